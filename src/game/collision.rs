use rand::Rng;

use super::Game;
use crate::audio::SoundEvent;
use crate::config::{BLOCKERS_POSITION, FATAL_BOTTOM_Y, MYSTERY_SCORES, PLAYER_ROW_Y};
use crate::entities::{Blocker, Explosion, Mystery, Projectile, SwarmState};
use crate::error::GameError;
use crate::quantum::{AmplitudeSource, MeasurementSource};

impl<Q: AmplitudeSource + MeasurementSource> Game<Q> {
    /// One collision pass. The order matters: bullets cancel each other
    /// before anything else can be hit, and the swarm is measured before
    /// the formation gets a chance to crash into it. `outcome` is this
    /// pass's measurement, already known to be in range.
    pub(super) fn check_collisions(&mut self, outcome: usize, now: u64) -> Result<(), GameError> {
        self.resolve_bullet_clashes();
        self.resolve_enemy_hits(now);
        self.resolve_mystery_hits(now);
        self.resolve_swarm_hits(outcome, now)?;
        self.resolve_invasion();
        resolve_blocker_hits(&mut self.bullets, &mut self.blockers);
        resolve_blocker_hits(&mut self.enemy_bullets, &mut self.blockers);
        if self.enemies.bottom() >= BLOCKERS_POSITION {
            let enemies = &self.enemies;
            self.blockers.retain(|blocker| {
                !enemies
                    .enemies()
                    .any(|enemy| enemy.hitbox().overlaps(&blocker.hitbox()))
            });
        }
        Ok(())
    }

    /// Player and enemy bullets that touch destroy each other
    fn resolve_bullet_clashes(&mut self) {
        let mut friendly_spent = vec![false; self.bullets.len()];
        let mut enemy_spent = vec![false; self.enemy_bullets.len()];
        for (i, bullet) in self.bullets.iter().enumerate() {
            for (j, enemy_bullet) in self.enemy_bullets.iter().enumerate() {
                if bullet.hitbox().overlaps(&enemy_bullet.hitbox()) {
                    friendly_spent[i] = true;
                    enemy_spent[j] = true;
                }
            }
        }
        remove_marked(&mut self.bullets, &friendly_spent);
        remove_marked(&mut self.enemy_bullets, &enemy_spent);
    }

    /// Each enemy touched by player bullets takes the damage of the first
    /// of them. Every touching bullet is consumed.
    fn resolve_enemy_hits(&mut self, now: u64) {
        let mut spent = vec![false; self.bullets.len()];
        let mut hits = Vec::new();
        for enemy in self.enemies.enemies() {
            let hitbox = enemy.hitbox();
            let mut damage = None;
            for (i, bullet) in self.bullets.iter().enumerate() {
                if bullet.hitbox().overlaps(&hitbox) {
                    spent[i] = true;
                    damage.get_or_insert(bullet.damage());
                }
            }
            if let Some(damage) = damage {
                hits.push((enemy.row, enemy.column, damage));
            }
        }
        remove_marked(&mut self.bullets, &spent);

        for (row, column, damage) in hits {
            self.sounds.push(SoundEvent::InvaderKilled);
            if let Some(dead) = self.enemies.apply_damage(row, column, damage) {
                self.score += dead.get_points();
                self.explosions
                    .push(Explosion::enemy(dead.x, dead.y, dead.row, now));
                tracing::debug!(row, column, score = self.score, "enemy destroyed");
            }
        }
    }

    fn resolve_mystery_hits(&mut self, now: u64) {
        let hitbox = self.mystery.hitbox();
        let before = self.bullets.len();
        self.bullets.retain(|bullet| !bullet.hitbox().overlaps(&hitbox));
        if self.bullets.len() == before {
            return;
        }

        let score = MYSTERY_SCORES[self.rng.random_range(0..MYSTERY_SCORES.len())];
        self.score += score;
        self.sounds.push(SoundEvent::MysteryKilled);
        self.explosions
            .push(Explosion::mystery(self.mystery.x, self.mystery.y, score, now));
        self.mystery = Mystery::new(now);
        tracing::info!(score, "mystery ship destroyed");
    }

    /// In superposition a hit collapses the swarm onto `outcome`. It only
    /// costs a life when the surviving ship is one of those hit.
    fn resolve_swarm_hits(&mut self, outcome: usize, now: u64) -> Result<(), GameError> {
        let mut spent = vec![false; self.enemy_bullets.len()];
        let mut hit = Vec::new();
        for (j, bullet) in self.enemy_bullets.iter().enumerate() {
            let ids = self.swarm.ships_hit_by(&bullet.hitbox());
            if !ids.is_empty() {
                spent[j] = true;
                hit.extend(ids);
            }
        }
        remove_marked(&mut self.enemy_bullets, &spent);
        if hit.is_empty() {
            return Ok(());
        }

        match self.swarm.state() {
            SwarmState::Superposition => {
                let observable = hit.iter().any(|&id| {
                    self.swarm
                        .ship(id)
                        .is_some_and(|ship| ship.probability() > 0.0)
                });
                if !observable {
                    return Ok(());
                }
                self.swarm.measure(outcome, now)?;
                if hit.contains(&outcome) {
                    self.lose_swarm(outcome, now);
                }
            }
            SwarmState::Measured { ship, .. } => {
                self.lose_swarm(ship, now);
            }
        }
        Ok(())
    }

    /// Once the formation is down at the player's row, enemies crash into
    /// ships. Losing every ship that way, or reaching the bottom, ends the game.
    fn resolve_invasion(&mut self) {
        let bottom = self.enemies.bottom();
        if bottom < PLAYER_ROW_Y {
            return;
        }

        let mut crashes = Vec::new();
        for enemy in self.enemies.enemies() {
            let hitbox = enemy.hitbox();
            for ship in self.swarm.present_ships() {
                if self.swarm.ship_hitbox(ship).overlaps(&hitbox) {
                    crashes.push((enemy.row, enemy.column, ship.id));
                }
            }
        }
        for &(row, column, id) in &crashes {
            self.enemies.kill(row, column);
            self.swarm.destroy(id);
        }

        let swarm_lost = !crashes.is_empty() && self.swarm.is_empty();
        if swarm_lost || bottom >= FATAL_BOTTOM_Y {
            self.game_over = true;
            tracing::info!(bottom, score = self.score, "invaders reached the ground, game over");
        }
    }
}

/// Bullets and shield cells that touch destroy each other
fn resolve_blocker_hits(bullets: &mut Vec<Projectile>, blockers: &mut Vec<Blocker>) {
    let mut cells_hit = vec![false; blockers.len()];
    let mut spent = vec![false; bullets.len()];
    for (i, bullet) in bullets.iter().enumerate() {
        let hitbox = bullet.hitbox();
        for (j, blocker) in blockers.iter().enumerate() {
            if blocker.hitbox().overlaps(&hitbox) {
                cells_hit[j] = true;
                spent[i] = true;
            }
        }
    }
    remove_marked(bullets, &spent);
    remove_marked(blockers, &cells_hit);
}

/// Drop the items whose flag is set; `marked` is parallel to `items`.
fn remove_marked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked.get(index).copied().unwrap_or(false);
        index += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_marked_keeps_order() {
        let mut items = vec![1, 2, 3, 4, 5];
        remove_marked(&mut items, &[false, true, false, true, false]);
        assert_eq!(items, vec![1, 3, 5]);
    }

    #[test]
    fn test_blocker_absorbs_one_bullet_per_cell() {
        let mut blockers = vec![Blocker { x: 100, y: 450 }, Blocker { x: 300, y: 450 }];
        let mut bullets = vec![
            Projectile::new(102, 445, crate::entities::ProjectileOwner::Enemy),
            Projectile::new(500, 445, crate::entities::ProjectileOwner::Enemy),
        ];
        resolve_blocker_hits(&mut bullets, &mut blockers);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].x, 500);
        assert_eq!(blockers, vec![Blocker { x: 300, y: 450 }]);
    }
}
