use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::SoundEvent;
use crate::config::{
    ENEMY_DEFAULT_POSITION, ENEMY_FIRE_INTERVAL_MS, ENEMY_MOVE_DOWN, GameConfig,
    NEXT_ROUND_DELAY_MS, RESPAWN_MS, STALE_SHIP_MS,
};
use crate::entities::{
    Blocker, EnemiesGroup, Explosion, Mystery, Projectile, ProjectileOwner, ShipGroup,
    make_all_blockers,
};
use crate::error::GameError;
use crate::quantum::{AmplitudeSource, MeasurementSource};
use crate::sprite::{Hitbox, ImageKey, RenderItem};

mod collision;

/// Anchor the swarm starts at on a fresh game
const START_ANCHOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Everything that lives on the playfield, advanced one tick at a time.
///
/// Timestamps are milliseconds on the caller's clock.
pub struct Game<Q> {
    config: GameConfig,
    source: Q,
    rng: StdRng,
    swarm: ShipGroup,
    enemies: EnemiesGroup,
    mystery: Mystery,
    bullets: Vec<Projectile>,
    enemy_bullets: Vec<Projectile>,
    explosions: Vec<Explosion>,
    blockers: Vec<Blocker>,
    score: u32,
    lives: u8,
    game_over: bool,
    /// Top row of the next formation; moves down every round
    enemy_position: i32,
    enemy_fire_timer: u64,
    pending_respawn: bool,
    /// When the swarm was last shot down
    ship_timer: u64,
    /// Anchor carried over to the respawned swarm
    ship_position: usize,
    round_cleared_at: Option<u64>,
    sounds: Vec<SoundEvent>,
}

impl<Q: AmplitudeSource + MeasurementSource> Game<Q> {
    pub fn new(config: GameConfig, source: Q, now: u64) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut swarm = ShipGroup::new(START_ANCHOR);
        swarm.update_probabilities(&source.amplitudes())?;
        let enemies = EnemiesGroup::new(
            config.enemy_rows,
            config.enemy_columns,
            ENEMY_DEFAULT_POSITION,
            now,
        );

        Ok(Self {
            lives: config.starting_lives,
            config,
            source,
            rng,
            swarm,
            enemies,
            mystery: Mystery::new(now),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            explosions: Vec::new(),
            blockers: make_all_blockers(),
            score: 0,
            game_over: false,
            enemy_position: ENEMY_DEFAULT_POSITION,
            enemy_fire_timer: now,
            pending_respawn: false,
            ship_timer: now,
            ship_position: START_ANCHOR,
            round_cleared_at: None,
            sounds: Vec::new(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_respawn_pending(&self) -> bool {
        self.pending_respawn
    }

    pub fn swarm(&self) -> &ShipGroup {
        &self.swarm
    }

    pub fn enemies(&self) -> &EnemiesGroup {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Projectile] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &[Projectile] {
        &self.enemy_bullets
    }

    pub fn blockers(&self) -> &[Blocker] {
        &self.blockers
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn source(&self) -> &Q {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut Q {
        &mut self.source
    }

    /// Sound triggers raised since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    /// The circuit was edited; pull fresh amplitudes into the swarm.
    pub fn circuit_changed(&mut self) -> Result<(), GameError> {
        self.swarm.update_probabilities(&self.source.amplitudes())
    }

    pub fn move_swarm_left(&mut self) {
        if !self.game_over {
            self.swarm.move_left();
        }
    }

    pub fn move_swarm_right(&mut self) {
        if !self.game_over {
            self.swarm.move_right();
        }
    }

    /// Fire a volley. Only one volley may be in flight, and nothing fires
    /// while the swarm is waiting to respawn. Returns the number of shots.
    pub fn fire(&mut self) -> usize {
        if self.game_over || self.pending_respawn || !self.bullets.is_empty() {
            return 0;
        }
        let shots = self.swarm.fire();
        let fired = shots.len();
        if fired > 0 {
            self.sounds.push(SoundEvent::Shoot);
        }
        self.bullets.extend(shots);
        fired
    }

    /// Advance the game to `now`: movement, enemy fire, then the ordered
    /// collision pass and the respawn timers.
    ///
    /// Every collision pass draws one measurement outcome, hit or not. It is
    /// checked before anything moves, so an `Err` leaves the game exactly as
    /// it was.
    pub fn tick(&mut self, now: u64) -> Result<(), GameError> {
        if self.game_over {
            return Ok(());
        }

        if self.enemies.is_empty() && self.explosions.is_empty() {
            let cleared_at = *self.round_cleared_at.get_or_insert(now);
            if now.saturating_sub(cleared_at) > NEXT_ROUND_DELAY_MS {
                self.next_round(now)?;
            }
            return Ok(());
        }

        let outcome = self.source.measure();
        if outcome >= self.swarm.len() {
            return Err(GameError::OutcomeOutOfRange {
                outcome,
                slots: self.swarm.len(),
            });
        }

        self.swarm.update(now);
        self.enemies.update(now);
        self.make_enemies_shoot(now);

        for bullet in self.bullets.iter_mut().chain(self.enemy_bullets.iter_mut()) {
            bullet.update();
        }
        self.bullets.retain(|b| !b.is_out_of_bounds());
        self.enemy_bullets.retain(|b| !b.is_out_of_bounds());

        if self.mystery.update(now) {
            self.sounds.push(SoundEvent::MysteryEntered);
        }
        self.explosions.retain(|e| !e.is_finished(now));

        self.check_collisions(outcome, now)?;
        if !self.game_over {
            self.create_new_ship(now)?;
        }
        Ok(())
    }

    fn make_enemies_shoot(&mut self, now: u64) {
        if now.saturating_sub(self.enemy_fire_timer) <= ENEMY_FIRE_INTERVAL_MS {
            return;
        }
        if let Some(shooter) = self.enemies.random_bottom(&mut self.rng) {
            let (x, y) = (shooter.x + 14, shooter.y + 20);
            self.enemy_bullets
                .push(Projectile::new(x, y, ProjectileOwner::Enemy));
            self.enemy_fire_timer = now;
        }
    }

    /// Book-keeping for a swarm that lost its ship `id`: a life, an
    /// explosion and a respawn timer, or the end of the game.
    fn lose_swarm(&mut self, id: usize, now: u64) {
        self.sounds.push(SoundEvent::ShipExplosion);
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            tracing::info!(score = self.score, "last life lost, game over");
            return;
        }

        self.swarm.explode(id, now);
        self.ship_position = self.swarm.anchor();
        self.ship_timer = now;
        self.pending_respawn = true;
        tracing::info!(ship = id, lives = self.lives, "swarm destroyed");
    }

    /// Poll the respawn timer. The later threshold wins, so a single tick
    /// never runs both steps.
    fn create_new_ship(&mut self, now: u64) -> Result<(), GameError> {
        if !self.pending_respawn {
            return Ok(());
        }
        let elapsed = now.saturating_sub(self.ship_timer);
        if elapsed > RESPAWN_MS {
            let mut swarm = ShipGroup::new(self.ship_position);
            swarm.update_probabilities(&self.source.amplitudes())?;
            self.swarm = swarm;
            self.pending_respawn = false;
            tracing::info!(anchor = self.ship_position, "swarm respawned");
        } else if elapsed > STALE_SHIP_MS
            && let Some(id) = self.swarm.measured_ship().map(|ship| ship.id)
        {
            self.swarm.destroy(id);
        }
        Ok(())
    }

    fn next_round(&mut self, now: u64) -> Result<(), GameError> {
        self.enemy_position += ENEMY_MOVE_DOWN;
        self.enemies = EnemiesGroup::new(
            self.config.enemy_rows,
            self.config.enemy_columns,
            self.enemy_position,
            now,
        );
        let mut swarm = ShipGroup::new(self.swarm.anchor());
        swarm.update_probabilities(&self.source.amplitudes())?;
        self.swarm = swarm;
        self.mystery = Mystery::new(now);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.pending_respawn = false;
        self.round_cleared_at = None;
        self.enemy_fire_timer = now;
        tracing::info!(
            enemy_position = self.enemy_position,
            score = self.score,
            "next round"
        );
        Ok(())
    }

    /// Whether the "next round" banner should be shown
    pub fn is_between_rounds(&self) -> bool {
        self.round_cleared_at.is_some()
    }

    pub fn render_items(&self, now: u64) -> Vec<RenderItem> {
        let mut items: Vec<RenderItem> = self.blockers.iter().map(Blocker::render_item).collect();
        items.extend(self.enemies.enemies().map(|enemy| enemy.render_item()));
        items.extend(self.mystery.render_item(now));
        items.extend(self.swarm.render_items(now));
        items.extend(self.bullets.iter().map(Projectile::render_item));
        items.extend(self.enemy_bullets.iter().map(Projectile::render_item));
        items.extend(self.explosions.iter().filter_map(|e| e.render_item(now)));
        // Life icons disappear from the right
        for life in 0..self.lives as i32 {
            let hitbox = Hitbox::new(715 + life * 27, 3, 23, 23);
            items.push(RenderItem::image(hitbox, ImageKey::Life, 1.0));
        }
        items
    }
}
