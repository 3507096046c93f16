use crate::config::{
    BULLET_HEIGHT, BULLET_MAX_DAMAGE, BULLET_WIDTH, ENEMY_LASER_SPEED, LASER_SPEED,
};
use crate::sprite::{Hitbox, ImageKey, RenderItem};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    pub owner: ProjectileOwner,
    /// Damage multiplier; the firing ship's probability while superposed
    pub strength: f64,
}

impl Projectile {
    pub fn new(x: i32, y: i32, owner: ProjectileOwner) -> Self {
        Self::with_strength(x, y, owner, 1.0)
    }

    pub fn with_strength(x: i32, y: i32, owner: ProjectileOwner, strength: f64) -> Self {
        Self {
            x,
            y,
            owner,
            strength,
        }
    }

    pub fn damage(&self) -> f64 {
        // +1 keeps a full-strength shot lethal despite float rounding
        BULLET_MAX_DAMAGE * self.strength + 1.0
    }

    pub fn update(&mut self) {
        match self.owner {
            ProjectileOwner::Player => self.y -= LASER_SPEED,
            ProjectileOwner::Enemy => self.y += ENEMY_LASER_SPEED,
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.y < 15 || self.y > 650
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }

    pub fn opacity(&self) -> f32 {
        match self.owner {
            ProjectileOwner::Enemy => 1.0,
            ProjectileOwner::Player if self.strength > 0.01 => self.strength.max(0.5) as f32,
            ProjectileOwner::Player => 0.0,
        }
    }

    pub fn render_item(&self) -> RenderItem {
        let key = match self.owner {
            ProjectileOwner::Player => ImageKey::Laser,
            ProjectileOwner::Enemy => ImageKey::EnemyLaser,
        };
        RenderItem::image(self.hitbox(), key, self.opacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new() {
        let projectile = Projectile::new(10, 100, ProjectileOwner::Player);
        assert_eq!(projectile.x, 10);
        assert_eq!(projectile.y, 100);
        assert_eq!(projectile.owner, ProjectileOwner::Player);
        assert_eq!(projectile.damage(), 97.0);
    }

    #[test]
    fn test_player_projectile_moves_up() {
        let mut projectile = Projectile::new(10, 100, ProjectileOwner::Player);
        projectile.update();
        assert_eq!(projectile.y, 85);
    }

    #[test]
    fn test_enemy_projectile_moves_down() {
        let mut projectile = Projectile::new(10, 100, ProjectileOwner::Enemy);
        projectile.update();
        assert_eq!(projectile.y, 105);
    }

    #[test]
    fn test_projectile_out_of_bounds() {
        assert!(Projectile::new(0, 10, ProjectileOwner::Player).is_out_of_bounds());
        assert!(Projectile::new(10, 651, ProjectileOwner::Enemy).is_out_of_bounds());
        assert!(!Projectile::new(10, 300, ProjectileOwner::Enemy).is_out_of_bounds());
    }

    #[test]
    fn test_weak_shot_damage_and_opacity() {
        let weak = Projectile::with_strength(0, 300, ProjectileOwner::Player, 0.25);
        assert_eq!(weak.damage(), 25.0);
        assert_eq!(weak.opacity(), 0.5);

        let ghost = Projectile::with_strength(0, 300, ProjectileOwner::Player, 0.0);
        assert_eq!(ghost.damage(), 1.0);
        assert_eq!(ghost.opacity(), 0.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_moves_in_correct_direction(
                initial_x in 0i32..800,
                initial_y in 20i32..640,
                owner in prop::sample::select(vec![ProjectileOwner::Player, ProjectileOwner::Enemy])
            ) {
                let mut projectile = Projectile::new(initial_x, initial_y, owner);
                projectile.update();

                match owner {
                    ProjectileOwner::Player => prop_assert!(projectile.y < initial_y),
                    ProjectileOwner::Enemy => prop_assert!(projectile.y > initial_y),
                }
                prop_assert_eq!(projectile.x, initial_x);
            }

            #[test]
            fn test_damage_grows_with_strength(a in 0.0f64..1.0, b in 0.0f64..1.0) {
                let weak = Projectile::with_strength(0, 300, ProjectileOwner::Player, a.min(b));
                let strong = Projectile::with_strength(0, 300, ProjectileOwner::Player, a.max(b));
                prop_assert!(weak.damage() <= strong.damage());
            }
        }
    }
}
