mod blocker;
mod enemy;
mod explosion;
mod formation;
mod mystery;
mod projectile;
mod ship;
mod ship_group;

// Re-export all public types
pub use blocker::{Blocker, make_all_blockers, make_blockers};
pub use enemy::Enemy;
pub use explosion::{Explosion, ExplosionKind, ShipExplosion};
pub use formation::EnemiesGroup;
pub use mystery::Mystery;
pub use projectile::{Projectile, ProjectileOwner};
pub use ship::Ship;
pub use ship_group::{ShipGroup, Slot, SwarmState};
