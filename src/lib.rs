// Library exports for testing
pub use audio::SoundEvent;
pub use config::GameConfig;
pub use entities::{
    Blocker, EnemiesGroup, Enemy, Explosion, Mystery, Projectile, ProjectileOwner, Ship,
    ShipGroup, Slot, SwarmState,
};
pub use error::GameError;
pub use game::{Game, GameState};
pub use quantum::{AmplitudeSource, MeasurementSource, Preset, PresetCircuit};
pub use sprite::{Hitbox, ImageKey, RenderItem, Visual};

pub mod app;
pub mod audio;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod quantum;
pub mod renderer;
pub mod sprite;
