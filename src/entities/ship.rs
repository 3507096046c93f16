use num_complex::Complex64;

use super::projectile::{Projectile, ProjectileOwner};
use crate::config::{DISTRIBUTIONS, OFFSETS, POSITIONS, SCREEN_WIDTH, SHIP_Y};

/// One member of the swarm, tied to a single basis state.
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: usize,
    pub amplitude: Complex64,
    pub classical: bool,
}

impl Ship {
    pub fn new(id: usize) -> Self {
        let amplitude = Complex64::new((DISTRIBUTIONS[id] / 100.0).sqrt(), 0.0);
        Self {
            id,
            amplitude,
            classical: false,
        }
    }

    pub fn probability(&self) -> f64 {
        self.amplitude.norm_sqr()
    }

    /// Banded so that unlikely ships stay faintly visible instead of
    /// fading out in proportion to their probability.
    pub fn opacity(&self) -> f32 {
        if self.classical {
            return 1.0;
        }
        let p = self.probability();
        if p > 0.75 {
            1.0
        } else if p > 0.5 {
            0.8
        } else if p > 0.25 {
            0.6
        } else if p > 0.1 {
            0.35
        } else {
            0.0
        }
    }

    /// Screen x for this ship when the swarm sits at `anchor`, wrapping
    /// around the screen edges.
    pub fn anchored_x(&self, anchor: usize) -> i32 {
        (OFFSETS[self.id] + POSITIONS[anchor]).rem_euclid(SCREEN_WIDTH)
    }

    /// Classical ships always fire at full strength.
    pub fn fire(&self, anchor: usize) -> Projectile {
        let strength = if self.classical {
            1.0
        } else {
            self.probability()
        };
        Projectile::with_strength(
            self.anchored_x(anchor) + 23,
            SHIP_Y + 5,
            ProjectileOwner::Player,
            strength,
        )
    }
}
