use crate::config::{ENEMY_HEIGHT, ENEMY_WIDTH, SHIP_HEIGHT, SHIP_WIDTH};
use crate::sprite::{ExplosionColor, Hitbox, ImageKey, RenderItem};

#[derive(Debug, Clone, PartialEq)]
pub enum ExplosionKind {
    Enemy { row: usize },
    /// Score popup left behind by the mystery ship
    Mystery { score: u32 },
}

/// Short-lived visual spawned when an enemy or the mystery ship dies
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    pub kind: ExplosionKind,
    pub started_at: u64,
}

impl Explosion {
    pub fn enemy(x: i32, y: i32, row: usize, now: u64) -> Self {
        Self {
            x,
            y,
            kind: ExplosionKind::Enemy { row },
            started_at: now,
        }
    }

    pub fn mystery(x: i32, y: i32, score: u32, now: u64) -> Self {
        Self {
            x: x + 20,
            y: y + 6,
            kind: ExplosionKind::Mystery { score },
            started_at: now,
        }
    }

    pub fn is_finished(&self, now: u64) -> bool {
        let passed = now.saturating_sub(self.started_at);
        match self.kind {
            ExplosionKind::Enemy { .. } => passed > 400,
            ExplosionKind::Mystery { .. } => passed > 600,
        }
    }

    pub fn render_item(&self, now: u64) -> Option<RenderItem> {
        let passed = now.saturating_sub(self.started_at);
        match self.kind {
            ExplosionKind::Enemy { row } => {
                let color = row_color(row);
                if passed <= 100 {
                    let hitbox = Hitbox::new(self.x, self.y, ENEMY_WIDTH, ENEMY_HEIGHT);
                    Some(RenderItem::image(
                        hitbox,
                        ImageKey::Explosion {
                            color,
                            large: false,
                        },
                        1.0,
                    ))
                } else if passed <= 200 {
                    let hitbox = Hitbox::new(
                        self.x - 6,
                        self.y - 6,
                        ENEMY_WIDTH + 10,
                        ENEMY_HEIGHT + 10,
                    );
                    Some(RenderItem::image(
                        hitbox,
                        ImageKey::Explosion { color, large: true },
                        1.0,
                    ))
                } else {
                    None
                }
            }
            // Blinks: on, off, on
            ExplosionKind::Mystery { score } => {
                if passed <= 200 || (400 < passed && passed <= 600) {
                    Some(RenderItem::text(self.x, self.y, score.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

fn row_color(row: usize) -> ExplosionColor {
    match row {
        0 => ExplosionColor::Purple,
        1 | 2 => ExplosionColor::Blue,
        _ => ExplosionColor::Green,
    }
}

/// What is left of the swarm's classical ship after it was shot down
#[derive(Debug, Clone, PartialEq)]
pub struct ShipExplosion {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub started_at: u64,
}

impl ShipExplosion {
    pub fn new(id: usize, x: i32, y: i32, now: u64) -> Self {
        Self {
            id,
            x,
            y,
            started_at: now,
        }
    }

    pub fn render_item(&self, now: u64) -> Option<RenderItem> {
        let passed = now.saturating_sub(self.started_at);
        if 300 < passed && passed <= 600 {
            let hitbox = Hitbox::new(self.x, self.y, SHIP_WIDTH, SHIP_HEIGHT);
            Some(RenderItem::image(hitbox, ImageKey::Ship, 1.0))
        } else {
            None
        }
    }
}
