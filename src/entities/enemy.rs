use crate::config::{ENEMY_HEALTH, ENEMY_HEIGHT, ENEMY_WIDTH};
use crate::sprite::{Hitbox, ImageKey, RenderItem};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub row: usize,
    pub column: usize,
    pub x: i32,
    pub y: i32,
    pub health: f64,
    /// Two-frame animation index
    pub frame: usize,
}

impl Enemy {
    pub fn new(row: usize, column: usize, x: i32, y: i32) -> Self {
        Self {
            row,
            column,
            x,
            y,
            health: ENEMY_HEALTH,
            frame: 0,
        }
    }

    pub fn toggle_frame(&mut self) {
        self.frame = (self.frame + 1) % 2;
    }

    pub fn take_damage(&mut self, damage: f64) {
        self.health -= damage;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Damaged enemies fade, but never below a faint outline
    pub fn opacity(&self) -> f32 {
        ((self.health / ENEMY_HEALTH) as f32).max(50.0 / 255.0)
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    pub fn get_points(&self) -> u32 {
        match self.row {
            0 => 30,
            1 | 2 => 20,
            _ => 10,
        }
    }

    pub fn render_item(&self) -> RenderItem {
        RenderItem::image(
            self.hitbox(),
            ImageKey::Enemy {
                row: self.row,
                frame: self.frame,
            },
            self.opacity(),
        )
    }
}
