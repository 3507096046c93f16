/// Axis-aligned box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Hitbox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionColor {
    Purple,
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKey {
    Ship,
    Mystery,
    /// Enemy sprite by row, with its two-frame animation index
    Enemy { row: usize, frame: usize },
    Explosion { color: ExplosionColor, large: bool },
    Laser,
    EnemyLaser,
    Blocker,
    Life,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Image(ImageKey),
    Text(String),
}

/// One thing to draw this frame. Drawing itself happens in the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub hitbox: Hitbox,
    pub visual: Visual,
    /// 0.0 is fully transparent, 1.0 fully opaque
    pub opacity: f32,
}

impl RenderItem {
    pub fn image(hitbox: Hitbox, key: ImageKey, opacity: f32) -> Self {
        Self {
            hitbox,
            visual: Visual::Image(key),
            opacity,
        }
    }

    pub fn text(x: i32, y: i32, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            hitbox: Hitbox::new(x, y, text.len() as i32 * 10, 20),
            visual: Visual::Text(text),
            opacity: 1.0,
        }
    }
}
