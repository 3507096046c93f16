use crate::config::{
    MYSTERY_HEIGHT, MYSTERY_MOVE_TIME_MS, MYSTERY_WIDTH, MYSTERY_Y, SCREEN_WIDTH,
};
use crate::sprite::{Hitbox, ImageKey, RenderItem};

/// Bonus ship that crosses the top of the screen every so often
#[derive(Debug, Clone)]
pub struct Mystery {
    pub x: i32,
    pub y: i32,
    pub direction: i32,
    timer: u64,
    announce: bool,
}

impl Mystery {
    pub fn new(now: u64) -> Self {
        Self {
            x: -80,
            y: MYSTERY_Y,
            direction: 1,
            timer: now,
            announce: true,
        }
    }

    fn is_active(&self, now: u64) -> bool {
        now.saturating_sub(self.timer) > MYSTERY_MOVE_TIME_MS
    }

    /// Moves the ship along its pass. Returns true on the tick it enters
    /// the screen.
    pub fn update(&mut self, now: u64) -> bool {
        let active = self.is_active(now);
        let mut entered = false;

        if active {
            if (self.x < 0 || self.x > SCREEN_WIDTH) && self.announce {
                entered = true;
                self.announce = false;
            }
            if self.x < 840 && self.direction == 1 {
                self.x += 2;
            }
            if self.x > -100 && self.direction == -1 {
                self.x -= 2;
            }
        }

        let mut turned = false;
        if self.x > 830 {
            self.announce = true;
            self.direction = -1;
            turned = true;
        }
        if self.x < -90 {
            self.announce = true;
            self.direction = 1;
            turned = true;
        }
        if active && turned {
            self.timer = now;
        }

        entered
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, MYSTERY_WIDTH, MYSTERY_HEIGHT)
    }

    pub fn render_item(&self, now: u64) -> Option<RenderItem> {
        self.is_active(now)
            .then(|| RenderItem::image(self.hitbox(), ImageKey::Mystery, 1.0))
    }
}
