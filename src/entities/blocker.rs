use crate::config::{BLOCKER_GROUPS, BLOCKER_SIZE, BLOCKERS_POSITION};
use crate::sprite::{Hitbox, ImageKey, RenderItem};

/// One destructible cell of a shield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocker {
    pub x: i32,
    pub y: i32,
}

impl Blocker {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, BLOCKER_SIZE, BLOCKER_SIZE)
    }

    pub fn render_item(&self) -> RenderItem {
        RenderItem::image(self.hitbox(), ImageKey::Blocker, 1.0)
    }
}

/// A 4x9 shield, `number` counting from the left edge
pub fn make_blockers(number: i32) -> Vec<Blocker> {
    let mut blockers = Vec::with_capacity(36);
    for row in 0..4 {
        for column in 0..9 {
            blockers.push(Blocker {
                x: 50 + 200 * number + column * BLOCKER_SIZE,
                y: BLOCKERS_POSITION + row * BLOCKER_SIZE,
            });
        }
    }
    blockers
}

/// All four shields
pub fn make_all_blockers() -> Vec<Blocker> {
    (0..BLOCKER_GROUPS).flat_map(make_blockers).collect()
}
