use serde::{Deserialize, Serialize};

use crate::obstacle::Obstacle;

/// Axis-aligned rectangle in screen pixels; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap: shared edges and zero-area rectangles never intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// True when `hitbox` overlaps any active obstacle.
pub fn collides(hitbox: &Rect, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obstacle| hitbox.intersects(&obstacle.rect))
}
