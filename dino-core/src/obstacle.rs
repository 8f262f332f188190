use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::constants::{
    BIRD_HEIGHT, BIRD_WIDTH, BIRD_Y, LARGE_CACTUS_HEIGHT, LARGE_CACTUS_WIDTHS, LARGE_CACTUS_Y,
    SMALL_CACTUS_HEIGHT, SMALL_CACTUS_WIDTHS, SMALL_CACTUS_Y,
};
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    SmallCactus,
    LargeCactus,
    Bird,
}

/// Fixed size and height band for one `(kind, variant)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ObstacleKind {
    pub const ALL: [Self; 3] = [Self::SmallCactus, Self::LargeCactus, Self::Bird];

    /// Number of cluster variants the kind is drawn with.
    #[inline]
    pub fn variant_count(self) -> u8 {
        match self {
            Self::SmallCactus => SMALL_CACTUS_WIDTHS.len() as u8,
            Self::LargeCactus => LARGE_CACTUS_WIDTHS.len() as u8,
            Self::Bird => 1,
        }
    }

    /// Variants out of range are clamped to the widest cluster.
    pub fn geometry(self, variant: u8) -> Geometry {
        match self {
            Self::SmallCactus => Geometry {
                y: SMALL_CACTUS_Y,
                width: SMALL_CACTUS_WIDTHS[clamp_variant(variant, SMALL_CACTUS_WIDTHS.len())],
                height: SMALL_CACTUS_HEIGHT,
            },
            Self::LargeCactus => Geometry {
                y: LARGE_CACTUS_Y,
                width: LARGE_CACTUS_WIDTHS[clamp_variant(variant, LARGE_CACTUS_WIDTHS.len())],
                height: LARGE_CACTUS_HEIGHT,
            },
            Self::Bird => Geometry {
                y: BIRD_Y,
                width: BIRD_WIDTH,
                height: BIRD_HEIGHT,
            },
        }
    }
}

#[inline]
fn clamp_variant(variant: u8, len: usize) -> usize {
    core::cmp::min(variant as usize, len - 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub variant: u8,
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, variant: u8, x: i32) -> Self {
        let geometry = kind.geometry(variant);
        Self {
            kind,
            variant,
            rect: Rect::new(x, geometry.y, geometry.width, geometry.height),
        }
    }

    /// Trailing edge has crossed the left boundary.
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.rect.x < -self.rect.width
    }
}

/// The single obstacle timeline shared by every agent of a generation.
///
/// At most one obstacle is active: a new one is drawn only on a tick that
/// starts with the set empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleStream {
    active: Vec<Obstacle>,
    spawned: u32,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self {
            active: Vec::with_capacity(1),
            spawned: 0,
        }
    }

    #[inline]
    pub fn active(&self) -> &[Obstacle] {
        &self.active
    }

    #[inline]
    pub fn nearest(&self) -> Option<&Obstacle> {
        self.active.first()
    }

    #[inline]
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Spawn-if-empty, scroll left by `speed`, then retire what left the
    /// screen. A retired obstacle is replaced on the following tick.
    pub fn advance(&mut self, speed: i32, spawn_x: i32, rng: &mut SeededRng) {
        if self.active.is_empty() {
            let obstacle = Self::draw(spawn_x, rng);
            self.active.push(obstacle);
            self.spawned += 1;
        }

        for obstacle in &mut self.active {
            obstacle.rect.x -= speed;
        }

        self.active.retain(|obstacle| !obstacle.is_off_screen());
    }

    fn draw(spawn_x: i32, rng: &mut SeededRng) -> Obstacle {
        let kind = ObstacleKind::ALL[rng.next_int(ObstacleKind::ALL.len() as u32) as usize];
        let variant = match kind.variant_count() {
            1 => 0,
            count => rng.next_int(count as u32) as u8,
        };
        Obstacle::new(kind, variant, spawn_x)
    }
}
