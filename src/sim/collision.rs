//! Axis-aligned box overlap between the player and falling debris

use glam::Vec2;

use super::state::{Debris, Player};
use crate::tuning::Tuning;

/// Axis-aligned bounding box in play-area coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Strict overlap: boxes that only touch along an edge do not collide
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Returns the first debris overlapping the player, if any.
///
/// Which one is reported does not matter to the game; only existence does.
pub fn find_collision<'a>(
    player: &Player,
    debris: &'a [Debris],
    tuning: &Tuning,
) -> Option<&'a Debris> {
    let player_box = player.bounds(tuning);
    debris
        .iter()
        .find(|d| d.bounds(tuning).intersects(&player_box))
}
