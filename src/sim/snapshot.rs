//! Read-only view of a session for renderers

use serde::Serialize;

use super::state::{Debris, GameState, GameStatus};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player_x: f32,
    /// Active debris in spawn order
    pub debris: Vec<Debris>,
    pub score: u64,
    pub fall_speed: f32,
    pub status: GameStatus,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player_x: self.player.x,
            debris: self.debris.clone(),
            score: self.score,
            fall_speed: self.fall_speed,
            status: self.status,
        }
    }
}
