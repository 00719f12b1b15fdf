//! Debris Dodge - a falling-debris arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, scoring, collisions)
//! - `platform`: Raw device input mapped onto simulation events
//! - `audio`: Advisory sound reactions to simulation events
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (pixels)
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player box, anchored to the bottom edge
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Pixels moved per repeat while a direction is held
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Repeat period for held directions (ms)
    pub const MOVE_REPEAT_MS: f32 = 16.0;

    /// Debris box
    pub const DEBRIS_WIDTH: f32 = 30.0;
    pub const DEBRIS_HEIGHT: f32 = 30.0;

    /// Fall speed (pixels per frame)
    pub const INITIAL_DEBRIS_SPEED: f32 = 3.0;
    pub const MAX_DEBRIS_SPEED: f32 = 12.0;
    pub const SPEED_INCREASE_AMOUNT: f32 = 0.3;
    /// Ramp period (ms)
    pub const SPEED_INCREASE_INTERVAL_MS: f32 = 2000.0;

    /// Spawn period (ms)
    pub const DEBRIS_INTERVAL_MS: f32 = 1000.0;
    /// Chance that a spawn tick drops a burst of 2-3 instead of 1
    pub const BURST_CHANCE: f64 = 0.25;
    /// Extra gap kept between debris of the same burst
    pub const SPAWN_MARGIN: f32 = 5.0;
    /// Placement retries before accepting an overlapping slot
    pub const SPAWN_ATTEMPTS: u32 = 10;

    /// Chance that a scoring frame triggers a sound effect
    pub const SCORE_SFX_CHANCE: f64 = 0.1;

    /// Longest frame the host feeds into one tick (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Shortest period accepted for any gameplay timer (ms)
    pub const MIN_PERIOD_MS: f32 = 1.0;
}
