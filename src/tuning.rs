//! Data-driven game balance
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall
//! back to the compiled-in defaults from [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} ({size}) does not fit inside the play area width ({width})")]
    TooWide {
        field: &'static str,
        size: f32,
        width: f32,
    },

    #[error("{field} must be at least {min} ms, got {value}")]
    PeriodTooShort {
        field: &'static str,
        value: f32,
        min: f32,
    },

    #[error("initial speed {initial} exceeds maximum speed {max}")]
    SpeedRange { initial: f32, max: f32 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[error("spawn_attempts must be at least 1")]
    NoAttempts,
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub move_repeat_ms: f32,
    pub debris_width: f32,
    pub debris_height: f32,
    pub initial_speed: f32,
    pub max_speed: f32,
    pub speed_increment: f32,
    pub ramp_interval_ms: f32,
    pub spawn_interval_ms: f32,
    pub burst_chance: f64,
    pub spawn_margin: f32,
    pub spawn_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            move_repeat_ms: MOVE_REPEAT_MS,
            debris_width: DEBRIS_WIDTH,
            debris_height: DEBRIS_HEIGHT,
            initial_speed: INITIAL_DEBRIS_SPEED,
            max_speed: MAX_DEBRIS_SPEED,
            speed_increment: SPEED_INCREASE_AMOUNT,
            ramp_interval_ms: SPEED_INCREASE_INTERVAL_MS,
            spawn_interval_ms: DEBRIS_INTERVAL_MS,
            burst_chance: BURST_CHANCE,
            spawn_margin: SPAWN_MARGIN,
            spawn_attempts: SPAWN_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the parameters describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("move_repeat_ms", self.move_repeat_ms),
            ("debris_width", self.debris_width),
            ("debris_height", self.debris_height),
            ("initial_speed", self.initial_speed),
            ("ramp_interval_ms", self.ramp_interval_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        // Timers fire in a loop per frame; a tiny period would spin it
        for (field, value) in [
            ("move_repeat_ms", self.move_repeat_ms),
            ("ramp_interval_ms", self.ramp_interval_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
        ] {
            if value < MIN_PERIOD_MS {
                return Err(TuningError::PeriodTooShort {
                    field,
                    value,
                    min: MIN_PERIOD_MS,
                });
            }
        }

        if self.speed_increment < 0.0 {
            return Err(TuningError::NotPositive {
                field: "speed_increment",
                value: self.speed_increment,
            });
        }
        if self.spawn_margin < 0.0 {
            return Err(TuningError::NotPositive {
                field: "spawn_margin",
                value: self.spawn_margin,
            });
        }

        for (field, size) in [
            ("player_width", self.player_width),
            ("debris_width", self.debris_width),
        ] {
            if size >= self.width {
                return Err(TuningError::TooWide {
                    field,
                    size,
                    width: self.width,
                });
            }
        }

        if self.initial_speed > self.max_speed {
            return Err(TuningError::SpeedRange {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }

        if !(0.0..=1.0).contains(&self.burst_chance) {
            return Err(TuningError::Probability {
                field: "burst_chance",
                value: self.burst_chance,
            });
        }

        if self.spawn_attempts == 0 {
            return Err(TuningError::NoAttempts);
        }

        Ok(())
    }

    /// Player offset at the start of a session (horizontally centered)
    pub fn player_start_x(&self) -> f32 {
        self.width / 2.0 - self.player_width / 2.0
    }

    /// Rightmost valid player offset
    pub fn player_max_x(&self) -> f32 {
        self.width - self.player_width
    }

    /// Minimum distance between offsets of the same spawn burst
    pub fn spawn_gap(&self) -> f32 {
        self.debris_width + self.spawn_margin
    }
}
