//! Game state and core simulation types
//!
//! Everything one session owns lives in [`GameState`]. Nothing outside it
//! holds references to entities.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Interval;
use super::collision::Aabb;
use crate::tuning::{Tuning, TuningError};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Debris falling, input live
    Active,
    /// Collision happened; only restart is accepted
    Over,
}

/// Advisory events raised during a tick, for audio and other observers.
/// They never feed back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A spawn tick added this many debris
    Spawned { count: u32 },
    /// Debris left the bottom edge this tick
    Scored { dodged: u32 },
    /// Fall speed was raised
    SpeedUp,
    /// Player was hit
    GameOver,
    /// Session was reset
    Restarted,
}

/// The player avatar. Only the horizontal offset moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
}

impl Player {
    /// Shift by `dx`, staying inside the play area
    pub fn shift(&mut self, dx: f32, tuning: &Tuning) {
        self.x = (self.x + dx).clamp(0.0, tuning.player_max_x());
    }

    /// Bounding box, anchored to the bottom edge
    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_rect(
            self.x,
            tuning.height - tuning.player_height,
            tuning.player_width,
            tuning.player_height,
        )
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pub id: u32,
    /// Fixed at spawn
    pub x: f32,
    pub y: f32,
}

impl Debris {
    pub fn bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_rect(self.x, self.y, tuning.debris_width, tuning.debris_height)
    }
}

/// Per-direction hold state for continuous movement
#[derive(Debug, Clone)]
pub struct HeldDirection {
    pub pressed: bool,
    pub repeat: Interval,
}

impl HeldDirection {
    fn new(period_ms: f32) -> Self {
        Self {
            pressed: false,
            repeat: Interval::new(period_ms),
        }
    }

    /// Start holding. A second press while held is ignored so key-repeat
    /// events never restart the timer.
    pub fn press(&mut self) {
        if !self.pressed {
            self.pressed = true;
            self.repeat.reset();
        }
    }

    pub fn release(&mut self) {
        self.pressed = false;
        self.repeat.reset();
    }

    /// Number of repeat steps due after `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if self.pressed {
            self.repeat.advance(dt_ms)
        } else {
            0
        }
    }
}

/// Hold state for both directions; each has its own timer
#[derive(Debug, Clone)]
pub struct Controls {
    pub left: HeldDirection,
    pub right: HeldDirection,
}

impl Controls {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            left: HeldDirection::new(tuning.move_repeat_ms),
            right: HeldDirection::new(tuning.move_repeat_ms),
        }
    }

    /// Cancel every pending repeat
    pub fn release_all(&mut self) {
        self.left.release();
        self.right.release();
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Validated balance parameters, fixed for the session
    pub(crate) tuning: Tuning,
    pub status: GameStatus,
    pub player: Player,
    /// Active debris, in spawn (id) order
    pub debris: Vec<Debris>,
    /// Current fall speed (pixels per frame)
    pub fall_speed: f32,
    pub score: u64,
    /// Animation ticks since the session started
    pub time_ticks: u64,
    pub controls: Controls,
    pub spawn_timer: Interval,
    pub ramp_timer: Interval,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Gameplay RNG, continues across restarts
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new game state with the given balance parameters.
    ///
    /// Tuning that would break an invariant (zero-width area, player wider
    /// than the area, burst chance outside [0, 1], ...) is rejected here so
    /// `tick` never sees it.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            status: GameStatus::Active,
            player: Player {
                x: tuning.player_start_x(),
            },
            debris: Vec::new(),
            fall_speed: tuning.initial_speed,
            score: 0,
            time_ticks: 0,
            controls: Controls::new(&tuning),
            spawn_timer: Interval::new(tuning.spawn_interval_ms),
            ramp_timer: Interval::new(tuning.ramp_interval_ms),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Allocate a new debris ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    /// Reset everything a session owns. The RNG stream carries on so the
    /// next session sees different debris.
    pub fn restart(&mut self) {
        let tuning = self.tuning;
        self.status = GameStatus::Active;
        self.player.x = tuning.player_start_x();
        self.debris.clear();
        self.fall_speed = tuning.initial_speed;
        self.score = 0;
        self.time_ticks = 0;
        self.controls.release_all();
        self.spawn_timer.reset();
        self.ramp_timer.reset();
        self.next_id = 0;
        log::info!("Session restarted");
    }

    /// Move to the terminal state and stop every periodic driver
    pub fn end(&mut self) {
        if self.status == GameStatus::Over {
            return;
        }
        self.status = GameStatus::Over;
        self.controls.release_all();
        self.events.push(GameEvent::GameOver);
        log::info!("Game over with score {}", self.score);
    }
}
