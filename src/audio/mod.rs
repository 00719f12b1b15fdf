//! Sound reactions to simulation events
//!
//! Deciding *what* to play is platform independent and uses its own RNG, so
//! audio never disturbs the gameplay RNG stream. Playback lives in `web`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SCORE_SFX_CHANCE;
use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioSession;

/// Number of distinct score jingles
pub const SCORE_VARIANTS: u8 = 5;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// One of the score jingles (0-based variant)
    Score(u8),
    /// Player was hit
    GameOver,
}

/// Background music state across user gestures and page visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicLifecycle {
    /// Waiting for the first user gesture
    #[default]
    Idle,
    Playing,
    /// Page hidden (possibly in the back/forward cache)
    Suspended,
}

impl MusicLifecycle {
    /// First gesture starts playback; later gestures do nothing.
    /// Returns true when playback should begin.
    pub fn start(&mut self) -> bool {
        if *self != Self::Idle {
            return false;
        }
        *self = Self::Playing;
        true
    }

    /// Page hidden. Returns true when playing audio should pause.
    pub fn hide(&mut self) -> bool {
        if *self != Self::Playing {
            return false;
        }
        *self = Self::Suspended;
        true
    }

    /// Page shown again. Returns true when suspended audio should resume.
    pub fn show(&mut self) -> bool {
        if *self != Self::Suspended {
            return false;
        }
        *self = Self::Playing;
        true
    }
}

/// Picks sound effects for a tick's events
#[derive(Debug, Clone)]
pub struct SfxPicker {
    rng: Pcg32,
    score_chance: f64,
}

impl SfxPicker {
    pub fn new(seed: u64) -> Self {
        Self::with_chance(seed, SCORE_SFX_CHANCE)
    }

    pub fn with_chance(seed: u64, score_chance: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            score_chance: score_chance.clamp(0.0, 1.0),
        }
    }

    /// Sounds to play for the given events. A scoring frame rolls once no
    /// matter how many debris it dodged.
    pub fn react(&mut self, events: &[GameEvent]) -> Vec<SoundEffect> {
        let mut sounds = Vec::new();
        for event in events {
            match event {
                GameEvent::Scored { .. } => {
                    if self.rng.random_bool(self.score_chance) {
                        let variant = self.rng.random_range(0..SCORE_VARIANTS);
                        sounds.push(SoundEffect::Score(variant));
                    }
                }
                GameEvent::GameOver => sounds.push(SoundEffect::GameOver),
                GameEvent::Spawned { .. } | GameEvent::SpeedUp | GameEvent::Restarted => {}
            }
        }
        sounds
    }
}
