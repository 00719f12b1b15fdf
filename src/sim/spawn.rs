//! Debris spawning with soft anti-overlap placement

use rand::Rng;

use super::state::{Debris, GameEvent, GameState};
use crate::tuning::Tuning;

/// Horizontal offsets chosen for one spawn burst
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub xs: Vec<f32>,
    /// How many offsets had to accept an overlapping slot
    pub fallbacks: u32,
}

/// Pick a burst size: usually 1, sometimes 2 or 3
pub fn roll_batch_size<R: Rng>(rng: &mut R, burst_chance: f64) -> u32 {
    if rng.random_bool(burst_chance) {
        rng.random_range(2..=3)
    } else {
        1
    }
}

/// A uniformly random debris offset in `[0, width - debris_width)`, whole pixels
pub fn random_x<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    let span = (tuning.width - tuning.debris_width).floor().max(1.0) as u32;
    rng.random_range(0..span) as f32
}

/// Choose `count` offsets, each at least `min_gap` from the ones before it.
///
/// Every offset gets up to `attempts` draws from `sample`. When none of them
/// is clear of the others, the draw farthest from its nearest neighbour is
/// used and overlap is accepted.
pub fn choose_offsets<F>(count: u32, min_gap: f32, attempts: u32, mut sample: F) -> Placement
where
    F: FnMut() -> f32,
{
    let mut xs: Vec<f32> = Vec::with_capacity(count as usize);
    let mut fallbacks = 0;

    for _ in 0..count {
        let mut best: Option<(f32, f32)> = None;
        let mut placed = None;

        for _ in 0..attempts.max(1) {
            let x = sample();
            let nearest = xs
                .iter()
                .map(|other| (other - x).abs())
                .fold(f32::INFINITY, f32::min);
            if nearest >= min_gap {
                placed = Some(x);
                break;
            }
            if best.is_none_or(|(_, d)| nearest > d) {
                best = Some((x, nearest));
            }
        }

        match (placed, best) {
            (Some(x), _) => xs.push(x),
            (None, Some((x, _))) => {
                fallbacks += 1;
                xs.push(x);
            }
            (None, None) => {}
        }
    }

    Placement { xs, fallbacks }
}

/// Run one spawn tick. No-op once the game is over.
pub fn spawn_burst(state: &mut GameState) -> u32 {
    if state.is_over() {
        return 0;
    }

    let tuning = state.tuning;
    let count = roll_batch_size(&mut state.rng, tuning.burst_chance);
    let placement = choose_offsets(count, tuning.spawn_gap(), tuning.spawn_attempts, || {
        random_x(&mut state.rng, &tuning)
    });

    if placement.fallbacks > 0 {
        log::debug!(
            "Spawn burst of {} accepted {} overlapping slot(s)",
            count,
            placement.fallbacks
        );
    }

    for x in placement.xs {
        let id = state.next_entity_id();
        state.debris.push(Debris { id, x, y: 0.0 });
    }

    state.events.push(GameEvent::Spawned { count });
    count
}
