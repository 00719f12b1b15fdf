//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time is passed in, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::Interval;
pub use collision::{Aabb, find_collision};
pub use snapshot::Snapshot;
pub use spawn::{Placement, choose_offsets, spawn_burst};
pub use state::{Debris, GameEvent, GameState, GameStatus, Player};
pub use tick::{InputEvent, TickInput, tick};
