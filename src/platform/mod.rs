//! Platform abstraction layer
//!
//! Translates raw device events into simulation [`InputEvent`]s:
//! - Keyboard arrows hold and release a direction
//! - On-screen buttons nudge one player width per press
//! - Restart keys only count once the game is over

pub mod input;

pub use input::{Button, map_button, map_key};
