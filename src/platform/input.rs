//! Raw input mapping

use crate::sim::{GameStatus, InputEvent};

/// On-screen touch/click buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Restart,
}

/// Map a keyboard event (DOM `KeyboardEvent.key` naming).
///
/// Auto-repeat keydowns are dropped; the simulation already repeats held
/// directions on its own timer.
pub fn map_key(key: &str, down: bool, repeat: bool, status: GameStatus) -> Option<InputEvent> {
    if down && repeat {
        return None;
    }
    match (key, down) {
        ("ArrowLeft" | "a" | "A", true) => Some(InputEvent::MoveLeftStart),
        ("ArrowLeft" | "a" | "A", false) => Some(InputEvent::MoveLeftEnd),
        ("ArrowRight" | "d" | "D", true) => Some(InputEvent::MoveRightStart),
        ("ArrowRight" | "d" | "D", false) => Some(InputEvent::MoveRightEnd),
        (" " | "Enter" | "r" | "R", true) if status == GameStatus::Over => {
            Some(InputEvent::Restart)
        }
        _ => None,
    }
}

/// Map an on-screen button press
pub fn map_button(button: Button, status: GameStatus) -> Option<InputEvent> {
    match (button, status) {
        (Button::Restart, GameStatus::Over) => Some(InputEvent::Restart),
        (Button::Restart, GameStatus::Active) => None,
        (Button::Left, _) => Some(InputEvent::NudgeLeft),
        (Button::Right, _) => Some(InputEvent::NudgeRight),
    }
}
