//! Keyboard input handling

use crate::game::GamePhase;

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Jump,
    /// Left arrow held (true) or released (false)
    Left(bool),
    Right(bool),
    Submit,
    Restart,
    ToggleAutopilot,
}

/// Map a key down event in the given phase
pub fn key_down(key: &str, phase: GamePhase) -> Option<Intent> {
    match (key, phase) {
        (" ", GamePhase::Start) => Some(Intent::Start),
        (" " | "ArrowUp", GamePhase::Playing) => Some(Intent::Jump),
        ("ArrowLeft", _) => Some(Intent::Left(true)),
        ("ArrowRight", _) => Some(Intent::Right(true)),
        ("Enter", GamePhase::GameOver) => Some(Intent::Submit),
        ("r" | "R", GamePhase::GameOver) => Some(Intent::Restart),
        ("a" | "A", GamePhase::Start | GamePhase::Playing) => Some(Intent::ToggleAutopilot),
        _ => None,
    }
}

/// Map a key up event
pub fn key_up(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" => Some(Intent::Left(false)),
        "ArrowRight" => Some(Intent::Right(false)),
        _ => None,
    }
}
