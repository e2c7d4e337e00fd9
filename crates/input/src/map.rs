//! Key mapping from terminal events to game commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to a game command.
///
/// Every key maps to something: keys without a binding become
/// [`Command::StartOrResume`], so any key starts or resumes the game.
pub fn handle_key_event(key: KeyEvent) -> Command {
    if should_quit(key) {
        return Command::Quit;
    }
    match key.code {
        // Movement
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up => Command::RotateCw,
        KeyCode::Char(' ') => Command::HardDrop,

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('f') | KeyCode::Char('F') => Command::ToggleGhost,

        // Debug
        KeyCode::Char('g') | KeyCode::Char('G') => Command::InjectGarbage,

        _ => Command::StartOrResume,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
