//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data with no dependencies, so it can be shared by
//! the rule engine, the key mapper and the terminal renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 14 columns (indexed 0-13)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `MOVE_ANIMATION_MS` | 20 | Slide time for a one-cell move or soft drop |
//! | `HARD_DROP_ANIMATION_MS` | 200 | Fall time for a hard drop, whatever the distance |
//! | `DROP_UNIT_MS` | 50 | Gravity period unit, scaled by `11 - level` |
//! | `KEY_FIRST_REPEAT_DELAY_MS` | 250 | Hold time before a key starts repeating |
//! | `KEY_REPEAT_INTERVAL_MS` | 20 | Interval between repeats of a held key |
//!
//! # Drop Period by Level
//!
//! | Level | Period |
//! |-------|--------|
//! | 1 | 500ms |
//! | 5 | 300ms |
//! | 10 | 50ms |
//!
//! # Examples
//!
//! ```
//! use tetrys_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_code(PieceKind::T.code()), Some(PieceKind::T));
//! assert!(Command::HardDrop.is_input());
//! assert!(!Command::TimerDrop.is_input());
//!
//! assert_eq!(BOARD_WIDTH, 14);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (14 columns)
pub const BOARD_WIDTH: u8 = 14;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Duration of the slide animation for a one-cell horizontal move or soft drop.
pub const MOVE_ANIMATION_MS: u32 = 20;

/// Duration of the hard drop fall animation.
pub const HARD_DROP_ANIMATION_MS: u32 = 200;

/// Gravity period unit. The drop period is `(11 - level) * DROP_UNIT_MS`.
pub const DROP_UNIT_MS: u32 = 50;

/// Level of a fresh session.
pub const START_LEVEL: u32 = 1;

/// Highest reachable level; gravity stops speeding up here.
pub const MAX_LEVEL: u32 = 10;

/// Lines needed per level step.
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear reward table, indexed by `lines - 1`.
///
/// Points are multiplied by `(level + 1)`.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// Flat score bonus for receiving a garbage row.
pub const GARBAGE_BONUS: u32 = 100;

/// Hold time before a held key starts repeating.
pub const KEY_FIRST_REPEAT_DELAY_MS: u32 = 250;

/// Interval between repeats of a held key.
pub const KEY_REPEAT_INTERVAL_MS: u32 = 20;

const _: () = assert!(BOARD_WIDTH > 0 && BOARD_HEIGHT > 0);
const _: () = assert!(BOARD_WIDTH >= 4, "the widest rotation state is 4 cells");
const _: () = assert!(START_LEVEL >= 1 && START_LEVEL <= MAX_LEVEL);
const _: () = assert!(MAX_LEVEL <= 10, "drop period is (11 - level) units");

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in a fixed order used for uniform random picks.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
    ];

    /// Uppercase letter, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Non-zero grid code used by snapshots (`0` means empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Session lifecycle.
///
/// `Ready` waits for the first key, `Running` plays, `Paused` freezes gravity and
/// animations, `Lost` waits for a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    #[default]
    Ready,
    Running,
    Paused,
    Lost,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Ready => "ready",
            Lifecycle::Running => "running",
            Lifecycle::Paused => "paused",
            Lifecycle::Lost => "lost",
        }
    }
}

/// Commands accepted by the game controller
///
/// Everything except [`Command::TimerDrop`] originates from player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the ready screen or resume from pause
    StartOrResume,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece clockwise, with a one-cell kick to either side
    RotateCw,
    /// Drop piece one cell, locking it if it cannot fall
    SoftDrop,
    /// Animate the piece to its resting row and lock it there
    HardDrop,
    /// Toggle between running and paused
    TogglePause,
    /// Push a random garbage row in from the bottom
    InjectGarbage,
    /// Start a fresh session after losing
    Restart,
    /// Show or hide the final-position preview
    ToggleGhost,
    /// Leave the program
    Quit,
    /// Gravity tick from the drop timer
    TimerDrop,
}

impl Command {
    /// Whether the command comes from the player (as opposed to the drop timer).
    pub fn is_input(&self) -> bool {
        !matches!(self, Command::TimerDrop)
    }
}

/// A cell on the game board
///
/// `None` is empty; `Some(kind)` remembers which piece locked there (for color only).
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_rule_constants() {
        assert_eq!(LINE_SCORES, [40, 100, 300, 1200]);
        assert_eq!(GARBAGE_BONUS, 100);
        assert_eq!(DROP_UNIT_MS, 50);
        assert_eq!(MOVE_ANIMATION_MS, 20);
        assert_eq!(HARD_DROP_ANIMATION_MS, 200);
        assert_eq!(MAX_LEVEL, 10);
    }

    #[test]
    fn reward_table_grows_super_linearly() {
        for k in 1..LINE_SCORES.len() {
            let per_line_before = LINE_SCORES[k - 1] / k as u32;
            let per_line_now = LINE_SCORES[k] / (k as u32 + 1);
            assert!(per_line_now > per_line_before);
        }
    }

    #[test]
    fn piece_codes_roundtrip_and_are_non_zero() {
        for kind in PieceKind::ALL {
            assert_ne!(kind.code(), 0);
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn only_the_drop_timer_is_not_player_input() {
        let all = [
            Command::StartOrResume,
            Command::MoveLeft,
            Command::MoveRight,
            Command::RotateCw,
            Command::SoftDrop,
            Command::HardDrop,
            Command::TogglePause,
            Command::InjectGarbage,
            Command::Restart,
            Command::ToggleGhost,
            Command::Quit,
        ];
        assert!(all.iter().all(Command::is_input));
        assert!(!Command::TimerDrop.is_input());
    }

    #[test]
    fn lifecycle_defaults_to_ready() {
        assert_eq!(Lifecycle::default(), Lifecycle::Ready);
    }
}
