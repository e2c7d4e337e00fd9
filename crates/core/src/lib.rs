//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the falling-block rules and the animation scheduler.
//! It has **no dependencies** on terminals or I/O, so the same game runs
//! headless under test, in a benchmark, or behind the terminal front-end.
//!
//! # Module Structure
//!
//! - [`board`]: 14x20 grid with placement checks, locking, line clears and garbage rows
//! - [`pieces`]: rotation-state tables for the seven piece kinds
//! - [`piece`]: the falling piece, with a real-valued anchor for smooth motion
//! - [`animation`]: tick-driven interpolation of the piece's position
//! - [`game_state`]: the controller; lifecycle, commands, gravity and settling
//! - [`rng`]: seedable random source used for piece draws and garbage
//! - [`scoring`]: line rewards, level progression and drop speed
//! - [`snapshot`]: copyable render-facing view of the whole game
//!
//! # Game Rules
//!
//! - **Uniform draws**: every piece kind is equally likely, every time
//! - **Simple rotation**: clockwise only, nudged one column left or right if blocked
//! - **No lock delay**: a piece settles as soon as a downward step fails
//! - **Ghost piece**: shows where the current piece will land (toggleable)
//! - **Garbage**: a random row can be pushed in from the bottom for a bonus
//! - **Scoring**: 40/100/300/1200 per 1-4 lines, times `(level + 1)`
//!
//! # Example
//!
//! ```
//! use tetrys_core::GameState;
//! use tetrys_types::{Command, Lifecycle};
//!
//! let mut game = GameState::new(12345);
//! assert_eq!(game.lifecycle(), Lifecycle::Ready);
//!
//! // Any key starts the game.
//! game.apply(Command::StartOrResume);
//! game.apply(Command::MoveRight);
//! game.apply(Command::HardDrop);
//!
//! // The drop lands once its animation has played out.
//! game.tick(200);
//! assert_eq!(game.board().cells().iter().filter(|c| c.is_some()).count(), 4);
//! ```
//!
//! # Timing
//!
//! - **Tick Rate**: 16ms (approximately 60 FPS)
//! - **Gravity**: `(11 - level) * 50ms`, from 500ms at level 1 to 50ms at level 10
//! - **Animations**: 20ms for a one-cell move, 200ms for a hard drop
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod animation;
pub mod board;
pub mod game_state;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetrys_types as types;

// Re-export commonly used types for convenience
pub use animation::{Axis, Scheduler};
pub use board::Board;
pub use game_state::{Completion, GameState, Session};
pub use piece::{Piece, Pos};
pub use pieces::{get_shape, get_state};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score, drop_interval_ms};
pub use snapshot::{GameSnapshot, PieceSnapshot};
