//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It renders a [`core::GameSnapshot`] into a simple framebuffer that can be
//! flushed to a terminal backend.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)
//! - Send only changed cells to the terminal

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetrys_core as core;
pub use tetrys_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{kind_color, overlay_text, GameView, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
