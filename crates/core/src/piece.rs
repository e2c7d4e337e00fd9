//! Piece module - the falling tetromino instance
//!
//! The anchor is real-valued because movement animations slide it between
//! cells. Anything that needs grid cells goes through [`Piece::cells`], which
//! rounds the anchor up to the next whole cell.

use crate::pieces::{get_state, normalize_rotation, MinoOffset, RotationState};
use crate::types::PieceKind;

/// A board-space cell `(column, row)`.
pub type Pos = (i32, i32);

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Always within `0..state_count(kind)`.
    pub rotation: usize,
    pub x: f64,
    pub y: f64,
}

impl Piece {
    /// Create a piece at the top-left corner in its first rotation state.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Translate the anchor. No validation; placement is the board's call.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Advance the rotation index by `n` states; negative `n` rotates back.
    pub fn rotate(&mut self, n: i32) {
        self.rotation = normalize_rotation(self.kind, self.rotation as i32 + n);
    }

    pub fn state(&self) -> &'static RotationState {
        get_state(self.kind, self.rotation as i32)
    }

    /// Bounding-box width of the current rotation state.
    pub fn width(&self) -> u8 {
        self.state().width
    }

    /// Bounding-box height of the current rotation state.
    pub fn height(&self) -> u8 {
        self.state().height
    }

    /// Anchor rounded up to the grid.
    pub fn grid_origin(&self) -> Pos {
        (self.x.ceil() as i32, self.y.ceil() as i32)
    }

    /// Occupied board cells. The iterator is cheap and can be recreated at will.
    pub fn cells(&self) -> Cells {
        Cells {
            origin: self.grid_origin(),
            offsets: self.state().cells.iter(),
        }
    }
}

/// Iterator over a piece's board cells, see [`Piece::cells`].
#[derive(Debug, Clone)]
pub struct Cells {
    origin: Pos,
    offsets: std::slice::Iter<'static, MinoOffset>,
}

impl Iterator for Cells {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        let &(dx, dy) = self.offsets.next()?;
        Some((self.origin.0 + dx as i32, self.origin.1 + dy as i32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl ExactSizeIterator for Cells {}
