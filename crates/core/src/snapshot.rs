use crate::piece::{Piece, Pos};
use crate::types::{Lifecycle, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Render-facing view of one piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: usize,
    /// Exact anchor, possibly mid-animation.
    pub x: f64,
    pub y: f64,
    /// Occupied cells, anchor rounded up.
    pub cells: [Pos; 4],
    pub width: u8,
    pub height: u8,
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        let mut cells = [(0, 0); 4];
        for (slot, cell) in cells.iter_mut().zip(value.cells()) {
            *slot = cell;
        }
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells,
            width: value.width(),
            height: value.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    /// Grid codes: `0` empty, otherwise [`PieceKind::code`].
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current: PieceSnapshot,
    /// Final resting cells of the current piece; `None` while the preview is hidden.
    pub ghost: Option<[Pos; 4]>,
    /// Next piece at the origin, for the preview box.
    pub next: PieceSnapshot,
    pub lifecycle: Lifecycle,
    pub show_ghost: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let empty = PieceSnapshot::from(Piece::new(PieceKind::O));
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: empty,
            ghost: None,
            next: empty,
            lifecycle: Lifecycle::Ready,
            show_ghost: true,
            score: 0,
            level: 0,
            lines: 0,
        }
    }
}
