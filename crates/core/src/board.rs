//! Board module - manages the game grid
//!
//! The board is a 14x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..13 (left to right), y ranges 0..19 (top to bottom)

use crate::piece::Piece;
use crate::rng::{random_kind, RandomSource};
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = WIDTH * HEIGHT;

/// The game board - 14 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= WIDTH as i32 || y < 0 || y >= HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Whether every cell of `piece` (rounded up to the grid) is on the board and empty.
    pub fn can_place(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| self.is_valid(x, y))
    }

    /// Write the piece's kind into every cell it covers.
    ///
    /// Cells outside the board are skipped; the caller decides whether the
    /// position was legal.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
    }

    /// Remove every complete row, letting the rows above fall, and return how many went.
    ///
    /// Uses a two-pointer compaction from the bottom up; the result equals removing
    /// each full row and inserting an empty row at the top once per removal.
    pub fn clear_completed_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + WIDTH, write_y * WIDTH);
                }
            }
        }

        // Fresh empty rows at the top
        self.cells[..write_y * WIDTH].fill(None);

        cleared
    }

    /// Push a garbage row in from the bottom; the top row is discarded.
    ///
    /// Each new cell is a coin flip between empty and a uniformly chosen kind.
    /// The row is not checked for completeness.
    pub fn inject_garbage<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.cells.copy_within(WIDTH.., 0);
        for cell in &mut self.cells[(HEIGHT - 1) * WIDTH..] {
            *cell = if rng.next_bool() {
                Some(random_kind(rng))
            } else {
                None
            };
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of the board, left to right.
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// Write the board as grid codes: `0` empty, else
    /// [`PieceKind::code`](crate::types::PieceKind::code).
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * WIDTH + x].map_or(0, |k| k.code());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill an entire row with `cell`. Out-of-range rows are ignored.
    pub fn fill_row(&mut self, y: usize, cell: Cell) {
        if y < HEIGHT {
            self.cells[y * WIDTH..(y + 1) * WIDTH].fill(cell);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
