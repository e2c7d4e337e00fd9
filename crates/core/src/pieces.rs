//! Pieces module - Tetromino rotation-state tables
//!
//! Every piece kind owns an ordered list of rotation states. A state is the set
//! of occupied offsets inside its bounding box, listed row by row (top to
//! bottom, left to right), plus the box size. Rotation indices wrap around the
//! number of states, so any integer is a valid request.
//!
//! The tables are the classic "lying down first" shapes: L/J/T have four states,
//! S/Z/I have two (horizontal and vertical), O has one.

use crate::types::PieceKind;

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Mino offsets of one rotation state
pub type PieceShape = [MinoOffset; 4];

/// One orientation of a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    pub cells: PieceShape,
    pub width: u8,
    pub height: u8,
}

const fn state(cells: PieceShape, width: u8, height: u8) -> RotationState {
    RotationState {
        cells,
        width,
        height,
    }
}

// xxx   xx   ..x   x.
// x..   .x   xxx   x.
//       .x         xx
const L_STATES: [RotationState; 4] = [
    state([(0, 0), (1, 0), (2, 0), (0, 1)], 3, 2),
    state([(0, 0), (1, 0), (1, 1), (1, 2)], 2, 3),
    state([(2, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
    state([(0, 0), (0, 1), (0, 2), (1, 2)], 2, 3),
];

// xxx   .x   x..   xx
// ..x   .x   xxx   x.
//       xx         x.
const J_STATES: [RotationState; 4] = [
    state([(0, 0), (1, 0), (2, 0), (2, 1)], 3, 2),
    state([(1, 0), (1, 1), (0, 2), (1, 2)], 2, 3),
    state([(0, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
    state([(0, 0), (1, 0), (0, 1), (0, 2)], 2, 3),
];

const S_STATES: [RotationState; 2] = [
    state([(1, 0), (2, 0), (0, 1), (1, 1)], 3, 2),
    state([(0, 0), (0, 1), (1, 1), (1, 2)], 2, 3),
];

const Z_STATES: [RotationState; 2] = [
    state([(0, 0), (1, 0), (1, 1), (2, 1)], 3, 2),
    state([(1, 0), (0, 1), (1, 1), (0, 2)], 2, 3),
];

// xxx   .x   .x.   x.
// .x.   xx   xxx   xx
//       .x         x.
const T_STATES: [RotationState; 4] = [
    state([(0, 0), (1, 0), (2, 0), (1, 1)], 3, 2),
    state([(1, 0), (0, 1), (1, 1), (1, 2)], 2, 3),
    state([(1, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
    state([(0, 0), (0, 1), (1, 1), (0, 2)], 2, 3),
];

const O_STATES: [RotationState; 1] = [state([(0, 0), (1, 0), (0, 1), (1, 1)], 2, 2)];

// The vertical I keeps a blank left column, so its box is 2 wide.
const I_STATES: [RotationState; 2] = [
    state([(0, 0), (1, 0), (2, 0), (3, 0)], 4, 1),
    state([(1, 0), (1, 1), (1, 2), (1, 3)], 2, 4),
];

/// All rotation states of a piece kind, in clockwise order.
pub fn rotation_states(kind: PieceKind) -> &'static [RotationState] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Number of distinct rotation states for a kind.
pub fn state_count(kind: PieceKind) -> usize {
    rotation_states(kind).len()
}

/// Normalize any rotation request into `0..state_count(kind)`.
pub fn normalize_rotation(kind: PieceKind, rotation: i32) -> usize {
    rotation.rem_euclid(state_count(kind) as i32) as usize
}

/// Get the rotation state for a kind; `rotation` wraps modulo the state count.
pub fn get_state(kind: PieceKind, rotation: i32) -> &'static RotationState {
    &rotation_states(kind)[normalize_rotation(kind, rotation)]
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: i32) -> PieceShape {
    get_state(kind, rotation).cells
}
