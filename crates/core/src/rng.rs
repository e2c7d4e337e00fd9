//! RNG module - seedable randomness for piece draws and garbage rows
//!
//! The controller never touches a global generator. It owns any
//! [`RandomSource`], so a game can be replayed from its seed and tests can
//! script the exact sequence of draws with [`SequenceRng`].

use crate::types::PieceKind;

/// Source of uniformly distributed `u32` values.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Random value in `[0, max)`. `max` must be non-zero.
    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fair coin.
    fn next_bool(&mut self) -> bool {
        self.next_range(2) == 1
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // The low bits of a power-of-two LCG have short periods; hand out the high half.
        self.state >> 16
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// `values` must not be empty.
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        Self { values, index: 0 }
    }

    /// A sequence that yields `kinds` in order from [`random_kind`].
    pub fn of_kinds(kinds: &[PieceKind]) -> Self {
        Self::new(kinds.iter().map(|&k| kind_index(k)).collect::<Vec<_>>())
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.index];
        self.index = (self.index + 1) % self.values.len();
        value
    }
}

fn kind_index(kind: PieceKind) -> u32 {
    PieceKind::ALL
        .iter()
        .position(|&k| k == kind)
        .map(|i| i as u32)
        .unwrap_or(0)
}

/// Uniform pick among the seven piece kinds.
pub fn random_kind<R: RandomSource + ?Sized>(rng: &mut R) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}
