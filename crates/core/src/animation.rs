//! Animation module - tick-driven linear interpolation of the falling piece
//!
//! The scheduler holds a set of running interpolations, each sliding one axis
//! of the active piece from a start value to an end value over a duration.
//! [`Scheduler::advance`] is called once per tick; an interpolation that reaches
//! (or overshoots) its end snaps to it exactly, is retired, and hands back its
//! completion value so the owner can act on it.
//!
//! The scheduler is generic over the completion type so it carries no
//! knowledge of what a completion means. It holds at most one interpolation
//! per axis, so storage is fixed-size and the tick path never allocates.

use arrayvec::ArrayVec;

use crate::piece::Piece;

/// One slot per [`Axis`].
pub const MAX_ANIMATIONS: usize = 2;

/// Completions handed back by one scheduler step.
pub type Completions<C> = ArrayVec<C, MAX_ANIMATIONS>;

/// Animatable attribute of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn read(self, piece: &Piece) -> f64 {
        match self {
            Axis::X => piece.x,
            Axis::Y => piece.y,
        }
    }

    pub fn write(self, piece: &mut Piece, value: f64) {
        match self {
            Axis::X => piece.x = value,
            Axis::Y => piece.y = value,
        }
    }
}

/// One running interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation<C> {
    pub axis: Axis,
    pub start: f64,
    pub end: f64,
    pub duration_ms: f64,
    /// Elapsed share of the duration, accumulated per advance.
    progress: f64,
    on_complete: Option<C>,
}

impl<C> Animation<C> {
    pub fn has_completion(&self) -> bool {
        self.on_complete.is_some()
    }

    fn value(&self) -> f64 {
        self.start + (self.end - self.start) * self.progress
    }

    fn reached_end(&self, value: f64) -> bool {
        if self.end >= self.start {
            value >= self.end
        } else {
            value <= self.end
        }
    }
}

/// Set of concurrently running interpolations.
#[derive(Debug, Clone)]
pub struct Scheduler<C> {
    active: ArrayVec<Animation<C>, MAX_ANIMATIONS>,
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            active: ArrayVec::new(),
        }
    }

    /// Register a new interpolation.
    ///
    /// Callers keep at most one interpolation per axis; scheduling over a
    /// running one replaces it. A non-positive duration completes on the next
    /// advance.
    pub fn schedule(
        &mut self,
        axis: Axis,
        start: f64,
        end: f64,
        duration_ms: f64,
        on_complete: Option<C>,
    ) {
        debug_assert!(
            !self.is_animating(axis),
            "{:?} already has a running interpolation",
            axis
        );
        self.active.retain(|a| a.axis != axis);
        self.active.push(Animation {
            axis,
            start,
            end,
            duration_ms,
            progress: 0.0,
            on_complete,
        });
    }

    /// Step every interpolation by `delta_ms`, writing new values onto `piece`.
    ///
    /// Returns the completions of interpolations that finished this step, in
    /// scheduling order. Each completion is returned exactly once.
    pub fn advance(&mut self, delta_ms: f64, piece: &mut Piece) -> Completions<C> {
        let mut done = Completions::new();
        let mut i = 0;
        while i < self.active.len() {
            let anim = &mut self.active[i];
            anim.progress = if anim.duration_ms > 0.0 {
                anim.progress + delta_ms / anim.duration_ms
            } else {
                1.0
            };
            let value = anim.value();

            if anim.reached_end(value) || anim.progress >= 1.0 {
                anim.axis.write(piece, anim.end);
                let finished = self.active.remove(i);
                if let Some(c) = finished.on_complete {
                    done.push(c);
                }
            } else {
                anim.axis.write(piece, value);
                i += 1;
            }
        }
        done
    }

    /// Snap every interpolation to its end value and retire it.
    ///
    /// Returns the completions the caller now owes, in scheduling order.
    pub fn finish_all(&mut self, piece: &mut Piece) -> Completions<C> {
        let mut done = Completions::new();
        for anim in self.active.drain(..) {
            anim.axis.write(piece, anim.end);
            if let Some(c) = anim.on_complete {
                done.push(c);
            }
        }
        done
    }

    pub fn is_animating(&self, axis: Axis) -> bool {
        self.active.iter().any(|a| a.axis == axis)
    }

    /// Whether any running interpolation still owes a completion.
    pub fn has_pending_completion(&self) -> bool {
        self.active.iter().any(Animation::has_completion)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop every interpolation without touching the piece or firing completions.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}
