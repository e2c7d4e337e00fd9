//! Game state module - the rule controller
//!
//! Owns the session (board, current and next piece, counters), the lifecycle
//! state machine, the animation scheduler and the random source. Every rule
//! runs here: command dispatch, movement and rotation trials, settling, line
//! clears, scoring, level progression and game over detection.
//!
//! Movement commits the logical position immediately and then schedules a
//! short interpolation for display. Before any further piece command the
//! in-flight interpolations are snapped to their end, so collision checks
//! always see committed positions. A hard drop is the exception: its
//! interpolation carries the settle as its completion, and piece commands are
//! ignored until it lands.

use tracing::{debug, info};

use crate::animation::{Axis, Scheduler};
use crate::board::Board;
use crate::piece::{Piece, Pos};
use crate::rng::{random_kind, RandomSource, SimpleRng};
use crate::scoring::{calculate_level, calculate_line_score, drop_interval_ms};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{
    Command, Lifecycle, BOARD_WIDTH, GARBAGE_BONUS, HARD_DROP_ANIMATION_MS, MOVE_ANIMATION_MS,
    START_LEVEL,
};

/// What the controller does when an interpolation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Lock the current piece where it stands and carry on.
    SettlePiece,
}

/// Per-game data. Replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    current: Piece,
    next: Piece,
    score: u32,
    lines: u32,
    level: u32,
    drop_interval_ms: u32,
}

impl Session {
    /// Fresh board, counters at their starting values, and the first piece promoted.
    pub fn new<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let first = Piece::new(random_kind(rng));
        let mut session = Self {
            board: Board::new(),
            current: first,
            next: first,
            score: 0,
            lines: 0,
            level: START_LEVEL,
            drop_interval_ms: drop_interval_ms(START_LEVEL),
        };
        session.promote_next(rng);
        session
    }

    /// Make the next piece current, centered at the top, and draw a new next.
    ///
    /// Returns whether the promoted piece fits where it spawned.
    fn promote_next<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        let incoming = Piece::new(random_kind(rng));
        let mut current = std::mem::replace(&mut self.next, incoming);
        current.x = f64::from((BOARD_WIDTH - current.width()) / 2);
        current.y = 0.0;
        self.current = current;
        self.board.can_place(&self.current)
    }

    /// Credit a settle that cleared `cleared` rows. Returns whether the level changed.
    fn credit_lines(&mut self, cleared: usize) -> bool {
        if cleared == 0 {
            return false;
        }
        // Reward uses the level in force before this clear.
        self.score += calculate_line_score(cleared, self.level);
        self.lines += cleared as u32;
        let level = calculate_level(self.lines);
        if level == self.level {
            return false;
        }
        self.level = level;
        self.drop_interval_ms = drop_interval_ms(level);
        true
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    session: Session,
    lifecycle: Lifecycle,
    animations: Scheduler<Completion>,
    rng: R,
    /// Time since the last gravity step.
    drop_timer_ms: u32,
    show_ghost: bool,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new game drawing from `rng`. The game waits in [`Lifecycle::Ready`].
    pub fn with_rng(mut rng: R) -> Self {
        let session = Session::new(&mut rng);
        Self {
            session,
            lifecycle: Lifecycle::Ready,
            animations: Scheduler::new(),
            rng,
            drop_timer_ms: 0,
            show_ghost: true,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn board(&self) -> &Board {
        &self.session.board
    }

    /// Board access for scenario setup and debugging tools.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.session.board
    }

    pub fn current(&self) -> &Piece {
        &self.session.current
    }

    pub fn next(&self) -> &Piece {
        &self.session.next
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn lines(&self) -> u32 {
        self.session.lines
    }

    pub fn level(&self) -> u32 {
        self.session.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.session.drop_interval_ms
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn show_ghost(&self) -> bool {
        self.show_ghost
    }

    pub fn set_show_ghost(&mut self, show: bool) {
        self.show_ghost = show;
    }

    pub fn animations(&self) -> &Scheduler<Completion> {
        &self.animations
    }

    /// Whether a hard drop is still falling toward its settle.
    pub fn hard_drop_in_flight(&self) -> bool {
        self.animations.has_pending_completion()
    }

    /// Apply one command. Returns whether it changed anything.
    ///
    /// Outside [`Lifecycle::Running`] only lifecycle commands have an effect:
    /// any input starts a ready game or resumes a paused one, and a lost game
    /// accepts nothing but [`Command::Restart`].
    pub fn apply(&mut self, command: Command) -> bool {
        match (self.lifecycle, command) {
            (_, Command::Quit) => false,
            (Lifecycle::Ready, c) | (Lifecycle::Paused, c) if c.is_input() => {
                self.set_lifecycle(Lifecycle::Running);
                true
            }
            (Lifecycle::Lost, Command::Restart) => {
                self.restart();
                true
            }
            (Lifecycle::Running, c) => self.apply_running(c),
            _ => false,
        }
    }

    fn apply_running(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => {
                self.set_lifecycle(Lifecycle::Paused);
                return true;
            }
            Command::ToggleGhost => {
                self.show_ghost = !self.show_ghost;
                return true;
            }
            Command::StartOrResume | Command::Restart | Command::Quit => return false,
            _ => {}
        }

        if self.hard_drop_in_flight() {
            return false;
        }
        self.snap_motion();

        match command {
            Command::MoveLeft => self.try_shift(-1),
            Command::MoveRight => self.try_shift(1),
            Command::RotateCw => self.try_rotate(),
            Command::SoftDrop | Command::TimerDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::InjectGarbage => self.inject_garbage(),
            _ => false,
        }
    }

    /// Advance game time by `elapsed_ms`. Returns whether anything changed.
    ///
    /// Gravity fires first, then the interpolations advance and their
    /// completions run. Nothing moves unless the game is running.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }

        let mut changed = false;
        let interval = self.session.drop_interval_ms;
        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms >= interval {
            // Keep the remainder so the cadence stays exact on a fixed timestep.
            self.drop_timer_ms %= interval;
            changed |= self.apply(Command::TimerDrop);
        }

        if !self.animations.is_empty() {
            changed = true;
            let done = self
                .animations
                .advance(f64::from(elapsed_ms), &mut self.session.current);
            for completion in done {
                self.complete(completion);
            }
        }

        changed
    }

    /// Promote the next piece to current. On collision the game is lost.
    ///
    /// Returns whether the new piece was placeable.
    pub fn spawn_next(&mut self) -> bool {
        if !self.session.promote_next(&mut self.rng) {
            self.set_lifecycle(Lifecycle::Lost);
            info!(
                score = self.session.score,
                lines = self.session.lines,
                level = self.session.level,
                "game over"
            );
            return false;
        }
        self.session.drop_interval_ms = drop_interval_ms(self.session.level);
        self.drop_timer_ms = 0;
        true
    }

    /// Check if the current piece could move by `(dx, dy)` from its committed position.
    pub fn can_move(&self, dx: i32, dy: i32) -> bool {
        let mut trial = self.session.current;
        trial.move_by(f64::from(dx), f64::from(dy));
        self.session.board.can_place(&trial)
    }

    /// Row the current piece would settle at if dropped straight down.
    ///
    /// Starts from the piece's grid-rounded row; a piece that is already
    /// overlapping stays where it is.
    pub fn ghost_y(&self) -> f64 {
        let board = &self.session.board;
        let mut trial = self.session.current;
        trial.x = trial.x.ceil();
        trial.y = trial.y.ceil();
        if !board.can_place(&trial) {
            return trial.y;
        }
        loop {
            trial.y += 1.0;
            if !board.can_place(&trial) {
                return trial.y - 1.0;
            }
        }
    }

    /// Cells of the drop preview.
    pub fn ghost_cells(&self) -> [Pos; 4] {
        let mut ghost = self.session.current;
        ghost.y = self.ghost_y();
        cells_array(&ghost)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.session.board.write_u8_grid(&mut out.board);

        out.current = PieceSnapshot::from(self.session.current);
        out.ghost = self.show_ghost.then(|| self.ghost_cells());
        out.next = PieceSnapshot::from(self.session.next);
        out.lifecycle = self.lifecycle;
        out.show_ghost = self.show_ghost;
        out.score = self.session.score;
        out.level = self.session.level;
        out.lines = self.session.lines;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn set_lifecycle(&mut self, to: Lifecycle) {
        if self.lifecycle != to {
            debug!(from = self.lifecycle.as_str(), to = to.as_str(), "lifecycle");
            self.lifecycle = to;
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::SettlePiece => {
                if self.lifecycle == Lifecycle::Running {
                    self.settle();
                }
            }
        }
    }

    /// Jump every in-flight interpolation to its end and run what it owed.
    fn snap_motion(&mut self) {
        let owed = self.animations.finish_all(&mut self.session.current);
        for completion in owed {
            self.complete(completion);
        }
    }

    fn try_shift(&mut self, dx: i32) -> bool {
        if !self.can_move(dx, 0) {
            return false;
        }
        let from = self.session.current.x;
        let to = from + f64::from(dx);
        self.session.current.x = to;
        self.animations
            .schedule(Axis::X, from, to, f64::from(MOVE_ANIMATION_MS), None);
        true
    }

    /// Rotate clockwise, nudging one column left, then one right, before giving up.
    fn try_rotate(&mut self) -> bool {
        let Session { board, current, .. } = &mut self.session;

        current.rotate(1);
        if board.can_place(current) {
            return true;
        }
        current.move_by(-1.0, 0.0);
        if board.can_place(current) {
            return true;
        }
        current.move_by(2.0, 0.0);
        if board.can_place(current) {
            return true;
        }

        current.move_by(-1.0, 0.0);
        current.rotate(-1);
        false
    }

    /// One row down, or settle if the piece is resting.
    fn soft_drop(&mut self) -> bool {
        if !self.can_move(0, 1) {
            self.settle();
            return true;
        }
        let from = self.session.current.y;
        let to = from + 1.0;
        self.session.current.y = to;
        self.animations
            .schedule(Axis::Y, from, to, f64::from(MOVE_ANIMATION_MS), None);
        true
    }

    fn hard_drop(&mut self) -> bool {
        let from = self.session.current.y;
        let to = self.ghost_y();
        debug!(from, to, "hard drop");
        self.animations.schedule(
            Axis::Y,
            from,
            to,
            f64::from(HARD_DROP_ANIMATION_MS),
            Some(Completion::SettlePiece),
        );
        true
    }

    /// Lock the current piece, spawn the next, clear rows and credit them.
    ///
    /// Rows are cleared and credited even when the spawn loses the game.
    fn settle(&mut self) {
        let owed = self.animations.finish_all(&mut self.session.current);
        debug_assert!(owed.is_empty(), "settle with a hard drop still in flight");

        let locked = self.session.current;
        self.session.board.lock(&locked);
        self.spawn_next();

        let cleared = self.session.board.clear_completed_lines();
        let level_up = self.session.credit_lines(cleared);

        debug!(
            kind = locked.kind.as_str(),
            cleared,
            score = self.session.score,
            lines = self.session.lines,
            "piece settled"
        );
        if level_up {
            debug!(
                level = self.session.level,
                interval_ms = self.session.drop_interval_ms,
                "level up"
            );
        }
    }

    fn inject_garbage(&mut self) -> bool {
        self.session.board.inject_garbage(&mut self.rng);
        self.session.score += GARBAGE_BONUS;
        debug!(score = self.session.score, "garbage row");
        true
    }

    fn restart(&mut self) {
        self.session = Session::new(&mut self.rng);
        self.animations.clear();
        self.drop_timer_ms = 0;
        info!("restart");
        self.set_lifecycle(Lifecycle::Running);
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

fn cells_array(piece: &Piece) -> [Pos; 4] {
    let mut out = [(0, 0); 4];
    for (slot, cell) in out.iter_mut().zip(piece.cells()) {
        *slot = cell;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;
    use crate::types::{PieceKind, BOARD_HEIGHT, MAX_LEVEL, TICK_MS};

    const W: usize = BOARD_WIDTH as usize;
    const H: usize = BOARD_HEIGHT as usize;

    fn scripted(kinds: &[PieceKind]) -> GameState<SequenceRng> {
        GameState::with_rng(SequenceRng::of_kinds(kinds))
    }

    fn running(kinds: &[PieceKind]) -> GameState<SequenceRng> {
        let mut state = scripted(kinds);
        assert!(state.apply(Command::StartOrResume));
        state
    }

    /// Fill row `y` except the listed columns.
    fn fill_row_except(state: &mut GameState<SequenceRng>, y: usize, gaps: &[i32]) {
        for x in 0..W as i32 {
            if !gaps.contains(&x) {
                state.board_mut().set(x, y as i32, Some(PieceKind::J));
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.lifecycle(), Lifecycle::Ready);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.drop_interval_ms(), 500);
        assert!(state.show_ghost());
        assert!(state.animations().is_empty());
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_first_piece_is_centered_and_next_is_drawn() {
        let state = scripted(&[PieceKind::I, PieceKind::O, PieceKind::T]);
        assert_eq!(state.current().kind, PieceKind::I);
        assert_eq!(state.current().x, 5.0);
        assert_eq!(state.current().y, 0.0);
        assert_eq!(state.next().kind, PieceKind::O);

        let t = scripted(&[PieceKind::T, PieceKind::O]);
        // (14 - 3) / 2 rounds down.
        assert_eq!(t.current().x, 5.0);
    }

    #[test]
    fn test_any_input_starts_without_acting() {
        let mut state = scripted(&[PieceKind::T]);
        let before = *state.current();
        assert!(state.apply(Command::MoveLeft));
        assert_eq!(state.lifecycle(), Lifecycle::Running);
        assert_eq!(*state.current(), before);
    }

    #[test]
    fn test_ready_ignores_timer_and_quit() {
        let mut state = scripted(&[PieceKind::T]);
        assert!(!state.apply(Command::TimerDrop));
        assert!(!state.apply(Command::Quit));
        assert!(!state.tick(10_000));
        assert_eq!(state.lifecycle(), Lifecycle::Ready);
        assert_eq!(state.current().y, 0.0);
    }

    #[test]
    fn test_shift_commits_then_animates() {
        let mut state = running(&[PieceKind::O]);
        assert!(state.apply(Command::MoveRight));
        assert_eq!(state.current().x, 7.0);
        assert!(state.animations().is_animating(Axis::X));

        // The logical column is already committed; the display eases in from the old one.
        state.tick(10);
        assert_eq!(state.current().x, 6.5);
        state.tick(10);
        assert_eq!(state.current().x, 7.0);
        assert!(state.animations().is_empty());
    }

    #[test]
    fn test_shift_blocked_by_wall() {
        let mut state = running(&[PieceKind::O]);
        state.session.current.x = 0.0;
        assert!(!state.apply(Command::MoveLeft));
        assert_eq!(state.current().x, 0.0);
        assert!(state.animations().is_empty());
    }

    #[test]
    fn test_commands_see_committed_position() {
        let mut state = running(&[PieceKind::O]);
        assert!(state.apply(Command::MoveLeft));
        state.tick(5);
        assert!(state.current().x > 5.0);
        // The second move snaps the first and trials from column 5.
        assert!(state.apply(Command::MoveLeft));
        state.tick(20);
        assert_eq!(state.current().x, 4.0);
    }

    #[test]
    fn test_rotate_in_place() {
        let mut state = running(&[PieceKind::T]);
        state.session.current.y = 5.0;
        assert!(state.apply(Command::RotateCw));
        assert_eq!(state.current().rotation, 1);
        assert_eq!(state.current().x, 5.0);
    }

    #[test]
    fn test_rotate_kicks_left_at_right_wall() {
        let mut state = running(&[PieceKind::T]);
        state.session.current.rotation = 1;
        state.session.current.x = 12.0;
        state.session.current.y = 5.0;

        assert!(state.apply(Command::RotateCw));
        assert_eq!(state.current().rotation, 2);
        assert_eq!(state.current().x, 11.0);
    }

    #[test]
    fn test_rotate_kicks_right_past_obstacle() {
        let mut state = running(&[PieceKind::I]);
        state.session.current.rotation = 1;
        state.session.current.x = 0.0;
        state.session.current.y = 5.0;
        state.board_mut().set(0, 5, Some(PieceKind::Z));

        assert!(state.apply(Command::RotateCw));
        assert_eq!(state.current().rotation, 0);
        assert_eq!(state.current().x, 1.0);
    }

    #[test]
    fn test_failed_rotation_restores_piece_exactly() {
        let mut state = running(&[PieceKind::I]);
        state.session.current.rotation = 1;
        state.session.current.x = 0.0;
        state.session.current.y = 5.0;
        state.board_mut().set(0, 5, Some(PieceKind::Z));
        state.board_mut().set(4, 5, Some(PieceKind::Z));
        let before = *state.current();

        assert!(!state.apply(Command::RotateCw));
        let after = *state.current();
        assert_eq!(after, before);
        assert_eq!(after.x.to_bits(), before.x.to_bits());
        assert_eq!(after.y.to_bits(), before.y.to_bits());
    }

    #[test]
    fn test_soft_drop_moves_one_row() {
        let mut state = running(&[PieceKind::S]);
        assert!(state.apply(Command::SoftDrop));
        assert_eq!(state.current().y, 1.0);
        assert!(state.animations().is_animating(Axis::Y));
        assert!(!state.hard_drop_in_flight());
    }

    #[test]
    fn test_soft_drop_at_floor_settles_immediately() {
        let mut state = running(&[PieceKind::O, PieceKind::T, PieceKind::L]);
        state.session.current.y = (H - 2) as f64;

        assert!(state.apply(Command::SoftDrop));
        assert_eq!(state.board().get(6, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.board().get(7, 18), Some(Some(PieceKind::O)));
        assert_eq!(state.current().kind, PieceKind::T);
        assert_eq!(state.current().y, 0.0);
        assert_eq!(state.next().kind, PieceKind::L);
    }

    #[test]
    fn test_hard_drop_locks_after_animation() {
        let mut state = running(&[PieceKind::O, PieceKind::T]);
        assert!(state.apply(Command::HardDrop));
        assert!(state.hard_drop_in_flight());
        assert!(state.board().cells().iter().all(|c| c.is_none()));

        state.tick(100);
        assert!(state.current().y > 0.0 && state.current().y < 18.0);
        assert!(state.board().cells().iter().all(|c| c.is_none()));

        state.tick(100);
        assert_eq!(state.board().get(6, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.board().get(7, 18), Some(Some(PieceKind::O)));
        assert_eq!(state.current().kind, PieceKind::T);
        assert!(!state.hard_drop_in_flight());
    }

    #[test]
    fn test_piece_commands_ignored_during_hard_drop() {
        let mut state = running(&[PieceKind::O, PieceKind::T]);
        assert!(state.apply(Command::HardDrop));
        let x = state.current().x;

        assert!(!state.apply(Command::MoveLeft));
        assert!(!state.apply(Command::RotateCw));
        assert!(!state.apply(Command::SoftDrop));
        assert!(!state.apply(Command::HardDrop));
        assert!(!state.apply(Command::InjectGarbage));
        assert_eq!(state.current().x, x);
        assert_eq!(state.score(), 0);

        // Pausing is still possible and freezes the fall.
        assert!(state.apply(Command::TogglePause));
        let y = state.current().y;
        assert!(!state.tick(1_000));
        assert_eq!(state.current().y, y);
        assert!(state.hard_drop_in_flight());
    }

    #[test]
    fn test_ghost_y_finds_resting_row() {
        let mut state = running(&[PieceKind::I]);
        assert_eq!(state.ghost_y(), 19.0);
        state.board_mut().set(6, 12, Some(PieceKind::O));
        assert_eq!(state.ghost_y(), 11.0);
        assert_eq!(state.ghost_cells(), [(5, 11), (6, 11), (7, 11), (8, 11)]);
    }

    #[test]
    fn test_ghost_y_of_overlapping_piece_stays_put() {
        let mut state = running(&[PieceKind::O]);
        state.board_mut().set(6, 0, Some(PieceKind::I));
        assert_eq!(state.ghost_y(), 0.0);
    }

    #[test]
    fn test_single_line_scores_at_level_one() {
        let mut state = running(&[PieceKind::I, PieceKind::O]);
        fill_row_except(&mut state, 19, &[5, 6, 7, 8]);

        assert!(state.apply(Command::HardDrop));
        state.tick(200);

        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), 80);
        assert!(state.board().row(19).iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_four_lines_score_tetris() {
        let mut state = running(&[PieceKind::I, PieceKind::O]);
        for y in 16..20 {
            fill_row_except(&mut state, y, &[6]);
        }

        assert!(state.apply(Command::RotateCw));
        assert!(state.apply(Command::HardDrop));
        state.tick(200);

        assert_eq!(state.lines(), 4);
        assert_eq!(state.score(), 2400);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_level_progression_uses_previous_level_for_reward() {
        let mut state = running(&[PieceKind::I, PieceKind::O]);
        state.session.lines = 9;

        fill_row_except(&mut state, 19, &[5, 6, 7, 8]);
        assert!(state.apply(Command::HardDrop));
        state.tick(200);

        assert_eq!(state.lines(), 10);
        assert_eq!(state.level(), 2);
        assert_eq!(state.score(), 80);
        assert_eq!(state.drop_interval_ms(), 450);
    }

    #[test]
    fn test_spawn_collision_loses() {
        let mut state = running(&[PieceKind::T]);
        state.board_mut().fill_row(0, Some(PieceKind::Z));
        state.board_mut().fill_row(1, Some(PieceKind::Z));

        assert!(!state.spawn_next());
        assert_eq!(state.lifecycle(), Lifecycle::Lost);
    }

    #[test]
    fn test_losing_settle_still_clears_and_scores() {
        let mut state = running(&[PieceKind::I, PieceKind::O]);
        fill_row_except(&mut state, 19, &[5, 6, 7, 8]);
        state.board_mut().set(6, 1, Some(PieceKind::S));
        state.session.current.y = 19.0;

        assert!(state.apply(Command::SoftDrop));
        assert_eq!(state.lifecycle(), Lifecycle::Lost);
        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), 80);
        // The blocker fell with the clear.
        assert_eq!(state.board().get(6, 2), Some(Some(PieceKind::S)));
    }

    #[test]
    fn test_lost_accepts_only_restart() {
        let mut state = running(&[PieceKind::T]);
        state.board_mut().fill_row(0, Some(PieceKind::Z));
        state.board_mut().fill_row(1, Some(PieceKind::Z));
        state.spawn_next();

        let board = state.board().clone();
        for cmd in [
            Command::MoveLeft,
            Command::HardDrop,
            Command::TogglePause,
            Command::InjectGarbage,
            Command::StartOrResume,
            Command::ToggleGhost,
        ] {
            assert!(!state.apply(cmd), "{:?}", cmd);
        }
        assert!(!state.tick(1_000));
        assert_eq!(state.board(), &board);
        assert_eq!(state.lifecycle(), Lifecycle::Lost);
    }

    #[test]
    fn test_garbage_adds_bonus_without_lines() {
        let mut state = running(&[PieceKind::T]);
        state.board_mut().set(3, 19, Some(PieceKind::L));

        assert!(state.apply(Command::InjectGarbage));
        assert_eq!(state.score(), GARBAGE_BONUS);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.board().get(3, 18), Some(Some(PieceKind::L)));
    }

    #[test]
    fn test_pause_toggle_and_any_key_resumes() {
        let mut state = running(&[PieceKind::T]);
        assert!(state.apply(Command::TogglePause));
        assert_eq!(state.lifecycle(), Lifecycle::Paused);

        assert!(!state.tick(1_000));
        assert_eq!(state.current().y, 0.0);

        let x = state.current().x;
        assert!(state.apply(Command::MoveLeft));
        assert_eq!(state.lifecycle(), Lifecycle::Running);
        assert_eq!(state.current().x, x);
    }

    #[test]
    fn test_timer_drop_fires_on_period() {
        let mut state = running(&[PieceKind::T]);
        assert!(!state.tick(499));
        assert_eq!(state.current().y, 0.0);
        assert!(state.tick(1));
        assert_eq!(state.drop_timer_ms(), 0);
        assert_eq!(state.current().grid_origin().1, 1);
        state.tick(20);
        assert_eq!(state.current().y, 1.0);
    }

    #[test]
    fn test_timer_drop_keeps_cadence_on_fixed_timestep() {
        let mut state = running(&[PieceKind::T]);
        // 125 ticks of 16ms are exactly four 500ms periods.
        for _ in 0..124 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.current().grid_origin().1, 3);
        state.tick(TICK_MS);
        assert_eq!(state.current().grid_origin().1, 4);
        assert_eq!(state.drop_timer_ms(), 0);
    }

    #[test]
    fn test_timer_drop_cadence_at_top_level() {
        let mut state = running(&[PieceKind::T]);
        state.session.level = MAX_LEVEL;
        state.session.drop_interval_ms = drop_interval_ms(MAX_LEVEL);
        assert_eq!(state.drop_interval_ms(), 50);

        // 800ms is sixteen 50ms periods, not the twelve a 64ms rounding would give.
        for _ in 0..50 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.current().grid_origin().1, 16);
    }

    #[test]
    fn test_timer_drop_settles_resting_piece() {
        let mut state = running(&[PieceKind::O, PieceKind::Z]);
        state.session.current.y = (H - 2) as f64;
        state.tick(500);
        assert_eq!(state.current().kind, PieceKind::Z);
        assert_eq!(state.board().get(6, 19), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = running(&[PieceKind::T]);
        state.apply(Command::InjectGarbage);
        state.board_mut().fill_row(0, Some(PieceKind::Z));
        state.board_mut().fill_row(1, Some(PieceKind::Z));
        state.spawn_next();
        assert_eq!(state.lifecycle(), Lifecycle::Lost);

        assert!(state.apply(Command::Restart));
        assert_eq!(state.lifecycle(), Lifecycle::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
        assert!(state.animations().is_empty());
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = running(&[PieceKind::T]);
        assert!(!state.apply(Command::Restart));
        assert_eq!(state.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_toggle_ghost_hides_preview() {
        let mut state = running(&[PieceKind::T]);
        assert!(state.snapshot().ghost.is_some());
        assert!(state.apply(Command::ToggleGhost));
        assert!(!state.show_ghost());
        assert!(state.snapshot().ghost.is_none());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = running(&[PieceKind::O, PieceKind::L]);
        state.board_mut().set(0, 19, Some(PieceKind::I));
        let snap = state.snapshot();

        assert_eq!(snap.board[19][0], PieceKind::I.code());
        assert_eq!(snap.current.kind, PieceKind::O);
        assert_eq!(snap.current.cells, [(6, 0), (7, 0), (6, 1), (7, 1)]);
        assert_eq!(snap.ghost, Some([(6, 18), (7, 18), (6, 19), (7, 19)]));
        assert_eq!(snap.next.kind, PieceKind::L);
        assert_eq!(snap.lifecycle, Lifecycle::Running);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.lines, 0);
    }
}
