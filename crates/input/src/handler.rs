//! Key-repeat handler for terminal environments.
//!
//! Left, right and down repeat while held: the first repeat after
//! [`KEY_FIRST_REPEAT_DELAY_MS`], then one every [`KEY_REPEAT_INTERVAL_MS`].
//! Space is edge-triggered: holding it yields a single hard drop.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::types::{Command, KEY_FIRST_REPEAT_DELAY_MS, KEY_REPEAT_INTERVAL_MS};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

/// Upper bound on repeats produced by one update.
pub const MAX_REPEATS_PER_UPDATE: usize = 32;

/// Tracks held keys for repeat handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    hard_drop_latched: bool,
    last_key_time: std::time::Instant,
    horizontal_delay_timer: u32,
    down_delay_timer: u32,
    horizontal_repeat_accumulator: u32,
    down_repeat_accumulator: u32,
    first_repeat_delay: u32,
    repeat_interval: u32,
    key_release_timeout_ms: u32,
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(KEY_FIRST_REPEAT_DELAY_MS, KEY_REPEAT_INTERVAL_MS)
    }

    pub fn with_config(first_repeat_delay: u32, repeat_interval: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            hard_drop_latched: false,
            last_key_time: std::time::Instant::now(),
            horizontal_delay_timer: 0,
            down_delay_timer: 0,
            horizontal_repeat_accumulator: 0,
            down_repeat_accumulator: 0,
            first_repeat_delay,
            repeat_interval: repeat_interval.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Whether `code` is one of the keys this handler owns.
    ///
    /// Presses of these keys must go through [`InputHandler::handle_key_press`]
    /// only, so held keys are not applied twice.
    pub fn owns(code: KeyCode) -> bool {
        matches!(
            code,
            KeyCode::Left | KeyCode::Right | KeyCode::Down | KeyCode::Char(' ')
        )
    }

    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Left => {
                self.last_key_time = std::time::Instant::now();
                self.press_horizontal(HorizontalDirection::Left, Command::MoveLeft)
            }
            KeyCode::Right => {
                self.last_key_time = std::time::Instant::now();
                self.press_horizontal(HorizontalDirection::Right, Command::MoveRight)
            }
            KeyCode::Down => {
                self.last_key_time = std::time::Instant::now();
                if self.down_held {
                    None
                } else {
                    self.down_held = true;
                    self.down_delay_timer = 0;
                    self.down_repeat_accumulator = 0;
                    Some(Command::SoftDrop)
                }
            }
            KeyCode::Char(' ') => {
                self.last_key_time = std::time::Instant::now();
                if self.hard_drop_latched {
                    None
                } else {
                    self.hard_drop_latched = true;
                    Some(Command::HardDrop)
                }
            }
            _ => None,
        }
    }

    fn press_horizontal(&mut self, dir: HorizontalDirection, command: Command) -> Option<Command> {
        if self.horizontal == dir {
            return None;
        }
        self.horizontal = dir;
        self.horizontal_delay_timer = 0;
        self.horizontal_repeat_accumulator = 0;
        Some(command)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.release_horizontal(HorizontalDirection::Left),
            KeyCode::Right => self.release_horizontal(HorizontalDirection::Right),
            KeyCode::Down => self.release_down(),
            KeyCode::Char(' ') => self.hard_drop_latched = false,
            _ => {}
        }
    }

    fn release_horizontal(&mut self, dir: HorizontalDirection) {
        if self.horizontal == dir {
            self.horizontal = HorizontalDirection::None;
            self.horizontal_delay_timer = 0;
            self.horizontal_repeat_accumulator = 0;
        }
    }

    fn release_down(&mut self) {
        self.down_held = false;
        self.down_delay_timer = 0;
        self.down_repeat_accumulator = 0;
    }

    /// Advance held-key timers and return the repeats that fell due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<Command, MAX_REPEATS_PER_UPDATE> {
        let mut commands = ArrayVec::<Command, MAX_REPEATS_PER_UPDATE>::new();

        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            if self.horizontal != HorizontalDirection::None {
                self.release_horizontal(self.horizontal);
            }
            if self.down_held {
                self.release_down();
            }
            self.hard_drop_latched = false;
        }

        let horizontal = match self.horizontal {
            HorizontalDirection::Left => Some(Command::MoveLeft),
            HorizontalDirection::Right => Some(Command::MoveRight),
            HorizontalDirection::None => None,
        };
        if let Some(command) = horizontal {
            let due = repeats_due(
                &mut self.horizontal_delay_timer,
                &mut self.horizontal_repeat_accumulator,
                elapsed_ms,
                self.first_repeat_delay,
                self.repeat_interval,
            );
            for _ in 0..due {
                let _ = commands.try_push(command);
            }
        }

        if self.down_held {
            let due = repeats_due(
                &mut self.down_delay_timer,
                &mut self.down_repeat_accumulator,
                elapsed_ms,
                self.first_repeat_delay,
                self.repeat_interval,
            );
            for _ in 0..due {
                let _ = commands.try_push(Command::SoftDrop);
            }
        }

        commands
    }
}

/// Step one held key's timers; returns how many repeats are now due.
///
/// The first repeat fires `delay` after the press, then one per `interval`.
fn repeats_due(
    delay_timer: &mut u32,
    accumulator: &mut u32,
    elapsed_ms: u32,
    delay: u32,
    interval: u32,
) -> u32 {
    let prev = *delay_timer;
    *delay_timer = delay_timer.saturating_add(elapsed_ms);
    if *delay_timer < delay {
        return 0;
    }

    let mut due = 0;
    if prev < delay {
        // Crossing the delay is itself the first repeat.
        due += 1;
        *accumulator = *delay_timer - delay;
    } else {
        *accumulator += elapsed_ms;
    }
    due += *accumulator / interval;
    *accumulator %= interval;
    due
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
