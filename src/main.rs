//! Terminal runner (default binary).
//!
//! Renders through a framebuffer-based presenter, maps crossterm key events to
//! game commands, and drives the game on a fixed 16ms timestep.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetrys::core::{GameSnapshot, GameState};
use tetrys::input::{handle_key_event, InputHandler};
use tetrys::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetrys::types::{Command, TICK_MS};

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetrys",
    version,
    about = "Falling-block puzzle in the terminal with smooth piece animation.",
    long_about = "Falling-block puzzle in the terminal with smooth piece animation.\n\n\
        CONTROLS:\n  Left/Right  Move      Up     Rotate     Down  Soft drop\n  \
        Space       Hard drop P      Pause      F     Ghost on/off\n  \
        G           Garbage   R      Restart (after game over)\n  \
        Q / Esc     Quit\n\n\
        Any key starts the game and resumes it from pause."
)]
struct Args {
    /// Seed for piece and garbage draws. Defaults to the clock.
    #[arg(long, env = "TETRYS_SEED", value_name = "N")]
    seed: Option<u32>,

    /// Start with the landing preview hidden.
    #[arg(long)]
    no_ghost: bool,

    /// Write logs to FILE (filtered by RUST_LOG). Logging is off otherwise.
    #[arg(long, env = "TETRYS_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let seed = args.seed.unwrap_or_else(clock_seed);
    info!(seed, ghost = !args.no_ghost, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, seed, !args.no_ghost);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, seed: u32, show_ghost: bool) -> Result<()> {
    let mut game = GameState::new(seed);
    game.set_show_ghost(show_ghost);

    let view = GameView::default();
    let mut input_handler = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        let command = if InputHandler::owns(key.code) {
                            input_handler.handle_key_press(key.code)
                        } else {
                            Some(handle_key_event(key))
                        };
                        match command {
                            Some(Command::Quit) => {
                                info!(score = game.score(), lines = game.lines(), "quit");
                                return Ok(());
                            }
                            Some(command) => {
                                game.apply(command);
                            }
                            None => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Ignore terminal auto-repeat; the input handler repeats held keys itself.
                    }
                    KeyEventKind::Release => {
                        input_handler.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for command in input_handler.update(TICK_MS) {
                game.apply(command);
            }
            game.tick(TICK_MS);
        }
    }
}
