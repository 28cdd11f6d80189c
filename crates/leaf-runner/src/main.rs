//! Leaf fix runner
//!
//! This binary:
//! 1. Opens the progress database and a generated in-memory world
//! 2. Ticks the fixer at a fixed rate (20 TPS by default)
//! 3. Applies console commands between ticks
//! 4. Saves progress on quit
//!
//! Environment:
//! - `LEAF_DB` - progress database directory (default `data/leaffix`)
//! - `TARGET_TPS` - ticks per second (default 20)
//! - `LEAF_WORLD_SEED` - world generation seed (default 0)

mod command;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};

use leaf_persist::ProgressDb;
use leaf_tick::{FixScheduler, FixedRateTicker, TICKS_PER_SECOND, Ticker, TracingSink};
use leaf_world::{Generator, MemoryWorld};
use tracing::{info, warn};

use crate::command::{Command, CommandError, HELP, parse_command};

/// Height range of the generated world.
const WORLD_MIN_Y: i32 = 0;
const WORLD_MAX_Y: i32 = 255;

/// Slowest accepted tick rate: one tick a day.
const MIN_TPS: f32 = 1.0 / 86_400.0;

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leaf_runner=info".parse()?)
                .add_directive("leaf_tick=info".parse()?),
        )
        .init();

    info!("Starting leaf fix runner");

    // Configuration
    let db_path = std::env::var("LEAF_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/leaffix"));

    let target_tps = std::env::var("TARGET_TPS")
        .ok()
        .and_then(|p| parse_tps(&p))
        .unwrap_or(TICKS_PER_SECOND as f32);

    let seed: u64 = std::env::var("LEAF_WORLD_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    info!("Progress database: {}", db_path.display());
    let db = ProgressDb::open(&db_path)?;

    // The world must carry the name the saved progress refers to
    let world_name = match db.load_progress() {
        Ok(Some(state)) => state.world,
        Ok(None) => leaf_tick::ProgressState::default().world,
        Err(e) => {
            warn!("Saved progress is unreadable: {e}");
            leaf_tick::ProgressState::default().world
        }
    };
    let world = MemoryWorld::generated(
        world_name.clone(),
        WORLD_MIN_Y,
        WORLD_MAX_Y,
        Generator::with_seed(seed),
    );
    info!("World '{world_name}' with seed {seed}");

    let mut scheduler = FixScheduler::new(world, db, TracingSink);
    info!("{}", scheduler.status().summary());

    // Set up command input channel
    let (cmd_tx, cmd_rx) = mpsc::channel::<Result<Command, CommandError>>();

    // Spawn input thread
    thread::spawn(move || {
        input_thread(cmd_tx);
    });

    terminal::enable_raw_mode().ok();
    print_prompt();

    let mut ticker = FixedRateTicker::per_second(target_tps);
    let mut running = true;

    while running {
        // Check for commands
        while let Ok(parsed) = cmd_rx.try_recv() {
            clear_line();
            match parsed {
                Ok(Command::Quit) => {
                    info!("Shutting down...");
                    running = false;
                }
                Ok(Command::Help) => {
                    for line in HELP {
                        info!("{line}");
                    }
                }
                Ok(command) => {
                    if let Some(reply) = command::execute(&mut scheduler, command) {
                        info!("{reply}");
                    }
                }
                Err(CommandError::Empty) => {}
                Err(e) => warn!("{e}"),
            }
            print_prompt();
        }

        if !running {
            break;
        }

        ticker.wait();
        scheduler.on_tick();

        if scheduler.ticks().is_multiple_of(u64::from(TICKS_PER_SECOND)) {
            update_title(scheduler.index(), scheduler.progress().side);
        }
    }

    // Cleanup
    terminal::disable_raw_mode().ok();
    scheduler.shutdown();

    Ok(())
}

/// Parse a tick rate, rejecting rates whose tick interval is not a usable
/// duration.
fn parse_tps(raw: &str) -> Option<f32> {
    let tps: f32 = raw.trim().parse().ok()?;
    if !tps.is_finite() || tps < MIN_TPS {
        warn!("Ignoring TARGET_TPS={raw}, expected a rate of at least {MIN_TPS}");
        return None;
    }
    Some(tps)
}

/// Read keys into a line, forwarding each parsed line on Enter.
///
/// Up recalls the last submitted line. Ends on `quit` or Ctrl-C.
#[allow(clippy::print_stdout)]
fn input_thread(tx: mpsc::Sender<Result<Command, CommandError>>) {
    let mut line = String::new();
    let mut last = String::new();

    loop {
        if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
            continue;
        }
        let Ok(Event::Key(key)) = event::read() else {
            continue;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            let _ = tx.send(Ok(Command::Quit));
            break;
        }

        match key.code {
            KeyCode::Enter => {
                let parsed = parse_command(&line);
                let quit = matches!(parsed, Ok(Command::Quit));
                if !line.trim().is_empty() {
                    last = core::mem::take(&mut line);
                }
                line.clear();
                if tx.send(parsed).is_err() || quit {
                    break;
                }
            }
            KeyCode::Up => {
                line.clone_from(&last);
                clear_line();
                print!("\r> {line}");
                io::stdout().flush().ok();
            }
            KeyCode::Char(c) => {
                line.push(c);
                print!("{c}");
                io::stdout().flush().ok();
            }
            KeyCode::Backspace => {
                if line.pop().is_some() {
                    print!("\x08 \x08");
                    io::stdout().flush().ok();
                }
            }
            KeyCode::Esc => {
                line.clear();
                clear_line();
                print_prompt();
            }
            _ => {}
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_prompt() {
    print!("\r> ");
    io::stdout().flush().ok();
}

fn clear_line() {
    execute!(
        io::stdout(),
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine)
    )
    .ok();
}

/// Show progress in the terminal title.
#[allow(clippy::print_stdout)]
fn update_title(index: u64, side: u32) {
    let target = u64::from(side) * u64::from(side);
    print!("\x1b]0;Leaf fix - index {index} of {target}\x07");
    io::stdout().flush().ok();
}
