//! Console commands.
//!
//! Input is validated here; the scheduler only ever sees well-typed values.

use core::num::NonZeroU32;

use leaf_tick::{ConfigStore, FixScheduler, NotificationSink, StartOutcome, StopOutcome};
use leaf_world::{TILE_EDGE, TileStore};
use thiserror::Error;

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
    /// Show or set the ticks between chunks.
    Period(Option<NonZeroU32>),
    /// Show or set the next spiral index.
    Index(Option<u64>),
    /// Show or set the side of the square, in blocks.
    Side(Option<NonZeroU32>),
    /// Show or set the lowest scanned y.
    MinY(Option<i32>),
    Notify,
    Debug,
    Reload,
    Help,
    Quit,
}

/// Rejected console input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("")]
    Empty,

    #[error("Unknown command: '{0}'. Type 'help' for commands.")]
    Unknown(String),

    #[error("'{0}' takes at most one argument.")]
    TooManyArguments(&'static str),

    #[error("The argument must be a positive integer.")]
    NotPositive,

    #[error("The argument must be a non-negative integer.")]
    NotNonNegative,

    #[error("The argument must be a valid Y coordinate.")]
    InvalidY,
}

pub const HELP: &[&str] = &[
    "Commands:",
    "  start            - Start fixing at the current index",
    "  stop             - Stop fixing",
    "  status           - Show progress",
    "  period [ticks]   - Show or set ticks between chunks",
    "  index [n]        - Show or set the next spiral index",
    "  side [blocks]    - Show or set the side of the square",
    "  min_y [y]        - Show or set the lowest scanned y",
    "  notify           - Toggle progress broadcasts",
    "  debug            - Toggle per-chunk timing logs",
    "  reload           - Reload saved progress",
    "  q, quit          - Save and quit",
    "  help             - Show this help",
];

/// Parse one line of console input.
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let lowered = input.trim().to_lowercase();
    let mut words = lowered.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Empty);
    };
    let arg = words.next();
    let extra = words.next().is_some();

    let command = match name {
        "start" => Command::Start,
        "stop" => Command::Stop,
        "status" => Command::Status,
        "notify" => Command::Notify,
        "debug" => Command::Debug,
        "reload" => Command::Reload,
        "help" | "h" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "period" => Command::Period(arg.map(parse_positive).transpose()?),
        "side" => Command::Side(arg.map(parse_positive).transpose()?),
        "index" => Command::Index(
            arg.map(|a| a.parse::<u64>().map_err(|_| CommandError::NotNonNegative))
                .transpose()?,
        ),
        "min_y" => Command::MinY(
            arg.map(|a| {
                a.parse::<i32>()
                    .ok()
                    .filter(|y| *y >= 0)
                    .ok_or(CommandError::InvalidY)
            })
            .transpose()?,
        ),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    let takes_arg = matches!(
        command,
        Command::Period(_) | Command::Side(_) | Command::Index(_) | Command::MinY(_)
    );
    if extra || (arg.is_some() && !takes_arg) {
        return Err(CommandError::TooManyArguments(match command {
            Command::Period(_) => "period",
            Command::Side(_) => "side",
            Command::Index(_) => "index",
            Command::MinY(_) => "min_y",
            _ => "this command",
        }));
    }

    Ok(command)
}

fn parse_positive(arg: &str) -> Result<NonZeroU32, CommandError> {
    arg.parse().map_err(|_| CommandError::NotPositive)
}

/// Apply a command to the scheduler and phrase the reply.
///
/// `Help` and `Quit` are handled by the caller and produce no reply here.
pub fn execute<W, S, N>(scheduler: &mut FixScheduler<W, S, N>, command: Command) -> Option<String>
where
    W: TileStore,
    S: ConfigStore,
    N: NotificationSink,
{
    let reply = match command {
        Command::Start => match scheduler.start() {
            StartOutcome::AlreadyRunning => "Leaf fix is already running.".to_string(),
            StartOutcome::Started { index } => format!("Leaf fix STARTED at index {index}."),
        },
        Command::Stop => match scheduler.stop() {
            StopOutcome::AlreadyStopped => "Leaf fix is already stopped.".to_string(),
            StopOutcome::Stopped { index } => format!("Leaf fix STOPPED at index {index}."),
        },
        Command::Status => scheduler.status().summary(),
        Command::Period(period) => {
            let changed = period.is_some();
            if let Some(period) = period {
                scheduler.set_period(period);
            }
            format!(
                "Leaf fix: the period is {}{} tick(s).",
                if changed { "now " } else { "" },
                scheduler.progress().period
            )
        }
        Command::Index(index) => {
            let changed = index.is_some();
            if let Some(index) = index {
                scheduler.set_index(index);
            }
            format!(
                "Leaf fix: the index is {}{}.",
                if changed { "now " } else { "" },
                scheduler.index()
            )
        }
        Command::Side(blocks) => {
            let changed = blocks.is_some();
            if let Some(blocks) = blocks {
                scheduler.set_side_blocks(blocks);
            }
            let side = scheduler.progress().side;
            format!(
                "Leaf fix: the side is {}{side} chunk(s), {} blocks.",
                if changed { "now " } else { "" },
                u64::from(side) * TILE_EDGE as u64
            )
        }
        Command::MinY(min_y) => {
            let mut changed = false;
            if let Some(min_y) = min_y {
                match scheduler.set_min_y(min_y) {
                    Ok(()) => changed = true,
                    Err(_) => return Some(CommandError::InvalidY.to_string()),
                }
            }
            format!(
                "Leaf fix: the minimum Y coordinate is {}{}.",
                if changed { "now " } else { "" },
                scheduler.progress().min_y
            )
        }
        Command::Notify => format!(
            "Leaf fix notifications {}",
            if scheduler.toggle_notify() { "ENABLED." } else { "DISABLED." }
        ),
        Command::Debug => format!(
            "Leaf fix debug logging {}",
            if scheduler.toggle_debug() { "ENABLED." } else { "DISABLED." }
        ),
        Command::Reload => {
            if scheduler.reload() {
                "Leaf fix configuration reloaded.".to_string()
            } else {
                "Leaf fix configuration could not be reloaded.".to_string()
            }
        }
        Command::Help | Command::Quit => return None,
    };
    Some(reply)
}
