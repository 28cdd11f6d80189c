//! Tick-paced chunk fixing with resumable progress.
//!
//! # Tick Execution Model
//!
//! ```text
//! Tick N (one call to FixScheduler::on_tick):
//! ┌─────────────────────────────────────────────────────────────┐
//! │  1. Count the tick                                          │
//! │  2. Stopped? done                                           │
//! │  3. Side or period invalid? halt                            │
//! │  4. index >= side²? final status, halt                      │
//! │  5. N % period == 0? fix chunk at spiral(index), index += 1 │
//! │  6. N % 200 == 0? status broadcast                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler owns its [`ProgressState`] and the three collaborators it
//! talks to: a [`TileStore`](leaf_world::TileStore) for chunks, a
//! [`ConfigStore`] for persistence and a [`NotificationSink`] for progress
//! broadcasts. Nothing escapes `on_tick`; failures halt the run and are
//! reported through logs, broadcasts and [`TickOutcome`].

mod driver;
mod error;
mod fix;
mod notify;
mod scheduler;
mod state;
mod store;

pub use driver::{FixedRateTicker, ImmediateTicker, Ticker, run_ticks};
pub use error::SchedulerError;
pub use fix::{DECAY_MASK, FixStats, fix_tile};
pub use leaf_spiral::ring_side_completed_by;
pub use notify::{
    ChannelSink, NOTIFY_CAPABILITY, Notice, NotificationSink, StatusReport, TracingSink,
};
pub use scheduler::{FixScheduler, RunState, StartOutcome, StopOutcome, TickOutcome};
pub use state::{ProgressState, side_tiles_from_blocks};
pub use store::{ConfigStore, MemoryStore, MemoryStoreError};

/// Game ticks per real-time second.
pub const TICKS_PER_SECOND: u32 = 20;

/// Ticks between periodic status broadcasts (10 seconds).
pub const STATUS_INTERVAL_TICKS: u64 = 200;
