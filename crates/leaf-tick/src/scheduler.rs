//! The incremental fixer.

use core::num::NonZeroU32;
use std::time::Instant;

use leaf_spiral::{TileOffset, offset_for_index, ring_side_completed_by};
use leaf_world::{TilePos, TileStore, WorldError};
use tracing::{debug, error, info, warn};

use crate::fix::{FixStats, fix_tile};
use crate::notify::{NOTIFY_CAPABILITY, NotificationSink, StatusReport};
use crate::store::ConfigStore;
use crate::{ProgressState, STATUS_INTERVAL_TICKS, SchedulerError};

/// Coarse scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Stopped with chunks left to fix.
    Idle,
    /// Consuming ticks.
    Running,
    /// Stopped with the whole square fixed.
    Complete,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running.
    Stopped,
    /// Running, but this tick is not on the period.
    Waiting,
    /// A chunk was fixed and the index advanced.
    Fixed {
        index: u64,
        pos: TilePos,
        stats: FixStats,
    },
    /// The square was already complete; the run has ended.
    Completed,
    /// The run was halted by a failure.
    Halted(SchedulerError),
}

/// Reply to a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning,
    Started { index: u64 },
}

/// Reply to a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    AlreadyStopped,
    Stopped { index: u64 },
}

/// Fixes one chunk every `period` ticks along the spiral until the target
/// square is done.
///
/// `on_tick` must be called once per game tick. All other requests are
/// expected on the same thread, between ticks; a host that calls in from
/// several threads has to put the whole scheduler behind one lock, since the
/// index update and the completion check belong together.
pub struct FixScheduler<W, S, N> {
    state: ProgressState,
    ticks: u64,
    world: W,
    store: S,
    sink: N,
}

impl<W, S, N> FixScheduler<W, S, N>
where
    W: TileStore,
    S: ConfigStore,
    N: NotificationSink,
{
    /// Create a scheduler from the state held in `store`, falling back to
    /// defaults when nothing was saved or the store cannot be read.
    ///
    /// The scheduler always starts stopped.
    pub fn new(world: W, store: S, sink: N) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => {
                info!(
                    "Loaded progress: index {}, side {}, period {}",
                    state.index, state.side, state.period
                );
                state
            }
            Ok(None) => {
                info!("No saved progress, using defaults");
                ProgressState::default()
            }
            Err(e) => {
                warn!("Failed to load progress, using defaults: {e}");
                ProgressState::default()
            }
        };
        Self::with_state(state, world, store, sink)
    }

    /// Create a scheduler with an explicit state. The state is not saved
    /// until something changes.
    pub fn with_state(mut state: ProgressState, world: W, store: S, sink: N) -> Self {
        state.running = false;
        Self {
            state,
            ticks: 0,
            world,
            store,
            sink,
        }
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Advance one tick.
    pub fn on_tick(&mut self) -> TickOutcome {
        self.ticks += 1;

        if !self.state.running {
            return TickOutcome::Stopped;
        }

        if !self.state.is_valid() {
            let err = SchedulerError::ConfigurationInvalid {
                side: self.state.side,
                period: self.state.period,
            };
            error!("{err}");
            self.sink
                .broadcast(&format!("Leaf fix: {err}."), NOTIFY_CAPABILITY);
            self.halt();
            return TickOutcome::Halted(err);
        }

        if self.state.is_complete() {
            self.finish();
            return TickOutcome::Completed;
        }

        let outcome = if self.ticks.is_multiple_of(u64::from(self.state.period)) {
            self.fix_next()
        } else {
            TickOutcome::Waiting
        };

        if self.state.running && self.ticks.is_multiple_of(STATUS_INTERVAL_TICKS) {
            self.status_update();
        }

        outcome
    }

    fn fix_next(&mut self) -> TickOutcome {
        let index = self.state.index;
        let offset = offset_for_index(index);
        let pos = TilePos::new(offset.x, offset.z);
        let ys = self.state.min_y..=self.state.max_y;
        let start = Instant::now();

        let stats = match self.world.load_tile(&self.state.world, pos) {
            Ok(tile) => fix_tile(tile, ys),
            Err(source) => return self.load_failed(index, offset, source),
        };

        let elapsed = start.elapsed();
        if self.state.debug {
            info!(
                "Fixed index {index} chunk {pos} in {} ms ({} of {} leaves changed)",
                elapsed.as_millis(),
                stats.changed,
                stats.leaves
            );
        } else {
            debug!("Fixed index {index} chunk {pos} in {elapsed:?}");
        }

        self.state.index += 1;
        if self.state.is_complete() {
            self.finish();
        } else {
            self.save();
        }

        TickOutcome::Fixed { index, pos, stats }
    }

    fn load_failed(
        &mut self,
        index: u64,
        offset: TileOffset,
        source: WorldError,
    ) -> TickOutcome {
        let err = SchedulerError::TileLoad {
            index,
            offset,
            source,
        };
        error!("{err}");
        self.sink.broadcast(
            &format!("Leaf fix: stopped at index {index}, chunk {offset} could not be loaded."),
            NOTIFY_CAPABILITY,
        );
        self.halt();
        TickOutcome::Halted(err)
    }

    fn finish(&mut self) {
        info!(
            "Finished fixing {} x {} chunks at index {}",
            self.state.side, self.state.side, self.state.index
        );
        self.state.running = false;
        self.status_update();
        self.save();
    }

    fn halt(&mut self) {
        self.state.running = false;
        self.save();
    }

    fn status_update(&self) {
        if self.state.notify {
            self.sink
                .broadcast(&self.status().to_string(), NOTIFY_CAPABILITY);
        }
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!("Failed to save progress: {e}");
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Resume fixing at the current index.
    pub fn start(&mut self) -> StartOutcome {
        let outcome = if self.state.running {
            StartOutcome::AlreadyRunning
        } else {
            self.state.running = true;
            info!("Started at index {}", self.state.index);
            StartOutcome::Started {
                index: self.state.index,
            }
        };
        self.save();
        outcome
    }

    /// Stop fixing; the index is kept.
    pub fn stop(&mut self) -> StopOutcome {
        let outcome = if self.state.running {
            self.state.running = false;
            info!("Stopped at index {}", self.state.index);
            StopOutcome::Stopped {
                index: self.state.index,
            }
        } else {
            StopOutcome::AlreadyStopped
        };
        self.save();
        outcome
    }

    pub fn set_period(&mut self, period: NonZeroU32) {
        self.state.period = period.get();
        self.save();
    }

    pub fn set_index(&mut self, index: u64) {
        self.state.index = index;
        self.save();
    }

    /// Set the side in chunks; even values become the next odd value.
    pub fn set_side_tiles(&mut self, side: u32) -> u32 {
        let side = self.state.set_side_tiles(side);
        self.save();
        side
    }

    /// Set the side in blocks, rounded up to whole chunks and forced odd.
    pub fn set_side_blocks(&mut self, blocks: NonZeroU32) -> u32 {
        self.set_side_tiles(crate::side_tiles_from_blocks(blocks.get()))
    }

    /// Set the lowest scanned y.
    ///
    /// # Errors
    /// Returns [`SchedulerError::MinYOutOfRange`] unless `0 <= min_y <= max_y`.
    pub fn set_min_y(&mut self, min_y: i32) -> Result<(), SchedulerError> {
        let max_y = self.state.max_y;
        if !(0..=max_y).contains(&min_y) {
            return Err(SchedulerError::MinYOutOfRange { min_y, max_y });
        }
        self.state.min_y = min_y;
        self.save();
        Ok(())
    }

    /// Flip progress broadcasts, returning the new setting.
    pub fn toggle_notify(&mut self) -> bool {
        self.state.notify = !self.state.notify;
        self.save();
        self.state.notify
    }

    /// Flip per-chunk timing logs, returning the new setting.
    pub fn toggle_debug(&mut self) -> bool {
        self.state.debug = !self.state.debug;
        self.save();
        self.state.debug
    }

    /// Re-read the saved state, keeping the current running flag.
    ///
    /// Returns `false` and keeps the current state if the store has nothing
    /// or cannot be read.
    pub fn reload(&mut self) -> bool {
        match self.store.load() {
            Ok(Some(mut state)) => {
                state.running = self.state.running;
                self.state = state;
                info!("Reloaded progress at index {}", self.state.index);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to reload progress: {e}");
                false
            }
        }
    }

    /// Persist the state before the host goes away.
    pub fn shutdown(&mut self) {
        info!("Saving progress at index {}", self.state.index);
        self.save();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.running
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[must_use]
    pub const fn index(&self) -> u64 {
        self.state.index
    }

    /// Ticks seen since creation, running or not.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        if self.state.running {
            RunState::Running
        } else if self.state.is_complete() {
            RunState::Complete
        } else {
            RunState::Idle
        }
    }

    #[must_use]
    pub const fn progress(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport {
            running: self.state.running,
            complete: self.state.is_complete(),
            index: self.state.index,
            completed_side: ring_side_completed_by(self.state.index).unwrap_or(0),
            target_side: self.state.side,
        }
    }

    #[must_use]
    pub const fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}
