//! Tick sources.

use std::time::{Duration, Instant};

use leaf_world::TileStore;

use crate::notify::NotificationSink;
use crate::store::ConfigStore;
use crate::{FixScheduler, TickOutcome};

/// Paces calls to [`FixScheduler::on_tick`].
pub trait Ticker {
    /// Block until the next tick is due.
    fn wait(&mut self);
}

/// Ticks at a fixed rate, sleeping off whatever time the last tick left over.
///
/// A tick that overruns its slot is not made up for; the schedule restarts
/// from the late tick.
#[derive(Debug)]
pub struct FixedRateTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl FixedRateTicker {
    /// Tick `tps` times per second.
    ///
    /// # Panics
    /// Panics if `tps` is not a positive finite number.
    #[must_use]
    pub fn per_second(tps: f32) -> Self {
        assert!(tps.is_finite() && tps > 0.0, "tick rate must be positive");
        Self::with_interval(Duration::from_secs_f32(1.0 / tps))
    }

    #[must_use]
    pub const fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Ticker for FixedRateTicker {
    fn wait(&mut self) {
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        let base = if due > now { due } else { Instant::now() };
        self.next = Some(base + self.interval);
    }
}

/// Never waits. Drives the scheduler as fast as possible, e.g. in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateTicker;

impl Ticker for ImmediateTicker {
    fn wait(&mut self) {}
}

/// Run `ticks` ticks, returning how many chunks were fixed.
///
/// Stops early once the scheduler is no longer running.
pub fn run_ticks<W, S, N, T>(
    scheduler: &mut FixScheduler<W, S, N>,
    ticker: &mut T,
    ticks: u64,
) -> u64
where
    W: TileStore,
    S: ConfigStore,
    N: NotificationSink,
    T: Ticker,
{
    let mut fixed = 0;
    for _ in 0..ticks {
        ticker.wait();
        if let TickOutcome::Fixed { .. } = scheduler.on_tick() {
            fixed += 1;
        }
        if !scheduler.is_running() {
            break;
        }
    }
    fixed
}

#[cfg(test)]
mod tests {
    use leaf_world::{Generator, MemoryWorld};

    use super::*;
    use crate::{MemoryStore, ProgressState, TracingSink};

    #[test]
    fn test_run_ticks_stops_at_completion() {
        let state = ProgressState {
            side: 5,
            period: 2,
            ..ProgressState::default()
        };
        let world = MemoryWorld::generated("world", 0, 127, Generator::default());
        let mut scheduler = FixScheduler::with_state(state, world, MemoryStore::new(), TracingSink);
        scheduler.start();

        let fixed = run_ticks(&mut scheduler, &mut ImmediateTicker, 1_000);

        assert_eq!(fixed, 25);
        assert!(scheduler.is_complete());
        assert_eq!(scheduler.ticks(), 50);
    }

    #[test]
    fn test_fixed_rate_ticker_paces() {
        let mut ticker = FixedRateTicker::with_interval(Duration::from_millis(5));
        let start = Instant::now();
        for _ in 0..5 {
            ticker.wait();
        }
        // The first tick is immediate.
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_per_second_interval() {
        let ticker = FixedRateTicker::per_second(20.0);
        assert_eq!(ticker.interval().as_millis(), 50);
    }
}
