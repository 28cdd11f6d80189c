//! Scheduler error types.

use leaf_spiral::TileOffset;
use leaf_world::WorldError;
use thiserror::Error;

/// Why a run was halted or a request was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Side or period is unusable. The run cannot continue until the
    /// configuration is corrected.
    #[error("side {side} or period {period} is invalid, giving up")]
    ConfigurationInvalid { side: u32, period: u32 },

    /// The chunk at the current index could not be loaded. The index is not
    /// advanced, so restarting retries the same chunk.
    #[error("chunk {index} at {offset} could not be loaded: {source}")]
    TileLoad {
        index: u64,
        offset: TileOffset,
        #[source]
        source: WorldError,
    },

    /// Requested lowest y lies outside the scannable height.
    #[error("min_y {min_y} is outside 0..={max_y}")]
    MinYOutOfRange { min_y: i32, max_y: i32 },
}
