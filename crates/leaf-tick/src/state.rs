//! Persisted progress.

use serde::{Deserialize, Serialize};

use leaf_world::TILE_EDGE;

/// Everything the fixer needs to resume after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Next spiral index to fix.
    pub index: u64,
    /// Side of the target square in chunks. Kept odd by the setters.
    pub side: u32,
    /// Ticks between fixed chunks.
    pub period: u32,
    /// Whether the fixer was running when last saved.
    pub running: bool,
    /// Lowest y scanned, inclusive.
    pub min_y: i32,
    /// Highest y scanned, inclusive.
    pub max_y: i32,
    /// Name of the world being fixed.
    pub world: String,
    /// Whether progress broadcasts are sent.
    pub notify: bool,
    /// Whether per-chunk timings are logged at info level.
    pub debug: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            index: 0,
            side: 1,
            period: 20,
            running: false,
            min_y: 0,
            max_y: 255,
            world: "world".to_string(),
            notify: true,
            debug: false,
        }
    }
}

impl ProgressState {
    /// Chunks in the target square.
    #[must_use]
    pub const fn target_tiles(&self) -> u64 {
        let side = self.side as u64;
        side * side
    }

    /// Every chunk of the target square has been fixed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.index >= self.target_tiles()
    }

    /// Side and period are usable.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.side >= 1 && self.period >= 1
    }

    /// Set the side in chunks, bumping even values to the next odd one.
    pub fn set_side_tiles(&mut self, side: u32) -> u32 {
        self.side = if side.is_multiple_of(2) { side.saturating_add(1) } else { side };
        self.side
    }
}

/// Convert a side length in blocks to an odd side length in chunks,
/// rounding up.
#[must_use]
pub const fn side_tiles_from_blocks(blocks: u32) -> u32 {
    let tiles = blocks.div_ceil(TILE_EDGE as u32);
    if tiles.is_multiple_of(2) { tiles + 1 } else { tiles }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_sides_are_bumped() {
        let mut state = ProgressState::default();
        assert_eq!(state.set_side_tiles(4), 5);
        assert_eq!(state.set_side_tiles(7), 7);
        assert_eq!(state.set_side_tiles(0), 1);
    }

    #[test]
    fn test_side_from_blocks() {
        assert_eq!(side_tiles_from_blocks(1), 1);
        assert_eq!(side_tiles_from_blocks(16), 1);
        assert_eq!(side_tiles_from_blocks(17), 3);
        assert_eq!(side_tiles_from_blocks(48), 3);
        assert_eq!(side_tiles_from_blocks(49), 5);
        assert_eq!(side_tiles_from_blocks(10_000), 625);
    }

    #[test]
    fn test_completion_boundary() {
        let mut state = ProgressState {
            side: 3,
            ..ProgressState::default()
        };
        state.index = 8;
        assert!(!state.is_complete());
        state.index = 9;
        assert!(state.is_complete());
    }

    #[test]
    fn test_validity() {
        assert!(ProgressState::default().is_valid());
        let zero_side = ProgressState {
            side: 0,
            ..ProgressState::default()
        };
        assert!(!zero_side.is_valid());
        let zero_period = ProgressState {
            period: 0,
            ..ProgressState::default()
        };
        assert!(!zero_period.is_valid());
    }
}
