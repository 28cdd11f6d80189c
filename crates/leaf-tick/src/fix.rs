//! Leaf decay bit clearing.

use core::ops::RangeInclusive;

use leaf_world::{TILE_EDGE, Tile};

/// Aux bits kept on leaf cells: the species. The no-decay (bit 2) and
/// check-decay (bit 3) flags are cleared.
pub const DECAY_MASK: u8 = 0b0011;

/// What one chunk fix touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixStats {
    /// Leaf cells scanned.
    pub leaves: u32,
    /// Leaf cells whose aux data changed.
    pub changed: u32,
}

/// Clear the decay flags of every leaf cell in `ys` across the whole chunk.
pub fn fix_tile(tile: &mut Tile, ys: RangeInclusive<i32>) -> FixStats {
    let mut stats = FixStats::default();

    for z in 0..TILE_EDGE {
        for x in 0..TILE_EDGE {
            for cell in tile.column_mut(x, z, ys.clone()) {
                if !cell.kind().is_leaves() {
                    continue;
                }
                stats.leaves += 1;

                let fixed = cell.aux() & DECAY_MASK;
                if fixed != cell.aux() {
                    cell.set_aux(fixed);
                    stats.changed += 1;
                }
            }
        }
    }

    stats
}
