//! Square spiral enumeration of chunk offsets.
//!
//! Chunks are visited ring by ring, outward from the origin. Ring 0 is the
//! single centre chunk; every later ring is the border of a centred square
//! with an odd side length.
//!
//! ```text
//!   index layout for side = 5
//!
//!      -2  -1   0   1   2   (x)
//! -2    9  10  11  12  13
//! -1   14   1   2   3  15
//!  0   16   4   0   5  17
//!  1   18   6   7   8  19
//!  2   20  21  22  23  24
//! (z)
//! ```
//!
//! Each ring starts with its north row (west to east), then alternates between
//! the west and east columns (north to south), and ends with the south row.
//! Because the order only depends on the index, progress can be checkpointed
//! at any index and resumed without gaps or duplicates.

mod offset;
mod ring;

pub use offset::{SpiralIter, TileOffset, offset_for_index};
pub use ring::{ring_len, ring_side_completed_by, tiles_in_square};
