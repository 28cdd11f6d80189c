//! Index to chunk offset mapping.

use crate::ring::ring_side_completed_by;

/// Chunk offset relative to the spiral origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TileOffset {
    pub x: i32,
    pub z: i32,
}

impl TileOffset {
    /// The centre chunk.
    pub const ORIGIN: Self = Self { x: 0, z: 0 };

    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chebyshev distance from the origin, i.e. the ring this offset lies on.
    #[must_use]
    pub const fn ring(self) -> u32 {
        let x = self.x.unsigned_abs();
        let z = self.z.unsigned_abs();
        if x > z { x } else { z }
    }
}

impl core::fmt::Display for TileOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Map a linear progress index to its chunk offset.
///
/// Pure: the same index always yields the same offset. Every index below
/// `u32::MAX²`, i.e. every chunk of any square a `u32` side can describe,
/// maps to an exact offset. Beyond that the coordinates saturate at the
/// `i32` bounds.
#[must_use]
pub fn offset_for_index(index: u64) -> TileOffset {
    let Some(completed) = ring_side_completed_by(index) else {
        return TileOffset::ORIGIN;
    };

    // The outermost rings of a u64 index do not fit i64 corner arithmetic.
    let completed = i128::from(completed);
    let new_side = completed + 2;
    // Truncating division: -3 / 2 == -1. The north-west corner of every ring
    // depends on this rounding.
    let corner = -new_side / 2;
    let relative = i128::from(index) - completed * completed;

    // Cells before the south row: the north row plus both side columns.
    let before_south = new_side + 2 * (new_side - 2);

    let (x, z) = if relative < new_side {
        // North row, west to east.
        (corner + relative, corner)
    } else if relative < before_south {
        // West and east columns alternate, north to south.
        let step = relative - new_side;
        let row = 1 + step / 2;
        if step % 2 == 0 {
            (corner, corner + row)
        } else {
            (corner + new_side - 1, corner + row)
        }
    } else {
        // South row, west to east.
        let column = relative - before_south;
        (corner + column, corner + new_side - 1)
    };

    TileOffset::new(saturate(x), saturate(z))
}

fn saturate(v: i128) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// Walks the spiral from a starting index.
#[derive(Clone, Debug)]
pub struct SpiralIter {
    next: u64,
}

impl SpiralIter {
    /// Iterate from the centre chunk.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Resume iteration at `index`.
    #[must_use]
    pub const fn starting_at(index: u64) -> Self {
        Self { next: index }
    }
}

impl Default for SpiralIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SpiralIter {
    type Item = (u64, TileOffset);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        self.next = self.next.checked_add(1)?;
        Some((index, offset_for_index(index)))
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;

    use super::*;
    use crate::tiles_in_square;

    fn offsets(count: u64) -> Vec<TileOffset> {
        (0..count).map(offset_for_index).collect()
    }

    #[test]
    fn test_origin() {
        assert_eq!(offset_for_index(0), TileOffset::ORIGIN);
    }

    #[test]
    fn test_side_three_order() {
        let expected = [
            (0, 0),
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ]
        .map(|(x, z)| TileOffset::new(x, z));

        assert_eq!(offsets(9), expected);
    }

    #[test]
    fn test_side_three_covers_the_square() {
        let visited: HashSet<TileOffset> = offsets(9).into_iter().collect();
        let square: HashSet<TileOffset> = (-1..=1)
            .flat_map(|z| (-1..=1).map(move |x| TileOffset::new(x, z)))
            .collect();
        assert_eq!(visited, square);
    }

    #[test]
    fn test_side_five_ring() {
        assert_eq!(offset_for_index(9), TileOffset::new(-2, -2));
        assert_eq!(offset_for_index(13), TileOffset::new(2, -2));
        assert_eq!(offset_for_index(14), TileOffset::new(-2, -1));
        assert_eq!(offset_for_index(15), TileOffset::new(2, -1));
        assert_eq!(offset_for_index(19), TileOffset::new(2, 1));
        assert_eq!(offset_for_index(20), TileOffset::new(-2, 2));
        assert_eq!(offset_for_index(24), TileOffset::new(2, 2));
    }

    #[test]
    fn test_completed_squares_have_no_gaps_or_repeats() {
        for side in (1..=41u64).step_by(2) {
            let count = tiles_in_square(side);
            let half = (side / 2) as i32;

            let mut seen = HashSet::new();
            for offset in offsets(count) {
                assert!(seen.insert(offset), "repeat {offset} for side {side}");
                assert!(
                    offset.x.abs() <= half && offset.z.abs() <= half,
                    "{offset} outside square of side {side}"
                );
            }
            assert_eq!(seen.len() as u64, count);
        }
    }

    #[test]
    fn test_rings_are_visited_in_order() {
        let mut last_ring = 0;
        for offset in offsets(tiles_in_square(31)) {
            let ring = offset.ring();
            assert!(ring >= last_ring, "ring went back from {last_ring} to {ring}");
            last_ring = ring;
        }
        assert_eq!(last_ring, 15);
    }

    #[test]
    fn test_pure() {
        for index in [0, 1, 7, 48, 49, 50, 1_000_003] {
            assert_eq!(offset_for_index(index), offset_for_index(index));
        }
    }

    #[test]
    fn test_largest_u32_square_has_exact_corners() {
        let side = u64::from(u32::MAX);
        let inner = side - 2;

        // First chunk of the outermost ring: its north-west corner.
        assert_eq!(
            offset_for_index(inner * inner),
            TileOffset::new(-i32::MAX, -i32::MAX)
        );
        // Last chunk: the south-east corner.
        assert_eq!(
            offset_for_index(side * side - 1),
            TileOffset::new(i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn test_indices_past_i64_do_not_overflow() {
        let beyond = i64::MAX as u64 + 10;
        let offset = offset_for_index(beyond);
        assert_eq!(offset, offset_for_index(beyond));
        assert!(offset.ring() > 1_500_000_000);

        let last = offset_for_index(u64::MAX);
        assert_eq!(last.x, i32::MAX);
    }

    #[test]
    fn test_iter_resumes_where_it_left_off() {
        let full: Vec<_> = SpiralIter::new().take(25).collect();
        let resumed: Vec<_> = SpiralIter::starting_at(12).take(13).collect();
        assert_eq!(&full[12..], resumed.as_slice());
        assert_eq!(full[24], (24, TileOffset::new(2, 2)));
    }
}
