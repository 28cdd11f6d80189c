//! Ring arithmetic.

/// Side length of the largest fully completed square once `index` chunks
/// have been processed.
///
/// Returns `None` for `index == 0`: not even the centre chunk is done yet.
/// Otherwise the result is always odd.
#[must_use]
pub const fn ring_side_completed_by(index: u64) -> Option<u64> {
    let side = index.isqrt();
    if side.is_multiple_of(2) {
        side.checked_sub(1)
    } else {
        Some(side)
    }
}

/// Number of chunks in a centred square with the given side.
#[must_use]
pub const fn tiles_in_square(side: u64) -> u64 {
    side * side
}

/// Number of chunks on the border ring of a square with the given odd side.
#[must_use]
pub const fn ring_len(side: u64) -> u64 {
    match side {
        0 => 0,
        1 => 1,
        _ => tiles_in_square(side) - tiles_in_square(side - 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_has_no_completed_ring() {
        assert_eq!(ring_side_completed_by(0), None);
    }

    #[test]
    fn test_perfect_odd_squares_complete_their_side() {
        for side in (1..200u64).step_by(2) {
            assert_eq!(
                ring_side_completed_by(side * side),
                Some(side),
                "side {side}"
            );
        }
    }

    #[test]
    fn test_one_before_square_reports_previous_ring() {
        for side in (3..200u64).step_by(2) {
            assert_eq!(
                ring_side_completed_by(side * side - 1),
                Some(side - 2),
                "side {side}"
            );
        }
    }

    #[test]
    fn test_even_roots_round_down_to_odd() {
        // 4..=8 have isqrt 2, which is not a completed square.
        for index in 4..9 {
            assert_eq!(ring_side_completed_by(index), Some(1));
        }
        assert_eq!(ring_side_completed_by(1), Some(1));
        assert_eq!(ring_side_completed_by(3), Some(1));
    }

    #[test]
    fn test_ring_len() {
        assert_eq!(ring_len(1), 1);
        assert_eq!(ring_len(3), 8);
        assert_eq!(ring_len(5), 16);
        assert_eq!(ring_len(7), 24);
    }

    #[test]
    fn test_large_index_does_not_overflow() {
        let side = 4_000_001u64;
        assert_eq!(ring_side_completed_by(side * side), Some(side));
    }
}
