//! Capacity normalisation: rounding a requested channel size up to the next
//! power of two.
//!
//! The power-of-two property is load-bearing: every ring index is computed
//! as `cursor & mask` rather than `cursor % capacity`, so `capacity` must be
//! a power of two for the mask to work.

/// Smallest power of two `>= n`, with `next_pow2(0) == 1`.
///
/// A requested size of zero is rounded up to one rather than rejected: the
/// caller gets the smallest possible channel instead of a construction
/// error, which matches `usize::next_power_of_two`'s own behavior for zero.
#[inline]
pub(crate) const fn next_pow2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Index mask for a given (already power-of-two) capacity.
#[inline]
pub(crate) const fn mask_for(capacity: usize) -> usize {
    capacity - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_next_power_of_two() {
        let cases = [
            (0, 1),
            (1, 1),
            (2, 2),
            (3, 4),
            (7, 8),
            (8, 8),
            (9, 16),
            (1023, 1024),
            (1024, 1024),
            (1025, 2048),
        ];
        for (requested, expected) in cases {
            assert_eq!(
                next_pow2(requested),
                expected,
                "next_pow2({requested}) should be {expected}"
            );
        }
    }

    #[test]
    fn result_is_always_a_power_of_two() {
        for n in 0usize..2000 {
            let capacity = next_pow2(n);
            assert_eq!(capacity & (capacity - 1), 0, "capacity {capacity} for n={n} is not a power of two");
            assert!(capacity >= n.max(1));
        }
    }

    #[test]
    fn mask_matches_capacity_minus_one() {
        assert_eq!(mask_for(16), 15);
        assert_eq!(mask_for(1), 0);
    }
}
