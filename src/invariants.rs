//! Debug assertion macros for ring buffer invariants.
//!
//! These are only active in debug builds (`debug_assert!` itself is a
//! no-op in release), so there is zero overhead in release builds.
//!
//! Used by both [`crate::spsc::SpscRing`] and [`crate::mpsc::MpscRing`].

/// Assert that occupancy does not exceed capacity.
///
/// Invariant: `0 <= (head - tail) <= capacity`.
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "occupancy {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that a cursor only increases (monotonic progress).
///
/// Invariant: `new_value >= old_value` (unsigned wrapping comparison).
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that the consumer cursor never advances past the producer cursor.
///
/// Invariant: `tail <= head`.
macro_rules! debug_assert_tail_not_past_head {
    ($new_tail:expr, $head:expr) => {
        debug_assert!(
            $new_tail <= $head,
            "advancing tail {} beyond head {}",
            $new_tail,
            $head
        )
    };
}

/// Assert that a producer only publishes into a slot it actually claimed:
/// after a successful CAS claiming `ticket`, the slot's observed sequence
/// must equal `ticket` before the producer writes into it.
macro_rules! debug_assert_ticket_match {
    ($observed:expr, $ticket:expr) => {
        debug_assert!(
            $observed == $ticket,
            "slot sequence {} does not match claimed ticket {}",
            $observed,
            $ticket
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_tail_not_past_head;
pub(crate) use debug_assert_ticket_match;
