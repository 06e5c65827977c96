//! Multi-producer single-consumer bounded ring buffer, wait-free on the
//! consumer side and lock-free (CAS-retry) on the producer side.

use std::ptr;
use std::sync::atomic::Ordering;

use crate::backoff::Backoff;
use crate::capacity::{mask_for, next_pow2};
use crate::invariants::{debug_assert_bounded_count, debug_assert_monotonic, debug_assert_ticket_match};
use crate::slot::{allocate_slots, new_cursor, Cursor, Slot};

/// A bounded MPSC ring buffer.
///
/// Any number of producers may call [`MpscRing::try_send`] concurrently;
/// exactly one consumer calls [`MpscRing::try_receive`]. Producers reserve
/// a "ticket" (a slot index) by checking that the slot's sequence number
/// confirms it is free and then CAS-ing the shared `head` cursor forward;
/// the loser of a race simply reloads and retries. The consumer drains
/// in ticket order exactly like [`crate::spsc::SpscRing`],
/// since only one thread ever touches `tail`.
pub(crate) struct MpscRing<T> {
    capacity: usize,
    mask: usize,
    slots: Box<[Slot<T>]>,
    head: Cursor,
    tail: Cursor,
}

unsafe impl<T: Send> Send for MpscRing<T> {}
unsafe impl<T: Send> Sync for MpscRing<T> {}

impl<T> MpscRing<T> {
    pub(crate) fn new(requested_size: usize) -> Self {
        let capacity = next_pow2(requested_size);
        Self {
            capacity,
            mask: mask_for(capacity),
            slots: allocate_slots(capacity),
            head: new_cursor(0),
            tail: new_cursor(0),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking send. Returns `Err(item)` if the ring is full.
    ///
    /// Any number of producer threads may call this concurrently.
    pub(crate) fn try_send(&self, item: T) -> Result<(), T> {
        let mut backoff = Backoff::new();
        let ticket = loop {
            let head = self.head.load(Ordering::Relaxed);
            let tail = self.tail.load(Ordering::Acquire);

            // Fullness is decided on the cursors, not on the slot's
            // sequence alone: at capacity 1, every ticket maps to the same
            // slot, so a just-published slot's sequence is indistinguishable
            // from a freshly-vacated one by a sequence diff alone.
            if head - tail >= self.capacity as u64 {
                return Err(item);
            }

            let slot = &self.slots[head as usize & self.mask];
            let seq = slot.sequence.load(Ordering::Acquire);
            let diff = seq as i64 - head as i64;

            if diff == 0 {
                // This slot looks free. Race other producers to claim it.
                if self
                    .head
                    .compare_exchange_weak(head, head + 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    debug_assert_monotonic!("mpsc.head", head, head + 1);
                    break head;
                }
                // Lost the race; another producer claimed this ticket.
                backoff.spin();
            } else if diff < 0 {
                // Shouldn't happen once the cursor guard above holds, but
                // fail closed rather than spin if it ever does.
                return Err(item);
            } else {
                // Another producer already advanced `head` past our stale
                // read; reload and try again.
                backoff.spin();
            }
        };

        let slot = &self.slots[ticket as usize & self.mask];
        // The CAS above only succeeds when the slot's sequence equals
        // `ticket` (checked just before it), and no one else can touch
        // this slot's sequence until this producer publishes below, so
        // the handshake holds without an additional spin.
        debug_assert_ticket_match!(slot.sequence.load(Ordering::Relaxed), ticket);

        // SAFETY: this producer holds the unique ticket for `ticket`, and
        // the slot's sequence confirms no one else holds it.
        unsafe {
            slot.item_ptr().write(std::mem::MaybeUninit::new(item));
        }
        slot.sequence.store(ticket + 1, Ordering::Release);
        Ok(())
    }

    /// Non-blocking receive. Returns `None` if the ring is empty.
    pub(crate) fn try_receive(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let slot = &self.slots[tail as usize & self.mask];
        let seq = slot.sequence.load(Ordering::Acquire);
        let diff = seq as i64 - (tail as i64 + 1);

        if diff == 0 {
            // SAFETY: the single consumer holds exclusive access once the
            // producer's publish for this lap is visible.
            let item = unsafe { (*slot.item_ptr()).assume_init_read() };
            slot.sequence
                .store(tail + self.capacity as u64, Ordering::Release);
            debug_assert_monotonic!("mpsc.tail", tail, tail + 1);
            self.tail.store(tail + 1, Ordering::Relaxed);
            Some(item)
        } else {
            debug_assert!(diff < 0, "mpsc tail/slot sequence desynchronized");
            None
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    pub(crate) fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head - tail == self.capacity as u64
    }
}

impl<T> Drop for MpscRing<T> {
    fn drop(&mut self) {
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        debug_assert_bounded_count!(head - tail, self.capacity as u64);
        let mut cursor = tail;
        while cursor != head {
            let slot = &self.slots[cursor as usize & self.mask];
            // SAFETY: every index in [tail, head) holds a live, published
            // item that was never consumed.
            unsafe {
                ptr::drop_in_place((*slot.item_ptr()).as_mut_ptr());
            }
            cursor += 1;
        }
    }
}
