//! Single-producer single-consumer bounded ring buffer.

use std::ptr;
use std::sync::atomic::Ordering;

use crate::capacity::{mask_for, next_pow2};
use crate::invariants::{debug_assert_bounded_count, debug_assert_monotonic, debug_assert_tail_not_past_head};
use crate::slot::{allocate_slots, new_cursor, Cursor, Slot};

/// A bounded SPSC ring buffer.
///
/// Exactly one producer calls [`SpscRing::try_send`] and exactly one
/// consumer calls [`SpscRing::try_receive`]; the ring never enforces this
/// itself, it only guarantees correctness under that usage.
///
/// The producer owns `head` (the next slot index it will write), the
/// consumer owns `tail` (the next slot index it will read). Each slot
/// additionally carries a sequence number that tells the *other* side
/// whether the slot is ready for it, so a send and a receive on adjacent
/// slots never race on the shared cursors alone.
pub(crate) struct SpscRing<T> {
    capacity: usize,
    mask: usize,
    slots: Box<[Slot<T>]>,
    head: Cursor,
    tail: Cursor,
}

// SAFETY: `T: Send` is sufficient because at most one producer and one
// consumer ever touch a given slot, handed off via the sequence protocol.
unsafe impl<T: Send> Send for SpscRing<T> {}
unsafe impl<T: Send> Sync for SpscRing<T> {}

impl<T> SpscRing<T> {
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
    pub(crate) fn try_send(&self, item: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        // Fullness is decided on the cursors, not on the slot's sequence:
        // at capacity 1, a just-published slot's sequence (`head`) is
        // indistinguishable from a freshly-vacated one using a sequence
        // diff alone, since the next producer position is also `head`.
        if head - tail >= self.capacity as u64 {
            return Err(item);
        }

        let slot = &self.slots[head as usize & self.mask];
        // SAFETY: `head - tail < capacity` means the consumer has vacated
        // this slot (or it is fresh), so the producer has exclusive access.
        unsafe {
            slot.item_ptr().write(std::mem::MaybeUninit::new(item));
        }
        // Publish: the consumer must see the write above before it
        // observes the new sequence.
        slot.sequence.store(head + 1, Ordering::Release);
        debug_assert_monotonic!("spsc.head", head, head + 1);
        self.head.store(head + 1, Ordering::Relaxed);
        Ok(())
    }

    /// Non-blocking receive. Returns `None` if the ring is empty.
    pub(crate) fn try_receive(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let slot = &self.slots[tail as usize & self.mask];
        let seq = slot.sequence.load(Ordering::Acquire);
        let diff = seq as i64 - (tail as i64 + 1);

        if diff == 0 {
            // SAFETY: `seq == tail + 1` means the producer's publish for
            // this lap is visible, so the consumer has exclusive access.
            let item = unsafe { (*slot.item_ptr()).assume_init_read() };
            // Free the slot for the producer's next lap around the ring.
            slot.sequence
                .store(tail + self.capacity as u64, Ordering::Release);
            debug_assert_monotonic!("spsc.tail", tail, tail + 1);
            debug_assert_tail_not_past_head!(tail + 1, self.head.load(Ordering::Relaxed));
            self.tail.store(tail + 1, Ordering::Relaxed);
            Some(item)
        } else {
            debug_assert!(diff < 0, "spsc tail/slot sequence desynchronized");
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

    #[cfg(test)]
    fn len(&self) -> u64 {
        self.head.load(Ordering::Acquire) - self.tail.load(Ordering::Acquire)
    }
}

impl<T> Drop for SpscRing<T> {
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
