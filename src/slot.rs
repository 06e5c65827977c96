//! Slot layout shared by the SPSC and MPSC rings: one payload cell plus one
//! sequence number per slot.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;

use crossbeam_utils::CachePadded;

/// A single ring slot: an uninitialized payload cell guarded by a sequence
/// number.
///
/// The sequence number encodes which "lap" around the ring a slot is
/// currently in. At construction, slot `i` starts with `sequence == i`.
/// A producer may write into the slot only once it observes the
/// sequence it expects for the current reservation; a consumer may read it
/// only once the producer's publish has made the next sequence visible.
///
/// `item` is only ever accessed through the handshake enforced by the
/// sequence number, so at most one thread has exclusive access to it at any
/// time despite the shared `UnsafeCell`.
pub(crate) struct Slot<T> {
    pub(crate) sequence: AtomicU64,
    item: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: access to `item` is serialized by the sequence-number handshake
// in `SpscRing`/`MpscRing`; the ring itself is `Sync` only when `T: Send`.
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    fn new(sequence: u64) -> Self {
        Self {
            sequence: AtomicU64::new(sequence),
            item: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Pointer to the payload cell. Caller must hold the handshake that
    /// makes exclusive access to this slot safe.
    #[inline]
    pub(crate) fn item_ptr(&self) -> *mut MaybeUninit<T> {
        self.item.get()
    }
}

/// Allocate a boxed slice of `capacity` slots, with slot `i` pre-seeded to
/// sequence `i`.
pub(crate) fn allocate_slots<T>(capacity: usize) -> Box<[Slot<T>]> {
    (0..capacity)
        .map(|i| Slot::new(i as u64))
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

/// A cache-padded cursor. Producer and consumer cursors are each wrapped in
/// this so that producer-side and consumer-side traffic never shares a
/// cache line.
pub(crate) type Cursor = CachePadded<AtomicU64>;

pub(crate) fn new_cursor(value: u64) -> Cursor {
    CachePadded::new(AtomicU64::new(value))
}
