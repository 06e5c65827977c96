//! Public channel surface: [`Channel`], [`ChannelMode`], [`ChannelError`].

use thiserror::Error;

use crate::mpsc::MpscRing;
use crate::spsc::SpscRing;

/// Which concurrency protocol a [`Channel`] uses.
///
/// `#[non_exhaustive]` leaves room to add variants such as a future
/// single-producer/multi-consumer or multi-producer/multi-consumer mode
/// without a breaking change; [`Channel::new`] rejects any variant it does
/// not implement with [`ChannelError::UnsupportedMode`] rather than
/// silently degrading to one of the modes below.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Single producer, single consumer.
    Spsc,
    /// Multiple producers, single consumer.
    Mpsc,
}

/// Errors returned by [`Channel::new`].
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The requested [`ChannelMode`] has no implementation in this crate.
    ///
    /// SPMC and MPMC variants are not implemented and must be rejected at
    /// construction rather than silently mapped onto a mode
    /// that gives weaker guarantees than requested.
    #[error("unsupported channel mode: {0:?}")]
    UnsupportedMode(ChannelMode),
}

enum Ring<T> {
    Spsc(SpscRing<T>),
    Mpsc(MpscRing<T>),
}

/// A bounded, lock-free, in-process message-passing channel.
///
/// Construct with [`Channel::new`], choosing [`ChannelMode::Spsc`] when
/// there is exactly one producer and one consumer, or
/// [`ChannelMode::Mpsc`] when multiple producers share one consumer. The
/// channel has no close/drain/iteration/peek operation: a caller that
/// needs one builds it on top of `try_send`/`try_receive` using an
/// out-of-band signal.
pub struct Channel<T> {
    ring: Ring<T>,
}

impl<T> Channel<T> {
    /// Creates a channel with a capacity rounded up to the next power of
    /// two (`requested_size = 0` rounds to capacity 1).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UnsupportedMode`] for any `mode` this crate
    /// does not implement.
    pub fn new(requested_size: usize, mode: ChannelMode) -> Result<Self, ChannelError> {
        let ring = match mode {
            ChannelMode::Spsc => Ring::Spsc(SpscRing::new(requested_size)),
            ChannelMode::Mpsc => Ring::Mpsc(MpscRing::new(requested_size)),
            _ => return Err(ChannelError::UnsupportedMode(mode)),
        };
        Ok(Self { ring })
    }

    /// The channel's actual capacity (the requested size rounded up to the
    /// next power of two).
    pub fn capacity(&self) -> usize {
        match &self.ring {
            Ring::Spsc(r) => r.capacity(),
            Ring::Mpsc(r) => r.capacity(),
        }
    }

    /// Attempts to send `item` without blocking. Returns `Err(item)` if the
    /// channel is full.
    pub fn try_send(&self, item: T) -> Result<(), T> {
        match &self.ring {
            Ring::Spsc(r) => r.try_send(item),
            Ring::Mpsc(r) => r.try_send(item),
        }
    }

    /// Attempts to receive an item without blocking. Returns `None` if the
    /// channel is empty.
    pub fn try_receive(&self) -> Option<T> {
        match &self.ring {
            Ring::Spsc(r) => r.try_receive(),
            Ring::Mpsc(r) => r.try_receive(),
        }
    }

    /// Returns `true` if the channel currently holds no items.
    ///
    /// This is a snapshot: with concurrent producers/consumers it may be
    /// stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        match &self.ring {
            Ring::Spsc(r) => r.is_empty(),
            Ring::Mpsc(r) => r.is_empty(),
        }
    }

    /// Returns `true` if the channel is currently at capacity.
    ///
    /// This is a snapshot, subject to the same staleness caveat as
    /// [`Channel::is_empty`].
    pub fn is_full(&self) -> bool {
        match &self.ring {
            Ring::Spsc(r) => r.is_full(),
            Ring::Mpsc(r) => r.is_full(),
        }
    }
}
