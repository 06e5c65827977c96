//! Bounded, lock-free, in-process message-passing channels.
//!
//! This crate provides two ring-buffer based channel protocols:
//!
//! - [`ChannelMode::Spsc`]: a single producer and a single consumer,
//!   implemented with the classic Lamport/Vyukov sequence-counter
//!   handshake.
//! - [`ChannelMode::Mpsc`]: any number of producers and a single consumer,
//!   implemented with a wait-free ticket reservation on top of the same
//!   slot protocol.
//!
//! Both are bounded: capacity is fixed at construction (rounded up to the
//! next power of two) and never grows. `try_send`/`try_receive` never
//! block, spin, or perform a system call; [`Channel::send`]/
//! [`Channel::recv`] (behind the default `async` feature) layer an
//! exponential-backoff polling loop on top of the try-ops for callers in
//! an async context.
//!
//! Single-producer/multi-consumer and multi-producer/multi-consumer
//! variants, dynamic resizing, closing/completion signaling, and
//! cross-process transport are all out of scope; see `ChannelMode` for
//! how an unsupported mode is rejected rather than silently downgraded.

mod backoff;
mod capacity;
mod channel;
mod invariants;
mod mpsc;
mod slot;
mod spsc;

#[cfg(feature = "async")]
mod async_ops;

pub use channel::{Channel, ChannelError, ChannelMode};
