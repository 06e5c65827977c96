//! Async `send`/`recv` wrappers over the non-blocking try-ops.
//!
//! These are plain polling loops with exponential backoff (1ms, doubling,
//! capped at 100ms), not a waker-driven design (see `DESIGN.md`'s [ASYNC]
//! entry for the tradeoff against a `Notify`-based wakeup).

use std::time::Duration;

use crate::channel::Channel;

const INITIAL_BACKOFF: Duration = Duration::from_millis(1);
const MAX_BACKOFF: Duration = Duration::from_millis(100);

/// Generates the backoff schedule: 1ms, 2ms, 4ms, ..., capped at 100ms,
/// then holds at the cap forever. Exposed as a free function so it can be
/// unit-tested without needing wall-clock time.
pub(crate) fn next_backoff(current: Duration) -> Duration {
    let doubled = current.saturating_mul(2);
    if doubled > MAX_BACKOFF {
        MAX_BACKOFF
    } else {
        doubled
    }
}

impl<T> Channel<T> {
    /// Sends `item`, waiting with exponential backoff while the channel is
    /// full.
    ///
    /// Cancellation-safe: dropping the returned future before it resolves
    /// simply drops the locally-held `item` without ever publishing it,
    /// which is ordinary `Future` drop behavior and needs no extra
    /// bookkeeping.
    pub async fn send(&self, mut item: T) {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.try_send(item) {
                Ok(()) => return,
                Err(rejected) => {
                    item = rejected;
                    tokio::time::sleep(backoff).await;
                    backoff = next_backoff(backoff);
                }
            }
        }
    }

    /// Receives an item, waiting with exponential backoff while the
    /// channel is empty.
    pub async fn recv(&self) -> T {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            if let Some(item) = self.try_receive() {
                return item;
            }
            tokio::time::sleep(backoff).await;
            backoff = next_backoff(backoff);
        }
    }
}
