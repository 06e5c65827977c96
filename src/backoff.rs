use std::hint;

/// Adaptive spin backoff (Crossbeam-style).
///
/// Progressively increases wait cost: each `spin()` doubles the number of
/// PAUSE-hinted spins, up to a cap. Used for the MPSC ticket CAS retry loop
/// and the bounded spin on a claimed slot's sequence number. Never used on
/// the SPSC or try-op fast paths, which never spin.
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6;

    #[inline]
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub(crate) fn spin(&mut self) {
        let spins = 1 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= Self::SPIN_LIMIT {
            self.step += 1;
        }
    }
}
