//! Wall-clock time source.
//!
//! Every time-dependent operation receives its `now` from a [`Clock`]
//! rather than reading the system time itself, so offline reconciliation
//! and autosave stamps can be driven deterministically in tests.

use std::sync::atomic::{AtomicU64, Ordering};

use homestead_types::Timestamp;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// The system clock, read through [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(chrono::Utc::now())
    }
}

/// A manually driven clock.
///
/// Shared references can move it, so a test can hold the clock while a
/// session or runner reads from it.
#[derive(Debug)]
pub struct FixedClock {
    /// `f64` bit pattern of the current seconds value.
    bits: AtomicU64,
}

impl FixedClock {
    /// A clock stopped at `now`.
    pub const fn new(now: Timestamp) -> Self {
        Self {
            bits: AtomicU64::new(now.as_secs().to_bits()),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: Timestamp) {
        self.bits.store(now.as_secs().to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `secs` seconds (backward when negative).
    pub fn advance(&self, secs: f64) {
        self.set(self.now().offset(secs));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(f64::from_bits(self.bits.load(Ordering::SeqCst)))
    }
}
