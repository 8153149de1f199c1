//! Wall-clock timestamps.
//!
//! The save format records times as fractional seconds since the Unix
//! epoch, so that is the canonical representation inside the engine as
//! well. Conversions from [`chrono`] types exist for the clock
//! implementations; arithmetic is limited to what growth and offline
//! reconciliation need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Microseconds per second, used when converting from [`DateTime`].
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// A point in time, in seconds since the Unix epoch.
///
/// A `Timestamp` is not guaranteed to be valid: values read from a save
/// file may be negative or non-finite. Use [`Timestamp::is_valid`] where a
/// valid time is required.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The epoch itself.
    pub const EPOCH: Self = Self(0.0);

    /// Wrap a raw seconds-since-epoch value.
    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Convert a `chrono` UTC time.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        // i64 micros fit an f64 mantissa exactly until the year 2255.
        Self(at.timestamp_micros() as f64 / MICROS_PER_SECOND)
    }

    /// Return the raw seconds-since-epoch value.
    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// Whether the value is finite and not before the epoch.
    pub const fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// Signed number of seconds from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later (clock skew).
    pub fn seconds_since(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }

    /// The timestamp `secs` seconds after this one (before, when negative).
    #[must_use]
    pub fn offset(self, secs: f64) -> Self {
        Self(self.0 + secs)
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::from_datetime(at)
    }
}
