//! Crop growth model.
//!
//! A crop's progress is a pure function of three numbers: when it was
//! planted, how long its species takes to grow, and the current time.
//! Nothing about growth is stored; every query recomputes it, so a crop
//! keeps growing while the game is closed without any bookkeeping.
//!
//! # Stage buckets
//!
//! | Fraction      | Stage       |
//! |---------------|-------------|
//! | `[0.0, 0.2)`  | `Planted`   |
//! | `[0.2, 0.4)`  | `Sprouting` |
//! | `[0.4, 0.6)`  | `Growing`   |
//! | `[0.6, 1.0)`  | `Flowering` |
//! | `>= 1.0`      | `Ready`     |

use std::sync::Arc;

use homestead_types::{CropKind, GrowthStage, Timestamp};

use crate::catalog::{CropCatalog, CropSpec};
use crate::error::FarmError;

// ---------------------------------------------------------------------------
// Pure growth functions
// ---------------------------------------------------------------------------

/// Elapsed time over growth time, floored at zero and not clamped above.
///
/// Values of `1.0` or more mean the crop is ready. A zero growth time
/// (rejected by configuration validation) counts as instantly ready.
#[allow(clippy::cast_precision_loss)]
pub fn growth_fraction(planted_at: Timestamp, growth_time_secs: u64, now: Timestamp) -> f64 {
    if growth_time_secs == 0 {
        return 1.0;
    }
    let elapsed = now.seconds_since(planted_at);
    // `f64::max` also maps a NaN quotient to 0.0.
    (elapsed / growth_time_secs as f64).max(0.0)
}

/// Whether a growth fraction means the crop is ready.
pub fn is_ready(fraction: f64) -> bool {
    fraction >= 1.0
}

/// The display stage for a growth fraction.
pub fn stage_for(fraction: f64) -> GrowthStage {
    if is_ready(fraction) {
        GrowthStage::Ready
    } else if fraction < 0.2 {
        GrowthStage::Planted
    } else if fraction < 0.4 {
        GrowthStage::Sprouting
    } else if fraction < 0.6 {
        GrowthStage::Growing
    } else {
        // 0.6 up to 1.0 is one bucket.
        GrowthStage::Flowering
    }
}

/// Whole seconds left until the crop is ready, floored, never negative.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn seconds_remaining(growth_time_secs: u64, fraction: f64) -> u64 {
    let remaining = (growth_time_secs as f64 * (1.0 - fraction)).floor();
    if remaining.is_nan() || remaining <= 0.0 {
        0
    } else {
        // Float-to-int `as` saturates.
        remaining as u64
    }
}

/// Snapshot of every derived growth quantity at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Growth {
    /// Raw growth fraction (may exceed 1.0).
    pub fraction: f64,
    /// Display stage.
    pub stage: GrowthStage,
    /// Whether the crop can be harvested.
    pub ready: bool,
    /// Whole seconds until ready; 0 once ready.
    pub seconds_remaining: u64,
}

impl Growth {
    /// Compute the growth snapshot for a crop planted at `planted_at`.
    pub fn at(planted_at: Timestamp, growth_time_secs: u64, now: Timestamp) -> Self {
        let fraction = growth_fraction(planted_at, growth_time_secs, now);
        Self {
            fraction,
            stage: stage_for(fraction),
            ready: is_ready(fraction),
            seconds_remaining: seconds_remaining(growth_time_secs, fraction),
        }
    }
}

// ---------------------------------------------------------------------------
// CropInstance
// ---------------------------------------------------------------------------

/// A crop growing on a plot.
///
/// The planting time is fixed at construction. The instance is destroyed
/// when the crop is harvested, by hand or by offline reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct CropInstance {
    spec: Arc<CropSpec>,
    planted_at: Timestamp,
}

impl CropInstance {
    /// Create a crop of the given species.
    ///
    /// Returns [`FarmError::InvalidTimestamp`] if `planted_at` is negative
    /// or not finite.
    pub fn new(spec: Arc<CropSpec>, planted_at: Timestamp) -> Result<Self, FarmError> {
        if !planted_at.is_valid() {
            return Err(FarmError::InvalidTimestamp {
                value: planted_at.as_secs(),
            });
        }
        Ok(Self { spec, planted_at })
    }

    /// Create a crop by catalog key.
    ///
    /// Returns [`FarmError::UnknownCrop`] if the key is not in the catalog,
    /// or [`FarmError::InvalidTimestamp`] for a bad planting time.
    pub fn from_catalog(
        catalog: &CropCatalog,
        kind: &CropKind,
        planted_at: Timestamp,
    ) -> Result<Self, FarmError> {
        let spec = catalog.resolve(kind)?;
        Self::new(Arc::clone(spec), planted_at)
    }

    /// The crop's catalog key.
    pub fn kind(&self) -> &CropKind {
        &self.spec.kind
    }

    /// The crop's catalog entry.
    pub fn spec(&self) -> &CropSpec {
        &self.spec
    }

    /// When the crop was planted.
    pub const fn planted_at(&self) -> Timestamp {
        self.planted_at
    }

    /// See [`growth_fraction`].
    pub fn growth_fraction(&self, now: Timestamp) -> f64 {
        growth_fraction(self.planted_at, self.spec.growth_time_secs, now)
    }

    /// Whether the crop can be harvested at `now`.
    pub fn is_ready(&self, now: Timestamp) -> bool {
        is_ready(self.growth_fraction(now))
    }

    /// The display stage at `now`.
    pub fn stage(&self, now: Timestamp) -> GrowthStage {
        stage_for(self.growth_fraction(now))
    }

    /// Whole seconds until ready at `now`.
    pub fn seconds_remaining(&self, now: Timestamp) -> u64 {
        seconds_remaining(self.spec.growth_time_secs, self.growth_fraction(now))
    }

    /// Every derived quantity at `now`.
    pub fn growth(&self, now: Timestamp) -> Growth {
        Growth::at(self.planted_at, self.spec.growth_time_secs, now)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
