//! Crop catalog: per-species prices, growth durations and unlock levels.
//!
//! The catalog is static configuration. It is built once at startup from
//! the game configuration and shared read-only by every component; crop
//! instances hold an [`Arc`] to their own entry so growth and payout
//! queries never need a second lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use homestead_types::CropKind;

use crate::error::FarmError;

// ---------------------------------------------------------------------------
// CropSpec
// ---------------------------------------------------------------------------

/// Configuration of a single crop species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpec {
    /// Catalog key (`"RADISH"`), persisted as `crop_type`.
    pub kind: CropKind,
    /// Human-readable name (`"Radish"`).
    pub name: String,
    /// Single-glyph icon shown in the seed list.
    #[serde(default)]
    pub glyph: String,
    /// Seconds from planting until the crop is ready. Must be positive.
    pub growth_time_secs: u64,
    /// Coins charged when planting.
    pub seed_cost: u64,
    /// Coins paid for a manual harvest.
    pub sell_price: u64,
    /// Player level at which the crop becomes plantable. At least 1.
    pub unlock_level: u32,
}

impl CropSpec {
    /// Sell price minus seed cost. Negative for an unprofitable crop.
    pub fn profit(&self) -> i128 {
        i128::from(self.sell_price).saturating_sub(i128::from(self.seed_cost))
    }

    /// Whether planting this crop loses money on a manual harvest.
    pub const fn is_unprofitable(&self) -> bool {
        self.sell_price < self.seed_cost
    }

    /// Whether a player at `level` may plant this crop.
    pub const fn is_unlocked_at(&self, level: u32) -> bool {
        self.unlock_level <= level
    }

    /// Hard configuration problems with this entry, one message each.
    pub fn validation_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.kind.as_str().trim().is_empty() {
            issues.push("crop with an empty type key".to_owned());
        }
        if self.name.trim().is_empty() {
            issues.push(format!("crop {} has an empty name", self.kind));
        }
        if self.growth_time_secs == 0 {
            issues.push(format!("crop {} must have a positive growth time", self.kind));
        }
        if self.unlock_level == 0 {
            issues.push(format!("crop {} must unlock at level 1 or above", self.kind));
        }
        issues
    }
}

// ---------------------------------------------------------------------------
// CropCatalog
// ---------------------------------------------------------------------------

/// The immutable set of crop species, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropCatalog {
    /// Entries in configuration order.
    specs: Vec<Arc<CropSpec>>,
    /// Position of each kind in `specs`.
    index: BTreeMap<CropKind, usize>,
}

impl CropCatalog {
    /// Build a catalog from entries, keeping their order.
    ///
    /// Returns [`FarmError::DuplicateCrop`] if a kind appears twice.
    pub fn new(specs: impl IntoIterator<Item = CropSpec>) -> Result<Self, FarmError> {
        let mut catalog = Self {
            specs: Vec::new(),
            index: BTreeMap::new(),
        };
        for spec in specs {
            if catalog.index.contains_key(&spec.kind) {
                return Err(FarmError::DuplicateCrop(spec.kind));
            }
            catalog.index.insert(spec.kind.clone(), catalog.specs.len());
            catalog.specs.push(Arc::new(spec));
        }
        Ok(catalog)
    }

    /// The stock six-crop catalog.
    pub fn stock() -> Self {
        let specs = stock_specs();
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.kind.clone(), i))
            .collect();
        Self {
            specs: specs.into_iter().map(Arc::new).collect(),
            index,
        }
    }

    /// Look up a crop species.
    pub fn get(&self, kind: &CropKind) -> Option<&Arc<CropSpec>> {
        self.index.get(kind).and_then(|&i| self.specs.get(i))
    }

    /// Look up a crop species, failing with [`FarmError::UnknownCrop`].
    pub fn resolve(&self, kind: &CropKind) -> Result<&Arc<CropSpec>, FarmError> {
        self.get(kind)
            .ok_or_else(|| FarmError::UnknownCrop(kind.clone()))
    }

    /// Whether the catalog knows `kind`.
    pub fn contains(&self, kind: &CropKind) -> bool {
        self.index.contains_key(kind)
    }

    /// All entries, in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CropSpec>> {
        self.specs.iter()
    }

    /// Entries plantable at `level`.
    pub fn available_at(&self, level: u32) -> impl Iterator<Item = &Arc<CropSpec>> {
        self.specs.iter().filter(move |s| s.is_unlocked_at(level))
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog has no species at all.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::stock()
    }
}

/// The stock catalog entries, cheapest and fastest first.
pub fn stock_specs() -> Vec<CropSpec> {
    let spec = |kind: &str, name: &str, glyph: &str, growth: u64, cost: u64, price: u64, level: u32| {
        CropSpec {
            kind: CropKind::from(kind),
            name: name.to_owned(),
            glyph: glyph.to_owned(),
            growth_time_secs: growth,
            seed_cost: cost,
            sell_price: price,
            unlock_level: level,
        }
    };
    vec![
        spec("RADISH", "Radish", "\u{1f534}", 30, 10, 15, 1),
        spec("CARROT", "Carrot", "\u{1f955}", 60, 20, 35, 1),
        spec("WHEAT", "Wheat", "\u{1f33e}", 120, 30, 60, 2),
        spec("TOMATO", "Tomato", "\u{1f345}", 180, 50, 100, 3),
        spec("CORN", "Corn", "\u{1f33d}", 300, 80, 180, 5),
        spec("PUMPKIN", "Pumpkin", "\u{1f383}", 600, 150, 400, 7),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
