//! The save document schema.
//!
//! ```json
//! {
//!   "version": 1,
//!   "last_save": 1700000000.25,
//!   "farm": {
//!     "width": 4, "height": 4,
//!     "plots": { "0,0": null, "0,1": {"crop_type": "RADISH", "planted_at": 1699999990.0} }
//!   },
//!   "player": {
//!     "coins": 100, "experience": 0, "level": 1,
//!     "total_crops_planted": 0, "total_crops_harvested": 0,
//!     "unlocked_crops": ["CARROT", "RADISH"]
//!   }
//! }
//! ```
//!
//! Plot keys are written in `(x, y)` order and `unlocked_crops` sorted, so
//! identical state always produces identical bytes.
//!
//! Validation happens in two layers. [`SaveSnapshot::check_structure`]
//! needs nothing but the document and runs before a store hands a
//! snapshot out. [`SaveSnapshot::restore`] additionally resolves crop
//! kinds against the catalog while building live state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use homestead_farm::{CropCatalog, CropInstance, FarmGrid, MAX_DIMENSION};
use homestead_player::{PlayerRecord, PlayerState, ProgressionConfig};
use homestead_types::{Coord, CropKind, Timestamp};

use crate::error::SaveError;

/// The only save format version this engine reads and writes.
pub const SAVE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A complete save document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    /// Format version, always [`SAVE_VERSION`].
    pub version: u32,
    /// When the snapshot was taken.
    pub last_save: Timestamp,
    /// The farm grid.
    pub farm: FarmSnapshot,
    /// The player.
    pub player: PlayerSnapshot,
}

/// Serialized farm grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// One entry per cell, keyed `"x,y"`.
    pub plots: BTreeMap<Coord, Option<CropSnapshot>>,
}

/// Serialized crop instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSnapshot {
    /// Catalog key.
    pub crop_type: CropKind,
    /// Planting time.
    pub planted_at: Timestamp,
}

/// Serialized player state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Coins held.
    pub coins: u64,
    /// Experience toward the next level.
    pub experience: u64,
    /// Current level.
    pub level: u32,
    /// Lifetime number of crops planted.
    pub total_crops_planted: u64,
    /// Lifetime number of crops harvested.
    pub total_crops_harvested: u64,
    /// Crops the player may plant, sorted.
    pub unlocked_crops: Vec<CropKind>,
}

/// Live state rebuilt from a snapshot.
#[derive(Debug, Clone)]
pub struct RestoredGame {
    /// The farm grid, crops resolved against the catalog.
    pub farm: FarmGrid,
    /// The player.
    pub player: PlayerState,
    /// When the snapshot was taken.
    pub last_save: Timestamp,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl SaveSnapshot {
    /// Capture live state stamped with `last_save`.
    pub fn capture(farm: &FarmGrid, player: &PlayerState, last_save: Timestamp) -> Self {
        let plots = farm
            .iter()
            .map(|(coord, crop)| {
                let crop = crop.map(|c| CropSnapshot {
                    crop_type: c.kind().clone(),
                    planted_at: c.planted_at(),
                });
                (coord, crop)
            })
            .collect();

        let record = player.record();
        Self {
            version: SAVE_VERSION,
            last_save,
            farm: FarmSnapshot {
                width: farm.width(),
                height: farm.height(),
                plots,
            },
            player: PlayerSnapshot {
                coins: record.coins,
                experience: record.experience,
                level: record.level,
                total_crops_planted: record.total_crops_planted,
                total_crops_harvested: record.total_crops_harvested,
                // BTreeSet iteration is already sorted.
                unlocked_crops: record.unlocked_crops.into_iter().collect(),
            },
        }
    }

    /// Check everything that can be checked without a crop catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Schema`] describing the first violation found.
    pub fn check_structure(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::Schema(format!(
                "unsupported save version {} (expected {SAVE_VERSION})",
                self.version
            )));
        }
        if !self.last_save.as_secs().is_finite() {
            return Err(SaveError::Schema("last_save is not a finite number".to_owned()));
        }

        let FarmSnapshot {
            width,
            height,
            plots,
        } = &self.farm;
        if *width == 0 || *height == 0 || *width > MAX_DIMENSION || *height > MAX_DIMENSION {
            return Err(SaveError::Schema(format!(
                "invalid farm dimensions {width}x{height} (each side must be 1 to {MAX_DIMENSION})"
            )));
        }
        if let Some(coord) = plots.keys().find(|c| c.x >= *width || c.y >= *height) {
            return Err(SaveError::Schema(format!(
                "plot {coord} lies outside a {width}x{height} farm"
            )));
        }
        let expected = u64::from(*width).saturating_mul(u64::from(*height));
        let actual = u64::try_from(plots.len()).unwrap_or(u64::MAX);
        if actual != expected {
            return Err(SaveError::Schema(format!(
                "farm of {expected} cells has {actual} plot entries"
            )));
        }
        if let Some((coord, _)) = plots
            .iter()
            .find(|(_, crop)| crop.as_ref().is_some_and(|c| !c.planted_at.is_valid()))
        {
            return Err(SaveError::Schema(format!(
                "crop at {coord} has an invalid planted_at"
            )));
        }

        if self.player.level == 0 {
            return Err(SaveError::Schema("player level must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Rebuild live state, resolving crop kinds against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Schema`] for a structural violation,
    /// [`SaveError::Farm`] for an unknown crop kind, or
    /// [`SaveError::Player`] for an out-of-range player section.
    pub fn restore(
        self,
        catalog: &CropCatalog,
        progression: &ProgressionConfig,
    ) -> Result<RestoredGame, SaveError> {
        self.check_structure()?;

        let mut plots = BTreeMap::new();
        for (coord, crop) in self.farm.plots {
            let crop = match crop {
                Some(c) => Some(CropInstance::from_catalog(catalog, &c.crop_type, c.planted_at)?),
                None => None,
            };
            plots.insert(coord, crop);
        }
        let farm = FarmGrid::from_plots(self.farm.width, self.farm.height, plots)?;

        let record = PlayerRecord {
            coins: self.player.coins,
            experience: self.player.experience,
            level: self.player.level,
            total_crops_planted: self.player.total_crops_planted,
            total_crops_harvested: self.player.total_crops_harvested,
            unlocked_crops: self.player.unlocked_crops.into_iter().collect::<BTreeSet<_>>(),
        };
        let player = PlayerState::restore(record, progression)?;

        Ok(RestoredGame {
            farm,
            player,
            last_save: self.last_save,
        })
    }

    /// Parse a save document and check its structure.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Json`] for malformed JSON or missing fields,
    /// [`SaveError::Schema`] for a structural violation.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.check_structure()?;
        Ok(snapshot)
    }

    /// Render the document as two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
