//! Player state: coins, experience, levels, counters, and unlocked crops.
//!
//! # Level curve
//!
//! Advancing from level `n` to `n + 1` costs `n * xp_per_level`
//! experience, so with the stock value of 100 the steps are 100, 200,
//! 300, ... Experience is always kept below the next threshold: a large
//! gain loops through as many level-ups as it pays for and carries the
//! remainder.

use std::collections::BTreeSet;

use homestead_types::CropKind;

use crate::config::ProgressionConfig;
use crate::error::PlayerError;

/// Plain-data view of a player, used to persist and restore state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Coins held.
    pub coins: u64,
    /// Experience toward the next level.
    pub experience: u64,
    /// Current level, starting at 1.
    pub level: u32,
    /// Lifetime number of crops planted.
    pub total_crops_planted: u64,
    /// Lifetime number of crops harvested (manually or offline).
    pub total_crops_harvested: u64,
    /// Crops the player may plant.
    pub unlocked_crops: BTreeSet<CropKind>,
}

/// Live player state.
///
/// Coins never go negative: [`PlayerState::spend_coins`] refuses a spend
/// it cannot cover. Experience stays below [`PlayerState::xp_for_next_level`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    coins: u64,
    experience: u64,
    level: u32,
    total_crops_planted: u64,
    total_crops_harvested: u64,
    unlocked_crops: BTreeSet<CropKind>,
    /// Copied from [`ProgressionConfig::xp_per_level`].
    xp_per_level: u32,
}

impl PlayerState {
    /// A fresh level-1 player with the configured starting coins and crops.
    pub fn new(config: &ProgressionConfig) -> Self {
        Self {
            coins: config.starting_coins,
            experience: 0,
            level: 1,
            total_crops_planted: 0,
            total_crops_harvested: 0,
            unlocked_crops: config.starting_unlocked_crops.iter().cloned().collect(),
            xp_per_level: config.xp_per_level,
        }
    }

    /// Restore a player from persisted data.
    ///
    /// The starting crops are always unlocked, even if the record omits
    /// them. Experience at or above the next threshold is normalized
    /// through the usual level-up loop.
    pub fn restore(record: PlayerRecord, config: &ProgressionConfig) -> Result<Self, PlayerError> {
        if record.level == 0 {
            return Err(PlayerError::InvalidLevel(record.level));
        }
        let mut unlocked_crops = record.unlocked_crops;
        unlocked_crops.extend(config.starting_unlocked_crops.iter().cloned());

        let mut player = Self {
            coins: record.coins,
            experience: record.experience,
            level: record.level,
            total_crops_planted: record.total_crops_planted,
            total_crops_harvested: record.total_crops_harvested,
            unlocked_crops,
            xp_per_level: config.xp_per_level,
        };
        let levels = player.add_experience(0);
        if levels > 0 {
            tracing::debug!(levels, level = player.level, "Normalized restored experience");
        }
        Ok(player)
    }

    /// Plain-data copy of this player.
    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            coins: self.coins,
            experience: self.experience,
            level: self.level,
            total_crops_planted: self.total_crops_planted,
            total_crops_harvested: self.total_crops_harvested,
            unlocked_crops: self.unlocked_crops.clone(),
        }
    }

    /// Coins held.
    pub const fn coins(&self) -> u64 {
        self.coins
    }

    /// Experience toward the next level.
    pub const fn experience(&self) -> u64 {
        self.experience
    }

    /// Current level.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Lifetime number of crops planted.
    pub const fn total_crops_planted(&self) -> u64 {
        self.total_crops_planted
    }

    /// Lifetime number of crops harvested.
    pub const fn total_crops_harvested(&self) -> u64 {
        self.total_crops_harvested
    }

    /// Crops the player may plant.
    pub const fn unlocked_crops(&self) -> &BTreeSet<CropKind> {
        &self.unlocked_crops
    }

    /// Add coins. There is no upper bound; the balance saturates at
    /// `u64::MAX`.
    pub const fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Spend coins if the balance covers `amount`.
    ///
    /// Returns `false` and leaves the balance unchanged otherwise.
    pub const fn spend_coins(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    /// Experience needed to leave the current level.
    pub fn xp_for_next_level(&self) -> u64 {
        u64::from(self.level).saturating_mul(u64::from(self.xp_per_level))
    }

    /// Progress toward the next level in `[0.0, 1.0]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn xp_progress(&self) -> f64 {
        let threshold = self.xp_for_next_level();
        if threshold == 0 {
            return 1.0;
        }
        (self.experience as f64 / threshold as f64).min(1.0)
    }

    /// Add experience and apply every level-up it pays for.
    ///
    /// The threshold is recomputed after each level, so a single large
    /// gain can cross several levels. Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut levels_gained: u32 = 0;
        loop {
            let threshold = self.xp_for_next_level();
            // A zero threshold (xp_per_level of 0) would never terminate.
            if threshold == 0 || self.experience < threshold {
                break;
            }
            let Some(next_level) = self.level.checked_add(1) else {
                break;
            };
            self.experience = self.experience.saturating_sub(threshold);
            self.level = next_level;
            levels_gained = levels_gained.saturating_add(1);
        }
        levels_gained
    }

    /// Unlock a crop. Returns `true` if it was not unlocked before.
    pub fn unlock_crop(&mut self, kind: CropKind) -> bool {
        self.unlocked_crops.insert(kind)
    }

    /// Whether the player may plant `kind`.
    pub fn has_crop_unlocked(&self, kind: &CropKind) -> bool {
        self.unlocked_crops.contains(kind)
    }

    /// Count a planted crop.
    pub const fn record_planted(&mut self) {
        self.total_crops_planted = self.total_crops_planted.saturating_add(1);
    }

    /// Count a harvested crop.
    pub const fn record_harvested(&mut self) {
        self.total_crops_harvested = self.total_crops_harvested.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
