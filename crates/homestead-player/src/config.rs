//! Progression tunables.
//!
//! These values correspond to the `progression` section of
//! `homestead-config.yaml`. The [`ProgressionConfig`] struct bundles every
//! tunable so callers (the game session, tests) can override defaults.

use serde::Deserialize;

use homestead_types::CropKind;

/// Starting values and the experience curve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressionConfig {
    /// Coins a new player starts with (default: 100).
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,

    /// Crops a new player may plant before any level-up
    /// (default: `RADISH`, `CARROT`).
    #[serde(default = "default_starting_unlocked_crops")]
    pub starting_unlocked_crops: Vec<CropKind>,

    /// Experience per level step. Reaching level `n + 1` from level `n`
    /// takes `n * xp_per_level` experience (default: 100).
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,

    /// Experience granted for each manual harvest (default: 10).
    #[serde(default = "default_xp_per_harvest")]
    pub xp_per_harvest: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_coins: default_starting_coins(),
            starting_unlocked_crops: default_starting_unlocked_crops(),
            xp_per_level: default_xp_per_level(),
            xp_per_harvest: default_xp_per_harvest(),
        }
    }
}

const fn default_starting_coins() -> u64 {
    100
}

fn default_starting_unlocked_crops() -> Vec<CropKind> {
    vec![CropKind::from("RADISH"), CropKind::from("CARROT")]
}

const fn default_xp_per_level() -> u32 {
    100
}

const fn default_xp_per_harvest() -> u32 {
    10
}
