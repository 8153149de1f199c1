//! Offline reconciliation.
//!
//! Runs exactly once when a save is loaded. Crops keep growing while the
//! game is closed because growth is computed from wall-clock timestamps;
//! this pass settles the consequences. Every crop that is ready at load
//! time is harvested automatically at a discount, in grid scan order.
//!
//! # Algorithm
//!
//! 1. `offline = clamp(now - last_save, 0, max_offline_secs)`.
//! 2. If `offline < min_offline_secs_to_process`, return an empty summary
//!    (with `offline_secs = 0`) and touch nothing.
//! 3. For each occupied plot whose crop is ready at `now` (measured from
//!    its own planting time, not from the offline gap), pay
//!    `floor(sell_price * offline_reward_multiplier)`, count the harvest,
//!    and clear the plot.
//!
//! A crop harvests at most once per load, however many growth periods fit
//! in the gap. It makes no difference whether it became ready before or
//! after the save was written.

use serde::Serialize;

use homestead_farm::FarmGrid;
use homestead_player::PlayerState;
use homestead_types::{Coord, CropKind, GameEvent, Timestamp};

use crate::config::TimingConfig;

/// Away time above which the welcome-back notice is a full summary.
pub const MODAL_AWAY_SECS: f64 = 300.0;

/// Away time above which a short welcome-back toast is shown.
pub const TOAST_AWAY_SECS: f64 = 60.0;

/// One crop harvested by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoHarvest {
    /// Where the crop stood.
    pub coord: Coord,
    /// Catalog key.
    pub kind: CropKind,
    /// Display name.
    pub name: String,
    /// Coins credited.
    pub coins: u64,
}

/// What happened while the player was away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfflineSummary {
    /// Seconds away after clamping, or 0 for a gap too short to process.
    pub offline_secs: f64,
    /// Harvested crops in scan order.
    pub auto_harvested: Vec<AutoHarvest>,
    /// Sum of `auto_harvested` payouts.
    pub total_coins: u64,
}

/// How a front end should greet a returning player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WelcomeBack {
    /// Show the full summary.
    Modal,
    /// Show a brief "away for N minutes" note.
    Toast {
        /// Whole minutes away.
        minutes: u64,
    },
    /// Say nothing.
    Silent,
}

impl OfflineSummary {
    /// The summary of a gap too short to process.
    pub const fn nothing() -> Self {
        Self {
            offline_secs: 0.0,
            auto_harvested: Vec::new(),
            total_coins: 0,
        }
    }

    /// Whether there is nothing to report: no time was processed and
    /// nothing was harvested.
    pub fn is_empty(&self) -> bool {
        self.auto_harvested.is_empty() && self.offline_secs <= 0.0
    }

    /// Classify the greeting: a summary after more than five minutes away
    /// or any harvest, a toast after more than one minute, else nothing.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn notice(&self) -> WelcomeBack {
        if self.offline_secs > MODAL_AWAY_SECS || !self.auto_harvested.is_empty() {
            WelcomeBack::Modal
        } else if self.offline_secs > TOAST_AWAY_SECS {
            WelcomeBack::Toast {
                minutes: (self.offline_secs / 60.0).floor() as u64,
            }
        } else {
            WelcomeBack::Silent
        }
    }

    /// Away time as `"2h 5m"` or `"5m"`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn away_label(&self) -> String {
        let secs = self.offline_secs.max(0.0).floor() as u64;
        let hours = secs / 3_600;
        let minutes = (secs % 3_600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    /// One [`GameEvent::CropAutoHarvested`] per harvested crop.
    pub fn events(&self) -> Vec<GameEvent> {
        self.auto_harvested
            .iter()
            .map(|h| GameEvent::CropAutoHarvested {
                coord: h.coord,
                kind: h.kind.clone(),
                coins: h.coins,
            })
            .collect()
    }
}

/// Coins paid for an unattended harvest: the sell price scaled by
/// `multiplier`, rounded down.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn offline_payout(sell_price: u64, multiplier: f64) -> u64 {
    let coins = (sell_price as f64 * multiplier).floor();
    if coins.is_nan() || coins <= 0.0 {
        0
    } else {
        coins as u64
    }
}

/// Seconds away, clamped to `[0, max_offline_secs]`.
#[allow(clippy::cast_precision_loss)]
pub fn offline_seconds(last_save: Timestamp, now: Timestamp, timing: &TimingConfig) -> f64 {
    let raw = now.seconds_since(last_save);
    if raw.is_nan() || raw <= 0.0 {
        return 0.0;
    }
    raw.min(timing.max_offline_secs as f64)
}

/// Settle the time between `last_save` and `now`.
///
/// Mutates `farm` and `player` only when the gap reaches
/// `min_offline_secs_to_process`.
#[allow(clippy::cast_precision_loss)]
pub fn reconcile(
    farm: &mut FarmGrid,
    player: &mut PlayerState,
    last_save: Timestamp,
    now: Timestamp,
    timing: &TimingConfig,
) -> OfflineSummary {
    let offline_secs = offline_seconds(last_save, now, timing);
    if offline_secs < timing.min_offline_secs_to_process as f64 {
        tracing::debug!(offline_secs, "Offline gap too short to process");
        return OfflineSummary::nothing();
    }

    let ready: Vec<Coord> = farm
        .ready_crops(now)
        .into_iter()
        .map(|(coord, _)| coord)
        .collect();

    let mut auto_harvested = Vec::with_capacity(ready.len());
    let mut total_coins: u64 = 0;
    for coord in ready {
        let Some(crop) = farm.harvest(coord) else {
            continue;
        };
        let spec = crop.spec();
        let coins = offline_payout(spec.sell_price, timing.offline_reward_multiplier);
        player.add_coins(coins);
        player.record_harvested();
        total_coins = total_coins.saturating_add(coins);

        tracing::debug!(coord = %coord, kind = %spec.kind, coins, "Crop auto-harvested");
        auto_harvested.push(AutoHarvest {
            coord,
            kind: spec.kind.clone(),
            name: spec.name.clone(),
            coins,
        });
    }

    tracing::info!(
        offline_secs,
        harvested = auto_harvested.len(),
        total_coins,
        "Offline progress reconciled"
    );

    OfflineSummary {
        offline_secs,
        auto_harvested,
        total_coins,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
