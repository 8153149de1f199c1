//! Notifications emitted by a live game session.
//!
//! The presentation layer never watches model state directly. Every
//! mutating session call queues the events it caused; hosts drain the
//! queue and decide what (if anything) to show.

use serde::{Deserialize, Serialize};

use crate::{Coord, CropKind, Timestamp};

/// Something that happened to the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A crop was planted and its seed cost paid.
    CropPlanted {
        /// Where the crop was planted.
        coord: Coord,
        /// What was planted.
        kind: CropKind,
        /// Coins spent on the seed.
        seed_cost: u64,
    },

    /// A ready crop was harvested by hand at full price.
    CropHarvested {
        /// Where the crop stood.
        coord: Coord,
        /// What was harvested.
        kind: CropKind,
        /// Coins credited.
        coins: u64,
        /// Experience credited.
        experience: u64,
    },

    /// A ready crop was harvested by offline reconciliation at a discount.
    CropAutoHarvested {
        /// Where the crop stood.
        coord: Coord,
        /// What was harvested.
        kind: CropKind,
        /// Coins credited.
        coins: u64,
    },

    /// The player reached a new level.
    LevelUp {
        /// The level just reached.
        level: u32,
    },

    /// A crop became available for planting.
    CropUnlocked {
        /// The unlocked crop.
        kind: CropKind,
        /// The player's level at the time of unlocking.
        level: u32,
    },

    /// The game state was written to the save store.
    Saved {
        /// The `last_save` stamp recorded in the snapshot.
        at: Timestamp,
    },

    /// Writing the game state to the save store failed.
    SaveFailed,
}
