//! Read-only projection of a session for front ends.
//!
//! A [`FarmView`] is rebuilt on every growth refresh. It carries every
//! number a UI needs to draw the grid and the sidebar, so a front end
//! never has to touch the growth model or player arithmetic itself.

use serde::Serialize;

use homestead_farm::{FarmGrid, StageGlyphs, progress_bar, remaining_label};
use homestead_player::PlayerState;
use homestead_types::{Coord, CropKind, GrowthStage, Timestamp};

/// The whole farm and the player at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmView {
    /// When the view was taken.
    pub at: Timestamp,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// One cell per plot, in scan order.
    pub cells: Vec<CellView>,
    /// Number of crops ready to harvest.
    pub ready_count: usize,
    /// Sidebar stats.
    pub player: PlayerView,
}

/// One plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    /// Position on the grid.
    pub coord: Coord,
    /// Growth stage, `Empty` for an empty plot.
    pub stage: GrowthStage,
    /// Glyph for the stage.
    pub glyph: String,
    /// The crop, if any.
    pub crop: Option<CropView>,
}

/// A growing crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropView {
    /// Catalog key.
    pub kind: CropKind,
    /// Display name.
    pub name: String,
    /// Growth fraction clamped to `[0, 1]` for display.
    pub progress: f64,
    /// Whole seconds until ready.
    pub seconds_remaining: u64,
    /// `"Ready!"` or the formatted time remaining.
    pub remaining: String,
    /// Eight-cell progress bar.
    pub progress_bar: String,
    /// Whether the crop can be harvested.
    pub ready: bool,
}

/// Player stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    /// Coins held.
    pub coins: u64,
    /// Current level.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u64,
    /// Experience needed to leave the current level.
    pub xp_for_next_level: u64,
    /// `experience / xp_for_next_level`, at most 1.0.
    pub xp_progress: f64,
    /// Lifetime crops planted.
    pub total_crops_planted: u64,
    /// Lifetime crops harvested.
    pub total_crops_harvested: u64,
}

impl FarmView {
    /// Project `farm` and `player` at `now`.
    pub fn capture(
        farm: &FarmGrid,
        player: &PlayerState,
        glyphs: &StageGlyphs,
        now: Timestamp,
    ) -> Self {
        let cells: Vec<CellView> = farm
            .iter()
            .map(|(coord, crop)| match crop {
                None => CellView {
                    coord,
                    stage: GrowthStage::Empty,
                    glyph: glyphs.glyph(GrowthStage::Empty).to_owned(),
                    crop: None,
                },
                Some(crop) => {
                    let growth = crop.growth(now);
                    CellView {
                        coord,
                        stage: growth.stage,
                        glyph: glyphs.glyph(growth.stage).to_owned(),
                        crop: Some(CropView {
                            kind: crop.kind().clone(),
                            name: crop.spec().name.clone(),
                            progress: growth.fraction.min(1.0),
                            seconds_remaining: growth.seconds_remaining,
                            remaining: remaining_label(&growth),
                            progress_bar: progress_bar(growth.fraction),
                            ready: growth.ready,
                        }),
                    }
                }
            })
            .collect();
        let ready_count = cells
            .iter()
            .filter(|c| c.crop.as_ref().is_some_and(|crop| crop.ready))
            .count();

        Self {
            at: now,
            width: farm.width(),
            height: farm.height(),
            cells,
            ready_count,
            player: PlayerView {
                coins: player.coins(),
                level: player.level(),
                experience: player.experience(),
                xp_for_next_level: player.xp_for_next_level(),
                xp_progress: player.xp_progress(),
                total_crops_planted: player.total_crops_planted(),
                total_crops_harvested: player.total_crops_harvested(),
            },
        }
    }

    /// The cell at `coord`, if it is on the grid.
    pub fn cell(&self, coord: Coord) -> Option<&CellView> {
        self.cells.iter().find(|c| c.coord == coord)
    }
}
