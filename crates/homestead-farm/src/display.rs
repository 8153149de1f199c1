//! Presentation derivations shared by front ends.
//!
//! Nothing here feeds back into game state; these helpers only turn growth
//! numbers into the strings a UI shows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use homestead_types::GrowthStage;

use crate::crop::Growth;

/// Number of cells in a growth progress bar.
pub const PROGRESS_BAR_CELLS: usize = 8;

const FILLED: char = '\u{2588}';
const UNFILLED: char = '\u{2591}';

/// Format a number of seconds as `"45s"`, `"2m 15s"` / `"2m"`, or
/// `"1h 5m"` / `"1h"`.
pub fn format_remaining(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 3_600 {
        let minutes = seconds / 60;
        let secs = seconds % 60;
        return if secs > 0 {
            format!("{minutes}m {secs}s")
        } else {
            format!("{minutes}m")
        };
    }
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if minutes > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{hours}h")
    }
}

/// `"Ready!"` for a ready crop, otherwise the formatted time remaining.
pub fn remaining_label(growth: &Growth) -> String {
    if growth.ready {
        "Ready!".to_owned()
    } else {
        format_remaining(growth.seconds_remaining)
    }
}

/// An eight-cell bar such as `"████░░░░"`, full once the crop is ready.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(fraction: f64) -> String {
    let filled = if fraction >= 1.0 {
        PROGRESS_BAR_CELLS
    } else if fraction.is_nan() || fraction <= 0.0 {
        0
    } else {
        ((fraction * PROGRESS_BAR_CELLS as f64).floor() as usize).min(PROGRESS_BAR_CELLS)
    };
    let mut bar = String::with_capacity(PROGRESS_BAR_CELLS * FILLED.len_utf8());
    bar.extend(core::iter::repeat_n(FILLED, filled));
    bar.extend(core::iter::repeat_n(
        UNFILLED,
        PROGRESS_BAR_CELLS.saturating_sub(filled),
    ));
    bar
}

/// Glyph shown for each growth stage.
///
/// Deserializes from a `STAGE: glyph` mapping; stages missing from the
/// mapping fall back to the stock glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageGlyphs(BTreeMap<GrowthStage, String>);

impl StageGlyphs {
    /// Glyph for `stage`.
    pub fn glyph(&self, stage: GrowthStage) -> &str {
        self.0
            .get(&stage)
            .map_or_else(|| stock_glyph(stage), String::as_str)
    }

    /// Override the glyph for one stage.
    pub fn set(&mut self, stage: GrowthStage, glyph: impl Into<String>) {
        self.0.insert(stage, glyph.into());
    }
}

const fn stock_glyph(stage: GrowthStage) -> &'static str {
    match stage {
        GrowthStage::Empty => "\u{2b1b}",
        GrowthStage::Planted => "\u{1f331}",
        GrowthStage::Sprouting => "\u{1f33f}",
        GrowthStage::Growing => "\u{1fab4}",
        GrowthStage::Flowering => "\u{1f33a}",
        GrowthStage::Ready => "\u{2728}",
    }
}
