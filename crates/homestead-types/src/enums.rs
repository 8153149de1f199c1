//! Enumeration types for the Homestead engine.

use serde::{Deserialize, Serialize};

/// Visual growth stage of a plot.
///
/// [`GrowthStage::Empty`] describes a plot without a crop; the remaining
/// variants are the buckets of a crop's growth fraction, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStage {
    /// No crop on the plot.
    Empty,
    /// Growth fraction in `[0.0, 0.2)`.
    Planted,
    /// Growth fraction in `[0.2, 0.4)`.
    Sprouting,
    /// Growth fraction in `[0.4, 0.6)`.
    Growing,
    /// Growth fraction in `[0.6, 1.0)`.
    Flowering,
    /// Growth fraction of `1.0` or more; the crop can be harvested.
    Ready,
}

impl GrowthStage {
    /// Every stage, in display order.
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Planted,
        Self::Sprouting,
        Self::Growing,
        Self::Flowering,
        Self::Ready,
    ];

    /// The upper-case name used in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Planted => "PLANTED",
            Self::Sprouting => "SPROUTING",
            Self::Growing => "GROWING",
            Self::Flowering => "FLOWERING",
            Self::Ready => "READY",
        }
    }
}

impl core::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_as_str() {
        for stage in GrowthStage::ALL {
            let json = serde_json::to_string(&stage).ok();
            assert_eq!(json, Some(format!("\"{}\"", stage.as_str())));
        }
    }
}
