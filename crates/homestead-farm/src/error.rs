//! Error types for the `homestead-farm` crate.
//!
//! Only invalid input is an error. Expected precondition failures
//! (planting on an occupied plot, harvesting an empty one) are reported
//! through `bool` and `Option` return values instead.

use homestead_types::{Coord, CropKind};

/// Errors raised when farm data is constructed from invalid input.
#[derive(Debug, thiserror::Error)]
pub enum FarmError {
    /// The crop kind is not present in the catalog.
    #[error("unknown crop type: {0}")]
    UnknownCrop(CropKind),

    /// The catalog lists the same crop kind twice.
    #[error("duplicate crop type in catalog: {0}")]
    DuplicateCrop(CropKind),

    /// A planting timestamp is negative or not a finite number.
    #[error("invalid planted_at timestamp: {value}")]
    InvalidTimestamp {
        /// The rejected value, in seconds since the epoch.
        value: f64,
    },

    /// Grid dimensions are zero or exceed [`MAX_DIMENSION`](crate::MAX_DIMENSION).
    #[error("invalid farm dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A plot entry lies outside the grid bounds.
    #[error("plot {coord} lies outside a {width}x{height} farm")]
    PlotOutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// The plot entries do not cover every cell of the grid.
    #[error("farm of {expected} cells has only {actual} plot entries")]
    MissingPlots {
        /// Number of cells in the grid.
        expected: u64,
        /// Number of plot entries supplied.
        actual: u64,
    },
}
