//! Crop catalog, crop growth model, and farm grid for the Homestead engine.
//!
//! This crate models the physical farm: which crops exist and what they
//! cost, how a planted crop progresses from seed to harvest as wall-clock
//! time passes, and the rectangular grid of plots crops are planted on.
//!
//! # Modules
//!
//! - [`catalog`] -- [`CropSpec`] entries and the immutable [`CropCatalog`].
//! - [`crop`] -- [`CropInstance`] and the pure growth functions
//!   ([`growth_fraction`], [`stage_for`], [`seconds_remaining`]).
//! - [`grid`] -- [`FarmGrid`]: bounds-checked plant/harvest/expand.
//! - [`display`] -- Presentation derivations (remaining-time labels,
//!   progress bars, stage glyphs) shared by every front end.
//! - [`error`] -- Error types for invalid input.

pub mod catalog;
pub mod crop;
pub mod display;
pub mod error;
pub mod grid;

// Re-export primary types at crate root.
pub use catalog::{CropCatalog, CropSpec};
pub use crop::{CropInstance, Growth, growth_fraction, seconds_remaining, stage_for};
pub use display::{StageGlyphs, format_remaining, progress_bar, remaining_label};
pub use error::FarmError;
pub use grid::{FarmGrid, MAX_DIMENSION};
