//! Shared value types for the Homestead farming engine.
//!
//! Every other crate in the workspace builds on the small set of value
//! types defined here. None of them carry behaviour beyond parsing,
//! formatting and ordering.
//!
//! # Modules
//!
//! - [`ids`] -- [`CropKind`], the catalog key identifying a crop species.
//! - [`coord`] -- [`Coord`], a value-typed grid position with the
//!   `"{x},{y}"` text form used at the save boundary.
//! - [`time`] -- [`Timestamp`], seconds since the Unix epoch.
//! - [`enums`] -- [`GrowthStage`] display buckets.
//! - [`events`] -- [`GameEvent`], the notifications a live session emits.

pub mod coord;
pub mod enums;
pub mod events;
pub mod ids;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use coord::{Coord, CoordParseError};
pub use enums::GrowthStage;
pub use events::GameEvent;
pub use ids::CropKind;
pub use time::Timestamp;
