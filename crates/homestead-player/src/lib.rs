//! Player progression for the Homestead engine.
//!
//! Coins, experience and levels, lifetime counters, and the set of crops
//! the player may plant.
//!
//! # Modules
//!
//! - [`config`] -- [`ProgressionConfig`]: starting values and the XP curve.
//! - [`player`] -- [`PlayerState`] and its arithmetic.
//! - [`error`] -- Error types for restoring persisted player state.

pub mod config;
pub mod error;
pub mod player;

pub use config::ProgressionConfig;
pub use error::PlayerError;
pub use player::{PlayerRecord, PlayerState};
