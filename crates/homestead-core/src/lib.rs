//! Game orchestration for the Homestead engine.
//!
//! This crate wires the farm, the player, and the save store into a
//! playable game:
//!
//! ```text
//! SaveStore --load--> offline::reconcile --> GameSession <--plant/harvest-- host
//!                                                |
//!                          runner: growth refresh + autosave ticks
//! ```
//!
//! # Modules
//!
//! - [`config`] -- [`GameConfig`] (YAML) and the validated [`GameRules`].
//! - [`clock`] -- The [`Clock`] abstraction over wall-clock time.
//! - [`offline`] -- One-shot reconciliation of time spent away.
//! - [`session`] -- [`GameSession`]: live play and level-up unlocks.
//! - [`view`] -- Read-only projection of a session for front ends.
//! - [`persistence`] -- Load, save, and new-game orchestration.
//! - [`runner`] -- Async loop driving refresh and autosave ticks.

pub mod clock;
pub mod config;
pub mod offline;
pub mod persistence;
pub mod runner;
pub mod session;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ConfigError, DisplayConfig, FarmConfig, GameConfig, GameRules, LoggingConfig, SaveConfig,
    TimingConfig,
};
pub use offline::{AutoHarvest, OfflineSummary, WelcomeBack, reconcile};
pub use persistence::{LoadedGame, load_game, load_or_new, new_game, save_game};
pub use runner::{NoOpObserver, RunSummary, SessionObserver, ViewPublisher, run_session};
pub use session::{GameSession, HarvestOutcome, PlantOutcome};
pub use view::{CellView, CropView, FarmView, PlayerView};
