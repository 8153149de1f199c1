//! Save snapshots and persistence for the Homestead engine.
//!
//! The snapshot is the only bit-exact boundary of the engine: a JSON
//! document holding the farm, the player, and the time it was written.
//! The game core never touches files. It asks a [`SaveStore`] for the
//! last snapshot and hands it a new one, and every failure in between
//! collapses to "no save" or "not saved".
//!
//! ```text
//! FarmGrid + PlayerState --capture--> SaveSnapshot --to_json--> store
//! store --from_json + check_structure--> SaveSnapshot --restore--> live state
//! ```
//!
//! # Modules
//!
//! - [`snapshot`] -- The [`SaveSnapshot`] schema and its conversions.
//! - [`store`] -- The [`SaveStore`] trait, [`JsonFileStore`], [`MemoryStore`].
//! - [`error`] -- [`SaveError`].

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::SaveError;
pub use snapshot::{
    CropSnapshot, FarmSnapshot, PlayerSnapshot, RestoredGame, SAVE_VERSION, SaveSnapshot,
};
pub use store::{JsonFileStore, MemoryStore, SaveStore};
