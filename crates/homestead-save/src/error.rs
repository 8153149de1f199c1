//! Error types for the persistence layer.
//!
//! These never reach the game core directly: the [`SaveStore`](crate::SaveStore)
//! implementations log them and report "no save" or "not saved" instead.

use homestead_farm::FarmError;
use homestead_player::PlayerError;

/// Errors that can occur while reading, writing, or restoring a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading or writing the save file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or lacks required fields.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but violates the save structure.
    #[error("invalid save structure: {0}")]
    Schema(String),

    /// The farm section names an unknown crop or holds a bad timestamp.
    #[error("invalid farm data: {0}")]
    Farm(#[from] FarmError),

    /// The player section is out of range.
    #[error("invalid player data: {0}")]
    Player(#[from] PlayerError),
}
