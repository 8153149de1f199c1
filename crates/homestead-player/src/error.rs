//! Error types for the `homestead-player` crate.

/// Errors raised when restoring persisted player state.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Levels start at 1.
    #[error("player level must be at least 1, got {0}")]
    InvalidLevel(u32),
}
