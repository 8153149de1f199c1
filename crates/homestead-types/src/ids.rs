//! Catalog keys.
//!
//! Crops are identified by the upper-case key they are configured under
//! (`"RADISH"`, `"PUMPKIN"`, ...). The key is what gets persisted in the
//! `crop_type` field of a save file, so it is kept as a plain string
//! wrapped in a newtype rather than a closed Rust enum: the catalog is
//! configuration, not code.

use serde::{Deserialize, Serialize};

/// Key of a crop species in the crop catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropKind(String);

impl CropKind {
    /// Wrap a catalog key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CropKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CropKind {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for CropKind {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let kind = CropKind::from("RADISH");
        let json = serde_json::to_string(&kind).ok();
        assert_eq!(json.as_deref(), Some("\"RADISH\""));
    }

    #[test]
    fn orders_lexicographically() {
        assert!(CropKind::from("CARROT") < CropKind::from("RADISH"));
    }
}
