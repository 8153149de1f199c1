//! Persistence stores.
//!
//! [`SaveStore`] is the game core's only I/O boundary. Implementations
//! never return an error: a missing, unreadable, or invalid save is simply
//! `None`, and a failed write is `false`. Anything worth knowing about the
//! failure is logged here, where the cause is still at hand.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::SaveError;
use crate::snapshot::SaveSnapshot;

/// Somewhere a save snapshot can be loaded from and stored to.
pub trait SaveStore: Send + Sync {
    /// The last stored snapshot, or `None` if there is none or it is
    /// structurally invalid.
    fn load_raw(&self) -> Option<SaveSnapshot>;

    /// Store a snapshot, replacing the previous one. Returns whether the
    /// write succeeded. Callers do not retry.
    fn store_raw(&self, snapshot: &SaveSnapshot) -> bool;
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A save file on disk.
///
/// Writes go to a sibling `.json.tmp` file that is then renamed over the
/// save, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store for the save file at `path`. Nothing is touched until the
    /// first load or store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and check the save file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Io`] if the file cannot be read, or the
    /// [`SaveSnapshot::from_json`] error for an invalid document.
    pub fn read(&self) -> Result<Option<SaveSnapshot>, SaveError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        SaveSnapshot::from_json(&json).map(Some)
    }

    /// Write the save file, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Io`] if any filesystem step fails, or
    /// [`SaveError::Json`] if serialization fails.
    pub fn write(&self, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = snapshot.to_json()?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SaveStore for JsonFileStore {
    fn load_raw(&self) -> Option<SaveSnapshot> {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unusable save file"
                );
                None
            }
        }
    }

    fn store_raw(&self, snapshot: &SaveSnapshot) -> bool {
        match self.write(snapshot) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Save file written");
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to write save file"
                );
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process store holding the serialized document.
///
/// Round-trips through the same JSON text as [`JsonFileStore`], so it
/// exercises the full schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with a raw document, which need not be valid.
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(json.into())),
        }
    }

    /// The stored document, if any.
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SaveStore for MemoryStore {
    fn load_raw(&self) -> Option<SaveSnapshot> {
        let json = self.document()?;
        match SaveSnapshot::from_json(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unusable in-memory save");
                None
            }
        }
    }

    fn store_raw(&self, snapshot: &SaveSnapshot) -> bool {
        match snapshot.to_json() {
            Ok(json) => {
                *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize in-memory save");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
