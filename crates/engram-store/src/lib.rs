//! Engram Storage Layer
//!
//! Implements the `WorkspaceStore` trait over a single JSON document on
//! disk. The workspace is replaced wholesale on every save; there is no
//! incremental patching, no locking, and no history. Callers that share a
//! path across concurrent pipelines must serialize writes themselves.
//!
//! Absence or invalidity of the document is a valid initial state: `load`
//! always produces a workspace, falling back to the canonical empty one.
//! Persistence failures, by contrast, are never swallowed.
//!
//! # Examples
//!
//! ```no_run
//! use engram_store::FileWorkspaceStore;
//! use engram_domain::traits::WorkspaceStore;
//!
//! let store = FileWorkspaceStore::new("memory/workspace.json");
//! let workspace = store.load();
//! store.save(&workspace).unwrap();
//! ```

#![warn(missing_docs)]

use engram_domain::traits::WorkspaceStore;
use engram_domain::Workspace;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during workspace persistence
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document is missing a required top-level key
    #[error("invalid workspace document: {0}")]
    Validation(String),

    /// Filesystem failure while writing the document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workspace could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed implementation of `WorkspaceStore`
pub struct FileWorkspaceStore {
    path: PathBuf,
}

impl FileWorkspaceStore {
    /// Create a store bound to the given document path.
    ///
    /// The path does not have to exist yet; parent directories are created
    /// on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate and write a raw workspace document.
    ///
    /// The document must carry all three required top-level keys; anything
    /// else fails with a validation error before touching the filesystem.
    pub fn save_document(&self, document: &Value) -> Result<(), StoreError> {
        for key in Workspace::REQUIRED_KEYS {
            if document.get(key).is_none() {
                return Err(StoreError::Validation(format!(
                    "missing required key '{}'",
                    key
                )));
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, contents)?;
        info!("workspace saved to {}", self.path.display());
        Ok(())
    }
}

impl WorkspaceStore for FileWorkspaceStore {
    type Error = StoreError;

    fn load(&self) -> Workspace {
        if !self.path.exists() {
            info!(
                "workspace document {} does not exist, starting empty",
                self.path.display()
            );
            return Workspace::default();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(
                    "workspace document {} is unreadable ({}), starting empty",
                    self.path.display(),
                    e
                );
                return Workspace::default();
            }
        };

        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "workspace document {} is not valid JSON ({}), starting empty",
                    self.path.display(),
                    e
                );
                return Workspace::default();
            }
        };

        // A document missing any required key is treated as stale format
        // and discarded, not repaired in place.
        let all_keys_present = Workspace::REQUIRED_KEYS
            .iter()
            .all(|key| value.get(key).is_some());
        if !all_keys_present {
            warn!(
                "workspace document {} is missing required keys, starting empty",
                self.path.display()
            );
            return Workspace::default();
        }

        Workspace::sanitize(value)
    }

    fn save(&self, workspace: &Workspace) -> Result<(), StoreError> {
        let document = serde_json::to_value(workspace)?;
        self.save_document(&document)
    }
}
