//! Reconciliation errors

use thiserror::Error;

/// Errors that can occur during reconciliation
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The oracle call itself failed (transport, backend)
    #[error("Oracle call failed: {0}")]
    Oracle(String),

    /// Persisting the merged workspace failed
    #[error("Workspace persistence failed: {0}")]
    Store(String),

    /// A workspace or structure could not be serialized for the prompt
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
