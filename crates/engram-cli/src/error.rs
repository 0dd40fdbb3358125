//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Prompt template error
    #[error("Prompt template error: {0}")]
    Template(#[from] engram_llm::TemplateError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extract(#[from] engram_extractor::ExtractorError),

    /// Reconciliation error
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] engram_reconciler::ReconcileError),

    /// Workspace persistence error
    #[error("Workspace error: {0}")]
    Store(#[from] engram_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
