//! Error types for the Extractor

use engram_llm::TemplateError;
use thiserror::Error;

/// Errors that can occur while constructing the extraction pipeline.
///
/// Per-chunk oracle and parse failures are deliberately absent: they are
/// isolated, logged, and degrade to "no contribution" for that chunk rather
/// than surfacing as errors.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Invalid segmentation or extraction configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operator prompt template asset is missing or unreadable
    #[error(transparent)]
    Template(#[from] TemplateError),
}
