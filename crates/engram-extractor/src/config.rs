//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text segmentation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStrategy {
    /// Fixed-size sliding window
    #[default]
    Fixed,
    /// Sentence-boundary accumulation (CJK and Latin terminators)
    Semantic,
    /// Blank-line paragraph accumulation
    Paragraph,
}

impl SegmentStrategy {
    /// Names accepted by `FromStr`
    pub const VALID_NAMES: [&'static str; 3] = ["fixed", "semantic", "paragraph"];
}

impl fmt::Display for SegmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentStrategy::Fixed => "fixed",
            SegmentStrategy::Semantic => "semantic",
            SegmentStrategy::Paragraph => "paragraph",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SegmentStrategy {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(SegmentStrategy::Fixed),
            "semantic" => Ok(SegmentStrategy::Semantic),
            "paragraph" => Ok(SegmentStrategy::Paragraph),
            other => Err(ExtractorError::Config(format!(
                "unknown segmentation strategy '{}'; valid strategies: {}",
                other,
                Self::VALID_NAMES.join(", ")
            ))),
        }
    }
}

/// Configuration for segmentation and extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Segmentation strategy
    #[serde(default)]
    pub strategy: SegmentStrategy,

    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl ExtractorConfig {
    /// Validate the configuration.
    ///
    /// An overlap at or above the chunk size would stall the fixed-window
    /// scan, so it is rejected here instead of looping silently.
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.chunk_size == 0 {
            return Err(ExtractorError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ExtractorError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            strategy: SegmentStrategy::Fixed,
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    100
}
