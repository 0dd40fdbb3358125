//! Engram Extractor
//!
//! Converts unstructured text into an aggregated semantic structure by
//! driving the oracle once per chunk of input.
//!
//! # Architecture
//!
//! ```text
//! Text → Segmenter → Chunks → per-chunk oracle call → SemanticStructure
//! ```
//!
//! # Key Properties
//!
//! - **Ordered aggregation**: chunks are processed strictly sequentially and
//!   their records concatenated in emission order
//! - **Failure isolation**: an oracle or parse failure for one chunk drops
//!   that chunk's contribution and never aborts the batch
//! - **No local deduplication**: near-duplicate records across chunks are
//!   deferred to the reconciliation oracle
//!
//! # Example Usage
//!
//! ```
//! use engram_extractor::{Extractor, ExtractorConfig};
//! use engram_llm::{MockProvider, PromptTemplate};
//!
//! let llm = MockProvider::new(r#"{"entities": [{"name": "Alice"}]}"#);
//! let template = PromptTemplate::from_text("operator", "Extract from: {input_text}");
//! let extractor = Extractor::new(llm, template, &ExtractorConfig::default()).unwrap();
//!
//! let structure = extractor.extract("Alice was arrested in Taipei.");
//! assert_eq!(structure.entities.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod segmenter;


pub use config::{ExtractorConfig, SegmentStrategy};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use segmenter::{Chunk, ChunkId, Segmenter};
