//! Engram Domain Layer
//!
//! This crate contains the core data model for Engram's episodic memory
//! pipeline and the trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Workspace**: the persistent memory snapshot (`actors`/`events`/`questions`)
//! - **SemanticStructure**: the ephemeral per-ingestion extraction aggregate
//! - **LlmProvider**: the injected generative capability (the "oracle")
//! - **WorkspaceStore**: persistence boundary for the workspace document
//!
//! ## Architecture
//!
//! - Pure data model and trait definitions only
//! - Infrastructure implementations live in other crates
//! - Inner record shapes are oracle-defined and kept as raw JSON values

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod structure;
pub mod traits;
pub mod workspace;

// Re-exports for convenience
pub use structure::SemanticStructure;
pub use workspace::Workspace;
