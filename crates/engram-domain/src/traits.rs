//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! infrastructure. Implementations live in other crates.

use crate::Workspace;

/// Trait for the injected generative capability (the "oracle").
///
/// Implemented by the infrastructure layer (engram-llm). Calls are blocking
/// one-shot request/response exchanges; timeouts and cancellation, if any,
/// are the implementation's concern.
pub trait LlmProvider {
    /// Error type for generation failures
    type Error;

    /// Generate a text completion for the given prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for loading and saving the persisted workspace document.
///
/// Implemented by the infrastructure layer (engram-store).
pub trait WorkspaceStore {
    /// Error type for persistence failures
    type Error;

    /// Load the workspace, treating absence or invalid content as the
    /// canonical empty workspace rather than an error
    fn load(&self) -> Workspace;

    /// Replace the persisted document wholesale. Persistence failures are
    /// never swallowed; they propagate to the caller.
    fn save(&self, workspace: &Workspace) -> Result<(), Self::Error>;
}
