//! Engram LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` trait from `engram-domain`,
//! plus the two utilities shared by every oracle-facing component:
//!
//! - [`response::parse_structured`]: syntactic recovery of JSON from
//!   free-form generative output
//! - [`template::PromptTemplate`]: literal token substitution for prompt
//!   assets that embed JSON examples
//!
//! # Providers
//!
//! - `MockProvider`: deterministic scripted provider for testing
//! - `OllamaProvider`: local Ollama API integration over blocking HTTP
//!
//! # Examples
//!
//! ```
//! use engram_llm::MockProvider;
//! use engram_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod response;
pub mod template;

use engram_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use response::ParseError;
pub use template::{PromptTemplate, TemplateError};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Scripted LLM provider for deterministic testing.
///
/// Responses are served from a FIFO script first, then from a fixed default.
/// The pipeline drives the oracle through several sequential calls per
/// ingestion, so a queue keeps test scripts independent of exact prompt text.
///
/// # Examples
///
/// ```
/// use engram_llm::MockProvider;
/// use engram_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("default");
/// provider.push_response("first");
/// assert_eq!(provider.generate("a").unwrap(), "first");
/// assert_eq!(provider.generate("b").unwrap(), "default");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a provider that answers every prompt with a fixed response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one response to serve before falling back to the default
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue one generation failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
    }

    /// Number of generate calls observed so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// The most recent prompt passed to generate
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    /// All prompts passed to generate, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate("any prompt").unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_scripted_responses() {
        let provider = MockProvider::new("fallback");
        provider.push_response("one");
        provider.push_response("two");

        assert_eq!(provider.generate("a").unwrap(), "one");
        assert_eq!(provider.generate("b").unwrap(), "two");
        assert_eq!(provider.generate("c").unwrap(), "fallback");
    }

    #[test]
    fn test_mock_provider_scripted_error() {
        let provider = MockProvider::default();
        provider.push_error("backend unavailable");

        let result = provider.generate("prompt");
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[test]
    fn test_mock_provider_records_prompts() {
        let provider = MockProvider::new("ok");
        provider.generate("first prompt").unwrap();
        provider.generate("second prompt").unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().unwrap(), "second prompt");
        assert_eq!(provider.prompts()[0], "first prompt");
    }

    #[test]
    fn test_mock_provider_clone_shares_script() {
        let provider = MockProvider::new("ok");
        let clone = provider.clone();
        clone.push_response("from clone");

        assert_eq!(provider.generate("x").unwrap(), "from clone");
        assert_eq!(clone.call_count(), 1);
    }
}
