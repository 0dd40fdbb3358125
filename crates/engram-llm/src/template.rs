//! Prompt template assets with literal token substitution
//!
//! Templates embed literal JSON examples, so `{token}` placeholders are
//! resolved by plain substring replacement. Running them through a
//! formatting engine would mistake the example braces for placeholders.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a prompt template asset
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template asset does not exist
    #[error("prompt template not found: {0}")]
    NotFound(PathBuf),

    /// The template asset exists but could not be read
    #[error("failed to read prompt template {path}: {source}")]
    Io {
        /// Path of the unreadable asset
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// A named prompt template with `{token}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    template: String,
}

impl PromptTemplate {
    /// Load a template from an external asset.
    ///
    /// A missing asset is a construction-time failure; callers are expected
    /// to treat it as fatal rather than continue with a half-wired pipeline.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Err(TemplateError::NotFound(path.to_path_buf()));
        }

        let template = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template".to_string());

        debug!("loaded prompt template '{}' ({} chars)", name, template.len());
        Ok(Self { name, template })
    }

    /// Build a template from in-memory text (used by tests and built-in prompts)
    pub fn from_text(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Template name (the asset's file stem)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute each `{token}` by literal replacement.
    ///
    /// Tokens absent from the template are ignored; brace characters that do
    /// not spell a provided token are left exactly as written.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
        let mut prompt = self.template.clone();
        for (token, value) in substitutions {
            let placeholder = format!("{{{}}}", token);
            prompt = prompt.replace(&placeholder, value);
        }
        prompt
    }
}
