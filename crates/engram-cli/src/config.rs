//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use engram_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the persisted workspace document
    #[serde(default = "default_memory_path")]
    pub memory_path: PathBuf,

    /// Prompt template assets
    #[serde(default)]
    pub prompts: Prompts,

    /// Oracle backend settings
    #[serde(default)]
    pub ollama: OllamaSettings,

    /// Segmentation settings
    #[serde(default)]
    pub chunking: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Prompt template asset paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompts {
    /// Per-chunk extraction prompt
    #[serde(default = "default_operator_prompt")]
    pub operator: PathBuf,

    /// Workspace merge prompt
    #[serde(default = "default_reconciliation_prompt")]
    pub reconciliation: PathBuf,
}

/// Ollama backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSettings {
    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// JSON format
    Json,
    /// Quiet (counts only) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".engram").join("config.toml"))
    }

    /// Load configuration from an explicit file. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the default configuration file, creating it on first run.
    pub fn load_or_init() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().ok();
            Ok(config)
        }
    }

    /// Save configuration to the default file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_path: default_memory_path(),
            prompts: Prompts::default(),
            ollama: OllamaSettings::default(),
            chunking: ExtractorConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            operator: default_operator_prompt(),
            reconciliation: default_reconciliation_prompt(),
        }
    }
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Summary,
        }
    }
}

fn default_memory_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".engram")
        .join("memory.json")
}

fn default_operator_prompt() -> PathBuf {
    PathBuf::from("prompts/operator.md")
}

fn default_reconciliation_prompt() -> PathBuf {
    PathBuf::from("prompts/reconciliation.md")
}

fn default_endpoint() -> String {
    engram_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    engram_llm::ollama::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Summary
}
