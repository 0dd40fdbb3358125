//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use engram_extractor::SegmentStrategy;
use std::path::PathBuf;

/// Engram CLI - Ingest text into a persistent episodic memory.
#[derive(Debug, Parser)]
#[command(name = "engram")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable summary (default)
    Summary,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest text into the workspace
    Ingest(IngestArgs),

    /// Show the current workspace
    Show(ShowArgs),

    /// Run a conflict-resolution pass over the workspace
    Resolve,

    /// Re-evaluate tracked questions against the recorded events
    Track,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Text file to ingest
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Segmentation strategy (fixed, semantic, paragraph)
    #[arg(short, long)]
    pub strategy: Option<SegmentStrategy>,

    /// Target chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Skip the forward-falling question derivation pass
    #[arg(long)]
    pub no_forward_questions: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Show only the open questions
    #[arg(long)]
    pub open: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Summary => crate::config::OutputFormat::Summary,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
