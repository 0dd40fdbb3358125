//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use engram_domain::traits::WorkspaceStore;
use engram_extractor::Extractor;
use engram_llm::PromptTemplate;
use std::fs;
use std::io::{self, Read};

/// Execute the ingest command: segment, extract, reconcile, persist.
pub fn execute_ingest(args: IngestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = args.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("No text provided".to_string()));
    }

    let mut chunking = config.chunking.clone();
    if let Some(strategy) = args.strategy {
        chunking.strategy = strategy;
    }
    if let Some(chunk_size) = args.chunk_size {
        chunking.chunk_size = chunk_size;
    }
    if let Some(overlap) = args.overlap {
        chunking.overlap = overlap;
    }

    let operator = PromptTemplate::load(&config.prompts.operator)?;
    let extractor = Extractor::new(super::oracle(config), operator, &chunking)?;

    let mut structure = extractor.extract(&text);
    if structure.is_empty() {
        println!("{}", formatter.info("Nothing extracted, workspace unchanged."));
        return Ok(());
    }
    if !args.no_forward_questions {
        extractor.derive_forward_questions(&mut structure);
    }

    let reconciler = super::reconciler(config)?;
    let prev = reconciler.store().load();
    let merged = reconciler.reconcile(&prev, &structure)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Workspace updated: {} actors, {} events, {} questions ({} open)",
            merged.actors.len(),
            merged.events.len(),
            merged.questions.len(),
            merged.open_questions().len()
        ))
    );
    Ok(())
}
