//! Command implementations.

mod ingest;
mod resolve;
mod show;
mod track;

pub use ingest::execute_ingest;
pub use resolve::execute_resolve;
pub use show::execute_show;
pub use track::execute_track;

use crate::config::Config;
use engram_llm::{OllamaProvider, PromptTemplate};
use engram_reconciler::Reconciler;
use engram_store::FileWorkspaceStore;
use std::time::Duration;

/// Build the configured oracle backend.
fn oracle(config: &Config) -> OllamaProvider {
    OllamaProvider::with_timeout(
        &config.ollama.endpoint,
        &config.ollama.model,
        Duration::from_secs(config.ollama.timeout_secs),
    )
}

/// Wire the reconciliation engine from the configuration.
fn reconciler(
    config: &Config,
) -> crate::Result<Reconciler<OllamaProvider, FileWorkspaceStore>> {
    let template = PromptTemplate::load(&config.prompts.reconciliation)?;
    let store = FileWorkspaceStore::new(&config.memory_path);
    Ok(Reconciler::new(oracle(config), store, template))
}
