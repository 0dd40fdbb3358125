//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use engram_domain::traits::WorkspaceStore;
use engram_store::FileWorkspaceStore;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = FileWorkspaceStore::new(&config.memory_path);
    let workspace = store.load();

    if args.open {
        println!("{}", formatter.format_questions(&workspace.open_questions())?);
    } else {
        println!("{}", formatter.format_workspace(&workspace)?);
    }
    Ok(())
}
