//! Resolve command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use engram_domain::traits::WorkspaceStore;

/// Execute a conflict-resolution pass and persist the repaired workspace.
pub fn execute_resolve(config: &Config, formatter: &Formatter) -> Result<()> {
    let reconciler = super::reconciler(config)?;
    let mut workspace = reconciler.store().load();

    if workspace.is_empty() {
        println!("{}", formatter.info("The workspace is empty, nothing to resolve."));
        return Ok(());
    }

    reconciler.resolve_conflicts(&mut workspace)?;
    reconciler.store().save(&workspace)?;

    println!("{}", formatter.success("Conflict resolution pass complete."));
    println!("{}", formatter.format_workspace(&workspace)?);
    Ok(())
}
