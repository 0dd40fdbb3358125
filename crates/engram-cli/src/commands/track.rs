//! Track command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use engram_domain::traits::WorkspaceStore;

/// Re-evaluate tracked questions against the recorded events and persist.
pub fn execute_track(config: &Config, formatter: &Formatter) -> Result<()> {
    let reconciler = super::reconciler(config)?;
    let mut workspace = reconciler.store().load();

    if workspace.questions.is_empty() {
        println!("{}", formatter.info("No tracked questions."));
        return Ok(());
    }

    reconciler.track_questions(&mut workspace)?;
    reconciler.store().save(&workspace)?;

    let open = workspace.open_questions();
    println!(
        "{}",
        formatter.success(&format!(
            "Question tracking pass complete: {} of {} still open",
            open.len(),
            workspace.questions.len()
        ))
    );
    println!("{}", formatter.format_questions(&open)?);
    Ok(())
}
