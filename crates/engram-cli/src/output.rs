//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use engram_domain::Workspace;
use serde_json::Value;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the workspace for display.
    pub fn format_workspace(&self, workspace: &Workspace) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(workspace)?),
            OutputFormat::Summary => Ok(self.format_workspace_summary(workspace)),
            OutputFormat::Quiet => Ok(format!(
                "actors={} events={} questions={} open={}",
                workspace.actors.len(),
                workspace.events.len(),
                workspace.questions.len(),
                workspace.open_questions().len()
            )),
        }
    }

    /// Format a list of question records for display.
    pub fn format_questions(&self, questions: &[Value]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(questions)?),
            OutputFormat::Summary => {
                if questions.is_empty() {
                    return Ok(self.colorize("No open questions.", Color::Yellow));
                }
                let lines: Vec<String> = questions
                    .iter()
                    .map(|question| format!("  - {}", record_label(question)))
                    .collect();
                Ok(format!(
                    "{}\n{}",
                    self.colorize(&format!("Open questions ({})", questions.len()), Color::Blue),
                    lines.join("\n")
                ))
            }
            OutputFormat::Quiet => Ok(questions.len().to_string()),
        }
    }

    fn format_workspace_summary(&self, workspace: &Workspace) -> String {
        if workspace.is_empty() {
            return self.colorize("The workspace is empty.", Color::Yellow);
        }

        let mut out = Vec::new();
        for (title, records) in [
            ("Actors", &workspace.actors),
            ("Events", &workspace.events),
            ("Questions", &workspace.questions),
        ] {
            out.push(self.colorize(&format!("{} ({})", title, records.len()), Color::Blue));
            for record in records {
                out.push(format!("  - {}", record_label(record)));
            }
        }
        out.push(format!(
            "{} open question(s)",
            workspace.open_questions().len()
        ));
        out.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            Color::Green => text.green().to_string(),
            Color::Blue => text.blue().to_string(),
            Color::Yellow => text.yellow().to_string(),
        }
    }
}

enum Color {
    Green,
    Blue,
    Yellow,
}

/// One-line label for an arbitrary JSON record: its most descriptive string
/// field, or the compact record itself as a fallback.
fn record_label(record: &Value) -> String {
    for key in ["name", "summary", "question", "id"] {
        if let Some(label) = record.get(key).and_then(Value::as_str) {
            return label.to_string();
        }
    }
    record.to_string()
}
