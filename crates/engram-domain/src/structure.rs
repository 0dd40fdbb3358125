//! The per-ingestion semantic extraction aggregate

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ephemeral aggregate built from one ingested document.
///
/// Each partition is an ordered list of oracle-defined records. The
/// aggregate is created by the extractor, consumed once by the reconciler,
/// then discarded; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticStructure {
    /// Entities mentioned in the text
    #[serde(default)]
    pub entities: Vec<Value>,

    /// Events described by the text
    #[serde(default)]
    pub events: Vec<Value>,

    /// Questions raised directly by the text
    #[serde(default)]
    pub questions: Vec<Value>,

    /// Roles entities play
    #[serde(default)]
    pub roles: Vec<Value>,

    /// State changes observed
    #[serde(default)]
    pub states: Vec<Value>,

    /// Actions taken by entities
    #[serde(default)]
    pub actions: Vec<Value>,

    /// Time and location context
    #[serde(default)]
    pub spatiotemporal_context: Vec<Value>,

    /// Prospective follow-up questions the text implies
    #[serde(default)]
    pub forward_falling_questions: Vec<Value>,
}

impl SemanticStructure {
    /// Append every matching array field of an oracle response into the
    /// running aggregate.
    ///
    /// This is pure concatenation: deduplication of near-identical records
    /// across chunks is deferred to the reconciliation oracle. Fields the
    /// response does not carry are skipped.
    pub fn absorb(&mut self, response: &Value) {
        for (key, partition) in [
            ("entities", &mut self.entities),
            ("events", &mut self.events),
            ("questions", &mut self.questions),
            ("roles", &mut self.roles),
            ("states", &mut self.states),
            ("actions", &mut self.actions),
            ("spatiotemporal_context", &mut self.spatiotemporal_context),
            (
                "forward_falling_questions",
                &mut self.forward_falling_questions,
            ),
        ] {
            if let Some(items) = response.get(key).and_then(Value::as_array) {
                partition.extend(items.iter().cloned());
            }
        }
    }

    /// True when every partition is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.events.is_empty()
            && self.questions.is_empty()
            && self.roles.is_empty()
            && self.states.is_empty()
            && self.actions.is_empty()
            && self.spatiotemporal_context.is_empty()
            && self.forward_falling_questions.is_empty()
    }
}
