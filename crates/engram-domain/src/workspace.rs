//! The persistent semantic workspace

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// The persistent memory snapshot accumulated across ingestions.
///
/// The schema is exactly three ordered lists; the shape of the records
/// inside each list is decided by the reconciliation oracle, so they are
/// kept as raw JSON values. Order is irrelevant to correctness but is
/// preserved for stability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Entities known to the memory (people, organizations, objects)
    #[serde(default)]
    pub actors: Vec<Value>,

    /// Events the memory has witnessed
    #[serde(default)]
    pub events: Vec<Value>,

    /// Tracked questions, both open and resolved
    #[serde(default)]
    pub questions: Vec<Value>,
}

impl Workspace {
    /// Top-level keys every persisted workspace document must carry
    pub const REQUIRED_KEYS: [&'static str; 3] = ["actors", "events", "questions"];

    /// Coerce an arbitrary JSON value into the three-key workspace schema.
    ///
    /// A missing or non-array key is reset to an empty list with a warning,
    /// never an error. Unknown top-level keys are dropped.
    pub fn sanitize(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                warn!(
                    "workspace value is {} rather than an object, resetting to empty schema",
                    json_type_name(&other)
                );
                return Self::default();
            }
        };

        let mut lists = [Vec::new(), Vec::new(), Vec::new()];
        for (slot, key) in lists.iter_mut().zip(Self::REQUIRED_KEYS) {
            match object.remove(key) {
                Some(Value::Array(items)) => *slot = items,
                Some(other) => {
                    warn!(
                        "workspace key '{}' is {} rather than an array, resetting to empty",
                        key,
                        json_type_name(&other)
                    );
                }
                None => {
                    warn!("workspace is missing key '{}', inserting empty list", key);
                }
            }
        }

        let [actors, events, questions] = lists;
        Self {
            actors,
            events,
            questions,
        }
    }

    /// The still-open subset of tracked questions.
    ///
    /// A question counts as closed once the oracle has marked it with
    /// `"status": "resolved"` or `"resolved": true`.
    pub fn open_questions(&self) -> Vec<Value> {
        self.questions
            .iter()
            .filter(|question| !is_resolved(question))
            .cloned()
            .collect()
    }

    /// True when all three lists are empty
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.events.is_empty() && self.questions.is_empty()
    }
}

fn is_resolved(question: &Value) -> bool {
    if question.get("resolved").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    question.get("status").and_then(Value::as_str) == Some("resolved")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_complete_object() {
        let value = json!({
            "actors": [{"id": "actor:alice"}],
            "events": [{"summary": "arrest"}],
            "questions": [{"question": "when is the trial?"}],
        });

        let workspace = Workspace::sanitize(value);
        assert_eq!(workspace.actors.len(), 1);
        assert_eq!(workspace.events.len(), 1);
        assert_eq!(workspace.questions.len(), 1);
    }

    #[test]
    fn test_sanitize_missing_key_becomes_empty_list() {
        let value = json!({"actors": [], "events": []});
        let workspace = Workspace::sanitize(value);
        assert!(workspace.questions.is_empty());
    }

    #[test]
    fn test_sanitize_non_list_key_is_reset() {
        let value = json!({"actors": "not a list", "events": [], "questions": []});
        let workspace = Workspace::sanitize(value);
        assert!(workspace.actors.is_empty());
    }

    #[test]
    fn test_sanitize_non_object_resets_everything() {
        let workspace = Workspace::sanitize(json!([1, 2, 3]));
        assert!(workspace.is_empty());
    }

    #[test]
    fn test_deserialization_tolerates_missing_keys() {
        let workspace: Workspace = serde_json::from_str(r#"{"actors": []}"#).unwrap();
        assert!(workspace.events.is_empty());
        assert!(workspace.questions.is_empty());
    }

    #[test]
    fn test_open_questions_filters_resolved() {
        let workspace = Workspace {
            questions: vec![
                json!({"question": "open one"}),
                json!({"question": "closed by status", "status": "resolved"}),
                json!({"question": "closed by flag", "resolved": true}),
                json!({"question": "still pending", "status": "unresolved"}),
            ],
            ..Default::default()
        };

        let open = workspace.open_questions();
        assert_eq!(open.len(), 2);
        assert_eq!(open[0]["question"], "open one");
        assert_eq!(open[1]["question"], "still pending");
    }
}
