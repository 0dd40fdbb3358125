//! The reconciliation engine

use crate::error::ReconcileError;
use engram_domain::traits::{LlmProvider, WorkspaceStore};
use engram_domain::{SemanticStructure, Workspace};
use engram_llm::response::parse_structured;
use engram_llm::PromptTemplate;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Merges newly extracted semantic structures into the persistent workspace.
///
/// Holds the only write path to the store; extraction and the CLI read the
/// workspace but never persist it themselves.
pub struct Reconciler<L, S>
where
    L: LlmProvider,
    S: WorkspaceStore,
{
    llm: L,
    store: S,
    template: PromptTemplate,
}

impl<L, S> Reconciler<L, S>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
    S: WorkspaceStore,
    S::Error: std::fmt::Display,
{
    /// Create a new Reconciler around an oracle, a store and the
    /// reconciliation prompt asset.
    pub fn new(llm: L, store: S, template: PromptTemplate) -> Self {
        Self {
            llm,
            store,
            template,
        }
    }

    /// The store this reconciler persists through
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge an extracted structure into the previous workspace snapshot.
    ///
    /// One oracle call produces the candidate next snapshot. On success the
    /// candidate is coerced back into the three-key schema, persisted
    /// wholesale, and returned. If the oracle's answer cannot be recovered
    /// as JSON the previous snapshot is returned unchanged and nothing is
    /// written. Oracle transport failures and persistence failures are
    /// errors; a syntactically broken generation is not.
    pub fn reconcile(
        &self,
        prev: &Workspace,
        structure: &SemanticStructure,
    ) -> Result<Workspace, ReconcileError> {
        let current_workspace = serde_json::to_string_pretty(prev)?;
        let new_structure = serde_json::to_string_pretty(structure)?;
        let unanswered = serde_json::to_string_pretty(&prev.open_questions())?;

        let prompt = self.template.render(&[
            ("current_workspace", &current_workspace),
            ("new_semantic_structure", &new_structure),
            ("unanswered_queries", &unanswered),
        ]);

        debug!("reconciliation prompt is {} chars", prompt.chars().count());
        let response = self
            .llm
            .generate(&prompt)
            .map_err(|e| ReconcileError::Oracle(e.to_string()))?;

        let merged = match parse_structured(&response) {
            Ok(value) => Workspace::sanitize(value),
            Err(e) => {
                warn!("reconciliation discarded, keeping previous workspace: {}", e);
                return Ok(prev.clone());
            }
        };

        self.store
            .save(&merged)
            .map_err(|e| ReconcileError::Store(e.to_string()))?;

        info!(
            "workspace reconciled: {} actors, {} events, {} questions",
            merged.actors.len(),
            merged.events.len(),
            merged.questions.len()
        );
        Ok(merged)
    }

    /// Resolve groups of co-referent entity mentions into canonical actor
    /// records and append them to the workspace's actor list.
    ///
    /// The returned list holds only the newly created canonical records.
    /// An unparseable or non-array answer appends nothing and returns an
    /// empty list; only the oracle call itself can fail. The workspace is
    /// mutated in memory only, persistence stays with [`reconcile`].
    ///
    /// [`reconcile`]: Reconciler::reconcile
    pub fn align_entities(
        &self,
        workspace: &mut Workspace,
        mention_groups: &[Value],
    ) -> Result<Vec<Value>, ReconcileError> {
        if mention_groups.is_empty() {
            return Ok(Vec::new());
        }

        let context = json!({
            "known_actors": workspace.actors,
            "mention_groups": mention_groups,
        });
        let prompt = format!(
            "{}\n\nInput:\n{}",
            ALIGNMENT_INSTRUCTIONS,
            serde_json::to_string_pretty(&context)?
        );

        let response = self
            .llm
            .generate(&prompt)
            .map_err(|e| ReconcileError::Oracle(e.to_string()))?;

        match parse_structured(&response) {
            Ok(Value::Array(canonical)) => {
                info!(
                    "aligned {} mention groups into {} canonical actors",
                    mention_groups.len(),
                    canonical.len()
                );
                workspace.actors.extend(canonical.iter().cloned());
                Ok(canonical)
            }
            Ok(_) => {
                warn!("alignment response is not a list, keeping actors unchanged");
                Ok(Vec::new())
            }
            Err(e) => {
                warn!("alignment discarded, keeping actors unchanged: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Stamp an actor record with a new timestamp and/or location.
    ///
    /// Pure in-memory bookkeeping, no oracle involved. An unknown actor id
    /// is a warned no-op. Related records referring to the same actor are
    /// not touched yet.
    // TODO: propagate the updated context to events that reference the actor.
    pub fn update_spatiotemporal(
        &self,
        workspace: &mut Workspace,
        actor_id: &str,
        timestamp: Option<&str>,
        location: Option<&str>,
    ) {
        let actor = workspace.actors.iter_mut().find(|actor| {
            actor.get("id").and_then(Value::as_str) == Some(actor_id)
        });

        let Some(actor) = actor else {
            warn!("spatiotemporal update skipped, no actor with id '{}'", actor_id);
            return;
        };

        let Some(fields) = actor.as_object_mut() else {
            warn!("spatiotemporal update skipped, actor '{}' is not an object", actor_id);
            return;
        };

        if let Some(timestamp) = timestamp {
            fields.insert("timestamp".to_string(), json!(timestamp));
        }
        if let Some(location) = location {
            fields.insert("location".to_string(), json!(location));
        }
        debug!("updated spatiotemporal context of actor '{}'", actor_id);
    }

    /// Ask the oracle to find and repair contradictions across the whole
    /// workspace, replacing it in memory with the repaired snapshot.
    ///
    /// An unparseable answer leaves the workspace unchanged.
    pub fn resolve_conflicts(&self, workspace: &mut Workspace) -> Result<(), ReconcileError> {
        let prompt = format!(
            "{}\n\nWorkspace:\n{}",
            CONFLICT_INSTRUCTIONS,
            serde_json::to_string_pretty(workspace)?
        );

        let response = self
            .llm
            .generate(&prompt)
            .map_err(|e| ReconcileError::Oracle(e.to_string()))?;

        match parse_structured(&response) {
            Ok(value) => {
                *workspace = Workspace::sanitize(value);
                info!("conflict resolution pass applied");
            }
            Err(e) => {
                warn!("conflict resolution discarded, keeping workspace unchanged: {}", e);
            }
        }
        Ok(())
    }

    /// Re-evaluate the tracked questions against the recorded events,
    /// marking resolved ones and keeping the rest, replacing only the
    /// workspace's question list.
    ///
    /// An unparseable or non-array answer leaves the questions unchanged.
    pub fn track_questions(&self, workspace: &mut Workspace) -> Result<(), ReconcileError> {
        let context = json!({
            "events": workspace.events,
            "questions": workspace.questions,
        });
        let prompt = format!(
            "{}\n\nInput:\n{}",
            QUESTION_INSTRUCTIONS,
            serde_json::to_string_pretty(&context)?
        );

        let response = self
            .llm
            .generate(&prompt)
            .map_err(|e| ReconcileError::Oracle(e.to_string()))?;

        match parse_structured(&response) {
            Ok(Value::Array(questions)) => {
                info!("question tracking pass kept {} questions", questions.len());
                workspace.questions = questions;
            }
            Ok(_) => {
                warn!("question tracking response is not a list, keeping questions unchanged");
            }
            Err(e) => {
                warn!("question tracking discarded, keeping questions unchanged: {}", e);
            }
        }
        Ok(())
    }
}

const ALIGNMENT_INSTRUCTIONS: &str = r#"You are an entity resolution expert. Each mention group below lists surface forms believed to refer to one real-world entity. Merge every group with the known actors where they match, and mint one canonical actor record per group that matches none.

Output a JSON array of the newly minted canonical actor records only, no additional text. Each record must have this shape:

{
  "id": "actor:stable-slug",
  "name": "canonical display name",
  "aliases": ["every surface form seen"],
  "type": "person | organization | object"
}"#;

const CONFLICT_INSTRUCTIONS: &str = r#"You are a knowledge-base maintenance expert. The workspace below may contain contradictory records (mutually exclusive states, duplicate events with diverging details, stale facts superseded by newer ones). Repair the contradictions, preferring more recent and more specific records.

Output the full repaired workspace as a single JSON object with exactly the keys "actors", "events" and "questions", no additional text."#;

const QUESTION_INSTRUCTIONS: &str = r#"You are tracking open questions against a growing event record. For each question below, decide whether the events now answer it. Mark answered questions with "status": "resolved" and add an "answer" field citing the deciding event; keep every other question as it is.

Output the full updated question list as a JSON array, no additional text."#;

#[cfg(test)]
mod tests {
    use super::*;
    use engram_llm::MockProvider;
    use engram_store::FileWorkspaceStore;
    use tempfile::TempDir;

    const RECONCILIATION_TEMPLATE: &str = "\
Previous workspace:\n{current_workspace}\n\n\
New structure:\n{new_semantic_structure}\n\n\
Open questions:\n{unanswered_queries}";

    fn reconciler(
        llm: MockProvider,
        dir: &TempDir,
    ) -> Reconciler<MockProvider, FileWorkspaceStore> {
        let store = FileWorkspaceStore::new(dir.path().join("memory.json"));
        let template = PromptTemplate::from_text("reconciliation", RECONCILIATION_TEMPLATE);
        Reconciler::new(llm, store, template)
    }

    fn sample_structure() -> SemanticStructure {
        let mut structure = SemanticStructure::default();
        structure.entities.push(json!({"name": "Alice"}));
        structure.events.push(json!({"summary": "arrest"}));
        structure
    }

    #[test]
    fn test_reconcile_persists_and_returns_merged_workspace() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(
            r#"{"actors": [{"id": "actor:alice"}], "events": [{"summary": "arrest"}], "questions": []}"#,
        );
        let reconciler = reconciler(llm, &dir);

        let merged = reconciler
            .reconcile(&Workspace::default(), &sample_structure())
            .unwrap();

        assert_eq!(merged.actors.len(), 1);
        assert_eq!(merged.events.len(), 1);

        // The merged snapshot is on disk, not just in memory.
        let raw = std::fs::read_to_string(dir.path().join("memory.json")).unwrap();
        let persisted: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted["actors"][0]["id"], "actor:alice");
    }

    #[test]
    fn test_reconcile_parse_failure_keeps_previous_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new("I could not merge these, sorry!");
        let reconciler = reconciler(llm, &dir);

        let prev = Workspace {
            actors: vec![json!({"id": "actor:bob"})],
            ..Default::default()
        };

        let result = reconciler.reconcile(&prev, &sample_structure()).unwrap();
        assert_eq!(result, prev);
        assert!(!dir.path().join("memory.json").exists());
    }

    #[test]
    fn test_reconcile_oracle_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::default();
        llm.push_error("backend unavailable");
        let reconciler = reconciler(llm, &dir);

        let result = reconciler.reconcile(&Workspace::default(), &sample_structure());
        assert!(matches!(result, Err(ReconcileError::Oracle(_))));
        assert!(!dir.path().join("memory.json").exists());
    }

    #[test]
    fn test_reconcile_prompt_carries_all_three_sections() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(r#"{"actors": [], "events": [], "questions": []}"#);
        let reconciler = reconciler(llm.clone(), &dir);

        let prev = Workspace {
            actors: vec![json!({"id": "actor:alice"})],
            questions: vec![
                json!({"question": "open"}),
                json!({"question": "done", "status": "resolved"}),
            ],
            ..Default::default()
        };

        reconciler.reconcile(&prev, &sample_structure()).unwrap();

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("actor:alice"));
        assert!(prompt.contains(r#""name": "Alice""#));
        // Only the unresolved question reaches the open-questions section.
        assert!(prompt.contains(r#""question": "open""#));
        let open_section = prompt.split("Open questions:").nth(1).unwrap();
        assert!(!open_section.contains(r#""question": "done""#));
    }

    #[test]
    fn test_reconcile_empty_workspace_serializes_empty_lists() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(r#"{"actors": [], "events": [], "questions": []}"#);
        let reconciler = reconciler(llm.clone(), &dir);

        reconciler
            .reconcile(&Workspace::default(), &SemanticStructure::default())
            .unwrap();

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains(r#""questions": []"#));
    }

    #[test]
    fn test_reconcile_sanitizes_oracle_extras() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(
            r#"{"actors": [], "events": [], "questions": "oops", "commentary": "extra"}"#,
        );
        let reconciler = reconciler(llm, &dir);

        let merged = reconciler
            .reconcile(&Workspace::default(), &sample_structure())
            .unwrap();
        assert!(merged.questions.is_empty());
    }

    #[test]
    fn test_align_entities_appends_canonical_actors() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(
            r#"[{"id": "actor:alice", "name": "Alice Chen", "aliases": ["Alice", "Ms. Chen"]}]"#,
        );
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace {
            actors: vec![json!({"id": "actor:bob"})],
            ..Default::default()
        };
        let groups = vec![json!(["Alice", "Ms. Chen"])];

        let minted = reconciler.align_entities(&mut workspace, &groups).unwrap();
        assert_eq!(minted.len(), 1);
        assert_eq!(workspace.actors.len(), 2);
        assert_eq!(workspace.actors[1]["id"], "actor:alice");
    }

    #[test]
    fn test_align_entities_parse_failure_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new("not json at all");
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace::default();
        let groups = vec![json!(["Alice"])];

        let minted = reconciler.align_entities(&mut workspace, &groups).unwrap();
        assert!(minted.is_empty());
        assert!(workspace.actors.is_empty());
    }

    #[test]
    fn test_align_entities_empty_groups_skip_the_oracle() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::default();
        let reconciler = reconciler(llm.clone(), &dir);

        let mut workspace = Workspace::default();
        reconciler.align_entities(&mut workspace, &[]).unwrap();
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_update_spatiotemporal_stamps_matching_actor() {
        let dir = TempDir::new().unwrap();
        let reconciler = reconciler(MockProvider::default(), &dir);

        let mut workspace = Workspace {
            actors: vec![json!({"id": "actor:alice", "name": "Alice"})],
            ..Default::default()
        };

        reconciler.update_spatiotemporal(
            &mut workspace,
            "actor:alice",
            Some("2024-06-01T10:00:00Z"),
            Some("Taipei"),
        );

        assert_eq!(workspace.actors[0]["timestamp"], "2024-06-01T10:00:00Z");
        assert_eq!(workspace.actors[0]["location"], "Taipei");
        assert_eq!(workspace.actors[0]["name"], "Alice");
    }

    #[test]
    fn test_update_spatiotemporal_unknown_actor_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let reconciler = reconciler(MockProvider::default(), &dir);

        let mut workspace = Workspace {
            actors: vec![json!({"id": "actor:alice"})],
            ..Default::default()
        };
        let before = workspace.clone();

        reconciler.update_spatiotemporal(&mut workspace, "actor:ghost", Some("now"), None);
        assert_eq!(workspace, before);
    }

    #[test]
    fn test_resolve_conflicts_replaces_workspace() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(
            r#"{"actors": [{"id": "actor:alice", "state": "released"}], "events": [], "questions": []}"#,
        );
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace {
            actors: vec![
                json!({"id": "actor:alice", "state": "detained"}),
                json!({"id": "actor:alice", "state": "released"}),
            ],
            ..Default::default()
        };

        reconciler.resolve_conflicts(&mut workspace).unwrap();
        assert_eq!(workspace.actors.len(), 1);
        assert_eq!(workspace.actors[0]["state"], "released");
    }

    #[test]
    fn test_resolve_conflicts_parse_failure_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new("no conflicts I think??");
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace {
            actors: vec![json!({"id": "actor:alice"})],
            ..Default::default()
        };
        let before = workspace.clone();

        reconciler.resolve_conflicts(&mut workspace).unwrap();
        assert_eq!(workspace, before);
    }

    #[test]
    fn test_track_questions_replaces_only_questions() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(
            r#"[{"question": "when is the trial?", "status": "resolved", "answer": "June 3rd"}]"#,
        );
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace {
            actors: vec![json!({"id": "actor:alice"})],
            events: vec![json!({"summary": "trial scheduled for June 3rd"})],
            questions: vec![json!({"question": "when is the trial?"})],
        };

        reconciler.track_questions(&mut workspace).unwrap();
        assert_eq!(workspace.questions[0]["status"], "resolved");
        assert_eq!(workspace.actors.len(), 1);
        assert_eq!(workspace.events.len(), 1);
    }

    #[test]
    fn test_track_questions_non_array_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let llm = MockProvider::new(r#"{"questions": []}"#);
        let reconciler = reconciler(llm, &dir);

        let mut workspace = Workspace {
            questions: vec![json!({"question": "still open"})],
            ..Default::default()
        };

        reconciler.track_questions(&mut workspace).unwrap();
        assert_eq!(workspace.questions.len(), 1);
    }
}
