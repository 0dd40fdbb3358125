//! Integration tests for the file-backed workspace store

use engram_domain::traits::WorkspaceStore;
use engram_domain::Workspace;
use engram_store::{FileWorkspaceStore, StoreError};
use serde_json::json;
use std::fs;

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path().join("workspace.json"));

    let workspace = Workspace {
        actors: vec![json!({"id": "actor:alice", "name": "Alice"})],
        events: vec![json!({"summary": "Alice was arrested"})],
        questions: vec![json!({"question": "when is the trial?", "status": "unresolved"})],
    };

    store.save(&workspace).unwrap();
    assert_eq!(store.load(), workspace);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path().join("nested/deeply/workspace.json"));

    store.save(&Workspace::default()).unwrap();
    assert!(store.path().exists());
}

#[test]
fn test_save_replaces_document_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path().join("workspace.json"));

    let first = Workspace {
        actors: vec![json!({"id": "actor:alice"})],
        ..Default::default()
    };
    store.save(&first).unwrap();

    let second = Workspace {
        events: vec![json!({"summary": "only this"})],
        ..Default::default()
    };
    store.save(&second).unwrap();

    let loaded = store.load();
    assert!(loaded.actors.is_empty());
    assert_eq!(loaded.events.len(), 1);
}

#[test]
fn test_load_invalid_json_is_empty_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    fs::write(&path, "not json {").unwrap();

    let store = FileWorkspaceStore::new(&path);
    assert_eq!(store.load(), Workspace::default());
}

#[test]
fn test_load_document_missing_key_is_empty_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    fs::write(
        &path,
        serde_json::to_string(&json!({"actors": [{"id": "actor:alice"}], "events": []})).unwrap(),
    )
    .unwrap();

    let store = FileWorkspaceStore::new(&path);
    // Stale format: the whole document is discarded, not partially kept.
    assert_eq!(store.load(), Workspace::default());
}

#[test]
fn test_load_coerces_non_list_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");
    fs::write(
        &path,
        serde_json::to_string(&json!({
            "actors": "wrong type",
            "events": [{"summary": "kept"}],
            "questions": [],
        }))
        .unwrap(),
    )
    .unwrap();

    let store = FileWorkspaceStore::new(&path);
    let loaded = store.load();
    assert!(loaded.actors.is_empty());
    assert_eq!(loaded.events.len(), 1);
}

#[test]
fn test_save_document_validation_failure_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileWorkspaceStore::new(dir.path().join("workspace.json"));

    store.save(&Workspace::default()).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let result = store.save_document(&json!({"actors": []}));
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}
