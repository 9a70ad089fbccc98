//! Tests for high-score persistence.

use cat_facts_game::{FileScoreStore, MemoryScoreStore, ScoreStore, load_high_score};
use tempfile::TempDir;

/// Creates a temp directory and a store path inside it. The directory
/// handle must stay in scope to keep the files alive.
fn setup_store() -> (TempDir, FileScoreStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileScoreStore::new(dir.path().join("score.json"));
    (dir, store)
}

#[test]
fn test_missing_file_reads_as_none() {
    let (_dir, store) = setup_store();
    assert_eq!(store.read_high_score().expect("Read failed"), None);
    assert_eq!(store.updated_at().expect("Read failed"), None);
    assert_eq!(load_high_score(&store), 0);
}

#[test]
fn test_write_then_read() {
    let (_dir, store) = setup_store();
    store.write_high_score(420).expect("Write failed");
    assert_eq!(store.read_high_score().expect("Read failed"), Some(420));
    assert!(store.updated_at().expect("Read failed").is_some());

    store.write_high_score(512).expect("Write failed");
    assert_eq!(load_high_score(&store), 512);
}

#[test]
fn test_file_is_camel_case_json() {
    let (_dir, store) = setup_store();
    store.write_high_score(77).expect("Write failed");
    let content = std::fs::read_to_string(store.path()).expect("File exists");
    let value: serde_json::Value = serde_json::from_str(&content).expect("Valid JSON");
    assert_eq!(value["highScore"], 77);
    assert!(value["updatedAt"].is_string());
}

#[test]
fn test_write_creates_parent_dirs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileScoreStore::new(dir.path().join("nested/deeper/score.json"));
    store.write_high_score(3).expect("Write failed");
    assert_eq!(store.read_high_score().expect("Read failed"), Some(3));
}

#[test]
fn test_corrupt_file_loads_as_zero() {
    let (_dir, store) = setup_store();
    std::fs::write(store.path(), "not json").expect("Write failed");
    assert!(store.read_high_score().is_err());
    assert_eq!(load_high_score(&store), 0);
}

#[test]
fn test_memory_store_clones_share_slot() {
    let store = MemoryScoreStore::new();
    let view = store.clone();
    assert_eq!(view.read_high_score().expect("Read failed"), None);

    store.write_high_score(9).expect("Write failed");
    assert_eq!(view.read_high_score().expect("Read failed"), Some(9));
    assert_eq!(view.writes(), 1);
}

#[test]
fn test_memory_store_preloaded() {
    let store = MemoryScoreStore::with_high_score(250);
    assert_eq!(load_high_score(&store), 250);
    assert_eq!(store.writes(), 0);
}
