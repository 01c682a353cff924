//! Integration tests for the session workflow and the standalone operations
//!
//! These run the library end to end on fixture files.

use dataprepper::diagnostics::{self, health};
use dataprepper::error::PrepError;
use dataprepper::lifecycle::{ActionParams, MemoryStore, SessionRegistry, TransformationEngine};
use dataprepper::ops::{self, DroppedColumnCache, FilterSpec, flows};
use dataprepper::frame;
use serde_json::json;
use std::sync::Arc;

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("testdata/{name}")).unwrap()
}

fn engine() -> (SessionRegistry, TransformationEngine) {
    let sessions = SessionRegistry::new(Arc::new(MemoryStore::unbounded()));
    let engine = TransformationEngine::new(sessions.clone());
    (sessions, engine)
}

#[test]
fn test_session_apply_and_undo_to_empty() {
    let upload = fixture("people.csv");
    let (sessions, engine) = engine();
    let session_id = sessions.create(&upload).unwrap();

    let params = ActionParams::from_json(r#"{"method": "median"}"#).unwrap();
    let imputed = engine
        .apply(&session_id, "impute", vec!["age".to_owned()], &params, &upload, 10)
        .unwrap();
    assert!(imputed.can_undo);
    assert_eq!(imputed.preview.data[1][2], json!(31.5));

    let dropped = engine
        .apply(&session_id, "drop", vec!["city".to_owned()], &ActionParams::default(), &upload, 10)
        .unwrap();
    assert_eq!(dropped.preview.columns, vec!["id", "name", "age", "salary"]);
    assert_eq!(sessions.depth(&session_id).unwrap(), 3);

    // Back to the imputed table
    let undone = engine.undo(&session_id, &upload, 10).unwrap();
    assert!(undone.can_undo);
    assert_eq!(undone.preview, imputed.preview);

    // Back to the upload
    let undone = engine.undo(&session_id, &upload, 10).unwrap();
    assert!(undone.can_undo);
    assert_eq!(undone.preview.data[1][2], serde_json::Value::Null);

    // The pop that empties the stack previews the upload
    let undone = engine.undo(&session_id, &upload, 10).unwrap();
    assert!(!undone.can_undo);
    assert_eq!(undone.preview, flows::preview(&upload, 10).unwrap());

    let err = engine.undo(&session_id, &upload, 10).unwrap_err();
    assert!(matches!(err, PrepError::NoHistory));
    assert_eq!(err.to_string(), "No history to undo.");
}

#[test]
fn test_sessions_are_independent() {
    let upload = fixture("people.csv");
    let (sessions, engine) = engine();
    let first = sessions.create(&upload).unwrap();
    let second = "other-session";

    engine
        .apply(&first, "drop", vec!["name".to_owned()], &ActionParams::default(), &upload, 5)
        .unwrap();
    engine
        .apply(second, "drop", vec!["salary".to_owned()], &ActionParams::default(), &upload, 5)
        .unwrap();

    assert_eq!(sessions.depth(&first).unwrap(), 2);
    assert_eq!(sessions.depth(second).unwrap(), 1);
    let top = sessions.get_top(&first).unwrap();
    assert!(top.column("salary").is_ok());
    assert!(top.column("name").is_err());
}

#[test]
fn test_drop_with_cache_then_restore() {
    let upload = fixture("people.csv");
    let cache = DroppedColumnCache::new(Arc::new(MemoryStore::unbounded()));

    let (preview, operation_id) = flows::drop_columns_with_cache(
        &cache,
        &upload,
        &["salary".to_owned(), "name".to_owned()],
        10,
    )
    .unwrap();
    assert_eq!(preview.columns, vec!["id", "age", "city"]);

    // The client sends back the reduced table
    let table = frame::decode(&upload).unwrap();
    let table = ops::drop_columns(&table, &["salary".to_owned(), "name".to_owned()]).unwrap();
    let reduced = frame::encode(&table).unwrap();
    let restored = flows::restore_dropped_columns(&cache, reduced.as_bytes(), &operation_id, 10).unwrap();
    assert_eq!(restored.columns, vec!["id", "age", "city", "salary", "name"]);
    assert_eq!(restored.data[0][4], json!("Alice"));

    let short = b"id,age,city\n1,34,Oslo\n";
    let err = flows::restore_dropped_columns(&cache, short, &operation_id, 10).unwrap_err();
    assert!(matches!(err, PrepError::RowCountMismatch { .. }));
}

#[test]
fn test_fixture_diagnostics() {
    let df = frame::decode(&fixture("people.csv")).unwrap();
    let report = diagnostics::analyze(&df).unwrap();
    assert_eq!(report.len(), 5);

    let age = report.get("age").unwrap();
    assert_eq!(age.count, 4);
    assert!((age.missing_pct - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(age.recommendations, vec![health::IMPUTE_MISSING.to_owned()]);

    let name = report.get("name").unwrap();
    let text = name.categorical().unwrap();
    assert_eq!(text.top.as_deref(), Some("Carol"));
    assert_eq!(text.freq, 2);
}

#[test]
fn test_fixture_cleaning_ops() {
    let upload = fixture("people.csv");
    let deduped = flows::drop_duplicates(&upload, None, 10).unwrap();
    assert_eq!(deduped.row_count(), 5);

    let scores = fixture("scores.csv");
    let passing = flows::filter_rows(&scores, &FilterSpec::new("score").at_least("80"), 10).unwrap();
    let names: Vec<&serde_json::Value> = passing.data.iter().map(|row| &row[0]).collect();
    assert_eq!(names, vec![&json!("ana"), &json!("dee"), &json!("gus")]);

    let grades = flows::filter_rows(&scores, &FilterSpec::new("grade").matching("^[AB]$"), 10).unwrap();
    assert_eq!(grades.row_count(), 4);
}
