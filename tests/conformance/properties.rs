//! Engine properties observed through instrumented collaborators.

use std::sync::Arc;

use crudcheck::{
    doc, CaseVerdict, DocumentStore, EngineConfig, MemoryStore, MismatchKind, Namespace, Outcome,
    Runner, SkipReason, Topology,
};
use tempfile::TempDir;

use crate::common::{
    reference, strict_config, write_fixture, CountingDispatcher, CountingStore, FixedDispatcher,
    LeakyStore,
};

fn single_verdict<S, D>(runner: &Runner<S, D>, dir: &TempDir) -> CaseVerdict
where
    S: crudcheck::DocumentStore + crudcheck::Deployment,
    D: crudcheck::Dispatcher,
{
    let report = runner.run_corpus(dir.path()).unwrap();
    assert_eq!(report.total(), 1);
    report.cases[0].verdict.clone()
}

// =============================================================================
// Skip gate
// =============================================================================

#[test]
fn test_skipped_case_neither_seeds_nor_dispatches() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "currentOp.json",
        r#"{"data": [{"_id": 1}], "tests": [{
            "description": "Aggregate with $currentOp",
            "operation": {"name": "aggregate", "arguments": {"pipeline": [{"$currentOp": {}}]}},
            "outcome": {"result": []}
        }]}"#,
    );
    let (store, executor) = reference(Topology::Sharded, "4.4.0");
    let counting_store = CountingStore::new(store.as_ref());
    let counting = CountingDispatcher::new(&executor);
    let runner = Runner::new(&counting_store, &counting, EngineConfig::default());

    let verdict = single_verdict(&runner, &dir);
    assert!(matches!(verdict, CaseVerdict::Skipped(SkipReason::Excluded(_))));
    assert_eq!(counting.calls.get(), 0);
    assert_eq!(counting_store.drops.get(), 0);
    assert_eq!(counting_store.inserts.get(), 0);
}

#[test]
fn test_requirement_alone_skips() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "future.json",
        r#"{"minServerVersion": "9.0", "tests": [{
            "description": "Find everything",
            "operation": {"name": "find", "arguments": {"filter": {}}},
            "outcome": {"result": []}
        }]}"#,
    );
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let counting = CountingDispatcher::new(&executor);
    let runner = Runner::new(store.as_ref(), &counting, EngineConfig::default());

    assert!(matches!(
        single_verdict(&runner, &dir),
        CaseVerdict::Skipped(SkipReason::Requirement(_))
    ));
    assert_eq!(counting.calls.get(), 0);
}

#[test]
fn test_requirement_and_exclusion_together_skip() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "both.json",
        r#"{"minServerVersion": "9.0", "tests": [{
            "description": "Aggregate with $currentOp",
            "operation": {"name": "aggregate", "arguments": {"pipeline": []}},
            "outcome": {}
        }]}"#,
    );
    let (store, executor) = reference(Topology::Sharded, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    assert!(matches!(single_verdict(&runner, &dir), CaseVerdict::Skipped(_)));
}

// =============================================================================
// Seeding
// =============================================================================

#[test]
fn test_seed_failure_is_setup_error_and_not_dispatched() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "dup.json",
        r#"{"data": [{"_id": 1}, {"_id": 1}], "tests": [{
            "description": "Find after a bad seed",
            "operation": {"name": "find", "arguments": {"filter": {}}},
            "outcome": {"result": [{"_id": 1}]}
        }]}"#,
    );
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let counting = CountingDispatcher::new(&executor);
    let runner = Runner::new(store.as_ref(), &counting, EngineConfig::default());

    let report = runner.run_corpus(dir.path()).unwrap();
    assert!(matches!(report.cases[0].verdict, CaseVerdict::SetupError(_)));
    assert_eq!(report.setup_errors, 1);
    assert!(!report.is_success());
    assert_eq!(counting.calls.get(), 0);
}

// =============================================================================
// Collection snapshot
// =============================================================================

const INSERT_ONE: &str = r#"{"tests": [{
    "description": "InsertOne into an empty collection",
    "operation": {"name": "insertOne", "arguments": {"document": {"_id": 1}}},
    "outcome": {"result": {"insertedId": 1}, "collection": {"data": [{"_id": 1}]}}
}]}"#;

#[test]
fn test_collection_snapshot_passes_on_clean_store() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "insert.json", INSERT_ONE);
    let (store, executor) = reference(Topology::Single, "4.4.0");
    store
        .insert_many(&Namespace::new("crud-tests", "test"), vec![doc!({"_id": 2})])
        .unwrap();

    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    assert_eq!(single_verdict(&runner, &dir), CaseVerdict::Passed);
}

#[test]
fn test_collection_snapshot_fails_when_state_leaks() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "insert.json", INSERT_ONE);
    let (store, executor) = reference(Topology::Single, "4.4.0");
    store
        .insert_many(&Namespace::new("crud-tests", "test"), vec![doc!({"_id": 2})])
        .unwrap();

    let leaky = LeakyStore(store.as_ref());
    let runner = Runner::new(&leaky, &executor, EngineConfig::default());
    match single_verdict(&runner, &dir) {
        CaseVerdict::Failed(failure) => {
            assert_eq!(failure.kind, MismatchKind::Collection);
            assert_eq!(failure.description, "InsertOne into an empty collection");
            assert_eq!(failure.actual, doc!([{"_id": 2}, {"_id": 1}]));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

// =============================================================================
// Outcome reconciliation
// =============================================================================

fn fixed_outcome_verdict(expected_outcome: &str, actual: Outcome, config: EngineConfig) -> CaseVerdict {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "fixed.json",
        &format!(
            r#"{{"tests": [{{"description": "Fixed outcome",
                "operation": {{"name": "updateOne", "arguments": {{}}}},
                "outcome": {}}}]}}"#,
            expected_outcome
        ),
    );
    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(store.as_ref(), FixedDispatcher(actual), config);
    single_verdict(&runner, &dir)
}

#[test]
fn test_upsert_leniency() {
    let actual = Outcome::success(doc!({"n": 1, "upsertedCount": 0}));
    assert_eq!(
        fixed_outcome_verdict(r#"{"result": {"n": 1}}"#, actual.clone(), EngineConfig::default()),
        CaseVerdict::Passed
    );
    assert!(matches!(
        fixed_outcome_verdict(r#"{"result": {"n": 1}}"#, actual, strict_config()),
        CaseVerdict::Failed(_)
    ));
}

#[test]
fn test_inserted_ids_leniency() {
    let actual = Outcome::success(doc!({"n": 2, "insertedIds": {"0": 1, "1": 2}}));
    assert_eq!(
        fixed_outcome_verdict(r#"{"result": {"n": 2}}"#, actual.clone(), EngineConfig::default()),
        CaseVerdict::Passed
    );
    assert!(matches!(
        fixed_outcome_verdict(r#"{"result": {"n": 2}}"#, actual, strict_config()),
        CaseVerdict::Failed(_)
    ));
}

#[test]
fn test_expected_error_flag_is_enforced() {
    let actual = Outcome::success(doc!({"n": 1}));
    match fixed_outcome_verdict(
        r#"{"error": true, "result": {"n": 1}}"#,
        actual,
        EngineConfig::default(),
    ) {
        CaseVerdict::Failed(failure) => assert_eq!(failure.kind, MismatchKind::Error),
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[test]
fn test_unexpected_result_shows_both_values() {
    let actual = Outcome::success(doc!({"deletedCount": 2}));
    match fixed_outcome_verdict(r#"{"result": {"deletedCount": 1}}"#, actual, EngineConfig::default()) {
        CaseVerdict::Failed(failure) => {
            assert_eq!(failure.kind, MismatchKind::Result);
            let text = failure.to_string();
            assert!(text.contains("Fixed outcome"));
            assert!(text.contains(r#"{"deletedCount":1}"#));
            assert!(text.contains(r#"{"deletedCount":2}"#));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[test]
fn test_absent_expected_result_rejects_actual_result() {
    let actual = Outcome::success(doc!({"deletedCount": 5}));
    match fixed_outcome_verdict(r#"{"collection": {"data": []}}"#, actual, EngineConfig::default()) {
        CaseVerdict::Failed(failure) => assert_eq!(failure.kind, MismatchKind::Result),
        other => panic!("Expected Failed, got {:?}", other),
    }
}
