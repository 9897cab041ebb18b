//! Run-level errors abort the run.

use crudcheck::{ConformanceError, EngineConfig, Runner, Topology};
use tempfile::TempDir;

use crate::common::{reference, write_fixture};

#[test]
fn test_malformed_fixture_aborts_run_and_names_file() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "a_good.json",
        r#"{"tests": [{"description": "d", "operation": {"name": "find"}, "outcome": {}}]}"#,
    );
    write_fixture(dir.path(), "nested/b_bad.json", r#"{"tests": "not a list"}"#);

    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    match runner.run_corpus(dir.path()) {
        Err(ConformanceError::MalformedFixture { path, .. }) => {
            assert!(path.ends_with("nested/b_bad.json"));
        }
        other => panic!("Expected MalformedFixture, got {:?}", other.map(|r| r.total())),
    }
}

#[test]
fn test_unparseable_json_is_malformed() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "broken.json", "{ not json");

    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let err = runner.discover(dir.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_missing_corpus() {
    let dir = TempDir::new().unwrap();
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    assert!(matches!(
        runner.run_corpus(&dir.path().join("absent")),
        Err(ConformanceError::CorpusNotFound { .. })
    ));
}
