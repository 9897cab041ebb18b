//! The sample corpus against the reference store.

use crudcheck::{CaseVerdict, EngineConfig, Runner, SkipReason, Topology};

use crate::common::{corpus_dir, reference};

const CORPUS_CASES: usize = 38;

#[test]
fn test_sample_corpus_passes_on_standalone() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let report = runner.run_corpus(&corpus_dir()).unwrap();

    assert!(report.is_success(), "{}", report);
    assert_eq!(report.total(), CORPUS_CASES);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.passed, CORPUS_CASES - 1);

    // $currentOp is scoped to sharded clusters by its fixture
    let skipped = report
        .cases
        .iter()
        .find(|r| matches!(r.verdict, CaseVerdict::Skipped(_)))
        .unwrap();
    assert_eq!(skipped.description, "Aggregate with $currentOp");
    assert!(matches!(
        skipped.verdict,
        CaseVerdict::Skipped(SkipReason::Requirement(_))
    ));
}

#[test]
fn test_sample_corpus_passes_on_sharded() {
    let (store, executor) = reference(Topology::ShardedReplicaSet, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let report = runner.run_corpus(&corpus_dir()).unwrap();

    assert!(report.is_success(), "{}", report);
    assert_eq!(report.skipped, 1);
    // Requirement met, so the exclusion table is what skips it
    assert!(report.cases.iter().any(|r| matches!(
        r.verdict,
        CaseVerdict::Skipped(SkipReason::Excluded(_))
    )));
}

#[test]
fn test_old_server_skips_version_gated_fixtures() {
    let (store, executor) = reference(Topology::Single, "2.4");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let report = runner.run_corpus(&corpus_dir()).unwrap();

    assert!(report.is_success(), "{}", report);
    // aggregate.json requires 2.6
    assert_eq!(report.skipped, 4);
}

#[test]
fn test_discovery_order_is_deterministic() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let first = runner.discover(&corpus_dir()).unwrap();
    let second = runner.discover(&corpus_dir()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].filename, "v1/read/aggregate-currentOp.json");
    assert_eq!(first.last().unwrap().filename, "v1/write/updateOne.json");
}

#[test]
fn test_running_a_case_twice_gives_the_same_verdict() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    for case in runner.discover(&corpus_dir()).unwrap() {
        let first = runner.run_case(&case);
        let second = runner.run_case(&case);
        assert_eq!(first, second, "{}", case.display_name());
    }
}

#[test]
fn test_filter_narrows_the_run() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner =
        Runner::new(store.as_ref(), &executor, EngineConfig::default()).with_filter("FindOneAndUpdate");
    let report = runner.run_corpus(&corpus_dir()).unwrap();
    assert_eq!(report.total(), 3);
    assert_eq!(report.passed, 3);
}

#[test]
fn test_fixture_namespace_is_used() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let cases = runner.discover(&corpus_dir()).unwrap();
    let update_many = cases
        .iter()
        .find(|c| c.filename == "v1/write/updateMany.json")
        .unwrap();
    assert_eq!(update_many.namespace().to_string(), "crud-named.updateMany");

    assert!(runner.run_case(update_many).is_passed());
    assert!(store.has_collection(&update_many.namespace()));
}

#[test]
fn test_report_serializes_to_json() {
    let (store, executor) = reference(Topology::Single, "4.4.0");
    let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
    let report = runner.run_corpus(&corpus_dir()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["passed"], CORPUS_CASES - 1);
    assert_eq!(json["cases"].as_array().unwrap().len(), CORPUS_CASES);
    assert_eq!(json["cases"][0]["verdict"]["status"], "skipped");
}
