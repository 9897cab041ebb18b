//! The runner: loader, expander and per-case execution wired together.
//!
//! Per case: skip gate, seed, dispatch, reconcile. Cases run one at a time
//! and a failing case never affects its siblings. Only corpus-level
//! problems (missing corpus, malformed fixture) abort a run.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crudcheck_core::{Deployment, Dispatcher, DocumentStore};

use crate::case::{expand, ResolvedCase};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::loader::load_corpus;
use crate::reconcile::{AssertionFailure, Reconciler};
use crate::report::{CaseRecord, RunReport};
use crate::seed::Seeder;
use crate::skip::{SkipEvaluator, SkipReason};

/// What happened to one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CaseVerdict {
    /// Every declared expectation held
    Passed,
    /// An expectation did not hold
    Failed(AssertionFailure),
    /// Not run
    Skipped(SkipReason),
    /// The store could not be prepared or read back
    SetupError(String),
}

impl CaseVerdict {
    /// True for [`CaseVerdict::Passed`]
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseVerdict::Passed)
    }
}

/// Runs cases against a store and a dispatcher.
pub struct Runner<S, D> {
    store: S,
    dispatcher: D,
    config: EngineConfig,
    reconciler: Reconciler,
    filter: Option<String>,
}

impl<S, D> Runner<S, D>
where
    S: DocumentStore + Deployment,
    D: Dispatcher,
{
    /// Create a runner. Leniencies come from `config.leniency`.
    pub fn new(store: S, dispatcher: D, config: EngineConfig) -> Self {
        let reconciler = Reconciler::new(config.leniency.enabled());
        Self {
            store,
            dispatcher,
            config,
            reconciler,
            filter: None,
        }
    }

    /// Only run cases whose description contains `text`.
    pub fn with_filter(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(text.into());
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the corpus and expand it into cases, skip decisions included.
    pub fn discover(&self, corpus: &Path) -> Result<Vec<ResolvedCase>> {
        let fixtures = load_corpus(corpus)?;
        let skip = SkipEvaluator::new(&self.store);
        let cases: Vec<ResolvedCase> = fixtures
            .iter()
            .flat_map(|fixture| expand(fixture, &skip, &self.config))
            .filter(|case| self.selected(case))
            .collect();
        debug!(target: "crudcheck::runner", cases = cases.len(), "Expanded corpus");
        Ok(cases)
    }

    fn selected(&self, case: &ResolvedCase) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |text| case.description.contains(text))
    }

    /// Run one case to a verdict.
    pub fn run_case(&self, case: &ResolvedCase) -> CaseVerdict {
        if let Some(reason) = &case.skip {
            return CaseVerdict::Skipped(reason.clone());
        }

        if let Err(failure) = Seeder::new(&self.store).seed(case) {
            warn!(target: "crudcheck::runner", case = %case.display_name(), error = %failure, "Setup failed");
            return CaseVerdict::SetupError(failure.to_string());
        }

        let definition = &case.definition;
        let ns = case.namespace();
        let outcome = self.dispatcher.dispatch(&ns, &definition.operation);
        debug!(target: "crudcheck::runner", case = %case.display_name(), error = outcome.error, "Dispatched");

        if let Err(failure) =
            self.reconciler
                .check_outcome(&case.description, &definition.outcome, &outcome)
        {
            return CaseVerdict::Failed(failure);
        }

        if let (Some(snapshot), Some(snapshot_ns)) = (
            definition.outcome.collection.as_ref(),
            case.snapshot_namespace(),
        ) {
            let actual = match self.store.find_all(&snapshot_ns) {
                Ok(docs) => docs,
                Err(e) => {
                    return CaseVerdict::SetupError(format!(
                        "failed to read {}: {}",
                        snapshot_ns, e
                    ))
                }
            };
            if let Err(failure) =
                self.reconciler
                    .check_collection(&case.description, snapshot, actual)
            {
                return CaseVerdict::Failed(failure);
            }
        }
        CaseVerdict::Passed
    }

    /// Run every case of a set, in order.
    pub fn run_cases(&self, cases: &[ResolvedCase]) -> RunReport {
        let mut report = RunReport::default();
        for case in cases {
            let verdict = self.run_case(case);
            match &verdict {
                CaseVerdict::Failed(failure) => {
                    info!(target: "crudcheck::runner", case = %case.display_name(), kind = %failure.kind, "FAILED")
                }
                CaseVerdict::Skipped(reason) => {
                    debug!(target: "crudcheck::runner", case = %case.display_name(), %reason, "skipped")
                }
                _ => {}
            }
            report.push(CaseRecord {
                filename: case.filename.clone(),
                description: case.description.clone(),
                verdict,
            });
        }
        report
    }

    /// Discover and run a whole corpus.
    pub fn run_corpus(&self, corpus: &Path) -> Result<RunReport> {
        let cases = self.discover(corpus)?;
        let report = self.run_cases(&cases);
        info!(
            target: "crudcheck::runner",
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            setup_errors = report.setup_errors,
            "Run complete"
        );
        Ok(report)
    }
}
