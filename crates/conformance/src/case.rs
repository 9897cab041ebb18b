//! Case expansion: one fixture into independent, runnable cases.

use std::sync::Arc;

use crudcheck_core::{Namespace, Value};

use crate::config::EngineConfig;
use crate::fixture::{CaseDefinition, Fixture};
use crate::skip::{SkipEvaluator, SkipReason};

/// The unit the runner executes.
///
/// The skip decision is computed at expansion time, so skipped cases can be
/// listed without touching the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCase {
    /// Originating fixture, relative to the corpus root
    pub filename: String,
    /// Case description
    pub description: String,
    /// Database the case runs in
    pub database_name: String,
    /// Working collection
    pub collection_name: String,
    /// Seed documents, shared by every case of the fixture
    pub data: Arc<[Value]>,
    /// Operation and expected outcome
    pub definition: Arc<CaseDefinition>,
    /// Set when the case must not run
    pub skip: Option<SkipReason>,
}

impl ResolvedCase {
    /// Working collection namespace
    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.database_name, &self.collection_name)
    }

    /// Collection the expected snapshot refers to, if the case has one.
    pub fn snapshot_namespace(&self) -> Option<Namespace> {
        let snapshot = self.definition.outcome.collection.as_ref()?;
        Some(match &snapshot.name {
            Some(name) => Namespace::new(&self.database_name, name),
            None => self.namespace(),
        })
    }

    /// `file :: description`
    pub fn display_name(&self) -> String {
        format!("{} :: {}", self.filename, self.description)
    }
}

/// One [`ResolvedCase`] per fixture test, in file order.
pub fn expand(fixture: &Fixture, skip: &SkipEvaluator<'_>, config: &EngineConfig) -> Vec<ResolvedCase> {
    let database_name = fixture
        .database_name
        .clone()
        .unwrap_or_else(|| config.default_database.clone());
    let collection_name = fixture
        .collection_name
        .clone()
        .unwrap_or_else(|| config.default_collection.clone());
    let data: Arc<[Value]> = fixture.data.clone().into();

    fixture
        .tests
        .iter()
        .map(|case| ResolvedCase {
            filename: fixture.filename.clone(),
            description: case.description.clone(),
            database_name: database_name.clone(),
            collection_name: collection_name.clone(),
            data: Arc::clone(&data),
            definition: Arc::new(case.clone()),
            skip: skip.evaluate(fixture, case),
        })
        .collect()
}
