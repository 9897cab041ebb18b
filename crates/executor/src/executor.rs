//! The Executor - reference dispatcher for CRUD fixture operations.
//!
//! The Executor routes parsed [`Command`]s to the handler for their family
//! and converts results to [`Output`]s. Through its [`Dispatcher`] impl it
//! also accepts raw fixture operation documents and folds every failure
//! into `Outcome { error: true }`.

use std::sync::Arc;

use tracing::debug;

use crudcheck_core::{Dispatcher, Namespace, Outcome, Value};
use crudcheck_storage::MemoryStore;

use crate::handlers::read::{self, FindArgs};
use crate::handlers::write::{self, Change, FindAndModify};
use crate::handlers::aggregate;
use crate::{Command, Output, Result};

/// The command executor.
///
/// The Executor is **stateless**: it holds a handle to the store but keeps
/// no state of its own.
///
/// # Example
///
/// ```ignore
/// use crudcheck_executor::{Command, Executor};
/// use crudcheck_core::{doc, Namespace};
///
/// let executor = Executor::new(Arc::new(MemoryStore::new()));
/// let ns = Namespace::new("crud-tests", "test");
///
/// let output = executor.execute(&ns, Command::InsertOne {
///     document: doc!({"_id": 1, "x": 11}),
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    store: Arc<MemoryStore>,
}

impl Executor {
    /// Create a new executor over a store.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Execute a single command against `ns`.
    pub fn execute(&self, ns: &Namespace, cmd: Command) -> Result<Output> {
        let store = self.store.as_ref();
        match cmd {
            // Insert commands
            Command::InsertOne { document } => write::insert_one(store, ns, document),
            Command::InsertMany { documents, options } => {
                write::insert_many(store, ns, documents, options)
            }

            // Delete commands
            Command::DeleteOne { filter } => write::delete(store, ns, filter, false),
            Command::DeleteMany { filter } => write::delete(store, ns, filter, true),

            // Update commands
            Command::ReplaceOne {
                filter,
                replacement,
                upsert,
            } => write::update(store, ns, filter, Change::Replace(&replacement), upsert, false),
            Command::UpdateOne {
                filter,
                update,
                upsert,
            } => write::update(store, ns, filter, Change::Update(&update), upsert, false),
            Command::UpdateMany {
                filter,
                update,
                upsert,
            } => write::update(store, ns, filter, Change::Update(&update), upsert, true),

            // Read commands
            Command::Find {
                filter,
                sort,
                skip,
                limit,
                projection,
            } => read::find(
                store,
                ns,
                FindArgs {
                    filter: filter.as_ref(),
                    sort: sort.as_ref(),
                    skip,
                    limit,
                    projection: projection.as_ref(),
                },
            ),
            Command::Count {
                filter,
                skip,
                limit,
            }
            | Command::CountDocuments {
                filter,
                skip,
                limit,
            } => read::count(store, ns, filter.as_ref().unwrap_or(&Value::Null), skip, limit),
            Command::EstimatedDocumentCount {} => read::estimated_document_count(store, ns),
            Command::Distinct { field_name, filter } => read::distinct(
                store,
                ns,
                &field_name,
                filter.as_ref().unwrap_or(&Value::Null),
            ),
            Command::Aggregate { pipeline } => aggregate::aggregate(store, ns, &pipeline),

            // FindOneAnd* commands
            Command::FindOneAndDelete {
                filter,
                sort,
                projection,
            } => write::find_one_and_delete(store, ns, filter, sort, projection),
            Command::FindOneAndReplace {
                filter,
                replacement,
                sort,
                projection,
                upsert,
                return_document,
            } => write::find_one_and_modify(
                store,
                ns,
                FindAndModify {
                    filter: &filter,
                    change: Change::Replace(&replacement),
                    sort: sort.as_ref(),
                    projection: projection.as_ref(),
                    upsert,
                    return_document,
                },
            ),
            Command::FindOneAndUpdate {
                filter,
                update,
                sort,
                projection,
                upsert,
                return_document,
            } => write::find_one_and_modify(
                store,
                ns,
                FindAndModify {
                    filter: &filter,
                    change: Change::Update(&update),
                    sort: sort.as_ref(),
                    projection: projection.as_ref(),
                    upsert,
                    return_document,
                },
            ),
        }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }
}

impl Dispatcher for Executor {
    fn dispatch(&self, ns: &Namespace, operation: &Value) -> Outcome {
        let result =
            Command::from_operation(operation).and_then(|cmd| self.execute(ns, cmd));
        match result {
            Ok(output) => Outcome::success(output.into_value()),
            Err(e) => {
                debug!(target: "crudcheck::executor", namespace = %ns, error = %e, "Operation failed");
                Outcome::failure()
            }
        }
    }
}
