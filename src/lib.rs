//! crudcheck - fixture-driven conformance runner for document CRUD APIs
//!
//! crudcheck runs the legacy CRUD JSON fixture corpus against a document
//! store and reports a verdict per case: passed, failed (with the mismatch),
//! skipped (with the rule that skipped it) or setup error.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use crudcheck::{EngineConfig, Executor, MemoryStore, Runner};
//!
//! let store = Arc::new(MemoryStore::new());
//! let executor = Executor::new(Arc::clone(&store));
//! let runner = Runner::new(store.as_ref(), &executor, EngineConfig::default());
//!
//! let report = runner.run_corpus("tests/fixtures/crud".as_ref())?;
//! assert!(report.is_success(), "{}", report);
//! ```
//!
//! # Architecture
//!
//! The engine (`crudcheck-conformance`) only knows the capability traits in
//! `crudcheck-core`. The in-memory store (`crudcheck-storage`) and the
//! reference dispatcher (`crudcheck-executor`) implement them so a corpus
//! can be run end to end without a server.

pub use crudcheck_conformance::*;
pub use crudcheck_core::{doc, Document, Namespace, ServerVersion, Topology, Value};
pub use crudcheck_executor::{Command, Executor, Output};
pub use crudcheck_storage::MemoryStore;
