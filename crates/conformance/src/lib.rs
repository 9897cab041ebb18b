//! # crudcheck Conformance
//!
//! Runs the legacy CRUD fixture corpus against a document store and
//! reports a verdict per case.
//!
//! ```text
//! Loader -> Expander -> (per case) Skip gate -> Seeder -> Dispatcher -> Reconciler
//! ```
//!
//! The store, the dispatcher and deployment introspection are capabilities
//! from `crudcheck-core`; this crate never depends on a concrete store.
//!
//! ## Quick Start
//!
//! ```text
//! use crudcheck_conformance::{EngineConfig, Runner};
//!
//! let runner = Runner::new(&store, &dispatcher, EngineConfig::default());
//! let report = runner.run_corpus(Path::new("tests/fixtures/crud"))?;
//! println!("{}", report);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case;
pub mod config;
pub mod error;
pub mod fixture;
pub mod leniency;
pub mod loader;
pub mod reconcile;
pub mod report;
pub mod runner;
pub mod seed;
pub mod skip;

pub use case::{expand, ResolvedCase};
pub use config::{DeploymentConfig, EngineConfig, LeniencyConfig, CONFIG_FILE_NAME};
pub use error::{ConformanceError, Result};
pub use fixture::{CaseDefinition, CollectionSnapshot, ExpectedOutcome, Fixture};
pub use leniency::Leniency;
pub use loader::{discover, load_corpus, load_fixture, load_fixture_str};
pub use reconcile::{AssertionFailure, MismatchKind, Reconciler};
pub use report::{CaseRecord, RunReport};
pub use runner::{CaseVerdict, Runner};
pub use seed::{Seeder, SetupFailure};
pub use skip::{Exclusion, SkipEvaluator, SkipReason, EXCLUSIONS};

// Capabilities the engine is written against
pub use crudcheck_core::{Deployment, Dispatcher, DocumentStore, Outcome};
