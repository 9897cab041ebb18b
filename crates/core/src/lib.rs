//! Core types and traits for crudcheck
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Document: the document model shared by fixtures and stores
//! - Namespace: `(database, collection)` pair
//! - Topology, ServerVersion, RunRequirement: deployment facts and bounds
//! - Outcome: result-or-error of a dispatched operation
//! - Traits: DocumentStore, Deployment, Dispatcher capabilities
//! - Error: store error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use outcome::Outcome;
pub use traits::{Deployment, Dispatcher, DocumentStore};
pub use types::{Namespace, RunRequirement, ServerVersion, Topology};
pub use value::{Document, Value};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
