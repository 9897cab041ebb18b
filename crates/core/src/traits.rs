//! Capability traits for the system under test
//!
//! The conformance engine never talks to a concrete store. It is written
//! against three capabilities:
//! - [`DocumentStore`]: reset, seed and read back collections
//! - [`Deployment`]: topology and version facts used for skip decisions
//! - [`Dispatcher`]: execute one operation document and report its outcome
//!
//! Implementations must be usable through a shared reference; the engine
//! runs one case at a time and never calls them concurrently.

use crate::error::Result;
use crate::outcome::Outcome;
use crate::types::{Namespace, RunRequirement, ServerVersion, Topology};
use crate::value::Value;

/// Collection-level access to the document store.
pub trait DocumentStore {
    /// Remove a collection and all of its documents.
    ///
    /// Dropping a collection that does not exist is not an error.
    fn drop_collection(&self, ns: &Namespace) -> Result<()>;

    /// Insert documents in the given order, stopping at the first failure.
    ///
    /// Returns the `_id` of every inserted document, in insertion order.
    fn insert_many(&self, ns: &Namespace, documents: Vec<Value>) -> Result<Vec<Value>>;

    /// Every document in the collection, in natural (insertion) order.
    fn find_all(&self, ns: &Namespace) -> Result<Vec<Value>>;
}

/// Facts about the live deployment.
pub trait Deployment {
    /// Deployment shape
    fn topology(&self) -> Topology;

    /// Version reported by the server
    fn server_version(&self) -> ServerVersion;

    /// Shorthand for sharded topologies
    fn is_sharded(&self) -> bool {
        self.topology().is_sharded()
    }

    /// Evaluate a fixture run requirement against this deployment
    fn satisfies(&self, requirement: &RunRequirement) -> bool {
        requirement.is_satisfied_by(self.topology(), &self.server_version())
    }
}

/// Executes operation documents against a collection.
///
/// Expected failures (duplicate keys, malformed arguments, unknown
/// operations) must come back as `Outcome { error: true, .. }` rather than
/// panics or propagated errors.
pub trait Dispatcher {
    /// Execute `operation` (`{"name": ..., "arguments": {...}}`) against `ns`.
    fn dispatch(&self, ns: &Namespace, operation: &Value) -> Outcome;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn drop_collection(&self, ns: &Namespace) -> Result<()> {
        (**self).drop_collection(ns)
    }

    fn insert_many(&self, ns: &Namespace, documents: Vec<Value>) -> Result<Vec<Value>> {
        (**self).insert_many(ns, documents)
    }

    fn find_all(&self, ns: &Namespace) -> Result<Vec<Value>> {
        (**self).find_all(ns)
    }
}

impl<T: Deployment + ?Sized> Deployment for &T {
    fn topology(&self) -> Topology {
        (**self).topology()
    }

    fn server_version(&self) -> ServerVersion {
        (**self).server_version()
    }
}

impl<T: Dispatcher + ?Sized> Dispatcher for &T {
    fn dispatch(&self, ns: &Namespace, operation: &Value) -> Outcome {
        (**self).dispatch(ns, operation)
    }
}
