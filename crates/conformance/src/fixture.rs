//! Fixture file model.
//!
//! A fixture is one JSON file of the legacy CRUD corpus:
//!
//! ```json
//! {
//!   "data": [{"_id": 1, "x": 11}],
//!   "minServerVersion": "3.4",
//!   "tests": [
//!     {
//!       "description": "Delete when one document matches",
//!       "operation": {"name": "deleteOne", "arguments": {"filter": {"_id": 1}}},
//!       "outcome": {"result": {"deletedCount": 1}, "collection": {"data": []}}
//!     }
//!   ]
//! }
//! ```
//!
//! Everything is immutable once loaded. Operation documents are opaque and
//! passed through to the dispatcher untouched.

use serde::{Deserialize, Deserializer};

use crudcheck_core::{RunRequirement, Value};

/// One parsed fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fixture {
    /// Path relative to the corpus root, `/`-separated
    #[serde(skip)]
    pub filename: String,
    /// Target database, or the configured default when absent
    #[serde(default)]
    pub database_name: Option<String>,
    /// Target collection, or the configured default when absent
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Seed documents, inserted in order before every case
    #[serde(default)]
    pub data: Vec<Value>,
    /// Document-level version bounds (`minServerVersion`, `maxServerVersion`)
    #[serde(flatten)]
    pub requirement: RunRequirement,
    /// Alternative deployments the fixture may run on; any one suffices
    #[serde(default, rename = "runOn")]
    pub run_on: Vec<RunRequirement>,
    /// Test cases, in file order
    pub tests: Vec<CaseDefinition>,
}

/// One entry of a fixture's `tests` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaseDefinition {
    /// Case identity and display name
    pub description: String,
    /// Operation document: `{"name": ..., "arguments": {...}}`
    pub operation: Value,
    /// What the operation is expected to produce
    pub outcome: ExpectedOutcome,
    /// Unconditional skip with a human-readable reason
    #[serde(default, rename = "skipReason")]
    pub skip_reason: Option<String>,
    /// Case-level version bounds
    #[serde(flatten)]
    pub requirement: RunRequirement,
}

/// Expected outcome of a case.
///
/// Absent fields are unspecified and not asserted. A `result` that is
/// present but `null` is asserted as null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpectedOutcome {
    /// Whether the operation must fail
    #[serde(default)]
    pub error: Option<bool>,
    /// Expected result value
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    /// Expected collection contents after the operation
    #[serde(default)]
    pub collection: Option<CollectionSnapshot>,
}

/// Expected full contents of a collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CollectionSnapshot {
    /// Collection to read; the case's working collection when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Documents in natural order
    pub data: Vec<Value>,
}

// `Option<Value>` would read an explicit `null` as absent.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}
