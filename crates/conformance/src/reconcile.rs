//! Outcome reconciliation: expected vs actual.
//!
//! Three independent checks, each reported as its own mismatch kind:
//! the error flag, the result value and the final collection contents.
//! An absent `error` flag is not asserted. An absent `result` asserts that
//! the operation produced none.

use std::fmt;

use serde::Serialize;

use crudcheck_core::{Outcome, Value};

use crate::fixture::{CollectionSnapshot, ExpectedOutcome};
use crate::leniency::{normalize, Leniency};

/// Which part of the outcome disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// The `error` flag
    Error,
    /// The operation result
    Result,
    /// Collection contents after the operation
    Collection,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MismatchKind::Error => "error flag",
            MismatchKind::Result => "result",
            MismatchKind::Collection => "collection",
        })
    }
}

/// A reconciliation mismatch for one case.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{description}: {kind} mismatch\n  expected: {expected}\n  actual:   {actual}")]
pub struct AssertionFailure {
    /// Description of the failing case
    pub description: String,
    /// What disagreed
    pub kind: MismatchKind,
    /// Expected value, after normalization
    pub expected: Value,
    /// Actual value, after normalization
    pub actual: Value,
}

/// Compares outcomes under a fixed set of leniencies.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    leniencies: Vec<Leniency>,
}

impl Reconciler {
    /// Reconciler applying `leniencies` in the given order.
    pub fn new(leniencies: Vec<Leniency>) -> Self {
        Self { leniencies }
    }

    /// Check the error flag, then the result.
    ///
    /// Both checks run independently: an expected `error: true` with an
    /// expected `result` asserts both. An absent expected result requires
    /// an absent actual result, and an explicit `null` never matches a
    /// missing one.
    pub fn check_outcome(
        &self,
        description: &str,
        expected: &ExpectedOutcome,
        actual: &Outcome,
    ) -> Result<(), AssertionFailure> {
        if let Some(expected_error) = expected.error {
            if expected_error != actual.error {
                return Err(AssertionFailure {
                    description: description.to_string(),
                    kind: MismatchKind::Error,
                    expected: Value::Bool(expected_error),
                    actual: Value::Bool(actual.error),
                });
            }
        }

        match (&expected.result, &actual.result) {
            (Some(expected_result), Some(actual_result)) => {
                let mut expected_result = expected_result.clone();
                let mut actual_result = actual_result.clone();
                normalize(&self.leniencies, &mut expected_result, &mut actual_result);
                if expected_result != actual_result {
                    return Err(AssertionFailure {
                        description: description.to_string(),
                        kind: MismatchKind::Result,
                        expected: expected_result,
                        actual: actual_result,
                    });
                }
            }
            (None, None) => {}
            // One side has no result at all: show both as outcome documents.
            (expected_result, _) => {
                let expected_outcome = Outcome {
                    error: expected.error.unwrap_or(actual.error),
                    result: expected_result.clone(),
                };
                return Err(AssertionFailure {
                    description: description.to_string(),
                    kind: MismatchKind::Result,
                    expected: expected_outcome.to_document(),
                    actual: actual.to_document(),
                });
            }
        }
        Ok(())
    }

    /// Compare the full contents of a collection, in natural order.
    pub fn check_collection(
        &self,
        description: &str,
        expected: &CollectionSnapshot,
        actual: Vec<Value>,
    ) -> Result<(), AssertionFailure> {
        if expected.data == actual {
            return Ok(());
        }
        Err(AssertionFailure {
            description: description.to_string(),
            kind: MismatchKind::Collection,
            expected: Value::Array(expected.data.clone()),
            actual: Value::Array(actual),
        })
    }
}
