//! Conformance Engine Tests
//!
//! End-to-end tests for the crudcheck engine:
//! - the sample corpus under `tests/fixtures/crud` against the reference store
//! - engine properties (skip gate, seeding, leniencies, snapshot checks)
//!   observed through instrumented stores and dispatchers
//! - run-level errors

mod common;

mod corpus;
mod properties;
mod run_errors;
