//! Test modules for the executor crate.


use std::sync::Arc;

use crudcheck_core::Namespace;
use crudcheck_storage::MemoryStore;

use crate::Executor;

/// Create a test executor over an empty in-memory store.
pub(crate) fn create_test_executor() -> Executor {
    Executor::new(Arc::new(MemoryStore::new()))
}

pub(crate) fn test_ns() -> Namespace {
    Namespace::new("crud-tests", "test")
}
