//! Common test utilities for conformance tests

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crudcheck::{
    Deployment, Dispatcher, DocumentStore, EngineConfig, Executor, MemoryStore, Namespace, Outcome,
    ServerVersion, Topology, Value,
};

/// Sample corpus shipped with the repository
pub fn corpus_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/crud")
}

/// Reference store and dispatcher reporting the given deployment
pub fn reference(topology: Topology, version: &str) -> (Arc<MemoryStore>, Executor) {
    let store = Arc::new(MemoryStore::with_deployment(topology, version.parse().unwrap()));
    let executor = Executor::new(Arc::clone(&store));
    (store, executor)
}

/// Write one fixture file under `dir`
pub fn write_fixture(dir: &Path, name: &str, json: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, json).unwrap();
}

/// Config with every leniency switched off
#[allow(dead_code)]
pub fn strict_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.leniency.upserted_count = false;
    config.leniency.inserted_ids = false;
    config
}

/// Dispatcher wrapper counting calls
pub struct CountingDispatcher<D> {
    pub inner: D,
    pub calls: Cell<usize>,
}

impl<D> CountingDispatcher<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<D: Dispatcher> Dispatcher for CountingDispatcher<D> {
    fn dispatch(&self, ns: &Namespace, operation: &Value) -> Outcome {
        self.calls.set(self.calls.get() + 1);
        self.inner.dispatch(ns, operation)
    }
}

/// Dispatcher that always reports the same outcome
pub struct FixedDispatcher(pub Outcome);

impl Dispatcher for FixedDispatcher {
    fn dispatch(&self, _ns: &Namespace, _operation: &Value) -> Outcome {
        self.0.clone()
    }
}

/// Store wrapper counting mutations
pub struct CountingStore<S> {
    pub inner: S,
    pub drops: Cell<usize>,
    pub inserts: Cell<usize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            drops: Cell::new(0),
            inserts: Cell::new(0),
        }
    }
}

impl<S: DocumentStore> DocumentStore for CountingStore<S> {
    fn drop_collection(&self, ns: &Namespace) -> crudcheck_core::Result<()> {
        self.drops.set(self.drops.get() + 1);
        self.inner.drop_collection(ns)
    }

    fn insert_many(&self, ns: &Namespace, documents: Vec<Value>) -> crudcheck_core::Result<Vec<Value>> {
        self.inserts.set(self.inserts.get() + 1);
        self.inner.insert_many(ns, documents)
    }

    fn find_all(&self, ns: &Namespace) -> crudcheck_core::Result<Vec<Value>> {
        self.inner.find_all(ns)
    }
}

impl<S: Deployment> Deployment for CountingStore<S> {
    fn topology(&self) -> Topology {
        self.inner.topology()
    }

    fn server_version(&self) -> ServerVersion {
        self.inner.server_version()
    }
}

/// Store whose drop is a no-op, so state leaks between cases
pub struct LeakyStore<S>(pub S);

impl<S: DocumentStore> DocumentStore for LeakyStore<S> {
    fn drop_collection(&self, _ns: &Namespace) -> crudcheck_core::Result<()> {
        Ok(())
    }

    fn insert_many(&self, ns: &Namespace, documents: Vec<Value>) -> crudcheck_core::Result<Vec<Value>> {
        self.0.insert_many(ns, documents)
    }

    fn find_all(&self, ns: &Namespace) -> crudcheck_core::Result<Vec<Value>> {
        self.0.find_all(ns)
    }
}

impl<S: Deployment> Deployment for LeakyStore<S> {
    fn topology(&self) -> Topology {
        self.0.topology()
    }

    fn server_version(&self) -> ServerVersion {
        self.0.server_version()
    }
}
