//! MemoryStore: in-memory reference document store
//!
//! Collections live in a `DashMap` keyed by [`Namespace`], each behind its
//! own `parking_lot::RwLock`, so operations on different collections never
//! contend. The store also answers deployment questions with a fixed,
//! configurable topology and server version, which lets a corpus be run
//! as if against a sharded cluster or an older server.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crudcheck_core::{Deployment, DocumentStore, Namespace, Result, ServerVersion, Topology, Value};

use crate::collection::Collection;

/// Shared handle to one collection
pub type CollectionHandle = Arc<RwLock<Collection>>;

/// Server version reported when none is configured
pub const DEFAULT_SERVER_VERSION: [u32; 3] = [4, 4, 0];

/// In-memory document store.
#[derive(Debug)]
pub struct MemoryStore {
    collections: DashMap<Namespace, CollectionHandle>,
    topology: Topology,
    server_version: ServerVersion,
}

impl MemoryStore {
    /// Create an empty standalone store reporting [`DEFAULT_SERVER_VERSION`]
    pub fn new() -> Self {
        Self::with_deployment(
            Topology::Single,
            ServerVersion::new(DEFAULT_SERVER_VERSION.to_vec()),
        )
    }

    /// Create an empty store that reports the given deployment facts
    pub fn with_deployment(topology: Topology, server_version: ServerVersion) -> Self {
        Self {
            collections: DashMap::new(),
            topology,
            server_version,
        }
    }

    /// Handle to a collection, creating it empty on first use.
    pub fn collection(&self, ns: &Namespace) -> CollectionHandle {
        self.collections
            .entry(ns.clone())
            .or_insert_with(|| Arc::new(RwLock::new(Collection::new(ns.clone()))))
            .clone()
    }

    /// True when the collection has been created and not dropped
    pub fn has_collection(&self, ns: &Namespace) -> bool {
        self.collections.contains_key(ns)
    }

    /// Sorted collection names of one database
    pub fn collection_names(&self, database: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|entry| entry.key().database == database)
            .map(|entry| entry.key().collection.clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn drop_collection(&self, ns: &Namespace) -> Result<()> {
        if self.collections.remove(ns).is_some() {
            debug!(target: "crudcheck::store", namespace = %ns, "Dropped collection");
        }
        Ok(())
    }

    fn insert_many(&self, ns: &Namespace, documents: Vec<Value>) -> Result<Vec<Value>> {
        let handle = self.collection(ns);
        let mut collection = handle.write();
        documents
            .into_iter()
            .map(|doc| collection.insert(doc))
            .collect()
    }

    fn find_all(&self, ns: &Namespace) -> Result<Vec<Value>> {
        Ok(self
            .collections
            .get(ns)
            .map(|handle| handle.read().documents().to_vec())
            .unwrap_or_default())
    }
}

impl Deployment for MemoryStore {
    fn topology(&self) -> Topology {
        self.topology
    }

    fn server_version(&self) -> ServerVersion {
        self.server_version.clone()
    }
}
