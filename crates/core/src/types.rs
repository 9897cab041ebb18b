//! Core types for crudcheck
//!
//! This module defines the foundational types shared by the store,
//! the executor and the conformance engine:
//! - Namespace: `(database, collection)` pair naming a collection
//! - Topology: deployment shape of the store under test
//! - ServerVersion: dotted version with zero-padded comparison
//! - RunRequirement: version/topology bounds a fixture declares

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Fully qualified collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Another collection in the same database.
    pub fn sibling(&self, collection: impl Into<String>) -> Self {
        Self::new(self.database.clone(), collection)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

// ============================================================================
// Topology
// ============================================================================

/// Deployment shape of the store under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Topology {
    /// Standalone server
    Single,
    /// Replica set
    ReplicaSet,
    /// Sharded cluster with standalone shards
    Sharded,
    /// Sharded cluster whose shards are replica sets
    ShardedReplicaSet,
    /// Load-balanced cluster
    LoadBalanced,
}

impl Topology {
    /// Canonical fixture spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Topology::Single => "single",
            Topology::ReplicaSet => "replicaset",
            Topology::Sharded => "sharded",
            Topology::ShardedReplicaSet => "sharded-replicaset",
            Topology::LoadBalanced => "load-balanced",
        }
    }

    /// True for both sharded shapes
    pub fn is_sharded(self) -> bool {
        matches!(self, Topology::Sharded | Topology::ShardedReplicaSet)
    }

    /// Whether a deployment of this shape meets a `required` topology.
    ///
    /// A sharded cluster backed by replica sets is still a sharded cluster.
    pub fn satisfies(self, required: Topology) -> bool {
        self == required || (self == Topology::ShardedReplicaSet && required == Topology::Sharded)
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Topology::Single),
            "replicaset" => Ok(Topology::ReplicaSet),
            "sharded" => Ok(Topology::Sharded),
            "sharded-replicaset" => Ok(Topology::ShardedReplicaSet),
            "load-balanced" => Ok(Topology::LoadBalanced),
            other => Err(Error::InvalidDeployment(format!(
                "unknown topology '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Topology {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Topology> for String {
    fn from(t: Topology) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ServerVersion
// ============================================================================

/// Dotted server version such as `4.4.0`.
///
/// Missing trailing components compare as zero, so `3.6 == 3.6.0`.
/// Pre-release suffixes (`-rc0`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerVersion {
    parts: Vec<u32>,
}

impl ServerVersion {
    /// Build a version from numeric components
    pub fn new(parts: impl Into<Vec<u32>>) -> Self {
        Self {
            parts: parts.into(),
        }
    }

    fn component(&self, index: usize) -> u32 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for ServerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ServerVersion {}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl FromStr for ServerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s.split('-').next().unwrap_or_default().trim();
        if core.is_empty() {
            return Err(Error::InvalidDeployment(format!(
                "empty server version '{}'",
                s
            )));
        }
        let parts = core
            .split('.')
            .map(|p| {
                p.parse::<u32>().map_err(|_| {
                    Error::InvalidDeployment(format!("invalid server version '{}'", s))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }
}

impl TryFrom<String> for ServerVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ServerVersion> for String {
    fn from(v: ServerVersion) -> Self {
        v.to_string()
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        f.write_str(&rendered.join("."))
    }
}

// ============================================================================
// RunRequirement
// ============================================================================

/// Version and topology bounds under which a fixture or case may run.
///
/// Every bound that is present must hold; absent bounds always hold.
/// Both version bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequirement {
    /// Lowest supported server version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_server_version: Option<ServerVersion>,
    /// Highest supported server version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_server_version: Option<ServerVersion>,
    /// Topologies the case applies to
    #[serde(default, rename = "topology", skip_serializing_if = "Option::is_none")]
    pub topologies: Option<Vec<Topology>>,
}

impl RunRequirement {
    /// True when no bound is declared
    pub fn is_unbounded(&self) -> bool {
        self.min_server_version.is_none()
            && self.max_server_version.is_none()
            && self.topologies.is_none()
    }

    /// Evaluate the requirement against a live deployment
    pub fn is_satisfied_by(&self, topology: Topology, version: &ServerVersion) -> bool {
        if let Some(min) = &self.min_server_version {
            if version < min {
                return false;
            }
        }
        if let Some(max) = &self.max_server_version {
            if version > max {
                return false;
            }
        }
        match &self.topologies {
            Some(allowed) => allowed.iter().any(|t| topology.satisfies(*t)),
            None => true,
        }
    }
}
