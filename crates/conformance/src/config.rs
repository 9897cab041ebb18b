//! Engine configuration via `crudcheck.toml`
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the standard behavior. Command-line flags override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crudcheck_core::{ServerVersion, Topology};

use crate::error::{ConformanceError, Result};
use crate::leniency::Leniency;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "crudcheck.toml";

/// Toggles for the result-normalization leniencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeniencyConfig {
    /// Treat an absent expected `upsertedCount` as zero
    #[serde(default = "enabled")]
    pub upserted_count: bool,
    /// Ignore `insertedIds` when the expected result does not mention it
    #[serde(default = "enabled")]
    pub inserted_ids: bool,
}

fn enabled() -> bool {
    true
}

impl Default for LeniencyConfig {
    fn default() -> Self {
        Self {
            upserted_count: true,
            inserted_ids: true,
        }
    }
}

impl LeniencyConfig {
    /// Enabled leniencies, in application order.
    pub fn enabled(&self) -> Vec<Leniency> {
        Leniency::ALL
            .into_iter()
            .filter(|l| match l {
                Leniency::UpsertedCountDefault => self.upserted_count,
                Leniency::IgnoreInsertedIds => self.inserted_ids,
            })
            .collect()
    }
}

/// Deployment facts reported by the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// `single`, `replicaset`, `sharded`, `sharded-replicaset` or `load-balanced`
    #[serde(default = "default_topology")]
    pub topology: Topology,
    /// Dotted server version, e.g. `"4.4.0"`
    #[serde(default = "default_server_version")]
    pub server_version: ServerVersion,
}

fn default_topology() -> Topology {
    Topology::Single
}

fn default_server_version() -> ServerVersion {
    ServerVersion::new(vec![4, 4, 0])
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            topology: default_topology(),
            server_version: default_server_version(),
        }
    }
}

/// Engine configuration loaded from `crudcheck.toml`.
///
/// # Example
///
/// ```toml
/// default_database = "crud-tests"
/// default_collection = "test"
///
/// [leniency]
/// upserted_count = true
/// inserted_ids = true
///
/// [deployment]
/// topology = "sharded"
/// server_version = "4.2.0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Database used when a fixture declares no `database_name`.
    #[serde(default = "default_database")]
    pub default_database: String,
    /// Collection used when a fixture declares no `collection_name`.
    #[serde(default = "default_collection")]
    pub default_collection: String,
    /// Result-normalization toggles.
    #[serde(default)]
    pub leniency: LeniencyConfig,
    /// Deployment facts for the reference store.
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

fn default_database() -> String {
    "crud-tests".to_string()
}

fn default_collection() -> String {
    "test".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_database: default_database(),
            default_collection: default_collection(),
            leniency: LeniencyConfig::default(),
            deployment: DeploymentConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# crudcheck configuration
#
# Database and collection used when a fixture does not name its own.
default_database = "crud-tests"
default_collection = "test"

# Result-normalization leniencies (both enabled by default).
#   upserted_count = an absent expected upsertedCount matches an actual 0
#   inserted_ids   = insertedIds is ignored unless the expected result has it
[leniency]
upserted_count = true
inserted_ids = true

# Deployment facts reported by the reference store, used for skip decisions.
#   topology: "single", "replicaset", "sharded", "sharded-replicaset", "load-balanced"
[deployment]
topology = "single"
server_version = "4.4.0"
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::Config`] if the text is not valid config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConformanceError::Config(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConformanceError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            ConformanceError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConformanceError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            ConformanceError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
