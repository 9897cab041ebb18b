//! Error types for command execution.
//!
//! Every failure inside the executor is one of these variants. At the
//! dispatch boundary they are folded into `Outcome { error: true }`, so
//! they never reach the conformance engine as Rust errors.

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Parsing | `UnknownOperation`, `InvalidArgument` | Bad operation document |
/// | Query | `InvalidFilter`, `InvalidUpdate`, `UnsupportedStage` | Bad query language |
/// | Store | `Store` | Duplicate keys, non-document values |
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Operation name not recognized
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Arguments missing or of the wrong shape
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Filter document cannot be evaluated
    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },

    /// Update or replacement document is not acceptable
    #[error("invalid update: {reason}")]
    InvalidUpdate { reason: String },

    /// Aggregation stage not implemented
    #[error("unsupported aggregation stage: {stage}")]
    UnsupportedStage { stage: String },

    /// Error raised by the underlying store
    #[error(transparent)]
    Store(#[from] crudcheck_core::Error),
}

impl Error {
    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn filter(reason: impl Into<String>) -> Self {
        Error::InvalidFilter {
            reason: reason.into(),
        }
    }

    pub(crate) fn update(reason: impl Into<String>) -> Self {
        Error::InvalidUpdate {
            reason: reason.into(),
        }
    }
}
