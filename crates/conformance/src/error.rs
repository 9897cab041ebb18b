//! Run-level errors for the conformance engine.
//!
//! These abort a run. Failures scoped to a single case (setup failures,
//! assertion mismatches) are not errors at this level; they are reported as
//! [`CaseVerdict`](crate::CaseVerdict)s.

use std::path::PathBuf;

/// Errors that abort corpus discovery, loading or configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// Corpus root is missing or is not a directory
    #[error("corpus not found: {}", path.display())]
    CorpusNotFound {
        /// Path that was searched
        path: PathBuf,
    },

    /// A fixture file could not be read or parsed
    #[error("malformed fixture {}: {reason}", path.display())]
    MalformedFixture {
        /// Offending file
        path: PathBuf,
        /// Parser or I/O message
        reason: String,
    },

    /// Directory traversal failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl ConformanceError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConformanceError::MalformedFixture {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for conformance operations
pub type Result<T> = std::result::Result<T, ConformanceError>;
