//! Error types for document store operations
//!
//! Every store implementation reports failures through this enum.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a document store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A document with the same `_id` already exists in the collection
    #[error("Duplicate key in {namespace}: _id {id}")]
    DuplicateKey {
        /// Collection the insert targeted (`database.collection`)
        namespace: String,
        /// Offending `_id`, rendered as JSON
        id: String,
    },

    /// A value that must be a document is not one
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Malformed server version or topology string
    #[error("Invalid deployment descriptor: {0}")]
    InvalidDeployment(String),

    /// Internal error (bug or invariant violation)
    #[error("Internal error: {0}")]
    Internal(String),
}
