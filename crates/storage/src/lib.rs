//! Reference storage layer for crudcheck
//!
//! This crate implements an in-memory document store used to run fixture
//! corpora without a live server:
//! - Collection: insertion-ordered documents with `_id` uniqueness
//! - MemoryStore: DashMap of collections, each behind a `parking_lot::RwLock`
//!
//! `MemoryStore` implements both `DocumentStore` and `Deployment` from
//! `crudcheck-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod memory;

pub use collection::{ensure_id, generate_id, Collection, ID_FIELD};
pub use memory::{CollectionHandle, MemoryStore, DEFAULT_SERVER_VERSION};
