//! # crudcheck Executor
//!
//! Reference implementation of the CRUD operations exercised by the legacy
//! CRUD fixture corpus, running over the in-memory store.
//!
//! It provides:
//! - [`Command`]/[`Output`] - typed operations and their results
//! - [`Executor`] - routes commands to handlers and implements
//!   [`Dispatcher`](crudcheck_core::Dispatcher) for raw operation documents
//!
//! ## Query Language
//!
//! | Area | Supported |
//! |------|-----------|
//! | Filters | `$eq $ne $gt $gte $lt $lte $in $nin $exists $and $or $nor` |
//! | Updates | `$set $unset $inc` |
//! | Aggregation | `$match $sort $skip $limit $project $count $out` |

#![warn(missing_docs)]

mod command;
mod compare;
mod error;
mod executor;
mod filter;
mod output;
mod update;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use command::{Command, InsertManyOptions, ReturnDocument};
pub use error::Error;
pub use executor::Executor;
pub use filter::matches;
pub use output::Output;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
