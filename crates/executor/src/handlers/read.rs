//! Read command handlers.
//!
//! Reads go through [`DocumentStore::find_all`] so that reading a missing
//! collection never creates it.

use crudcheck_core::{DocumentStore, Namespace, Value};
use crudcheck_storage::MemoryStore;

use super::{project_opt, select, window, window_count};
use crate::compare::loose_eq;
use crate::filter::matches;
use crate::{Error, Output, Result};

/// Arguments of a Find command.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindArgs<'a> {
    /// Query filter
    pub filter: Option<&'a Value>,
    /// Sort specification
    pub sort: Option<&'a Value>,
    /// Documents to skip
    pub skip: Option<i64>,
    /// Maximum documents to return (0 = unlimited)
    pub limit: Option<i64>,
    /// Projection specification
    pub projection: Option<&'a Value>,
}

/// Handle Find command.
pub fn find(store: &MemoryStore, ns: &Namespace, args: FindArgs<'_>) -> Result<Output> {
    let docs = store.find_all(ns)?;
    let filter = args.filter.unwrap_or(&Value::Null);
    let selected: Vec<Value> = select(&docs, filter, args.sort)?
        .into_iter()
        .map(|i| docs[i].clone())
        .collect();
    let windowed = window(selected, args.skip, args.limit)?;
    let projected = windowed
        .into_iter()
        .map(|doc| project_opt(doc, args.projection))
        .collect::<Result<Vec<_>>>()?;
    Ok(Output::Documents(projected))
}

/// Handle Count / CountDocuments commands.
pub fn count(
    store: &MemoryStore,
    ns: &Namespace,
    filter: &Value,
    skip: Option<i64>,
    limit: Option<i64>,
) -> Result<Output> {
    let docs = store.find_all(ns)?;
    let matched = select(&docs, filter, None)?.len();
    Ok(Output::Count(window_count(matched, skip, limit)?))
}

/// Handle EstimatedDocumentCount command.
pub fn estimated_document_count(store: &MemoryStore, ns: &Namespace) -> Result<Output> {
    Ok(Output::Count(store.find_all(ns)?.len() as u64))
}

/// Handle Distinct command.
///
/// Array values contribute their elements. Values keep first-seen order and
/// numerically equal values collapse to the first one seen.
pub fn distinct(
    store: &MemoryStore,
    ns: &Namespace,
    field_name: &str,
    filter: &Value,
) -> Result<Output> {
    if field_name.is_empty() {
        return Err(Error::argument("distinct needs a field name"));
    }
    let mut values: Vec<Value> = Vec::new();
    for doc in store.find_all(ns)? {
        if !matches(&doc, filter)? {
            continue;
        }
        let candidates = match doc.get_path(field_name) {
            None => continue,
            Some(Value::Array(items)) => items.clone(),
            Some(v) => vec![v.clone()],
        };
        for v in candidates {
            if !values.iter().any(|seen| loose_eq(seen, &v)) {
                values.push(v);
            }
        }
    }
    Ok(Output::Values(values))
}
