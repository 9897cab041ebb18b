//! Command handlers organized by operation family.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `write` | insert, delete, update, replace, findOneAnd* |
//! | `read` | find, count, countDocuments, estimatedDocumentCount, distinct |
//! | `aggregate` | aggregate |
//!
//! The helpers below are shared: selecting matches in natural or sorted
//! order, applying skip/limit windows, and projecting documents.

pub mod aggregate;
pub mod read;
pub mod write;

use std::cmp::Ordering;

use crudcheck_core::{Document, Value};
use crudcheck_storage::ID_FIELD;

use crate::compare::{compare, truthy};
use crate::filter::matches;
use crate::update::{set_path, unset_path};
use crate::{Error, Result};

/// Indices of documents matching `filter`, in natural order, then stably
/// reordered by `sort` when given.
pub(crate) fn select(docs: &[Value], filter: &Value, sort: Option<&Value>) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        if matches(doc, filter)? {
            indices.push(i);
        }
    }
    if let Some(spec) = sort {
        let keys = sort_keys(spec)?;
        indices.sort_by(|a, b| compare_by_keys(&docs[*a], &docs[*b], &keys));
    }
    Ok(indices)
}

/// Stable sort of whole documents by a sort specification.
pub(crate) fn sort_documents(docs: &mut [Value], spec: &Value) -> Result<()> {
    let keys = sort_keys(spec)?;
    docs.sort_by(|a, b| compare_by_keys(a, b, &keys));
    Ok(())
}

fn sort_keys(spec: &Value) -> Result<Vec<(&str, bool)>> {
    let fields = spec
        .as_object()
        .ok_or_else(|| Error::argument("sort specification must be a document"))?;
    fields
        .iter()
        .map(|(field, direction)| match direction.as_f64() {
            Some(d) if d == 1.0 => Ok((field.as_str(), true)),
            Some(d) if d == -1.0 => Ok((field.as_str(), false)),
            _ => Err(Error::argument(format!(
                "sort direction for '{}' must be 1 or -1",
                field
            ))),
        })
        .collect()
}

fn compare_by_keys(a: &Value, b: &Value, keys: &[(&str, bool)]) -> Ordering {
    keys.iter()
        .map(|(field, ascending)| {
            let left = a.get_path(field).unwrap_or(&Value::Null);
            let right = b.get_path(field).unwrap_or(&Value::Null);
            let ord = compare(left, right);
            if *ascending {
                ord
            } else {
                ord.reverse()
            }
        })
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Apply `skip` then `limit`.
///
/// A limit of zero means no limit; a negative limit is read as its
/// absolute value (single-batch semantics).
pub(crate) fn window(docs: Vec<Value>, skip: Option<i64>, limit: Option<i64>) -> Result<Vec<Value>> {
    let skip = non_negative("skip", skip.unwrap_or(0))?;
    let limit = limit.map(i64::unsigned_abs).filter(|l| *l > 0);
    let skipped = docs.into_iter().skip(skip);
    Ok(match limit {
        Some(l) => skipped.take(usize::try_from(l).unwrap_or(usize::MAX)).collect(),
        None => skipped.collect(),
    })
}

/// Count after applying `skip` and `limit` to `matched` results.
pub(crate) fn window_count(matched: usize, skip: Option<i64>, limit: Option<i64>) -> Result<u64> {
    let skip = non_negative("skip", skip.unwrap_or(0))?;
    let remaining = matched.saturating_sub(skip) as u64;
    Ok(match limit.map(i64::unsigned_abs).filter(|l| *l > 0) {
        Some(l) => remaining.min(l),
        None => remaining,
    })
}

fn non_negative(what: &str, n: i64) -> Result<usize> {
    usize::try_from(n).map_err(|_| Error::argument(format!("{} must be non-negative, got {}", what, n)))
}

/// Apply a projection document.
///
/// Inclusion (`{"x": 1}`) and exclusion (`{"x": 0}`) may not be mixed,
/// except for `_id` which is included unless explicitly excluded.
pub(crate) fn project(doc: &Value, projection: &Value) -> Result<Value> {
    let spec = projection
        .as_object()
        .ok_or_else(|| Error::argument("projection must be a document"))?;
    let source = doc
        .as_object()
        .ok_or_else(|| Error::argument("cannot project a non-document"))?;
    let keep_id = spec.get(ID_FIELD).map(truthy).unwrap_or(true);
    let fields: Vec<(&str, bool)> = spec
        .iter()
        .filter(|(k, _)| k.as_str() != ID_FIELD)
        .map(|(k, v)| (k.as_str(), truthy(v)))
        .collect();

    let inclusion = fields.iter().any(|(_, include)| *include);
    if inclusion && fields.iter().any(|(_, include)| !*include) {
        return Err(Error::argument(
            "projection cannot mix inclusion and exclusion",
        ));
    }

    let mut projected = if inclusion {
        let mut out = Document::new();
        if let Some(id) = source.get(ID_FIELD) {
            out.insert(ID_FIELD.to_string(), id.clone());
        }
        for (path, _) in &fields {
            if let Some(value) = doc.get_path(path) {
                set_path(&mut out, path, value.clone())?;
            }
        }
        out
    } else {
        let mut out = source.clone();
        for (path, _) in &fields {
            unset_path(&mut out, path);
        }
        out
    };
    if !keep_id {
        projected.shift_remove(ID_FIELD);
    }
    Ok(Value::Object(projected))
}

/// [`project`] when a projection is present, identity otherwise.
pub(crate) fn project_opt(doc: Value, projection: Option<&Value>) -> Result<Value> {
    match projection {
        Some(p) => project(&doc, p),
        None => Ok(doc),
    }
}
