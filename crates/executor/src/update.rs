//! Update and replacement documents.
//!
//! Update documents are made of operators only (`$set`, `$unset`, `$inc`);
//! replacement documents contain no operators at all. `_id` is immutable
//! under both.

use crudcheck_core::{Document, Value};
use crudcheck_storage::ID_FIELD;

use crate::compare::loose_eq;
use crate::{Error, Result};

/// Check that `update` is a non-empty operator document.
pub fn validate_update(update: &Value) -> Result<&Document> {
    let ops = update
        .as_object()
        .ok_or_else(|| Error::update(format!("update must be a document, got {}", update.type_name())))?;
    if ops.is_empty() {
        return Err(Error::update("update document is empty"));
    }
    if let Some(key) = ops.keys().find(|k| !k.starts_with('$')) {
        return Err(Error::update(format!(
            "update document must contain only operators, found '{}'",
            key
        )));
    }
    Ok(ops)
}

/// Check that `replacement` is a document without operators.
pub fn validate_replacement(replacement: &Value) -> Result<&Document> {
    let fields = replacement.as_object().ok_or_else(|| {
        Error::update(format!(
            "replacement must be a document, got {}",
            replacement.type_name()
        ))
    })?;
    if let Some(key) = fields.keys().find(|k| k.starts_with('$')) {
        return Err(Error::update(format!(
            "replacement document must not contain operators, found '{}'",
            key
        )));
    }
    Ok(fields)
}

/// Apply an operator document to `doc`, returning the updated copy.
pub fn apply_update(doc: &Value, update: &Value) -> Result<Value> {
    let ops = validate_update(update)?;
    let mut updated = doc
        .as_object()
        .cloned()
        .ok_or_else(|| Error::update("cannot update a non-document"))?;

    for (op, fields) in ops {
        let fields = fields
            .as_object()
            .ok_or_else(|| Error::update(format!("{} needs a document argument", op)))?;
        for (path, operand) in fields {
            match op.as_str() {
                "$set" => set_path(&mut updated, path, operand.clone())?,
                "$unset" => unset_path(&mut updated, path),
                "$inc" => {
                    let current = Value::Object(updated.clone());
                    let next = increment(current.get_path(path), operand, path)?;
                    set_path(&mut updated, path, next)?;
                }
                other => return Err(Error::update(format!("unsupported operator {}", other))),
            }
        }
    }

    let updated = Value::Object(updated);
    ensure_same_id(doc, &updated)?;
    Ok(updated)
}

/// Build the stored form of a replacement: the original `_id` is carried over.
pub fn apply_replacement(doc: &Value, replacement: &Value) -> Result<Value> {
    let fields = validate_replacement(replacement)?;
    let mut replaced = Document::new();
    if let Some(id) = doc.get(ID_FIELD) {
        replaced.insert(ID_FIELD.to_string(), id.clone());
    }
    for (k, v) in fields {
        replaced.insert(k.clone(), v.clone());
    }
    let replaced = Value::Object(replaced);
    ensure_same_id(doc, &replaced)?;
    Ok(replaced)
}

/// Seed document for an upsert: equality clauses of the filter.
pub fn upsert_seed(filter: &Value) -> Result<Value> {
    let mut seed = Document::new();
    if let Some(clauses) = filter.as_object() {
        for (path, condition) in clauses {
            if path.starts_with('$') {
                continue;
            }
            let literal = match condition {
                Value::Object(o) => match o.get("$eq") {
                    Some(eq) if o.len() == 1 => eq.clone(),
                    _ if o.keys().any(|k| k.starts_with('$')) => continue,
                    _ => condition.clone(),
                },
                _ => condition.clone(),
            };
            set_path(&mut seed, path, literal)?;
        }
    }
    Ok(Value::Object(seed))
}

fn ensure_same_id(before: &Value, after: &Value) -> Result<()> {
    match (before.get(ID_FIELD), after.get(ID_FIELD)) {
        (Some(old), Some(new)) if !loose_eq(old, new) => Err(Error::update(
            "performing an update on the path '_id' would modify the immutable field '_id'",
        )),
        (Some(_), None) => Err(Error::update("the '_id' field cannot be removed")),
        _ => Ok(()),
    }
}

fn increment(current: Option<&Value>, operand: &Value, path: &str) -> Result<Value> {
    if !operand.is_number() {
        return Err(Error::update(format!("$inc on '{}' needs a numeric operand", path)));
    }
    match (current, operand) {
        (None, _) => Ok(operand.clone()),
        (Some(Value::Int(a)), Value::Int(b)) => Ok(a
            .checked_add(*b)
            .map(Value::Int)
            .unwrap_or(Value::Float(*a as f64 + *b as f64))),
        (Some(c), _) if c.is_number() => Ok(Value::Float(
            c.as_f64().unwrap_or_default() + operand.as_f64().unwrap_or_default(),
        )),
        (Some(c), _) => Err(Error::update(format!(
            "cannot apply $inc to '{}' of type {}",
            path,
            c.type_name()
        ))),
    }
}

/// Set a dotted path, creating intermediate documents as needed.
pub fn set_path(doc: &mut Document, path: &str, value: Value) -> Result<()> {
    match path.split_once('.') {
        None => {
            doc.insert(path.to_string(), value);
            Ok(())
        }
        Some((head, rest)) => {
            let child = doc
                .entry(head.to_string())
                .or_insert_with(Value::object);
            match child {
                Value::Object(inner) => set_path(inner, rest, value),
                other => Err(Error::update(format!(
                    "cannot create field '{}' in element of type {}",
                    rest,
                    other.type_name()
                ))),
            }
        }
    }
}

/// Remove a dotted path; missing paths are ignored.
pub fn unset_path(doc: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            doc.shift_remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(inner)) = doc.get_mut(head) {
                unset_path(inner, rest);
            }
        }
    }
}
