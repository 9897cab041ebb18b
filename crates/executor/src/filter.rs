//! Filter evaluation.
//!
//! Supports the subset of the query language the CRUD corpus uses:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{"a.b": v}` | field equals `v`, or an array field contains `v` |
//! | `{"a": {"$gt": v}}` | `$eq $ne $gt $gte $lt $lte $in $nin $exists` |
//! | `{"$and": [..]}` | `$and $or $nor` over sub-filters |
//!
//! A missing field equals `null`.

use std::cmp::Ordering;

use crudcheck_core::{Document, Value};

use crate::compare::{compare, loose_eq, same_bracket, truthy};
use crate::{Error, Result};

/// Evaluate `filter` against `doc`.
///
/// A `null` filter matches everything.
pub fn matches(doc: &Value, filter: &Value) -> Result<bool> {
    match filter {
        Value::Null => Ok(true),
        Value::Object(clauses) => matches_clauses(doc, clauses),
        other => Err(Error::filter(format!(
            "filter must be a document, got {}",
            other.type_name()
        ))),
    }
}

fn matches_clauses(doc: &Value, clauses: &Document) -> Result<bool> {
    for (key, condition) in clauses {
        let hit = match key.as_str() {
            "$and" => sub_filters(key, condition)?
                .iter()
                .try_fold(true, |acc, f| Ok::<_, Error>(acc && matches(doc, f)?))?,
            "$or" => sub_filters(key, condition)?
                .iter()
                .try_fold(false, |acc, f| Ok::<_, Error>(acc || matches(doc, f)?))?,
            "$nor" => !sub_filters(key, condition)?
                .iter()
                .try_fold(false, |acc, f| Ok::<_, Error>(acc || matches(doc, f)?))?,
            op if op.starts_with('$') => {
                return Err(Error::filter(format!("unknown top-level operator {}", op)))
            }
            path => matches_field(doc.get_path(path), condition)?,
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sub_filters<'a>(op: &str, condition: &'a Value) -> Result<&'a [Value]> {
    match condition.as_array() {
        Some(list) if !list.is_empty() => Ok(list),
        _ => Err(Error::filter(format!("{} needs a non-empty array", op))),
    }
}

/// True when `condition` is an operator expression (`{"$gt": 1}`)
/// rather than a literal document to compare against.
fn is_operator_expression(condition: &Value) -> bool {
    condition
        .as_object()
        .and_then(|o| o.keys().next())
        .map(|k| k.starts_with('$'))
        .unwrap_or(false)
}

fn matches_field(field: Option<&Value>, condition: &Value) -> Result<bool> {
    if !is_operator_expression(condition) {
        return Ok(equals(field, condition));
    }
    let operators = condition.as_object().into_iter().flatten();
    for (op, operand) in operators {
        if !apply_operator(field, op, operand)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn apply_operator(field: Option<&Value>, op: &str, operand: &Value) -> Result<bool> {
    match op {
        "$eq" => Ok(equals(field, operand)),
        "$ne" => Ok(!equals(field, operand)),
        "$gt" => Ok(range(field, operand, |o| o == Ordering::Greater)),
        "$gte" => Ok(range(field, operand, |o| o != Ordering::Less)),
        "$lt" => Ok(range(field, operand, |o| o == Ordering::Less)),
        "$lte" => Ok(range(field, operand, |o| o != Ordering::Greater)),
        "$in" => in_list(field, op, operand),
        "$nin" => Ok(!in_list(field, op, operand)?),
        "$exists" => Ok(field.is_some() == truthy(operand)),
        other => Err(Error::filter(format!("unknown operator {}", other))),
    }
}

/// Candidate values for a field: the value itself plus, for arrays, each element.
fn candidates(field: &Value) -> impl Iterator<Item = &Value> {
    std::iter::once(field).chain(field.as_array().into_iter().flatten())
}

fn equals(field: Option<&Value>, operand: &Value) -> bool {
    match field {
        None => operand.is_null(),
        Some(value) => candidates(value).any(|c| loose_eq(c, operand)),
    }
}

fn range(field: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    field
        .map(|value| {
            candidates(value).any(|c| same_bracket(c, operand) && accept(compare(c, operand)))
        })
        .unwrap_or(false)
}

fn in_list(field: Option<&Value>, op: &str, operand: &Value) -> Result<bool> {
    let list = operand
        .as_array()
        .ok_or_else(|| Error::filter(format!("{} needs an array", op)))?;
    Ok(list.iter().any(|item| equals(field, item)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudcheck_core::doc;

    fn m(doc: Value, filter: Value) -> bool {
        matches(&doc, &filter).unwrap()
    }

    #[test]
    fn test_empty_and_null_filter_match_everything() {
        assert!(m(doc!({"_id": 1}), doc!({})));
        assert!(m(doc!({"_id": 1}), Value::Null));
    }

    #[test]
    fn test_equality_and_dotted_paths() {
        let d = doc!({"_id": 1, "x": {"y": 11}});
        assert!(m(d.clone(), doc!({"x.y": 11})));
        assert!(m(d.clone(), doc!({"x.y": 11.0})));
        assert!(!m(d.clone(), doc!({"x.y": 12})));
        assert!(m(d, doc!({"x": {"y": 11}})));
    }

    #[test]
    fn test_missing_field_equals_null() {
        assert!(m(doc!({"_id": 1}), doc!({"x": null})));
        assert!(!m(doc!({"_id": 1}), doc!({"x": 1})));
    }

    #[test]
    fn test_array_field_contains() {
        let d = doc!({"tags": ["a", "b"]});
        assert!(m(d.clone(), doc!({"tags": "b"})));
        assert!(m(d.clone(), doc!({"tags": ["a", "b"]})));
        assert!(!m(d, doc!({"tags": "c"})));
    }

    #[test]
    fn test_range_operators() {
        let d = doc!({"x": 22});
        assert!(m(d.clone(), doc!({"x": {"$gt": 11}})));
        assert!(m(d.clone(), doc!({"x": {"$gte": 22, "$lt": 33}})));
        assert!(!m(d.clone(), doc!({"x": {"$lte": 11}})));
        // different brackets never compare
        assert!(!m(d, doc!({"x": {"$gt": "a"}})));
    }

    #[test]
    fn test_in_nin_ne_exists() {
        let d = doc!({"_id": 2, "x": 22});
        assert!(m(d.clone(), doc!({"_id": {"$in": [1, 2]}})));
        assert!(!m(d.clone(), doc!({"_id": {"$nin": [1, 2]}})));
        assert!(m(d.clone(), doc!({"x": {"$ne": 11}})));
        assert!(m(d.clone(), doc!({"x": {"$exists": true}})));
        assert!(m(d, doc!({"y": {"$exists": false}})));
    }

    #[test]
    fn test_logical_operators() {
        let d = doc!({"_id": 3, "x": 33});
        assert!(m(d.clone(), doc!({"$or": [{"_id": 1}, {"x": 33}]})));
        assert!(!m(d.clone(), doc!({"$and": [{"_id": 3}, {"x": 1}]})));
        assert!(m(d, doc!({"$nor": [{"_id": 1}, {"_id": 2}]})));
    }

    #[test]
    fn test_invalid_filters_are_errors() {
        let d = doc!({"_id": 1});
        assert!(matches(&d, &doc!(5)).is_err());
        assert!(matches(&d, &doc!({"$where": "x"})).is_err());
        assert!(matches(&d, &doc!({"x": {"$regex": "a"}})).is_err());
        assert!(matches(&d, &doc!({"$or": []})).is_err());
        assert!(matches(&d, &doc!({"_id": {"$in": 1}})).is_err());
    }
}
