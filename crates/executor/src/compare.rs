//! Query-language value comparison.
//!
//! `Value`'s own `PartialEq` is strict (`Int(1) != Float(1.0)`), which is what
//! outcome reconciliation wants. Queries are looser: numbers compare by
//! magnitude, and sorting needs a total order across types.
//!
//! Cross-type order, lowest first: Null, numbers, String, Object, Array, Bool.

use std::cmp::Ordering;

use crudcheck_core::Value;

fn bracket(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// True when both values fall in the same comparison bracket
pub fn same_bracket(a: &Value, b: &Value) -> bool {
    bracket(a) == bracket(b)
}

/// Total order used by sorts and range operators.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (x, y) if x.is_number() && y.is_number() => {
            let (fx, fy) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            // NaN sorts below every other number
            fx.partial_cmp(&fy).unwrap_or_else(|| fx.is_nan().cmp(&fy.is_nan()).reverse())
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare(l, r))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x
            .iter()
            .zip(y.iter())
            .map(|((kl, vl), (kr, vr))| kl.cmp(kr).then_with(|| compare(vl, vr)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => bracket(a).cmp(&bracket(b)),
    }
}

/// Query equality: numbers by magnitude, containers element-wise.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (x, y) if x.is_number() && y.is_number() => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map(|other| loose_eq(v, other)).unwrap_or(false))
        }
        _ => a == b,
    }
}

/// Flag interpretation used by `$exists` and projections.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        v if v.is_number() => !v.is_zero(),
        _ => true,
    }
}
