//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. [`Output::into_value`]
//! renders it in the result shape the CRUD corpus expects, e.g.
//! `{"matchedCount": 1, "modifiedCount": 1, "upsertedCount": 0}`.

use crudcheck_core::{Document, Value};

/// Successful command execution results.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `_id` of a single inserted document
    InsertedId(Value),

    /// `_id`s of inserted documents, in insertion order
    InsertedIds(Vec<Value>),

    /// Number of deleted documents
    Deleted(u64),

    /// Update/replace counters
    Updated {
        /// Documents matching the filter
        matched: u64,
        /// Documents actually changed
        modified: u64,
        /// `_id` of the upserted document, if one was inserted
        upserted_id: Option<Value>,
    },

    /// Documents returned by a query
    Documents(Vec<Value>),

    /// Single document (or none) returned by a findOneAnd* command
    Document(Option<Value>),

    /// Count result
    Count(u64),

    /// Distinct values
    Values(Vec<Value>),
}

impl Output {
    /// Render as the result value reported in an outcome.
    pub fn into_value(self) -> Value {
        match self {
            Output::InsertedId(id) => object([("insertedId", id)]),
            Output::InsertedIds(ids) => {
                let by_index: Document = ids
                    .into_iter()
                    .enumerate()
                    .map(|(i, id)| (i.to_string(), id))
                    .collect();
                object([("insertedIds", Value::Object(by_index))])
            }
            Output::Deleted(n) => object([("deletedCount", Value::from(n))]),
            Output::Updated {
                matched,
                modified,
                upserted_id,
            } => {
                let mut result = Document::new();
                result.insert("matchedCount".into(), Value::from(matched));
                result.insert("modifiedCount".into(), Value::from(modified));
                result.insert(
                    "upsertedCount".into(),
                    Value::Int(i64::from(upserted_id.is_some())),
                );
                if let Some(id) = upserted_id {
                    result.insert("upsertedId".into(), id);
                }
                Value::Object(result)
            }
            Output::Documents(docs) | Output::Values(docs) => Value::Array(docs),
            Output::Document(doc) => doc.unwrap_or(Value::Null),
            Output::Count(n) => Value::from(n),
        }
    }
}

fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}
