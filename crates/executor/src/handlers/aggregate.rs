//! Aggregate command handler.
//!
//! Supported stages: `$match`, `$sort`, `$skip`, `$limit`, `$project`,
//! `$count` and `$out`. `$out` must be the final stage; it replaces the
//! target collection in the same database and the command then returns the
//! target collection's contents.

use crudcheck_core::{Document, DocumentStore, Namespace, Value};
use crudcheck_storage::MemoryStore;
use tracing::debug;

use super::{project, sort_documents, window};
use crate::filter::matches;
use crate::{Error, Output, Result};

/// Handle Aggregate command.
pub fn aggregate(store: &MemoryStore, ns: &Namespace, pipeline: &[Value]) -> Result<Output> {
    let mut docs = store.find_all(ns)?;
    for (position, stage) in pipeline.iter().enumerate() {
        let (name, arg) = single_stage(stage)?;
        docs = match name {
            "$match" => {
                let mut kept = Vec::with_capacity(docs.len());
                for doc in docs {
                    if matches(&doc, arg)? {
                        kept.push(doc);
                    }
                }
                kept
            }
            "$sort" => {
                sort_documents(&mut docs, arg)?;
                docs
            }
            "$skip" => window(docs, Some(stage_int(name, arg)?), None)?,
            "$limit" => {
                let limit = stage_int(name, arg)?;
                if limit <= 0 {
                    return Err(Error::argument("$limit must be positive"));
                }
                window(docs, None, Some(limit))?
            }
            "$project" => docs
                .iter()
                .map(|doc| project(doc, arg))
                .collect::<Result<Vec<_>>>()?,
            "$count" => {
                let field = arg
                    .as_str()
                    .filter(|f| !f.is_empty() && !f.starts_with('$'))
                    .ok_or_else(|| Error::argument("$count needs a non-empty field name"))?;
                if docs.is_empty() {
                    Vec::new()
                } else {
                    let mut counted = Document::new();
                    counted.insert(field.to_string(), Value::from(docs.len() as u64));
                    vec![Value::Object(counted)]
                }
            }
            "$out" => {
                if position + 1 != pipeline.len() {
                    return Err(Error::argument("$out can only be the final stage"));
                }
                let target = arg
                    .as_str()
                    .ok_or_else(|| Error::argument("$out needs a collection name"))?;
                return write_out(store, &ns.sibling(target), docs);
            }
            other => {
                return Err(Error::UnsupportedStage {
                    stage: other.to_string(),
                })
            }
        };
    }
    Ok(Output::Documents(docs))
}

fn write_out(store: &MemoryStore, target: &Namespace, docs: Vec<Value>) -> Result<Output> {
    debug!(target: "crudcheck::executor", namespace = %target, count = docs.len(), "$out");
    store.drop_collection(target)?;
    if !docs.is_empty() {
        store.insert_many(target, docs)?;
    }
    Ok(Output::Documents(store.find_all(target)?))
}

fn single_stage(stage: &Value) -> Result<(&str, &Value)> {
    match stage.as_object() {
        Some(fields) if fields.len() == 1 => fields
            .iter()
            .next()
            .map(|(name, arg)| (name.as_str(), arg))
            .ok_or_else(|| Error::argument("empty pipeline stage")),
        _ => Err(Error::argument(
            "each pipeline stage must be a document with exactly one field",
        )),
    }
}

fn stage_int(name: &str, arg: &Value) -> Result<i64> {
    match arg {
        Value::Int(n) => Ok(*n),
        Value::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        _ => Err(Error::argument(format!("{} needs an integer", name))),
    }
}
