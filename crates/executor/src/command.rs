//! Command enum defining all supported CRUD operations.
//!
//! Commands are parsed from the operation documents found in fixtures:
//!
//! ```json
//! {"name": "updateOne", "arguments": {"filter": {"_id": 1}, "update": {"$inc": {"x": 1}}}}
//! ```
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Typed**: Argument shapes are checked by serde before execution
//! - **Pure data**: No closures or executable code
//!
//! Unrecognized argument keys (`collation`, `hint`, ...) are ignored.

use serde::Deserialize;

use crudcheck_core::Value;

use crate::{Error, Result};

/// Which version of the document `findOneAndReplace`/`findOneAndUpdate` return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReturnDocument {
    /// The document as it was before modification
    #[default]
    Before,
    /// The document after modification
    After,
}

/// Options accepted by `insertMany`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsertManyOptions {
    /// Stop at the first failed insert
    #[serde(default = "default_ordered")]
    pub ordered: bool,
}

fn default_ordered() -> bool {
    true
}

impl Default for InsertManyOptions {
    fn default() -> Self {
        Self { ordered: true }
    }
}

/// A CRUD operation with its arguments.
///
/// # Command Categories
///
/// | Category | Commands |
/// |----------|----------|
/// | Insert | `InsertOne`, `InsertMany` |
/// | Delete | `DeleteOne`, `DeleteMany`, `FindOneAndDelete` |
/// | Update | `ReplaceOne`, `UpdateOne`, `UpdateMany`, `FindOneAndReplace`, `FindOneAndUpdate` |
/// | Read | `Find`, `Count`, `CountDocuments`, `EstimatedDocumentCount`, `Distinct`, `Aggregate` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "name",
    content = "arguments",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    /// Insert one document.
    /// Returns: `Output::InsertedId`
    InsertOne { document: Value },

    /// Insert several documents.
    /// Returns: `Output::InsertedIds`
    InsertMany {
        documents: Vec<Value>,
        #[serde(default)]
        options: InsertManyOptions,
    },

    /// Delete the first matching document.
    /// Returns: `Output::Deleted`
    DeleteOne { filter: Value },

    /// Delete every matching document.
    /// Returns: `Output::Deleted`
    DeleteMany { filter: Value },

    /// Replace the first matching document.
    /// Returns: `Output::Updated`
    ReplaceOne {
        filter: Value,
        replacement: Value,
        #[serde(default)]
        upsert: bool,
    },

    /// Update the first matching document.
    /// Returns: `Output::Updated`
    UpdateOne {
        filter: Value,
        update: Value,
        #[serde(default)]
        upsert: bool,
    },

    /// Update every matching document.
    /// Returns: `Output::Updated`
    UpdateMany {
        filter: Value,
        update: Value,
        #[serde(default)]
        upsert: bool,
    },

    /// Query documents.
    /// Returns: `Output::Documents`
    Find {
        filter: Option<Value>,
        sort: Option<Value>,
        skip: Option<i64>,
        limit: Option<i64>,
        projection: Option<Value>,
    },

    /// Legacy count.
    /// Returns: `Output::Count`
    Count {
        filter: Option<Value>,
        skip: Option<i64>,
        limit: Option<i64>,
    },

    /// Count matching documents.
    /// Returns: `Output::Count`
    CountDocuments {
        filter: Option<Value>,
        skip: Option<i64>,
        limit: Option<i64>,
    },

    /// Count every document in the collection.
    /// Returns: `Output::Count`
    EstimatedDocumentCount {},

    /// Distinct values of a field.
    /// Returns: `Output::Values`
    Distinct {
        field_name: String,
        filter: Option<Value>,
    },

    /// Run an aggregation pipeline.
    /// Returns: `Output::Documents`
    Aggregate { pipeline: Vec<Value> },

    /// Delete the first matching document and return it.
    /// Returns: `Output::Document`
    FindOneAndDelete {
        filter: Value,
        sort: Option<Value>,
        projection: Option<Value>,
    },

    /// Replace the first matching document and return it.
    /// Returns: `Output::Document`
    FindOneAndReplace {
        filter: Value,
        replacement: Value,
        sort: Option<Value>,
        projection: Option<Value>,
        #[serde(default)]
        upsert: bool,
        #[serde(default)]
        return_document: ReturnDocument,
    },

    /// Update the first matching document and return it.
    /// Returns: `Output::Document`
    FindOneAndUpdate {
        filter: Value,
        update: Value,
        sort: Option<Value>,
        projection: Option<Value>,
        #[serde(default)]
        upsert: bool,
        #[serde(default)]
        return_document: ReturnDocument,
    },
}

impl Command {
    /// Operation names accepted by [`Command::from_operation`]
    pub const NAMES: &'static [&'static str] = &[
        "insertOne",
        "insertMany",
        "deleteOne",
        "deleteMany",
        "replaceOne",
        "updateOne",
        "updateMany",
        "find",
        "count",
        "countDocuments",
        "estimatedDocumentCount",
        "distinct",
        "aggregate",
        "findOneAndDelete",
        "findOneAndReplace",
        "findOneAndUpdate",
    ];

    /// Parse an operation document (`{"name": .., "arguments": {..}}`).
    ///
    /// A missing `arguments` document is treated as empty. Keys other than
    /// `name` and `arguments` (such as `object`) are ignored.
    pub fn from_operation(operation: &Value) -> Result<Command> {
        let name = operation
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::argument("operation document has no string 'name'"))?;
        if !Self::NAMES.contains(&name) {
            return Err(Error::UnknownOperation {
                name: name.to_string(),
            });
        }
        let arguments = operation
            .get("arguments")
            .map(Value::to_json)
            .unwrap_or_else(|| serde_json::json!({}));
        let envelope = serde_json::json!({ "name": name, "arguments": arguments });
        serde_json::from_value(envelope).map_err(|e| Error::argument(format!("{}: {}", name, e)))
    }

    /// Fixture spelling of this command's name
    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertOne { .. } => "insertOne",
            Command::InsertMany { .. } => "insertMany",
            Command::DeleteOne { .. } => "deleteOne",
            Command::DeleteMany { .. } => "deleteMany",
            Command::ReplaceOne { .. } => "replaceOne",
            Command::UpdateOne { .. } => "updateOne",
            Command::UpdateMany { .. } => "updateMany",
            Command::Find { .. } => "find",
            Command::Count { .. } => "count",
            Command::CountDocuments { .. } => "countDocuments",
            Command::EstimatedDocumentCount {} => "estimatedDocumentCount",
            Command::Distinct { .. } => "distinct",
            Command::Aggregate { .. } => "aggregate",
            Command::FindOneAndDelete { .. } => "findOneAndDelete",
            Command::FindOneAndReplace { .. } => "findOneAndReplace",
            Command::FindOneAndUpdate { .. } => "findOneAndUpdate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudcheck_core::doc;

    #[test]
    fn test_parse_update_one() {
        let cmd = Command::from_operation(&doc!({
            "name": "updateOne",
            "arguments": {"filter": {"_id": 1}, "update": {"$inc": {"x": 1}}, "upsert": true}
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::UpdateOne {
                filter: doc!({"_id": 1}),
                update: doc!({"$inc": {"x": 1}}),
                upsert: true,
            }
        );
        assert_eq!(cmd.name(), "updateOne");
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let cmd = Command::from_operation(&doc!({
            "name": "findOneAndUpdate",
            "arguments": {
                "filter": {"_id": 1},
                "update": {"$set": {"x": 0}},
                "returnDocument": "After"
            }
        }))
        .unwrap();
        match cmd {
            Command::FindOneAndUpdate {
                return_document,
                upsert,
                sort,
                ..
            } => {
                assert_eq!(return_document, ReturnDocument::After);
                assert!(!upsert);
                assert!(sort.is_none());
            }
            other => panic!("Expected FindOneAndUpdate, got {:?}", other),
        }

        let distinct = Command::from_operation(&doc!({
            "name": "distinct",
            "arguments": {"fieldName": "x"}
        }))
        .unwrap();
        assert_eq!(
            distinct,
            Command::Distinct {
                field_name: "x".into(),
                filter: None
            }
        );
    }

    #[test]
    fn test_missing_arguments_defaults_to_empty() {
        let cmd = Command::from_operation(&doc!({"name": "estimatedDocumentCount"})).unwrap();
        assert_eq!(cmd, Command::EstimatedDocumentCount {});
        let find = Command::from_operation(&doc!({"name": "find", "object": "collection"})).unwrap();
        assert!(matches!(find, Command::Find { filter: None, .. }));
    }

    #[test]
    fn test_insert_many_ordered_default_and_override() {
        let ordered = Command::from_operation(&doc!({
            "name": "insertMany",
            "arguments": {"documents": [{"_id": 1}]}
        }))
        .unwrap();
        assert!(matches!(ordered, Command::InsertMany { options, .. } if options.ordered));

        let unordered = Command::from_operation(&doc!({
            "name": "insertMany",
            "arguments": {"documents": [{"_id": 1}], "options": {"ordered": false}}
        }))
        .unwrap();
        assert!(matches!(unordered, Command::InsertMany { options, .. } if !options.ordered));
    }

    #[test]
    fn test_unknown_operation() {
        let err = Command::from_operation(&doc!({"name": "mapReduce", "arguments": {}})).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownOperation {
                name: "mapReduce".into()
            }
        );
    }

    #[test]
    fn test_malformed_arguments() {
        assert!(matches!(
            Command::from_operation(&doc!({"name": "insertOne", "arguments": {}})),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Command::from_operation(&doc!({"arguments": {}})),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_every_name_round_trips() {
        for name in Command::NAMES {
            // Each name is accepted by the parser even when its arguments are wrong.
            let result = Command::from_operation(&doc!({"name": *name, "arguments": {}}));
            match result {
                Ok(cmd) => assert_eq!(cmd.name(), *name),
                Err(e) => assert!(matches!(e, Error::InvalidArgument { .. })),
            }
        }
    }
}
