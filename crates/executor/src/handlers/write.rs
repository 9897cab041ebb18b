//! Write command handlers.
//!
//! Every handler takes the collection's write lock once and performs the
//! whole command under it.

use crudcheck_core::{Namespace, Value};
use crudcheck_storage::MemoryStore;

use super::{project_opt, select};
use crate::command::{InsertManyOptions, ReturnDocument};
use crate::update::{
    apply_replacement, apply_update, upsert_seed, validate_replacement, validate_update,
};
use crate::{Error, Output, Result};

// =============================================================================
// Insert
// =============================================================================

/// Handle InsertOne command.
pub fn insert_one(store: &MemoryStore, ns: &Namespace, document: Value) -> Result<Output> {
    let handle = store.collection(ns);
    let id = handle.write().insert(document)?;
    Ok(Output::InsertedId(id))
}

/// Handle InsertMany command.
///
/// Ordered inserts stop at the first failure; unordered inserts attempt
/// every document and then report the first failure. Documents inserted
/// before a failure stay inserted.
pub fn insert_many(
    store: &MemoryStore,
    ns: &Namespace,
    documents: Vec<Value>,
    options: InsertManyOptions,
) -> Result<Output> {
    if documents.is_empty() {
        return Err(Error::argument("insertMany needs at least one document"));
    }
    let handle = store.collection(ns);
    let mut collection = handle.write();
    let mut ids = Vec::with_capacity(documents.len());
    let mut first_error = None;
    for doc in documents {
        match collection.insert(doc) {
            Ok(id) => ids.push(id),
            Err(e) if options.ordered => return Err(e.into()),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(Output::InsertedIds(ids)),
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Handle DeleteOne / DeleteMany commands.
pub fn delete(store: &MemoryStore, ns: &Namespace, filter: Value, many: bool) -> Result<Output> {
    let handle = store.collection(ns);
    let mut collection = handle.write();
    let mut targets = select(collection.documents(), &filter, None)?;
    if !many {
        targets.truncate(1);
    }
    // Remove from the back so earlier indices stay valid.
    for index in targets.iter().rev() {
        collection.remove_at(*index);
    }
    Ok(Output::Deleted(targets.len() as u64))
}

// =============================================================================
// Update / Replace
// =============================================================================

/// How a matched document is rewritten.
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    /// Operator update document
    Update(&'a Value),
    /// Full replacement document
    Replace(&'a Value),
}

impl Change<'_> {
    fn validate(&self) -> Result<()> {
        match self {
            Change::Update(u) => validate_update(u).map(|_| ()),
            Change::Replace(r) => validate_replacement(r).map(|_| ()),
        }
    }

    fn apply(&self, doc: &Value) -> Result<Value> {
        match self {
            Change::Update(u) => apply_update(doc, u),
            Change::Replace(r) => apply_replacement(doc, r),
        }
    }
}

/// Handle UpdateOne / UpdateMany / ReplaceOne commands.
pub fn update(
    store: &MemoryStore,
    ns: &Namespace,
    filter: Value,
    change: Change<'_>,
    upsert: bool,
    many: bool,
) -> Result<Output> {
    change.validate()?;
    let handle = store.collection(ns);
    let mut collection = handle.write();
    let mut targets = select(collection.documents(), &filter, None)?;
    if !many {
        targets.truncate(1);
    }

    if targets.is_empty() && upsert {
        let doc = change.apply(&upsert_seed(&filter)?)?;
        let id = collection.insert(doc)?;
        return Ok(Output::Updated {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        });
    }

    let mut modified = 0;
    for index in &targets {
        let current = &collection.documents()[*index];
        let next = change.apply(current)?;
        if next != *current {
            collection.replace_at(*index, next)?;
            modified += 1;
        }
    }
    Ok(Output::Updated {
        matched: targets.len() as u64,
        modified,
        upserted_id: None,
    })
}

// =============================================================================
// FindOneAnd*
// =============================================================================

/// Arguments shared by findOneAndReplace and findOneAndUpdate.
#[derive(Debug, Clone, Copy)]
pub struct FindAndModify<'a> {
    /// Which document to modify
    pub filter: &'a Value,
    /// Rewrite to apply
    pub change: Change<'a>,
    /// Picks the first match when several documents match
    pub sort: Option<&'a Value>,
    /// Projection applied to the returned document
    pub projection: Option<&'a Value>,
    /// Insert when nothing matches
    pub upsert: bool,
    /// Return the document before or after modification
    pub return_document: ReturnDocument,
}

/// Handle FindOneAndDelete command.
pub fn find_one_and_delete(
    store: &MemoryStore,
    ns: &Namespace,
    filter: Value,
    sort: Option<Value>,
    projection: Option<Value>,
) -> Result<Output> {
    let handle = store.collection(ns);
    let mut collection = handle.write();
    let first = select(collection.documents(), &filter, sort.as_ref())?
        .into_iter()
        .next();
    let removed = first.and_then(|index| collection.remove_at(index));
    let returned = removed
        .map(|doc| project_opt(doc, projection.as_ref()))
        .transpose()?;
    Ok(Output::Document(returned))
}

/// Handle FindOneAndReplace / FindOneAndUpdate commands.
pub fn find_one_and_modify(
    store: &MemoryStore,
    ns: &Namespace,
    args: FindAndModify<'_>,
) -> Result<Output> {
    args.change.validate()?;
    let handle = store.collection(ns);
    let mut collection = handle.write();
    let first = select(collection.documents(), args.filter, args.sort)?
        .into_iter()
        .next();

    let returned = match first {
        Some(index) => {
            let before = collection.documents()[index].clone();
            let after = args.change.apply(&before)?;
            if after != before {
                collection.replace_at(index, after.clone())?;
            }
            Some(match args.return_document {
                ReturnDocument::Before => before,
                ReturnDocument::After => after,
            })
        }
        None if args.upsert => {
            let doc = args.change.apply(&upsert_seed(args.filter)?)?;
            let id = collection.insert(doc)?;
            match args.return_document {
                ReturnDocument::Before => None,
                ReturnDocument::After => collection
                    .position_of_id(&id)
                    .map(|index| collection.documents()[index].clone()),
            }
        }
        None => None,
    };

    let returned = returned
        .map(|doc| project_opt(doc, args.projection))
        .transpose()?;
    Ok(Output::Document(returned))
}
