//! Collection: insertion-ordered document list with `_id` uniqueness
//!
//! Documents keep their natural order (the order they were inserted in),
//! which is the order `find_all` and unsorted queries report them in.
//! Replacing a document keeps its slot.

use crudcheck_core::{Error, Namespace, Result, Value};
use uuid::Uuid;

/// Field holding the primary key of every stored document
pub const ID_FIELD: &str = "_id";

/// Generate a fresh `_id` for a document that arrived without one.
pub fn generate_id() -> Value {
    Value::String(Uuid::new_v4().simple().to_string())
}

/// Make sure `doc` has an `_id`, generating one when absent.
///
/// A generated `_id` is placed first, matching how servers lay documents out.
/// Returns the document's `_id`.
pub fn ensure_id(doc: &mut Value) -> Result<Value> {
    let type_name = doc.type_name();
    let fields = doc
        .as_object_mut()
        .ok_or_else(|| Error::InvalidDocument(format!("expected Object, got {}", type_name)))?;
    if let Some(id) = fields.get(ID_FIELD) {
        return Ok(id.clone());
    }
    let id = generate_id();
    fields.shift_insert(0, ID_FIELD.to_string(), id.clone());
    Ok(id)
}

/// One collection's documents.
#[derive(Debug, Clone)]
pub struct Collection {
    namespace: Namespace,
    documents: Vec<Value>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            documents: Vec::new(),
        }
    }

    /// Name of this collection
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in natural order
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Index of the document whose `_id` equals `id`
    pub fn position_of_id(&self, id: &Value) -> Option<usize> {
        self.documents
            .iter()
            .position(|d| d.get(ID_FIELD) == Some(id))
    }

    /// Insert one document at the end of the collection.
    ///
    /// Fails with `DuplicateKey` when the `_id` is already taken, leaving the
    /// collection untouched.
    pub fn insert(&mut self, mut doc: Value) -> Result<Value> {
        let id = ensure_id(&mut doc)?;
        if self.position_of_id(&id).is_some() {
            return Err(Error::DuplicateKey {
                namespace: self.namespace.to_string(),
                id: id.to_string(),
            });
        }
        self.documents.push(doc);
        Ok(id)
    }

    /// Replace the document at `index`, keeping its slot.
    ///
    /// The replacement must carry an `_id` not used by any other document.
    pub fn replace_at(&mut self, index: usize, mut doc: Value) -> Result<()> {
        let id = ensure_id(&mut doc)?;
        if let Some(other) = self.position_of_id(&id) {
            if other != index {
                return Err(Error::DuplicateKey {
                    namespace: self.namespace.to_string(),
                    id: id.to_string(),
                });
            }
        }
        match self.documents.get_mut(index) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(Error::Internal(format!(
                "replace at {} out of bounds for {} documents",
                index,
                self.documents.len()
            ))),
        }
    }

    /// Remove and return the document at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        (index < self.documents.len()).then(|| self.documents.remove(index))
    }

    /// Remove every document
    pub fn clear(&mut self) {
        self.documents.clear();
    }
}
