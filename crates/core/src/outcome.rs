//! Outcome of a dispatched operation

use serde::{Deserialize, Serialize};

use crate::value::{Document, Value};

/// What an operation produced: a result value, an error flag, or both.
///
/// Error presence does not imply absence of a result; a partially applied
/// bulk write may report both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outcome {
    /// The operation failed
    #[serde(default)]
    pub error: bool,
    /// Value returned by the operation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Outcome {
    /// Successful outcome carrying `result`
    pub fn success(result: Value) -> Self {
        Self {
            error: false,
            result: Some(result),
        }
    }

    /// Failed outcome with no result
    pub fn failure() -> Self {
        Self {
            error: true,
            result: None,
        }
    }

    /// Render as an outcome document (`{"error": .., "result": ..}`)
    pub fn to_document(&self) -> Value {
        let mut doc = Document::new();
        doc.insert("error".to_string(), Value::Bool(self.error));
        if let Some(result) = &self.result {
            doc.insert("result".to_string(), result.clone());
        }
        Value::Object(doc)
    }
}
