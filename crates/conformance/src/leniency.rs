//! Result normalizations applied before the equality check.
//!
//! Each leniency bridges a gap between what fixtures spell out and what a
//! real implementation reports. They only touch object-shaped results, and
//! each can be switched off in [`LeniencyConfig`](crate::LeniencyConfig).

use serde::Serialize;

use crudcheck_core::Value;

const UPSERTED_COUNT: &str = "upsertedCount";
const INSERTED_IDS: &str = "insertedIds";

/// A named result normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leniency {
    /// An expected result without `upsertedCount` accepts an actual zero.
    UpsertedCountDefault,
    /// An expected result without `insertedIds` ignores the actual one.
    IgnoreInsertedIds,
}

impl Leniency {
    /// Every leniency, in application order
    pub const ALL: [Leniency; 2] = [Leniency::UpsertedCountDefault, Leniency::IgnoreInsertedIds];

    /// Config spelling
    pub fn name(self) -> &'static str {
        match self {
            Leniency::UpsertedCountDefault => "upserted_count",
            Leniency::IgnoreInsertedIds => "inserted_ids",
        }
    }

    /// Normalize `expected` and `actual` in place.
    pub fn apply(self, expected: &mut Value, actual: &mut Value) {
        match self {
            Leniency::UpsertedCountDefault => {
                let zero = actual
                    .get(UPSERTED_COUNT)
                    .filter(|count| count.is_zero())
                    .cloned();
                if let (Some(zero), Some(fields)) = (zero, expected.as_object_mut()) {
                    if !fields.contains_key(UPSERTED_COUNT) {
                        fields.insert(UPSERTED_COUNT.to_string(), zero);
                    }
                }
            }
            Leniency::IgnoreInsertedIds => {
                let expects_ids = match expected.as_object() {
                    Some(fields) => fields.contains_key(INSERTED_IDS),
                    None => return,
                };
                if !expects_ids {
                    if let Some(fields) = actual.as_object_mut() {
                        fields.shift_remove(INSERTED_IDS);
                    }
                }
            }
        }
    }
}

/// Apply `leniencies` in order.
pub fn normalize(leniencies: &[Leniency], expected: &mut Value, actual: &mut Value) {
    for leniency in leniencies {
        leniency.apply(expected, actual);
    }
}
