//! State seeding before each case.

use tracing::debug;

use crudcheck_core::DocumentStore;

use crate::case::ResolvedCase;

/// Seeding failed; the case cannot run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to seed {namespace}: {reason}")]
pub struct SetupFailure {
    /// Collection being seeded
    pub namespace: String,
    /// Store error message
    pub reason: String,
}

/// Resets and seeds the collections a case touches.
pub struct Seeder<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> Seeder<'a, S> {
    /// Seeder over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Drop the working collection (and the snapshot collection when it
    /// differs), then insert the seed data in order.
    ///
    /// Never retries: the first store error is returned.
    pub fn seed(&self, case: &ResolvedCase) -> Result<(), SetupFailure> {
        let ns = case.namespace();
        let mut targets = vec![ns.clone()];
        if let Some(snapshot) = case.snapshot_namespace() {
            if snapshot != ns {
                targets.push(snapshot);
            }
        }
        for target in &targets {
            self.store.drop_collection(target).map_err(|e| SetupFailure {
                namespace: target.to_string(),
                reason: e.to_string(),
            })?;
        }

        if !case.data.is_empty() {
            self.store
                .insert_many(&ns, case.data.to_vec())
                .map_err(|e| SetupFailure {
                    namespace: ns.to_string(),
                    reason: e.to_string(),
                })?;
        }
        debug!(target: "crudcheck::seed", namespace = %ns, documents = case.data.len(), "Seeded");
        Ok(())
    }
}
