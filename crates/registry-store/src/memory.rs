//! In-memory repository backed by a concurrent map
//!
//! Writes are last-write-wins; two racing creates for the same key resolve
//! to whichever lands last, which the engine's contract permits.

use dashmap::DashMap;
use registry_lifecycle::{Repository, StoreError};
use registry_model::{SchemaDetails, SchemaKey, SchemaState};
use tracing::debug;

/// Concurrent in-memory store keyed by reference id.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: DashMap<String, SchemaDetails>,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Repository for MemoryRepository {
    fn record_exists(&self, key: &SchemaKey) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(&key.reference_id()))
    }

    fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>, StoreError> {
        Ok(self
            .records
            .get(&key.reference_id())
            .map(|entry| entry.clone()))
    }

    fn create(&self, details: SchemaDetails) -> Result<(), StoreError> {
        debug!("Storing schema {}", details.schema_key);
        self.records
            .insert(details.schema_key.reference_id(), details);
        Ok(())
    }

    fn update(&self, details: SchemaDetails) -> Result<(), StoreError> {
        debug!("Updating schema {}", details.schema_key);
        self.records
            .insert(details.schema_key.reference_id(), details);
        Ok(())
    }

    fn get_schemas(
        &self,
        namespaces: &[String],
        states: &[SchemaState],
    ) -> Result<Vec<SchemaDetails>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| {
                (namespaces.is_empty() || namespaces.contains(&entry.schema_key.namespace))
                    && (states.is_empty() || states.contains(&entry.state))
            })
            .map(|entry| entry.clone())
            .collect())
    }
}
