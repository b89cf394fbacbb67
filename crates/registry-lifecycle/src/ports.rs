//! Persistence and version-generation ports consumed by the processors
//!
//! The engine never deletes and never queries beyond what these traits
//! expose. Blocking, retries, and conflict resolution are implementation
//! concerns behind the port.

use registry_model::{SchemaDetails, SchemaKey, SchemaState};
use thiserror::Error;

/// Failure inside a repository implementation.
#[derive(Error, Debug)]
#[error("Repository failure during {operation}: {message}")]
pub struct StoreError {
    /// Operation that failed
    pub operation: String,

    /// Backend-specific description
    pub message: String,
}

impl StoreError {
    /// Build a store error with operation context.
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// The persistence abstraction the engine reads and writes through.
pub trait Repository: Send + Sync {
    /// Whether a record exists for the exact key.
    fn record_exists(&self, key: &SchemaKey) -> Result<bool, StoreError>;

    /// Fetch the record for the exact key.
    fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>, StoreError>;

    /// Persist a new record.
    fn create(&self, details: SchemaDetails) -> Result<(), StoreError>;

    /// Overwrite an existing record.
    fn update(&self, details: SchemaDetails) -> Result<(), StoreError>;

    /// Fetch records filtered by namespace and state.
    ///
    /// An empty namespace list matches every namespace; an empty state list
    /// matches every state.
    fn get_schemas(
        &self,
        namespaces: &[String],
        states: &[SchemaState],
    ) -> Result<Vec<SchemaDetails>, StoreError>;
}

/// Produces opaque version ids, unique per (namespace, schema name).
pub trait VersionIdGenerator: Send + Sync {
    /// Generate the next version id under the given prefix.
    fn generate(&self, prefix: &str) -> String;
}
