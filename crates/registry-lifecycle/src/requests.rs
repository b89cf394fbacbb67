//! Request payloads read from the context by the lifecycle processors

use registry_model::{SchemaAttribute, SchemaKey, ValidationType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Register a new schema version.
///
/// The version itself is generator-assigned; callers only name the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSchemaRequest {
    /// Owning namespace
    pub namespace: String,

    /// Schema name within the namespace
    pub schema_name: String,

    /// Human-readable description
    pub description: String,

    /// Serialization family of checked payloads
    pub schema_type: String,

    /// Strictness applied when validating against this schema
    #[serde(default)]
    pub validation_type: ValidationType,

    /// Declared attribute set
    pub attributes: BTreeSet<SchemaAttribute>,

    /// Downstream systems this schema is transformed for
    #[serde(default)]
    pub transformation_targets: Vec<String>,

    /// Free-form note describing the change
    #[serde(default)]
    pub change_log: Option<String>,
}

/// Overwrite a draft schema version in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSchemaRequest {
    /// Owning namespace
    pub namespace: String,

    /// Schema name within the namespace
    pub schema_name: String,

    /// Version to update; must still be a draft
    pub version: String,

    /// Replacement description
    pub description: String,

    /// Replacement serialization family
    pub schema_type: String,

    /// Replacement strictness
    #[serde(default)]
    pub validation_type: ValidationType,

    /// Replacement attribute set
    pub attributes: BTreeSet<SchemaAttribute>,

    /// Replacement transformation targets
    #[serde(default)]
    pub transformation_targets: Vec<String>,

    /// Free-form note describing the change
    #[serde(default)]
    pub change_log: Option<String>,
}

impl UpdateSchemaRequest {
    /// The key this update targets.
    #[must_use]
    pub fn schema_key(&self) -> SchemaKey {
        SchemaKey::new(&self.namespace, &self.schema_name, &self.version)
    }
}

/// Release a draft schema version to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveSchemaRequest {
    /// Owning namespace
    pub namespace: String,

    /// Schema name within the namespace
    pub schema_name: String,

    /// Version to approve
    pub version: String,
}

impl ApproveSchemaRequest {
    /// The key this approval targets.
    #[must_use]
    pub fn schema_key(&self) -> SchemaKey {
        SchemaKey::new(&self.namespace, &self.schema_name, &self.version)
    }
}

/// Withdraw a schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectSchemaRequest {
    /// Owning namespace
    pub namespace: String,

    /// Schema name within the namespace
    pub schema_name: String,

    /// Version to reject
    pub version: String,
}

impl RejectSchemaRequest {
    /// The key this rejection targets.
    #[must_use]
    pub fn schema_key(&self) -> SchemaKey {
        SchemaKey::new(&self.namespace, &self.schema_name, &self.version)
    }
}
