//! Lifecycle record, state, and audit metadata for one schema version

use crate::attribute::SchemaAttribute;
use crate::key::SchemaKey;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle state of a schema version.
///
/// Transitions are monotonic per version: CREATED may move to APPROVED or
/// REJECTED, and both of those are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaState {
    /// Draft, still editable
    Created,

    /// Released for consumers; terminal
    Approved,

    /// Withdrawn; terminal
    Rejected,
}

impl SchemaState {
    /// Whether no further transition is permitted from this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        match self {
            SchemaState::Created => false,
            SchemaState::Approved | SchemaState::Rejected => true,
        }
    }
}

/// How strictly payloads and types are checked against an attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationType {
    /// Undeclared extra fields are violations
    Strict,

    /// Undeclared extra fields are tolerated
    #[default]
    Matching,
}

/// Creator and updater identity plus timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMeta {
    /// Actor that created this version
    pub created_by: String,

    /// Email of the creating actor
    pub created_by_email: String,

    /// Actor of the most recent change
    pub updated_by: String,

    /// Email of the most recent actor
    pub updated_by_email: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent change
    pub updated_at: DateTime<Utc>,
}

impl SchemaMeta {
    /// Create metadata for a freshly created version.
    pub fn new(actor: impl Into<String>, email: impl Into<String>) -> Self {
        let actor = actor.into();
        let email = email.into();
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            created_by_email: email.clone(),
            updated_by: actor,
            updated_by_email: email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a new updater.
    pub fn touch(&mut self, actor: impl Into<String>, email: impl Into<String>) {
        self.updated_by = actor.into();
        self.updated_by_email = email.into();
        self.updated_at = Utc::now();
    }
}

/// One append-only audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Lifecycle event name
    pub event: String,

    /// When the event happened
    pub timestamp: DateTime<Utc>,

    /// Actor that caused the event
    pub actor: String,
}

/// The full registry record for one schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDetails {
    /// Identity of this version
    pub schema_key: SchemaKey,

    /// Human-readable description
    pub description: String,

    /// Lifecycle state
    pub state: SchemaState,

    /// Serialization family of checked payloads (e.g. "JSON", "AVRO")
    pub schema_type: String,

    /// Strictness applied when validating against this schema
    pub validation_type: ValidationType,

    /// Creator/updater identity and timestamps
    pub meta: SchemaMeta,

    /// Append-only audit trail
    pub history: Vec<HistoryEntry>,

    /// Declared attribute set; never empty
    pub attributes: BTreeSet<SchemaAttribute>,

    /// Downstream systems this schema is transformed for
    #[serde(default)]
    pub transformation_targets: Vec<String>,

    /// Free-form note describing the latest change
    #[serde(default)]
    pub change_log: Option<String>,
}

impl SchemaDetails {
    /// Create a new record in the CREATED state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAttributes`] when the attribute set is empty.
    pub fn new(
        schema_key: SchemaKey,
        description: impl Into<String>,
        schema_type: impl Into<String>,
        validation_type: ValidationType,
        attributes: BTreeSet<SchemaAttribute>,
        meta: SchemaMeta,
    ) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::EmptyAttributes {
                reference: schema_key.reference_id(),
            });
        }

        Ok(Self {
            schema_key,
            description: description.into(),
            state: SchemaState::Created,
            schema_type: schema_type.into(),
            validation_type,
            meta,
            history: Vec::new(),
            attributes,
            transformation_targets: Vec::new(),
            change_log: None,
        })
    }

    /// Append an audit entry.
    pub fn record(&mut self, event: impl Into<String>, actor: impl Into<String>) {
        self.history.push(HistoryEntry {
            event: event.into(),
            timestamp: Utc::now(),
            actor: actor.into(),
        });
    }
}
