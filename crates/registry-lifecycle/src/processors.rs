//! Lifecycle processors, one per event
//!
//! Each processor is a single-threaded read-modify-write against the
//! repository port. Preconditions are checked first; persistence happens
//! only after every precondition holds.

use crate::context::SchemaContext;
use crate::ports::{Repository, VersionIdGenerator};
use crate::{EngineError, Result};
use registry_model::{SchemaDetails, SchemaKey, SchemaMeta, SchemaState};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Prefix every generated version id carries.
pub const VERSION_PREFIX: &str = "V";

/// The four lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaEvent {
    /// Register a new draft version
    Create,

    /// Overwrite a draft version
    Update,

    /// Release a draft version
    Approve,

    /// Withdraw a version
    Reject,
}

impl SchemaEvent {
    /// Canonical event name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SchemaEvent::Create => "CREATE",
            SchemaEvent::Update => "UPDATE",
            SchemaEvent::Approve => "APPROVE",
            SchemaEvent::Reject => "REJECT",
        }
    }

    /// All events, in registration order.
    #[must_use]
    pub fn all() -> [SchemaEvent; 4] {
        [
            SchemaEvent::Create,
            SchemaEvent::Update,
            SchemaEvent::Approve,
            SchemaEvent::Reject,
        ]
    }
}

impl fmt::Display for SchemaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One state transition over schema records.
pub trait LifecycleProcessor: Send + Sync {
    /// The single event this processor is bound to.
    fn event(&self) -> SchemaEvent;

    /// Run the transition for the request held in the context, writing the
    /// resulting record back into the context.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when a required context entry is absent or
    /// a lifecycle precondition fails; nothing is persisted in that case.
    fn process(&self, context: &mut SchemaContext) -> Result<()>;
}

/// Registers a new schema version as a draft.
pub struct CreateProcessor {
    repository: Arc<dyn Repository>,
    version_ids: Arc<dyn VersionIdGenerator>,
}

impl CreateProcessor {
    /// Create the processor from its dependencies.
    pub fn new(repository: Arc<dyn Repository>, version_ids: Arc<dyn VersionIdGenerator>) -> Self {
        Self {
            repository,
            version_ids,
        }
    }
}

impl LifecycleProcessor for CreateProcessor {
    fn event(&self) -> SchemaEvent {
        SchemaEvent::Create
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let user = context.text(crate::context::USER_KEY)?.to_string();
        let email = context.text(crate::context::EMAIL_KEY)?.to_string();
        let request = context.create_request()?.clone();

        let version = self.version_ids.generate(VERSION_PREFIX);
        let key = SchemaKey::new(&request.namespace, &request.schema_name, version);

        if self.repository.record_exists(&key)? {
            return Err(EngineError::SchemaAlreadyExists {
                reference: key.reference_id(),
            });
        }

        // At most one in-flight draft per schema name.
        let drafts = self
            .repository
            .get_schemas(std::slice::from_ref(&request.namespace), &[SchemaState::Created])?;
        if drafts
            .iter()
            .any(|draft| draft.schema_key.schema_name == request.schema_name)
        {
            return Err(EngineError::SchemaAlreadyExists {
                reference: format!("{}.{}", request.namespace, request.schema_name),
            });
        }

        let mut details = SchemaDetails::new(
            key,
            request.description,
            request.schema_type,
            request.validation_type,
            request.attributes,
            SchemaMeta::new(&user, &email),
        )
        .map_err(|error| EngineError::InvalidRequest {
            message: error.to_string(),
        })?;
        details.transformation_targets = request.transformation_targets;
        details.change_log = request.change_log;
        details.record("SchemaCreated", &user);

        self.repository.create(details.clone())?;
        info!("Created schema {}", details.schema_key);

        context.put_details(details);
        Ok(())
    }
}

/// Overwrites a draft version in place.
pub struct UpdateProcessor {
    repository: Arc<dyn Repository>,
}

impl UpdateProcessor {
    /// Create the processor from its dependency.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

impl LifecycleProcessor for UpdateProcessor {
    fn event(&self) -> SchemaEvent {
        SchemaEvent::Update
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let user = context.text(crate::context::USER_KEY)?.to_string();
        let email = context.text(crate::context::EMAIL_KEY)?.to_string();
        let request = context.update_request()?.clone();

        let key = request.schema_key();
        let mut details = self
            .repository
            .get(&key)?
            .filter(|existing| existing.state == SchemaState::Created)
            .ok_or_else(|| EngineError::NoSchemaFound {
                reference: key.reference_id(),
            })?;

        if request.attributes.is_empty() {
            return Err(EngineError::InvalidRequest {
                message: format!("Schema '{}' must declare at least one attribute", key),
            });
        }

        details.description = request.description;
        details.schema_type = request.schema_type;
        details.validation_type = request.validation_type;
        details.attributes = request.attributes;
        details.transformation_targets = request.transformation_targets;
        details.change_log = request.change_log;
        details.meta.touch(&user, &email);
        details.record("SchemaUpdated", &user);

        self.repository.update(details.clone())?;
        info!("Updated schema {}", details.schema_key);

        context.put_details(details);
        Ok(())
    }
}

/// Releases a draft version to consumers.
pub struct ApproveProcessor {
    repository: Arc<dyn Repository>,
}

impl ApproveProcessor {
    /// Create the processor from its dependency.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

impl LifecycleProcessor for ApproveProcessor {
    fn event(&self) -> SchemaEvent {
        SchemaEvent::Approve
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let user = context.text(crate::context::USER_KEY)?.to_string();
        let email = context.text(crate::context::EMAIL_KEY)?.to_string();
        let request = context.approve_request()?.clone();

        let key = request.schema_key();
        let mut details = self
            .repository
            .get(&key)?
            .filter(|existing| existing.state == SchemaState::Created)
            .ok_or_else(|| EngineError::NoSchemaFound {
                reference: key.reference_id(),
            })?;

        details.state = SchemaState::Approved;
        details.meta.touch(&user, &email);
        details.record("SchemaApproved", &user);

        self.repository.update(details.clone())?;
        info!("Approved schema {}", details.schema_key);

        context.put_details(details);
        Ok(())
    }
}

/// Withdraws a draft or released version.
pub struct RejectProcessor {
    repository: Arc<dyn Repository>,
}

impl RejectProcessor {
    /// Create the processor from its dependency.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

impl LifecycleProcessor for RejectProcessor {
    fn event(&self) -> SchemaEvent {
        SchemaEvent::Reject
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let user = context.text(crate::context::USER_KEY)?.to_string();
        let email = context.text(crate::context::EMAIL_KEY)?.to_string();
        let request = context.reject_request()?.clone();

        let key = request.schema_key();
        let mut details = self
            .repository
            .get(&key)?
            .filter(|existing| {
                matches!(
                    existing.state,
                    SchemaState::Created | SchemaState::Approved
                )
            })
            .ok_or_else(|| EngineError::NoSchemaFound {
                reference: key.reference_id(),
            })?;

        details.state = SchemaState::Rejected;
        details.meta.touch(&user, &email);
        details.record("SchemaRejected", &user);

        self.repository.update(details.clone())?;
        info!("Rejected schema {}", details.schema_key);

        context.put_details(details);
        Ok(())
    }
}
