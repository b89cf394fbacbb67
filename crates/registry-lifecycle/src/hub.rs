//! Fixed registry mapping each lifecycle event to its processor
//!
//! Built once from explicit dependencies; lookup afterwards is a pure map
//! read. No ambient or static mutable state.

use crate::context::SchemaContext;
use crate::ports::{Repository, VersionIdGenerator};
use crate::processors::{
    ApproveProcessor, CreateProcessor, LifecycleProcessor, RejectProcessor, SchemaEvent,
    UpdateProcessor,
};
use crate::{EngineError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Event-to-processor registry for one engine instance.
pub struct ProcessorHub {
    processors: HashMap<SchemaEvent, Box<dyn LifecycleProcessor>>,
}

impl ProcessorHub {
    /// Start building a hub.
    #[must_use]
    pub fn builder() -> ProcessorHubBuilder {
        ProcessorHubBuilder::default()
    }

    /// Look up the processor bound to an event.
    #[must_use]
    pub fn processor(&self, event: SchemaEvent) -> Option<&dyn LifecycleProcessor> {
        self.processors.get(&event).map(|processor| processor.as_ref())
    }

    /// Run the processor bound to an event against the given context.
    ///
    /// # Errors
    ///
    /// Propagates the processor's [`EngineError`].
    pub fn process(&self, event: SchemaEvent, context: &mut SchemaContext) -> Result<()> {
        let processor = self
            .processor(event)
            .ok_or_else(|| EngineError::ValueNotFound {
                key: event.name().to_string(),
            })?;
        processor.process(context)
    }
}

/// Builder collecting the hub's two dependencies.
///
/// `build` fails fast when either accessor is absent.
#[derive(Default)]
pub struct ProcessorHubBuilder {
    repository: Option<Arc<dyn Repository>>,
    version_ids: Option<Arc<dyn VersionIdGenerator>>,
}

impl ProcessorHubBuilder {
    /// Supply the repository accessor.
    #[must_use]
    pub fn repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Supply the version-generator accessor.
    #[must_use]
    pub fn version_ids(mut self, version_ids: Arc<dyn VersionIdGenerator>) -> Self {
        self.version_ids = Some(version_ids);
        self
    }

    /// Build the hub, registering one processor per event.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ValueNotFound`] when the repository or the
    /// version generator was not supplied.
    pub fn build(self) -> Result<ProcessorHub> {
        let repository = self.repository.ok_or_else(|| EngineError::ValueNotFound {
            key: "repository".to_string(),
        })?;
        let version_ids = self.version_ids.ok_or_else(|| EngineError::ValueNotFound {
            key: "version generator".to_string(),
        })?;

        let mut processors: HashMap<SchemaEvent, Box<dyn LifecycleProcessor>> = HashMap::new();
        processors.insert(
            SchemaEvent::Create,
            Box::new(CreateProcessor::new(repository.clone(), version_ids)),
        );
        processors.insert(
            SchemaEvent::Update,
            Box::new(UpdateProcessor::new(repository.clone())),
        );
        processors.insert(
            SchemaEvent::Approve,
            Box::new(ApproveProcessor::new(repository.clone())),
        );
        processors.insert(
            SchemaEvent::Reject,
            Box::new(RejectProcessor::new(repository)),
        );

        Ok(ProcessorHub { processors })
    }
}
