//! Cache-aware read path for approved schemas
//!
//! Validators resolve schemas through this retriever rather than the
//! repository. The cache refreshes on a fixed interval; between refreshes
//! callers may be served a stale approved schema, and the engine issues no
//! invalidation signal.

use dashmap::DashMap;
use registry_lifecycle::{Repository, StoreError};
use registry_model::{SchemaDetails, SchemaKey, SchemaState};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Interval-refresh cache over the repository's approved schemas.
pub struct CachedSchemaRetriever {
    repository: Arc<dyn Repository>,
    namespaces: Vec<String>,
    refresh_interval: Duration,
    cache: DashMap<String, SchemaDetails>,
    last_refresh: Mutex<Option<Instant>>,
}

impl CachedSchemaRetriever {
    /// Create a retriever over the given namespaces.
    ///
    /// An empty namespace list watches every namespace.
    pub fn new(
        repository: Arc<dyn Repository>,
        namespaces: Vec<String>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            repository,
            namespaces,
            refresh_interval,
            cache: DashMap::new(),
            last_refresh: Mutex::new(None),
        }
    }

    /// Resolve an approved schema, serving from the cache.
    ///
    /// # Errors
    ///
    /// Propagates repository failures from a due refresh.
    pub fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>, StoreError> {
        self.refresh_if_due()?;
        Ok(self.cache.get(&key.reference_id()).map(|entry| entry.clone()))
    }

    /// Number of schemas currently cached.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Reload the cache from the repository immediately.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn refresh(&self) -> Result<(), StoreError> {
        let approved = self
            .repository
            .get_schemas(&self.namespaces, &[SchemaState::Approved])?;
        debug!("Refreshing schema cache with {} records", approved.len());

        self.cache.clear();
        for details in approved {
            self.cache
                .insert(details.schema_key.reference_id(), details);
        }

        let mut last_refresh = self
            .last_refresh
            .lock()
            .map_err(|_| StoreError::new("refresh", "cache refresh clock poisoned"))?;
        *last_refresh = Some(Instant::now());
        Ok(())
    }

    fn refresh_if_due(&self) -> Result<(), StoreError> {
        let due = {
            let last_refresh = self
                .last_refresh
                .lock()
                .map_err(|_| StoreError::new("refresh", "cache refresh clock poisoned"))?;
            match *last_refresh {
                None => true,
                Some(at) => at.elapsed() >= self.refresh_interval,
            }
        };

        if due {
            self.refresh()?;
        }
        Ok(())
    }
}
