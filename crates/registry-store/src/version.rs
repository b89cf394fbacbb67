//! Process-local version id generation

use registry_lifecycle::VersionIdGenerator;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter-based generator.
///
/// Output is unique within the process; a deployment sharing one store
/// across processes needs a generator backed by that store instead.
#[derive(Debug, Default)]
pub struct CounterVersionIds {
    counter: AtomicU64,
}

impl CounterVersionIds {
    /// Create a generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator continuing from a known high-water mark.
    #[must_use]
    pub fn starting_after(last_issued: u64) -> Self {
        Self {
            counter: AtomicU64::new(last_issued),
        }
    }
}

impl VersionIdGenerator for CounterVersionIds {
    fn generate(&self, prefix: &str) -> String {
        let next = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}{next}")
    }
}
