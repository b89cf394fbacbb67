//! # registry-store
//!
//! Store-side collaborators of the schema registry engine: an in-memory
//! repository, a process-local version generator, and the interval-refresh
//! read path that serves approved schemas to validators.
//!
//! The engine only sees the ports from `registry-lifecycle`; everything
//! here stays behind them.

#[cfg(feature = "memory")]
pub mod memory;
pub mod retriever;
pub mod version;

#[cfg(feature = "memory")]
pub use memory::MemoryRepository;
pub use retriever::CachedSchemaRetriever;
pub use version::CounterVersionIds;
