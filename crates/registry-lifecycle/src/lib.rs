#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # registry-lifecycle
//!
//! Lifecycle state machine over schema versions.
//!
//! Each operation (CREATE, UPDATE, APPROVE, REJECT) is one processor bound to
//! exactly one event, reading its request from a [`SchemaContext`] and
//! persisting through the [`Repository`] port. Writes happen only after all
//! preconditions hold; every precondition failure is a typed [`EngineError`]
//! carrying a stable code and status.

pub mod context;
pub mod hub;
pub mod ports;
pub mod processors;
pub mod requests;

pub use context::{
    ContextValue, DETAILS_KEY, EMAIL_KEY, SchemaContext, USER_KEY,
};
pub use hub::{ProcessorHub, ProcessorHubBuilder};
pub use ports::{Repository, StoreError, VersionIdGenerator};
pub use processors::{
    ApproveProcessor, CreateProcessor, LifecycleProcessor, RejectProcessor, SchemaEvent,
    UpdateProcessor, VERSION_PREFIX,
};
pub use requests::{
    ApproveSchemaRequest, CreateSchemaRequest, RejectSchemaRequest, UpdateSchemaRequest,
};

use thiserror::Error;

/// Typed engine errors raised on precondition failures and usage bugs
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Value not found in context: {key}")]
    ValueNotFound { key: String },

    #[error("Schema already exists: {reference}")]
    SchemaAlreadyExists { reference: String },

    #[error("No schema found: {reference}")]
    NoSchemaFound { reference: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Stable machine-readable code for uniform caller mapping.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ValueNotFound { .. } => "VALUE_NOT_FOUND",
            EngineError::SchemaAlreadyExists { .. } => "SCHEMA_ALREADY_EXISTS",
            EngineError::NoSchemaFound { .. } => "NO_SCHEMA_FOUND",
            EngineError::InvalidRequest { .. } => "INVALID_REQUEST",
            EngineError::Store(_) => "STORAGE_FAILURE",
        }
    }

    /// Status paired with the code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            EngineError::ValueNotFound { .. } | EngineError::InvalidRequest { .. } => 400,
            EngineError::SchemaAlreadyExists { .. } => 409,
            EngineError::NoSchemaFound { .. } => 404,
            EngineError::Store(_) => 500,
        }
    }
}

/// Crate-local result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, EngineError>;
