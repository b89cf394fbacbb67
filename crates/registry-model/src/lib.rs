#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # registry-model
//!
//! Attribute model, schema identity, and lifecycle record types for the
//! schema registry.
//!
//! This crate provides the recursive attribute tree (`SchemaAttribute`) that
//! describes one field's declared shape, the `SchemaKey` identity of a schema
//! version, and the `SchemaDetails` record the lifecycle state machine reads
//! and writes. The serialized form of every type here is part of the
//! registry's interop surface and must stay stable.

/// Recursive attribute tree and data-handling qualifiers.
pub mod attribute;
/// Lifecycle record, state, and audit metadata types.
pub mod details;
/// Schema version identity and its canonical string form.
pub mod key;

/// Attribute primitives for shape description and qualifiers.
pub use attribute::{AttributeKind, Qualifier, SchemaAttribute};
/// Lifecycle record types and state enums.
pub use details::{HistoryEntry, SchemaDetails, SchemaMeta, SchemaState, ValidationType};
/// Schema version identity.
pub use key::SchemaKey;

use thiserror::Error;

/// Errors that can occur when constructing or checking model types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid attribute name '{name}': must match [A-Za-z0-9]*")]
    InvalidName { name: String },

    #[error("Map attribute '{name}' must carry key and value together")]
    LopsidedMap { name: String },

    #[error("Schema '{reference}' must declare at least one attribute")]
    EmptyAttributes { reference: String },
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
