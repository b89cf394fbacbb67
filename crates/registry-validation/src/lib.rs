#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # registry-validation
//!
//! Dual-mode validation against registered attribute sets.
//!
//! Both algorithms share one recursive-descent core. Structural validation
//! checks that a described type stays shape-compatible with an attribute
//! set; payload validation checks an untyped JSON document against one.
//! Mismatches accumulate as violation records; errors are reserved for
//! engine-usage bugs.
//!
//! ## Example Usage
//!
//! ```rust
//! use registry_model::{SchemaAttribute, ValidationType};
//! use registry_validation::ValidationEngine;
//!
//! let attributes = [
//!     SchemaAttribute::string("name").required(),
//!     SchemaAttribute::integer("age"),
//! ]
//! .into();
//!
//! let engine = ValidationEngine::new();
//! let document = serde_json::json!({"name": "x"});
//!
//! let messages = engine.validate_payload(&document, ValidationType::Strict, &attributes);
//! assert!(messages.is_empty());
//! ```

pub mod engine;
pub mod rules;

// Re-export main types
pub use engine::{ValidationEngine, Violation};
pub use rules::{found_tag, key_matches, scalar_assignable, value_matches};

use registry_introspect::TypeDescriptor;
use registry_model::{SchemaAttribute, ValidationType};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur around validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema does not match its declared type '{root_type}' ({} violations)", violations.len())]
    InvalidSchema {
        root_type: String,
        violations: Vec<Violation>,
    },
}

impl Error {
    /// Stable machine-readable code for uniform caller mapping.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidSchema { .. } => "INVALID_SCHEMA",
        }
    }

    /// Status paired with the code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidSchema { .. } => 422,
        }
    }
}

/// Crate-local result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to structurally validate with a fresh engine.
#[must_use]
pub fn validate_against_type(
    attributes: &BTreeSet<SchemaAttribute>,
    mode: ValidationType,
    descriptor: &TypeDescriptor,
) -> Vec<Violation> {
    ValidationEngine::new().validate_against_type(attributes, mode, descriptor)
}

/// Convenience function to validate a payload with a fresh engine.
#[must_use]
pub fn validate_payload(
    document: &serde_json::Value,
    mode: ValidationType,
    attributes: &BTreeSet<SchemaAttribute>,
) -> Vec<String> {
    ValidationEngine::new().validate_payload(document, mode, attributes)
}

/// Assert at startup that a registered attribute set still matches its
/// declared type.
///
/// # Errors
///
/// Returns [`Error::InvalidSchema`] carrying the accumulated violations when
/// the attribute set fails self-validation.
pub fn ensure_self_valid(
    attributes: &BTreeSet<SchemaAttribute>,
    mode: ValidationType,
    descriptor: &TypeDescriptor,
) -> Result<()> {
    let violations = validate_against_type(attributes, mode, descriptor);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidSchema {
            root_type: descriptor.name.clone(),
            violations,
        })
    }
}
