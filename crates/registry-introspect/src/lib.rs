//! # registry-introspect
//!
//! Type descriptors and the introspector deriving attribute trees from them.
//!
//! Instead of runtime reflection, a type declares its own field layout as a
//! [`TypeDescriptor`], usually through the [`Describe`] trait. The
//! introspector walks those declarations, including inherited ones, and
//! produces the registry's `SchemaAttribute` tree.

pub mod descriptor;
pub mod introspector;
pub mod loader;

pub use descriptor::{Describe, FieldDescriptor, FieldShape, MapEntry, ParentRef, TypeDescriptor};
pub use introspector::{ResolvedField, introspect, resolved_fields, resolved_fields_bound};
pub use loader::{
    load_attributes_from_file, load_attributes_from_json, load_attributes_from_yaml,
    load_descriptor_from_file, load_descriptor_from_json, load_descriptor_from_yaml,
};

use thiserror::Error;

/// Errors that can occur while describing or introspecting types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported type '{type_name}' on field '{field}'")]
    UnsupportedType { type_name: String, field: String },

    #[error("Invalid definition format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code for uniform caller mapping.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            Error::InvalidFormat(_) => "INVALID_FORMAT",
            Error::Io(_) => "IO_FAILURE",
        }
    }

    /// Status paired with the code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Error::UnsupportedType { .. } => 422,
            Error::InvalidFormat(_) => 400,
            Error::Io(_) => 500,
        }
    }
}

/// Crate-local result type for introspection operations.
pub type Result<T> = std::result::Result<T, Error>;
