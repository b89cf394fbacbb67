//! Explicit type descriptions consumed by the introspector
//!
//! A `TypeDescriptor` is the declared-field view of one concrete data type:
//! what a compiler or reflection layer would report, written down explicitly.
//! Descriptors nest through composite field shapes and chain through
//! parameterized supertype references.

use registry_model::Qualifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The declared shape of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldShape {
    /// True or false
    Bool,

    /// 16-bit integral number
    I16,

    /// 32-bit integral number
    I32,

    /// 64-bit integral number
    I64,

    /// 32-bit floating point number
    F32,

    /// 64-bit floating point number
    F64,

    /// Single character
    Char,

    /// Unicode text
    Text,

    /// Opaque byte string
    Bytes,

    /// Calendar date or timestamp
    Date,

    /// Enumerated type with named values
    Enum {
        /// Declaring type name
        name: String,

        /// Declared value names
        values: BTreeSet<String>,
    },

    /// Sequence-like container (list, set)
    Sequence {
        /// Element shape; absent models a raw, unparameterized container
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<Box<FieldShape>>,
    },

    /// Map-like container
    Mapping {
        /// Key and value shapes; absent models a raw container
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entry: Option<Box<MapEntry>>,
    },

    /// Another described composite type, possibly parameterized
    Composite {
        /// The composite's own descriptor
        descriptor: Box<TypeDescriptor>,

        /// Type arguments bound at the use site
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<FieldShape>,
    },

    /// The universal type that accepts any shape
    Any,

    /// A type parameter of the declaring type, resolved per hierarchy
    Param {
        /// Parameter name as declared
        name: String,
    },

    /// A shape the registry cannot model (functions, streams, handles)
    Opaque {
        /// Name of the offending type, reported in errors
        type_name: String,
    },
}

/// Key and value shapes of a parameterized map-like container.
///
/// Keeping both in one struct makes a half-parameterized mapping
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Key shape
    pub key: FieldShape,

    /// Value shape
    pub value: FieldShape,
}

impl FieldShape {
    /// A parameterized sequence.
    #[must_use]
    pub fn sequence(element: FieldShape) -> Self {
        Self::Sequence {
            element: Some(Box::new(element)),
        }
    }

    /// A raw, unparameterized sequence.
    #[must_use]
    pub fn raw_sequence() -> Self {
        Self::Sequence { element: None }
    }

    /// A parameterized mapping.
    #[must_use]
    pub fn mapping(key: FieldShape, value: FieldShape) -> Self {
        Self::Mapping {
            entry: Some(Box::new(MapEntry { key, value })),
        }
    }

    /// A raw, unparameterized mapping.
    #[must_use]
    pub fn raw_mapping() -> Self {
        Self::Mapping { entry: None }
    }

    /// An enumerated shape with its declared value names.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A composite shape with type arguments.
    #[must_use]
    pub fn composite(descriptor: TypeDescriptor, arguments: Vec<FieldShape>) -> Self {
        Self::Composite {
            descriptor: Box::new(descriptor),
            arguments,
        }
    }

    /// A reference to a type parameter of the declaring type.
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param { name: name.into() }
    }

    /// A shape the registry cannot model.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: type_name.into(),
        }
    }

    /// Short human-readable name used in violation messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            FieldShape::Bool => "bool".to_string(),
            FieldShape::I16 => "i16".to_string(),
            FieldShape::I32 => "i32".to_string(),
            FieldShape::I64 => "i64".to_string(),
            FieldShape::F32 => "f32".to_string(),
            FieldShape::F64 => "f64".to_string(),
            FieldShape::Char => "char".to_string(),
            FieldShape::Text => "text".to_string(),
            FieldShape::Bytes => "bytes".to_string(),
            FieldShape::Date => "date".to_string(),
            FieldShape::Enum { name, .. } => format!("enum {name}"),
            FieldShape::Sequence { element: None } => "raw sequence".to_string(),
            FieldShape::Sequence { element: Some(element) } => {
                format!("sequence of {}", element.describe())
            }
            FieldShape::Mapping { entry: None } => "raw mapping".to_string(),
            FieldShape::Mapping { entry: Some(entry) } => {
                format!("mapping of {} to {}", entry.key.describe(), entry.value.describe())
            }
            FieldShape::Composite { descriptor, .. } => descriptor.name.clone(),
            FieldShape::Any => "any".to_string(),
            FieldShape::Param { name } => format!("parameter {name}"),
            FieldShape::Opaque { type_name } => type_name.clone(),
        }
    }
}

/// One declared field of a described type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Declared shape
    pub shape: FieldShape,

    /// Required marker at the field declaration
    #[serde(default)]
    pub required: bool,

    /// Excluded from introspection (static, synthetic, transient)
    #[serde(default)]
    pub excluded: bool,

    /// Qualifier markers at the field declaration
    #[serde(default)]
    pub qualifiers: BTreeSet<Qualifier>,
}

impl FieldDescriptor {
    /// Declare a field with the given shape.
    pub fn new(name: impl Into<String>, shape: FieldShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
            excluded: false,
            qualifiers: BTreeSet::new(),
        }
    }

    /// Mark the declaration as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Exclude the declaration from introspection.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Attach a qualifier marker.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }
}

/// A parameterized reference to a supertype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    /// The supertype's descriptor
    pub descriptor: TypeDescriptor,

    /// Arguments the subtype bound the supertype's parameters to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<FieldShape>,
}

/// The declared-field view of one concrete data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name
    pub name: String,

    /// Required marker at the type declaration
    #[serde(default)]
    pub required: bool,

    /// Qualifier markers at the type declaration
    #[serde(default)]
    pub qualifiers: BTreeSet<Qualifier>,

    /// Declared type parameter names, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,

    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Parameterized supertype, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ParentRef>>,
}

impl TypeDescriptor {
    /// Start describing a type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            qualifiers: BTreeSet::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
            parent: None,
        }
    }

    /// Mark the type declaration as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a type-level qualifier marker.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    /// Declare a type parameter.
    #[must_use]
    pub fn with_type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Declare a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Reference a parameterized supertype.
    #[must_use]
    pub fn with_parent(mut self, descriptor: TypeDescriptor, arguments: Vec<FieldShape>) -> Self {
        self.parent = Some(Box::new(ParentRef {
            descriptor,
            arguments,
        }));
        self
    }
}

/// Implemented by types that can declare their own descriptor.
pub trait Describe {
    /// The type's field declarations.
    fn descriptor() -> TypeDescriptor;
}
