//! Recursive attribute model describing one field's declared shape

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A data-handling concern attached to an attribute.
///
/// Qualifiers are orthogonal to the attribute's shape; multiple qualifiers
/// may co-occur on one attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Qualifier {
    /// No special handling
    Standard,

    /// Personally identifiable information
    Pii,

    /// Stored and transported encrypted
    Encrypted,

    /// Retained only for a bounded time
    ShortLived {
        /// Retention in seconds; -1 means unspecified
        #[serde(rename = "ttlSeconds", default = "default_ttl")]
        ttl_seconds: i64,
    },
}

impl Qualifier {
    /// Create a short-lived qualifier with the given retention.
    #[must_use]
    pub fn short_lived(ttl_seconds: i64) -> Self {
        Self::ShortLived { ttl_seconds }
    }
}

/// One attribute in a schema: a field name plus its declared shape.
///
/// Container variants nest further attributes, so one `SchemaAttribute`
/// describes an arbitrarily deep tree. Equality, ordering and hashing are
/// structural, which makes `BTreeSet<SchemaAttribute>` the canonical
/// order-independent representation of a schema's attribute set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaAttribute {
    /// Field name; must match `[A-Za-z0-9]*`
    pub name: String,

    /// Whether a payload may omit this field
    #[serde(default = "default_true")]
    pub optional: bool,

    /// Data-handling qualifiers
    #[serde(default)]
    pub qualifiers: BTreeSet<Qualifier>,

    /// Declared shape of the field
    #[serde(flatten)]
    pub kind: AttributeKind,
}

/// The shape of one attribute, discriminated on the wire by a `type` tag.
///
/// Matchers over this enum must stay exhaustive: adding a variant is meant
/// to break every match site until it handles the new shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeKind {
    /// 32-bit integral number
    Integer,

    /// Unicode text
    String,

    /// 32-bit floating point number
    Float,

    /// 64-bit floating point number
    Double,

    /// 64-bit integral number
    Long,

    /// True or false
    Boolean,

    /// 16-bit integral number
    Short,

    /// Single character
    Character,

    /// Opaque byte string
    Bytes,

    /// Calendar date or timestamp
    Date,

    /// One of a fixed set of named values
    Enum {
        /// Allowed value names
        values: BTreeSet<String>,
    },

    /// Ordered collection of elements
    Array {
        /// Element shape; absent means untyped elements are accepted
        #[serde(
            rename = "elementAttribute",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        element: Option<Box<SchemaAttribute>>,
    },

    /// Key/value container
    Map {
        /// Key shape; present iff the value shape is present
        #[serde(
            rename = "keyAttribute",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        key: Option<Box<SchemaAttribute>>,

        /// Value shape; present iff the key shape is present
        #[serde(
            rename = "valueAttribute",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<Box<SchemaAttribute>>,
    },

    /// Nested structure
    Object {
        /// Nested attribute set; absent means any shape is accepted
        #[serde(
            rename = "nestedAttributes",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        nested: Option<BTreeSet<SchemaAttribute>>,
    },
}

impl AttributeKind {
    /// The wire tag of this shape, as used in violation messages.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeKind::Integer => "INTEGER",
            AttributeKind::String => "STRING",
            AttributeKind::Float => "FLOAT",
            AttributeKind::Double => "DOUBLE",
            AttributeKind::Long => "LONG",
            AttributeKind::Boolean => "BOOLEAN",
            AttributeKind::Short => "SHORT",
            AttributeKind::Character => "CHARACTER",
            AttributeKind::Bytes => "BYTES",
            AttributeKind::Date => "DATE",
            AttributeKind::Enum { .. } => "ENUM",
            AttributeKind::Array { .. } => "ARRAY",
            AttributeKind::Map { .. } => "MAP",
            AttributeKind::Object { .. } => "OBJECT",
        }
    }
}

impl SchemaAttribute {
    /// Create an attribute with the given shape; optional by default.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            optional: true,
            qualifiers: BTreeSet::new(),
            kind,
        }
    }

    /// Create a STRING attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::String)
    }

    /// Create an INTEGER attribute.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Integer)
    }

    /// Create an ENUM attribute with the given value names.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            AttributeKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create an ARRAY attribute; `element` absent accepts untyped elements.
    pub fn array(name: impl Into<String>, element: Option<SchemaAttribute>) -> Self {
        Self::new(
            name,
            AttributeKind::Array {
                element: element.map(Box::new),
            },
        )
    }

    /// Create a MAP attribute; the key and value shapes travel together.
    pub fn map(name: impl Into<String>, entry: Option<(SchemaAttribute, SchemaAttribute)>) -> Self {
        let (key, value) = match entry {
            Some((k, v)) => (Some(Box::new(k)), Some(Box::new(v))),
            None => (None, None),
        };
        Self::new(name, AttributeKind::Map { key, value })
    }

    /// Create an OBJECT attribute; `nested` absent accepts any shape.
    pub fn object(name: impl Into<String>, nested: Option<BTreeSet<SchemaAttribute>>) -> Self {
        Self::new(name, AttributeKind::Object { nested })
    }

    /// Mark this attribute as required in payloads.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Attach a qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    /// Check the name against the registry naming rule `[A-Za-z0-9]*`.
    #[must_use]
    pub fn has_valid_name(&self) -> bool {
        use regex::Regex;

        Regex::new("^[A-Za-z0-9]*$").is_ok_and(|re| re.is_match(&self.name))
    }

    /// Check this attribute tree against the model invariants: names match
    /// the naming rule, and a MAP carries its key and value shapes together.
    pub fn validate(&self) -> Result<()> {
        if !self.has_valid_name() {
            return Err(Error::InvalidName {
                name: self.name.clone(),
            });
        }

        match &self.kind {
            AttributeKind::Integer
            | AttributeKind::String
            | AttributeKind::Float
            | AttributeKind::Double
            | AttributeKind::Long
            | AttributeKind::Boolean
            | AttributeKind::Short
            | AttributeKind::Character
            | AttributeKind::Bytes
            | AttributeKind::Date
            | AttributeKind::Enum { .. } => Ok(()),
            AttributeKind::Array { element } => {
                if let Some(element) = element {
                    element.validate()?;
                }
                Ok(())
            }
            AttributeKind::Map { key, value } => {
                if key.is_some() != value.is_some() {
                    return Err(Error::LopsidedMap {
                        name: self.name.clone(),
                    });
                }
                if let (Some(key), Some(value)) = (key, value) {
                    key.validate()?;
                    value.validate()?;
                }
                Ok(())
            }
            AttributeKind::Object { nested } => {
                if let Some(nested) = nested {
                    for attribute in nested {
                        attribute.validate()?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> i64 {
    -1
}
