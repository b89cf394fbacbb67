//! Deriving attribute trees from type descriptors
//!
//! Introspection enumerates a type's non-excluded field declarations,
//! including inherited ones, resolves type parameters through the hierarchy's
//! substitution context, and maps each declared shape onto the attribute
//! model. It is a pure function: same descriptor, same attribute set.

use crate::descriptor::{FieldShape, MapEntry, TypeDescriptor};
use crate::{Error, Result};
use registry_model::{AttributeKind, Qualifier, SchemaAttribute};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Parameter-name to shape bindings for one level of the type hierarchy.
type Bindings = HashMap<String, FieldShape>;

/// One field of a type after inheritance and parameter substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// Field name
    pub name: String,

    /// Fully substituted shape; no parameter references remain
    pub shape: FieldShape,

    /// Required marker at the field declaration
    pub required: bool,

    /// Qualifier markers at the field declaration
    pub qualifiers: BTreeSet<Qualifier>,
}

/// Derive the attribute set for a described type.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] when a field declares a shape the
/// attribute model cannot express.
pub fn introspect(descriptor: &TypeDescriptor) -> Result<BTreeSet<SchemaAttribute>> {
    trace!("Introspecting type: {}", descriptor.name);
    introspect_bound(descriptor, &[])
}

/// The effective field list of a described type: inherited declarations
/// merged in, parameters substituted, nearest declaration winning on a
/// name collision.
#[must_use]
pub fn resolved_fields(descriptor: &TypeDescriptor) -> Vec<ResolvedField> {
    resolved_fields_bound(descriptor, &[])
}

/// Same as [`resolved_fields`], with the descriptor's type parameters bound
/// to the given arguments.
#[must_use]
pub fn resolved_fields_bound(
    descriptor: &TypeDescriptor,
    arguments: &[FieldShape],
) -> Vec<ResolvedField> {
    let bindings = bind(descriptor, arguments);
    let mut fields = Vec::new();
    collect_fields(descriptor, &bindings, &mut fields);
    fields
}

fn introspect_bound(
    descriptor: &TypeDescriptor,
    arguments: &[FieldShape],
) -> Result<BTreeSet<SchemaAttribute>> {
    let mut attributes = BTreeSet::new();
    for field in resolved_fields_bound(descriptor, arguments) {
        attributes.insert(field_attribute(&field)?);
    }
    Ok(attributes)
}

fn bind(descriptor: &TypeDescriptor, arguments: &[FieldShape]) -> Bindings {
    descriptor
        .type_params
        .iter()
        .cloned()
        .zip(arguments.iter().cloned())
        .collect()
}

fn collect_fields(descriptor: &TypeDescriptor, bindings: &Bindings, out: &mut Vec<ResolvedField>) {
    for field in &descriptor.fields {
        if field.excluded {
            continue;
        }
        // Nearest declaration wins when a subtype shadows an inherited name.
        if out.iter().any(|resolved| resolved.name == field.name) {
            continue;
        }
        out.push(ResolvedField {
            name: field.name.clone(),
            shape: resolve_shape(&field.shape, bindings),
            required: field.required,
            qualifiers: field.qualifiers.clone(),
        });
    }

    if let Some(parent) = &descriptor.parent {
        // The parent sees its own parameters bound to the arguments the
        // subtype used, resolved in the subtype's context first.
        let parent_bindings: Bindings = parent
            .descriptor
            .type_params
            .iter()
            .cloned()
            .zip(parent.arguments.iter().map(|a| resolve_shape(a, bindings)))
            .collect();
        collect_fields(&parent.descriptor, &parent_bindings, out);
    }
}

fn resolve_shape(shape: &FieldShape, bindings: &Bindings) -> FieldShape {
    match shape {
        FieldShape::Param { name } => bindings
            .get(name)
            .cloned()
            .unwrap_or(FieldShape::Any),
        FieldShape::Sequence { element } => FieldShape::Sequence {
            element: element
                .as_ref()
                .map(|element| Box::new(resolve_shape(element, bindings))),
        },
        FieldShape::Mapping { entry } => FieldShape::Mapping {
            entry: entry.as_ref().map(|entry| {
                Box::new(MapEntry {
                    key: resolve_shape(&entry.key, bindings),
                    value: resolve_shape(&entry.value, bindings),
                })
            }),
        },
        FieldShape::Composite {
            descriptor,
            arguments,
        } => FieldShape::Composite {
            descriptor: descriptor.clone(),
            arguments: arguments
                .iter()
                .map(|argument| resolve_shape(argument, bindings))
                .collect(),
        },
        FieldShape::Bool
        | FieldShape::I16
        | FieldShape::I32
        | FieldShape::I64
        | FieldShape::F32
        | FieldShape::F64
        | FieldShape::Char
        | FieldShape::Text
        | FieldShape::Bytes
        | FieldShape::Date
        | FieldShape::Enum { .. }
        | FieldShape::Any
        | FieldShape::Opaque { .. } => shape.clone(),
    }
}

fn field_attribute(field: &ResolvedField) -> Result<SchemaAttribute> {
    let (kind, type_required, type_qualifiers) = kind_of(&field.shape, &field.name)?;

    let mut qualifiers = field.qualifiers.clone();
    qualifiers.extend(type_qualifiers);

    Ok(SchemaAttribute {
        name: field.name.clone(),
        optional: !(field.required || type_required),
        qualifiers,
        kind,
    })
}

/// Attribute a container derives for its element/key/value slot.
fn slot_attribute(name: &str, shape: &FieldShape, field: &str) -> Result<SchemaAttribute> {
    let (kind, type_required, type_qualifiers) = kind_of(shape, field)?;

    Ok(SchemaAttribute {
        name: name.to_string(),
        optional: !type_required,
        qualifiers: type_qualifiers,
        kind,
    })
}

/// Map one resolved shape onto an attribute kind, carrying back the
/// type-level required marker and qualifiers of composite shapes.
fn kind_of(shape: &FieldShape, field: &str) -> Result<(AttributeKind, bool, BTreeSet<Qualifier>)> {
    let none = BTreeSet::new;

    let mapped = match shape {
        FieldShape::Bool => (AttributeKind::Boolean, false, none()),
        FieldShape::I16 => (AttributeKind::Short, false, none()),
        FieldShape::I32 => (AttributeKind::Integer, false, none()),
        FieldShape::I64 => (AttributeKind::Long, false, none()),
        FieldShape::F32 => (AttributeKind::Float, false, none()),
        FieldShape::F64 => (AttributeKind::Double, false, none()),
        FieldShape::Char => (AttributeKind::Character, false, none()),
        FieldShape::Text => (AttributeKind::String, false, none()),
        FieldShape::Bytes => (AttributeKind::Bytes, false, none()),
        FieldShape::Date => (AttributeKind::Date, false, none()),
        FieldShape::Enum { values, .. } => (
            AttributeKind::Enum {
                values: values.clone(),
            },
            false,
            none(),
        ),
        FieldShape::Sequence { element: None } => {
            (AttributeKind::Array { element: None }, false, none())
        }
        FieldShape::Sequence {
            element: Some(element),
        } => (
            AttributeKind::Array {
                element: Some(Box::new(slot_attribute("element", element, field)?)),
            },
            false,
            none(),
        ),
        FieldShape::Mapping { entry: None } => (
            AttributeKind::Map {
                key: None,
                value: None,
            },
            false,
            none(),
        ),
        FieldShape::Mapping { entry: Some(entry) } => (
            AttributeKind::Map {
                key: Some(Box::new(slot_attribute("key", &entry.key, field)?)),
                value: Some(Box::new(slot_attribute("value", &entry.value, field)?)),
            },
            false,
            none(),
        ),
        FieldShape::Composite {
            descriptor,
            arguments,
        } => (
            AttributeKind::Object {
                nested: Some(introspect_bound(descriptor, arguments)?),
            },
            descriptor.required,
            descriptor.qualifiers.clone(),
        ),
        // An unresolved parameter has already defaulted to the universal
        // type; both accept any shape.
        FieldShape::Any | FieldShape::Param { .. } => {
            (AttributeKind::Object { nested: None }, false, none())
        }
        FieldShape::Opaque { type_name } => {
            return Err(Error::UnsupportedType {
                type_name: type_name.clone(),
                field: field.to_string(),
            });
        }
    };

    Ok(mapped)
}
