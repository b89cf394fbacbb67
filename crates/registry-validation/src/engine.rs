//! Validation engine
//!
//! One recursive-descent core drives both algorithms: structural validation
//! walks an attribute set against a type's resolved fields, payload
//! validation walks it against a JSON document. Violations accumulate
//! without short-circuiting and each distinct violation is reported once.

use crate::rules::{found_tag, key_matches, scalar_assignable, value_matches};
use registry_introspect::{
    FieldShape, ResolvedField, TypeDescriptor, resolved_fields, resolved_fields_bound,
};
use registry_model::{AttributeKind, SchemaAttribute, ValidationType};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// One structural incompatibility between an attribute set and a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// What is incompatible
    pub message: String,

    /// Dotted path of the field, from the root type
    pub field_path: String,

    /// Name of the type validation started from
    pub root_type: String,
}

/// Accumulator deduplicating violations by (message, path).
struct Violations {
    root_type: String,
    seen: HashSet<(String, String)>,
    list: Vec<Violation>,
}

impl Violations {
    fn new(root_type: &str) -> Self {
        Self {
            root_type: root_type.to_string(),
            seen: HashSet::new(),
            list: Vec::new(),
        }
    }

    fn push(&mut self, message: String, field_path: String) {
        if self.seen.insert((message.clone(), field_path.clone())) {
            self.list.push(Violation {
                message,
                field_path,
                root_type: self.root_type.clone(),
            });
        }
    }

    fn into_list(self) -> Vec<Violation> {
        self.list
    }
}

/// Accumulator deduplicating payload messages.
struct Messages {
    seen: HashSet<String>,
    list: Vec<String>,
}

impl Messages {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            list: Vec::new(),
        }
    }

    fn push(&mut self, message: String) {
        if self.seen.insert(message.clone()) {
            self.list.push(message);
        }
    }

    fn into_list(self) -> Vec<String> {
        self.list
    }
}

/// Main validation engine
#[derive(Debug, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    /// Create a new validation engine
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assert that a described type remains shape-compatible with a
    /// registered attribute set.
    ///
    /// MATCHING requires every attribute to find an assignable same-named
    /// field; STRICT additionally reports every field not named by an
    /// attribute.
    #[must_use]
    pub fn validate_against_type(
        &self,
        attributes: &BTreeSet<SchemaAttribute>,
        mode: ValidationType,
        descriptor: &TypeDescriptor,
    ) -> Vec<Violation> {
        let mut violations = Violations::new(&descriptor.name);
        let fields = resolved_fields(descriptor);
        self.check_fields(attributes, &fields, mode, "", &mut violations);
        violations.into_list()
    }

    /// Check an untyped JSON document against a registered attribute set.
    #[must_use]
    pub fn validate_payload(
        &self,
        document: &Value,
        mode: ValidationType,
        attributes: &BTreeSet<SchemaAttribute>,
    ) -> Vec<String> {
        let mut messages = Messages::new();
        self.check_document(attributes, document, mode, "", &mut messages);
        messages.into_list()
    }

    fn check_fields(
        &self,
        attributes: &BTreeSet<SchemaAttribute>,
        fields: &[ResolvedField],
        mode: ValidationType,
        path: &str,
        out: &mut Violations,
    ) {
        for attribute in attributes {
            let attribute_path = join_path(path, &attribute.name);
            match fields.iter().find(|field| field.name == attribute.name) {
                None => {
                    if !attribute.optional {
                        out.push(
                            format!("Missing required field: {attribute_path}"),
                            attribute_path,
                        );
                    }
                }
                Some(field) => {
                    self.check_shape(attribute, &field.shape, mode, &attribute_path, out);
                }
            }
        }

        if mode == ValidationType::Strict {
            for field in fields {
                if !attributes.iter().any(|attribute| attribute.name == field.name) {
                    let field_path = join_path(path, &field.name);
                    out.push(format!("Unexpected field: {field_path}"), field_path);
                }
            }
        }
    }

    fn check_shape(
        &self,
        attribute: &SchemaAttribute,
        shape: &FieldShape,
        mode: ValidationType,
        path: &str,
        out: &mut Violations,
    ) {
        match &attribute.kind {
            AttributeKind::Integer
            | AttributeKind::String
            | AttributeKind::Float
            | AttributeKind::Double
            | AttributeKind::Long
            | AttributeKind::Boolean
            | AttributeKind::Short
            | AttributeKind::Character
            | AttributeKind::Bytes
            | AttributeKind::Date => {
                if !scalar_assignable(&attribute.kind, shape) {
                    self.mismatch(attribute, shape, path, out);
                }
            }
            AttributeKind::Enum { values } => match shape {
                FieldShape::Enum {
                    values: declared, ..
                } => {
                    let missing: Vec<_> = values.difference(declared).cloned().collect();
                    if !missing.is_empty() {
                        out.push(
                            format!(
                                "Field '{path}': enum values {missing:?} are not declared by the field type"
                            ),
                            path.to_string(),
                        );
                    }
                    if mode == ValidationType::Strict {
                        let extra: Vec<_> = declared.difference(values).cloned().collect();
                        if !extra.is_empty() {
                            out.push(
                                format!(
                                    "Field '{path}': enum values {extra:?} are not declared by the attribute"
                                ),
                                path.to_string(),
                            );
                        }
                    }
                }
                _ => self.mismatch(attribute, shape, path, out),
            },
            AttributeKind::Array { element } => match shape {
                FieldShape::Sequence {
                    element: field_element,
                } => match (element, field_element) {
                    // An untyped attribute accepts any sequence field.
                    (None, _) => {}
                    (Some(element), Some(field_element)) => {
                        self.check_shape(element, field_element, mode, path, out);
                    }
                    (Some(_), None) => {
                        out.push(
                            format!(
                                "Field '{path}': typed elements declared against a raw sequence"
                            ),
                            path.to_string(),
                        );
                    }
                },
                _ => self.mismatch(attribute, shape, path, out),
            },
            AttributeKind::Map { key, value } => match shape {
                FieldShape::Mapping { entry } => match (key, value, entry) {
                    (None, None, _) => {}
                    (Some(key), Some(value), Some(entry)) => {
                        self.check_shape(key, &entry.key, mode, path, out);
                        self.check_shape(value, &entry.value, mode, path, out);
                    }
                    (Some(_), Some(_), None) => {
                        out.push(
                            format!("Field '{path}': typed entries declared against a raw mapping"),
                            path.to_string(),
                        );
                    }
                    (Some(_), None, _) | (None, Some(_), _) => {
                        out.push(
                            format!("Field '{path}': map attribute must carry key and value together"),
                            path.to_string(),
                        );
                    }
                },
                _ => self.mismatch(attribute, shape, path, out),
            },
            AttributeKind::Object { nested } => match shape {
                FieldShape::Any => {
                    if nested.is_some() {
                        self.mismatch(attribute, shape, path, out);
                    }
                }
                FieldShape::Composite {
                    descriptor,
                    arguments,
                } => {
                    if let Some(nested) = nested {
                        let fields = resolved_fields_bound(descriptor, arguments);
                        self.check_fields(nested, &fields, mode, path, out);
                    }
                }
                _ => self.mismatch(attribute, shape, path, out),
            },
        }
    }

    fn mismatch(
        &self,
        attribute: &SchemaAttribute,
        shape: &FieldShape,
        path: &str,
        out: &mut Violations,
    ) {
        out.push(
            format!(
                "Field '{path}': expected {}, found {}",
                attribute.kind.tag(),
                shape.describe()
            ),
            path.to_string(),
        );
    }

    fn check_document(
        &self,
        attributes: &BTreeSet<SchemaAttribute>,
        document: &Value,
        mode: ValidationType,
        path: &str,
        out: &mut Messages,
    ) {
        let Some(object) = document.as_object() else {
            let message = if path.is_empty() {
                format!("Document: expected OBJECT, found {}", found_tag(document))
            } else {
                format!(
                    "Field '{path}': expected OBJECT, found {}",
                    found_tag(document)
                )
            };
            out.push(message);
            return;
        };

        for attribute in attributes {
            let attribute_path = join_path(path, &attribute.name);
            match object.get(&attribute.name) {
                None => {
                    if !attribute.optional {
                        out.push(format!("Missing required field: {attribute_path}"));
                    }
                }
                Some(value) => self.check_value(attribute, value, mode, &attribute_path, out),
            }
        }

        if mode == ValidationType::Strict {
            for key in object.keys() {
                if !attributes.iter().any(|attribute| attribute.name == *key) {
                    out.push(format!("Unexpected field: {}", join_path(path, key)));
                }
            }
        }
    }

    fn check_value(
        &self,
        attribute: &SchemaAttribute,
        value: &Value,
        mode: ValidationType,
        path: &str,
        out: &mut Messages,
    ) {
        if !value_matches(&attribute.kind, value) {
            // A mismatch stops the descent for this field.
            let message = match (&attribute.kind, value) {
                (AttributeKind::Enum { values }, Value::String(text)) => {
                    let values: Vec<_> = values.iter().cloned().collect();
                    format!("Field '{path}': expected one of {values:?}, found '{text}'")
                }
                _ => format!(
                    "Field '{path}': expected {}, found {}",
                    attribute.kind.tag(),
                    found_tag(value)
                ),
            };
            out.push(message);
            return;
        }

        match &attribute.kind {
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
            | AttributeKind::Enum { .. } => {}
            AttributeKind::Array { element } => {
                if let (Some(element), Some(items)) = (element, value.as_array()) {
                    for (index, item) in items.iter().enumerate() {
                        self.check_value(element, item, mode, &format!("{path}[{index}]"), out);
                    }
                }
            }
            AttributeKind::Map {
                key: key_attribute,
                value: value_attribute,
            } => {
                if let (Some(key_attribute), Some(value_attribute), Some(entries)) =
                    (key_attribute, value_attribute, value.as_object())
                {
                    for (entry_key, entry_value) in entries {
                        let entry_path = format!("{path}.{entry_key}");
                        if !key_matches(&key_attribute.kind, entry_key) {
                            out.push(format!(
                                "Field '{entry_path}': key does not match {}",
                                key_attribute.kind.tag()
                            ));
                        }
                        self.check_value(value_attribute, entry_value, mode, &entry_path, out);
                    }
                }
            }
            AttributeKind::Object { nested } => {
                if let Some(nested) = nested {
                    self.check_document(nested, value, mode, path, out);
                }
            }
        }
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
