//! Loading attribute sets and type descriptors from definition files
//!
//! Definitions load from JSON or YAML, chosen by file extension.

use crate::descriptor::TypeDescriptor;
use crate::{Error, Result};
use registry_model::SchemaAttribute;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::trace;

/// Load an attribute set from a JSON or YAML file.
pub fn load_attributes_from_file(path: &Path) -> Result<BTreeSet<SchemaAttribute>> {
    trace!("Loading attribute definitions from {:?}", path);
    let content = std::fs::read_to_string(path)?;

    if is_yaml(path) {
        load_attributes_from_yaml(&content)
    } else {
        load_attributes_from_json(&content)
    }
}

/// Load an attribute set from a JSON string.
pub fn load_attributes_from_json(json: &str) -> Result<BTreeSet<SchemaAttribute>> {
    serde_json::from_str(json).map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))
}

/// Load an attribute set from a YAML string.
pub fn load_attributes_from_yaml(yaml: &str) -> Result<BTreeSet<SchemaAttribute>> {
    serde_yaml::from_str(yaml).map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))
}

/// Load a type descriptor from a JSON or YAML file.
pub fn load_descriptor_from_file(path: &Path) -> Result<TypeDescriptor> {
    trace!("Loading type descriptor from {:?}", path);
    let content = std::fs::read_to_string(path)?;

    if is_yaml(path) {
        load_descriptor_from_yaml(&content)
    } else {
        load_descriptor_from_json(&content)
    }
}

/// Load a type descriptor from a JSON string.
pub fn load_descriptor_from_json(json: &str) -> Result<TypeDescriptor> {
    serde_json::from_str(json).map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))
}

/// Load a type descriptor from a YAML string.
pub fn load_descriptor_from_yaml(yaml: &str) -> Result<TypeDescriptor> {
    serde_yaml::from_str(yaml).map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_model::AttributeKind;

    #[test]
    fn test_load_attributes_from_json() {
        let json = r#"
        [
            {"type": "STRING", "name": "name", "optional": false},
            {"type": "INTEGER", "name": "age"}
        ]
        "#;

        let attributes = load_attributes_from_json(json).unwrap();

        assert_eq!(attributes.len(), 2);
        let name = attributes
            .iter()
            .find(|attribute| attribute.name == "name")
            .unwrap();
        assert_eq!(name.kind, AttributeKind::String);
        assert!(!name.optional);
    }

    #[test]
    fn test_load_attributes_from_yaml() {
        let yaml = r"
- type: STRING
  name: city
- type: ARRAY
  name: tags
  elementAttribute:
    type: STRING
    name: tag
";

        let attributes = load_attributes_from_yaml(yaml).unwrap();

        assert_eq!(attributes.len(), 2);
        let tags = attributes
            .iter()
            .find(|attribute| attribute.name == "tags")
            .unwrap();
        assert!(matches!(
            tags.kind,
            AttributeKind::Array { element: Some(_) }
        ));
    }

    #[test]
    fn test_load_descriptor_from_yaml() {
        let yaml = r"
name: Customer
fields:
  - name: id
    shape:
      kind: text
    required: true
  - name: scores
    shape:
      kind: mapping
      entry:
        key:
          kind: text
        value:
          kind: i64
";

        let descriptor = load_descriptor_from_yaml(yaml).unwrap();

        assert_eq!(descriptor.name, "Customer");
        assert_eq!(descriptor.fields.len(), 2);
        assert!(descriptor.fields[0].required);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let result = load_attributes_from_json("not json");

        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let result = load_descriptor_from_yaml("name: [");

        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }
}
