//! Per-variant matching rules shared by the validation algorithms

use chrono::{DateTime, NaiveDate};
use registry_introspect::FieldShape;
use registry_model::AttributeKind;
use serde_json::Value;

/// Whether a resolved scalar field shape is assignable to an attribute tag.
#[must_use]
pub fn scalar_assignable(kind: &AttributeKind, shape: &FieldShape) -> bool {
    matches!(
        (kind, shape),
        (AttributeKind::Boolean, FieldShape::Bool)
            | (AttributeKind::Short, FieldShape::I16)
            | (AttributeKind::Integer, FieldShape::I32)
            | (AttributeKind::Long, FieldShape::I64)
            | (AttributeKind::Float, FieldShape::F32)
            | (AttributeKind::Double, FieldShape::F64)
            | (AttributeKind::Character, FieldShape::Char)
            | (AttributeKind::String, FieldShape::Text)
            | (AttributeKind::Bytes, FieldShape::Bytes)
            | (AttributeKind::Date, FieldShape::Date)
    )
}

/// Whether a JSON value satisfies an attribute's shape predicate.
///
/// Container predicates only check the node kind; descending into elements
/// and entries is the engine's job.
#[must_use]
pub fn value_matches(kind: &AttributeKind, value: &Value) -> bool {
    match kind {
        AttributeKind::Integer => value
            .as_i64()
            .is_some_and(|n| i32::try_from(n).is_ok()),
        AttributeKind::Long => value.as_i64().is_some(),
        AttributeKind::Short => value
            .as_i64()
            .is_some_and(|n| i16::try_from(n).is_ok()),
        AttributeKind::Float | AttributeKind::Double => value.is_number(),
        AttributeKind::Boolean => value.is_boolean(),
        AttributeKind::String => value.is_string(),
        AttributeKind::Character => value.as_str().is_some_and(|s| s.chars().count() == 1),
        AttributeKind::Bytes => value.is_string(),
        AttributeKind::Date => value.as_str().is_some_and(is_date_text),
        AttributeKind::Enum { values } => value.as_str().is_some_and(|s| values.contains(s)),
        AttributeKind::Array { .. } => value.is_array(),
        AttributeKind::Map { .. } => value.is_object(),
        AttributeKind::Object { nested: Some(_) } => value.is_object(),
        AttributeKind::Object { nested: None } => true,
    }
}

/// Whether a JSON object key satisfies a map's key attribute.
///
/// JSON keys are always text, so scalar key attributes match against the
/// parsed key text.
#[must_use]
pub fn key_matches(kind: &AttributeKind, key: &str) -> bool {
    match kind {
        AttributeKind::Integer => key.parse::<i32>().is_ok(),
        AttributeKind::Long => key.parse::<i64>().is_ok(),
        AttributeKind::Short => key.parse::<i16>().is_ok(),
        AttributeKind::Float | AttributeKind::Double => key.parse::<f64>().is_ok(),
        AttributeKind::Boolean => key.parse::<bool>().is_ok(),
        AttributeKind::String | AttributeKind::Bytes => true,
        AttributeKind::Character => key.chars().count() == 1,
        AttributeKind::Date => is_date_text(key),
        AttributeKind::Enum { values } => values.contains(key),
        AttributeKind::Array { .. } | AttributeKind::Map { .. } => false,
        AttributeKind::Object { nested: Some(_) } => false,
        AttributeKind::Object { nested: None } => true,
    }
}

/// The tag name reported for a JSON value in mismatch messages.
#[must_use]
pub fn found_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(number) => {
            if let Some(integral) = number.as_i64() {
                if i32::try_from(integral).is_ok() {
                    "INTEGER"
                } else {
                    "LONG"
                }
            } else if number.is_u64() {
                "LONG"
            } else {
                "DOUBLE"
            }
        }
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Object(_) => "OBJECT",
    }
}

fn is_date_text(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_requires_integral_in_range() {
        assert!(value_matches(&AttributeKind::Integer, &json!(42)));
        assert!(value_matches(&AttributeKind::Integer, &json!(-7)));
        assert!(!value_matches(&AttributeKind::Integer, &json!(42.5)));
        assert!(!value_matches(&AttributeKind::Integer, &json!(5_000_000_000_i64)));
        assert!(!value_matches(&AttributeKind::Integer, &json!("42")));
    }

    #[test]
    fn test_short_range() {
        assert!(value_matches(&AttributeKind::Short, &json!(32_767)));
        assert!(!value_matches(&AttributeKind::Short, &json!(32_768)));
    }

    #[test]
    fn test_floating_point_accepts_any_number() {
        assert!(value_matches(&AttributeKind::Double, &json!(1)));
        assert!(value_matches(&AttributeKind::Double, &json!(1.5)));
        assert!(value_matches(&AttributeKind::Float, &json!(-0.25)));
        assert!(!value_matches(&AttributeKind::Float, &json!(true)));
    }

    #[test]
    fn test_character_requires_single_char() {
        assert!(value_matches(&AttributeKind::Character, &json!("x")));
        assert!(!value_matches(&AttributeKind::Character, &json!("xy")));
        assert!(!value_matches(&AttributeKind::Character, &json!("")));
    }

    #[test]
    fn test_date_accepts_rfc3339_and_plain_dates() {
        assert!(value_matches(&AttributeKind::Date, &json!("2024-01-15")));
        assert!(value_matches(
            &AttributeKind::Date,
            &json!("2024-01-15T10:30:00Z")
        ));
        assert!(!value_matches(&AttributeKind::Date, &json!("15/01/2024")));
    }

    #[test]
    fn test_enum_requires_declared_value() {
        let kind = AttributeKind::Enum {
            values: ["OPEN".to_string(), "CLOSED".to_string()].into(),
        };

        assert!(value_matches(&kind, &json!("OPEN")));
        assert!(!value_matches(&kind, &json!("PENDING")));
        assert!(!value_matches(&kind, &json!(1)));
    }

    #[test]
    fn test_container_predicates_check_node_kind() {
        assert!(value_matches(
            &AttributeKind::Array { element: None },
            &json!([1, 2])
        ));
        assert!(!value_matches(
            &AttributeKind::Array { element: None },
            &json!({"a": 1})
        ));
        assert!(value_matches(
            &AttributeKind::Map {
                key: None,
                value: None,
            },
            &json!({"a": 1})
        ));
        assert!(value_matches(&AttributeKind::Object { nested: None }, &json!(17)));
    }

    #[test]
    fn test_key_text_coercion() {
        assert!(key_matches(&AttributeKind::Integer, "42"));
        assert!(!key_matches(&AttributeKind::Integer, "forty-two"));
        assert!(key_matches(&AttributeKind::String, "anything"));
        assert!(!key_matches(&AttributeKind::Array { element: None }, "x"));
    }

    #[test]
    fn test_found_tags() {
        assert_eq!(found_tag(&json!(null)), "NULL");
        assert_eq!(found_tag(&json!(1)), "INTEGER");
        assert_eq!(found_tag(&json!(5_000_000_000_i64)), "LONG");
        assert_eq!(found_tag(&json!(1.5)), "DOUBLE");
        assert_eq!(found_tag(&json!("s")), "STRING");
        assert_eq!(found_tag(&json!([])), "ARRAY");
        assert_eq!(found_tag(&json!({})), "OBJECT");
    }
}
