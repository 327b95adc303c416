//! Schema validation helpers.
//!
//! This module provides utilities to validate `serde_json::Value` against a
//! [`Schema`]. The provider validates resource and data source configuration
//! before talking to the NetBox API so type errors surface with attribute
//! paths instead of API 400s.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_netbox::schema::{Schema, Attribute};
//! use hemmer_provider_netbox::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string())
//!     .with_attribute("vid", Attribute::optional_int64());
//!
//! let diagnostics = validate(&schema, &json!({"name": "vlan-100", "vid": 100}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": "vlan-100", "vid": "100"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("vid".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Diagnostic, DiagnosticSeverity, Schema};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Optional attributes may be absent or null
/// - Computed attributes are skipped (provider sets these)
/// - Attribute types must match the schema
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value))),
            );
            return diagnostics;
        }
    };

    for (name, attr) in &schema.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }

    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
///
/// This is a convenience wrapper around [`validate`] that returns a Result.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
///
/// Returns `true` if valid, `false` otherwise.
/// Use [`validate`] to get detailed error information.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

/// Check a NetBox slug: lowercase letters, digits, hyphens, and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Validate a slug attribute, producing an attribute-scoped diagnostic when
/// the value does not match the NetBox slug format.
pub fn validate_slug(path: &str, slug: &str) -> Option<Diagnostic> {
    if is_valid_slug(slug) {
        None
    } else {
        Some(
            Diagnostic::error(format!("Invalid slug '{}'", slug))
                .with_detail(
                    "Slugs may only contain lowercase letters, numbers, hyphens, and underscores",
                )
                .with_attribute(path),
        )
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Computed-only attributes are set by the provider
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        }
        Some(v) => {
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
        }
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        }
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        }
        AttributeType::Float64 => {
            if !value.is_number() {
                diagnostics.push(type_error(path, "float64", value));
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        }
        AttributeType::List(element_type) | AttributeType::Set(element_type) => {
            // Sets are represented as arrays in JSON
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        }
        AttributeType::Object(attrs) => {
            if let Some(obj) = value.as_object() {
                validate_object_type(attrs, obj, path, diagnostics);
            } else {
                diagnostics.push(type_error(path, "object", value));
            }
        }
    }
}

fn validate_object_type(
    attrs: &BTreeMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (name, attr_type) in attrs {
        let attr_path = format!("{}.{}", path, name);
        if let Some(value) = obj.get(name) {
            if !value.is_null() {
                validate_attribute_type(attr_type, value, &attr_path, diagnostics);
            }
        }
        // Object member types don't carry required/optional flags, so
        // presence is not enforced here
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            if n.as_i64().is_some() {
                true
            } else if let Some(f) = n.as_f64() {
                // A float with no fractional part still counts
                f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
            } else {
                false
            }
        }
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Error,
        summary: format!("Invalid type for attribute '{}'", path),
        detail: Some(format!(
            "Expected {}, got {}",
            expected,
            value_type_name(got)
        )),
        attribute: Some(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Schema};
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        // Valid
        let diagnostics = validate(&schema, &json!({"name": "dc-west"}));
        assert!(diagnostics.is_empty());

        // Missing required
        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));

        // Null value
        let diagnostics = validate(&schema, &json!({"name": null}));
        assert_eq!(diagnostics.len(), 1);

        // Wrong type
        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_attribute() {
        let schema = Schema::v0().with_attribute("vid", Attribute::optional_int64());

        let diagnostics = validate(&schema, &json!({"vid": 100}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"vid": null}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"vid": "100"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("id", Attribute::computed_string());

        let diagnostics = validate(&schema, &json!({}));
        assert!(diagnostics.is_empty());

        // Even with wrong type, computed-only attrs are not validated
        let diagnostics = validate(&schema, &json!({"id": 123}));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("vc_position", Attribute::required_int64());

        let diagnostics = validate(&schema, &json!({"vc_position": 2}));
        assert!(diagnostics.is_empty());

        // Float that's actually an integer
        let diagnostics = validate(&schema, &json!({"vc_position": 2.0}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"vc_position": 2.5}));
        assert_eq!(diagnostics.len(), 1);

        let diagnostics = validate(&schema, &json!({"vc_position": "2"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_bool() {
        let schema = Schema::v0().with_attribute(
            "is_pool",
            Attribute::new(AttributeType::Bool, AttributeFlags::required()),
        );

        assert!(validate(&schema, &json!({"is_pool": true})).is_empty());
        assert!(validate(&schema, &json!({"is_pool": false})).is_empty());
        assert_eq!(validate(&schema, &json!({"is_pool": "true"})).len(), 1);
    }

    #[test]
    fn test_validate_list() {
        let schema = Schema::v0().with_attribute(
            "object_types",
            Attribute::new(
                AttributeType::list(AttributeType::String),
                AttributeFlags::optional(),
            ),
        );

        let diagnostics = validate(&schema, &json!({"object_types": ["dcim.site", "dcim.device"]}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"object_types": []}));
        assert!(diagnostics.is_empty());

        // Wrong element type
        let diagnostics = validate(&schema, &json!({"object_types": ["dcim.site", 123]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("object_types.1".to_string()));

        let diagnostics = validate(&schema, &json!({"object_types": "dcim.site"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_set_of_objects() {
        let mut tag_attrs = BTreeMap::new();
        tag_attrs.insert("name".to_string(), AttributeType::String);
        tag_attrs.insert("slug".to_string(), AttributeType::String);

        let schema = Schema::v0().with_attribute(
            "tags",
            Attribute::new(
                AttributeType::set(AttributeType::Object(tag_attrs)),
                AttributeFlags::optional(),
            ),
        );

        let diagnostics = validate(
            &schema,
            &json!({"tags": [{"name": "Production", "slug": "production"}]}),
        );
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"tags": [{"name": 7, "slug": "production"}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("tags.0.name".to_string()));
    }

    #[test]
    fn test_validate_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("vid", Attribute::required_int64())
            .with_attribute("is_pool", Attribute::optional_bool());

        let diagnostics = validate(
            &schema,
            &json!({"name": 123, "vid": "not a number", "is_pool": "yes"}),
        );
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_is_valid_helper() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(is_valid(&schema, &json!({"name": "rack-12"})));
        assert!(!is_valid(&schema, &json!({})));
    }

    #[test]
    fn test_validate_result_helper() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate_result(&schema, &json!({"name": "rack-12"})).is_ok());

        let result = validate_result(&schema, &json!({}));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().len(), 1);
    }

    #[test]
    fn test_slug_format() {
        assert!(is_valid_slug("test-site-ds"));
        assert!(is_valid_slug("site_01"));
        assert!(!is_valid_slug("Test Site"));
        assert!(!is_valid_slug("UPPER"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("héllo"));

        let diag = validate_slug("slug", "Bad Slug").unwrap();
        assert_eq!(diag.attribute, Some("slug".to_string()));
        assert!(validate_slug("slug", "good-slug").is_none());
    }

    #[test]
    fn test_validate_root_not_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        let diagnostics = validate(&schema, &json!("not an object"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Expected object"));
    }
}
