//! Tooling for the WAHA `openapi.json` used to derive the models.
//!
//! The published schema declares some string properties as `object`;
//! [`retype_as_string`] fixes those in place before models are generated,
//! and [`format_openapi`] produces a stable, diff-friendly rendering.

use crate::error::{WahaError, WahaResult};
use log::{info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::path::Path;

/// Recursively order object keys.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for k in keys {
                sorted.insert(k.clone(), sort_keys(&obj[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Sorted keys, four-space indent, non-ASCII left as-is.
pub fn format_openapi(spec: &Value) -> WahaResult<String> {
    let sorted = sort_keys(spec);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    sorted.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| WahaError::schema(format!("formatted output is not UTF-8: {}", e)))
}

/// Read `input`, format it, write `output`.
pub fn format_openapi_file(input: &Path, output: &Path) -> WahaResult<()> {
    let spec = read_spec(input)?;
    write_spec(&spec, output)?;
    info!("Formatted {} -> {}", input.display(), output.display());
    Ok(())
}

pub fn read_spec(path: &Path) -> WahaResult<Value> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn write_spec(spec: &Value, path: &Path) -> WahaResult<()> {
    std::fs::write(path, format_openapi(spec)?)?;
    Ok(())
}

/// Change `components.schemas.<schema>.properties.<property>` from
/// `"type": "object"` to `"type": "string"`.
///
/// Returns `false` when the property is not typed `object` (nothing to fix).
pub fn retype_as_string(spec: &mut Value, schema: &str, property: &str) -> WahaResult<bool> {
    let prop = spec
        .pointer_mut(&format!(
            "/components/schemas/{}/properties/{}",
            escape_pointer(schema),
            escape_pointer(property)
        ))
        .ok_or_else(|| WahaError::schema(format!("no property {}.{} in spec", schema, property)))?;

    let obj = prop
        .as_object_mut()
        .ok_or_else(|| WahaError::schema(format!("{}.{} is not a schema object", schema, property)))?;

    let current = obj.get("type").and_then(Value::as_str).map(String::from);
    if current.as_deref() == Some("object") {
        obj.insert("type".to_string(), Value::String("string".to_string()));
        return Ok(true);
    }
    warn!(
        "{}.{} has type {:?}, leaving it unchanged",
        schema, property, current
    );
    Ok(false)
}

/// Apply [`retype_as_string`] to each `(schema, property)` pair and return
/// how many were changed.
pub fn retype_fields(spec: &mut Value, fields: &[(String, String)]) -> WahaResult<usize> {
    let mut changed = 0;
    for (schema, property) in fields {
        if retype_as_string(spec, schema, property)? {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Parse `Schema.property`.
pub fn parse_field(s: &str) -> WahaResult<(String, String)> {
    match s.split_once('.') {
        Some((schema, prop)) if !schema.is_empty() && !prop.is_empty() => {
            Ok((schema.to_string(), prop.to_string()))
        }
        _ => Err(WahaError::schema(format!(
            "expected Schema.property, got {:?}",
            s
        ))),
    }
}

// RFC 6901 escaping for JSON pointer segments.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "WAHA - WhatsApp HTTP API", "version": "2024.1"},
            "components": {
                "schemas": {
                    "WAMessage": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "object"},
                            "from": {"type": "object"},
                            "body": {"type": "string"}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_format_sorts_and_indents() {
        let out = format_openapi(&json!({"b": 1, "a": {"d": "é", "c": [true]}})).unwrap();
        let expected = "{\n    \"a\": {\n        \"c\": [\n            true\n        ],\n        \"d\": \"é\"\n    },\n    \"b\": 1\n}";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_retype_object_to_string() {
        let mut s = spec();
        assert!(retype_as_string(&mut s, "WAMessage", "id").unwrap());
        assert_eq!(s["components"]["schemas"]["WAMessage"]["properties"]["id"]["type"], "string");
        // Already a string: nothing to do.
        assert!(!retype_as_string(&mut s, "WAMessage", "body").unwrap());
    }

    #[test]
    fn test_retype_missing_property() {
        let mut s = spec();
        let err = retype_as_string(&mut s, "WAMessage", "nope").unwrap_err();
        assert!(matches!(err, WahaError::Schema(_)));
        assert!(retype_as_string(&mut s, "Missing", "id").is_err());
    }

    #[test]
    fn test_retype_fields_counts_changes() {
        let mut s = spec();
        let fields = vec![
            parse_field("WAMessage.id").unwrap(),
            parse_field("WAMessage.from").unwrap(),
            parse_field("WAMessage.body").unwrap(),
        ];
        assert_eq!(retype_fields(&mut s, &fields).unwrap(), 2);
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("SessionInfo.me").unwrap(),
            ("SessionInfo".to_string(), "me".to_string())
        );
        assert!(parse_field("SessionInfo").is_err());
        assert!(parse_field(".me").is_err());
    }

    #[test]
    fn test_file_round() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("openapi.json");
        let output = dir.path().join("openapi_formatted.json");
        std::fs::write(&input, r#"{"z":1,"a":2}"#).unwrap();

        format_openapi_file(&input, &output).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "{\n    \"a\": 2,\n    \"z\": 1\n}");
    }
}
