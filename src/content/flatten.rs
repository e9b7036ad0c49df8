//! Flattening of nested payloads into single-level string fields.

use serde_json::{Map, Value};

/// Collapses nested objects and arrays into one level of string values.
///
/// Keys along each path are joined with `delimiter`; array elements use
/// their index as the key segment. Every leaf is then converted to its
/// string form, since workflow-trigger webhooks only accept string fields.
/// Empty objects and arrays are kept as leaves (`"{}"`, `"[]"`).
///
/// A top-level value that is not an object or array is returned unchanged.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use slack_send::content::flatten;
///
/// let flat = flatten(json!({"bananas": {"truthiness": true}}), "_");
/// assert_eq!(flat, json!({"bananas_truthiness": "true"}));
/// ```
#[must_use]
pub fn flatten(value: Value, delimiter: &str) -> Value {
    if !matches!(value, Value::Object(_) | Value::Array(_)) {
        return value;
    }

    let mut fields = Map::new();
    walk(value, None, delimiter, &mut fields);
    Value::Object(fields)
}

fn walk(value: Value, prefix: Option<&str>, delimiter: &str, fields: &mut Map<String, Value>) {
    let key = |segment: &str| {
        prefix.map_or_else(
            || segment.to_string(),
            |p| format!("{p}{delimiter}{segment}"),
        )
    };

    match value {
        Value::Object(map) if !map.is_empty() => {
            for (segment, child) in map {
                walk(child, Some(&key(&segment)), delimiter, fields);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.into_iter().enumerate() {
                walk(child, Some(&key(&index.to_string())), delimiter, fields);
            }
        }
        leaf => {
            if let Some(path) = prefix {
                fields.insert(path.to_string(), Value::String(stringify(&leaf)));
            }
        }
    }
}

/// Returns the plain string form of a leaf value.
///
/// Strings are returned without JSON quoting.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
