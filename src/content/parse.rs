//! Parsing of inline payloads and payload files.

use std::path::Path;

use serde_json::{Map, Value};

use super::error::{ContentError, ParseAttempts, PayloadFileError};

/// Parses an inline payload into a JSON object.
///
/// YAML is tried first since it also accepts JSON and bare `key: value`
/// fragments. When that fails, the text is parsed as JSON, wrapped in
/// braces unless it already looks like an object, so that
/// `"text": "hi", "channel": "C0123"` is accepted.
///
/// # Errors
///
/// Returns [`ContentError::Payload`] carrying both failed attempts.
pub fn parse_inline(text: &str) -> Result<Value, ContentError> {
    let yaml = match serde_yaml::from_str::<Map<String, Value>>(text) {
        Ok(map) => return Ok(Value::Object(map)),
        Err(e) => e,
    };

    tracing::debug!("Payload is not a YAML mapping ({yaml}), retrying as JSON");

    match serde_json::from_str::<Map<String, Value>>(&wrap_object(text)) {
        Ok(map) => Ok(Value::Object(map)),
        Err(json) => Err(ContentError::Payload(ParseAttempts { json, yaml })),
    }
}

/// Reads and parses a payload file, choosing the parser by extension.
///
/// # Errors
///
/// Returns [`ContentError::PayloadFile`] when the file cannot be read, its
/// extension is not supported, or its contents do not parse.
pub async fn parse_file(path: &Path) -> Result<Value, ContentError> {
    load_file(path)
        .await
        .map_err(|source| ContentError::PayloadFile {
            path: path.to_path_buf(),
            source,
        })
}

async fn load_file(path: &Path) -> Result<Value, PayloadFileError> {
    let text = tokio::fs::read_to_string(path).await?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "json" => Ok(serde_json::from_str(&text)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
        other => Err(PayloadFileError::UnsupportedExtension(format!(".{other}"))),
    }
}

/// Wraps the trimmed text in braces unless it is already brace-delimited.
///
/// Brace-delimited means both a leading `{` and a trailing `}`. Text with
/// only one of them, such as `{"a":1},`, is wrapped like any other text
/// and then fails to parse. One trailing comma is dropped before wrapping.
pub(crate) fn wrap_object(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return trimmed.to_string();
    }

    let body = trimmed.strip_suffix(',').unwrap_or(trimmed);
    format!("{{{body}}}")
}
