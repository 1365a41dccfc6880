//! Argument extraction helpers for tool calls.
//!
//! Tool arguments arrive as a JSON object; these helpers pull typed values out of it
//! and turn absent or mistyped values into [`McpError`]s.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

fn invalid(name: &str, reason: &str) -> McpError {
    McpError::InvalidArg {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Err(McpError::MissingArg(name.to_string())),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid(name, "Expected a string")),
    }
}

/// Helper to get a required, non-empty string argument (identifiers, names).
pub fn get_nonempty_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    let value = get_string_arg(args, name)?;
    if value.is_empty() {
        return Err(McpError::MissingArg(name.to_string()));
    }
    Ok(value)
}

/// Helper to get an optional string argument. Present values must be strings.
pub fn get_optional_string(args: &Map<String, JsonValue>, name: &str) -> Result<Option<String>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(name, "Expected a string")),
    }
}

/// Helper to get an optional string argument that, when present, must not be empty.
pub fn get_optional_nonempty_string(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<String>> {
    match get_optional_string(args, name)? {
        Some(s) if s.is_empty() => Err(invalid(name, "Must not be empty")),
        other => Ok(other),
    }
}

/// Helper to get a required integer argument from JSON arguments.
pub fn get_i64_arg(args: &Map<String, JsonValue>, name: &str) -> Result<i64> {
    get_optional_i64(args, name)?.ok_or_else(|| McpError::MissingArg(name.to_string()))
}

/// Helper to get an optional integer argument. Present values must be integers.
pub fn get_optional_i64(args: &Map<String, JsonValue>, name: &str) -> Result<Option<i64>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(name, "Expected an integer")),
    }
}

/// Helper to get an optional object argument. Present values must be objects.
pub fn get_optional_object(
    args: &Map<String, JsonValue>,
    name: &str,
) -> Result<Option<Map<String, JsonValue>>> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Object(obj)) => Ok(Some(obj.clone())),
        Some(_) => Err(invalid(name, "Expected an object")),
    }
}
