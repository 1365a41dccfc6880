//! Greeting tool, handy for checking that a client can reach the server.
//!
//! Tools: say_hello

use serde_json::{json, Map, Value as JsonValue};

use crate::convert::get_optional_string;
use crate::error::{McpError, Result};
use crate::schema;
use crate::tools::{ToolDef, ToolOutput};

/// Get all greeting tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        "say_hello",
        "Says hello to the world or a specified name",
        schema!(object {
            optional: { "name": string }
        }),
    )]
}

/// Dispatch a greeting tool call.
pub fn dispatch(name: &str, args: Map<String, JsonValue>) -> Result<ToolOutput> {
    match name {
        "say_hello" => {
            let target =
                get_optional_string(&args, "name")?.unwrap_or_else(|| "World".to_string());
            Ok(ToolOutput::new(
                format!("Hello, {}! Welcome to the D&D MCP Server!", target),
                json!({ "greeting": target }),
            ))
        }
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
