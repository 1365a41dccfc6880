//! Tool registry and category definitions.
//!
//! Provides the infrastructure for registering and dispatching MCP tools.

pub mod creature;
pub mod dice;
pub mod greeting;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::roster::CreatureKind;
use crate::session::McpSession;

/// A group of tools that can be enabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ToolSet {
    /// Throw Dice
    Dice,
    /// Set/Get/Update/List/Delete Character(s)
    Character,
    /// Set/Get/Update/List/Delete Monster(s)
    Monster,
    /// say_hello
    Greeting,
}

impl ToolSet {
    /// Every tool set, in registration order.
    pub const ALL: [ToolSet; 4] = [
        ToolSet::Dice,
        ToolSet::Character,
        ToolSet::Monster,
        ToolSet::Greeting,
    ];

    fn tools(self) -> Vec<ToolDef> {
        match self {
            ToolSet::Dice => dice::tools(),
            ToolSet::Character => creature::tools(CreatureKind::Character),
            ToolSet::Monster => creature::tools(CreatureKind::Monster),
            ToolSet::Greeting => greeting::tools(),
        }
    }
}

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "Throw Dice")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
    /// JSON Schema for the structured result
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<JsonValue>,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            output_schema: None,
        }
    }

    /// Attach a schema for the structured result.
    pub fn with_output(mut self, output_schema: JsonValue) -> Self {
        self.output_schema = Some(output_schema);
        self
    }
}

/// What a tool hands back: a line for humans and a record for programs.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Human-readable summary
    pub text: String,
    /// Structured result matching the tool's output schema
    pub structured: JsonValue,
}

impl ToolOutput {
    /// Create a tool output.
    pub fn new(text: impl Into<String>, structured: JsonValue) -> Self {
        Self {
            text: text.into(),
            structured,
        }
    }
}

/// Registry of the enabled tools.
pub struct ToolRegistry {
    tools: Vec<(ToolSet, ToolDef)>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    pub fn new() -> Self {
        Self::with_sets(&ToolSet::ALL)
    }

    /// Create a registry exposing only the given tool sets.
    pub fn with_sets(sets: &[ToolSet]) -> Self {
        let mut tools = Vec::new();
        for &set in ToolSet::ALL.iter().filter(|s| sets.contains(s)) {
            tools.extend(set.tools().into_iter().map(|t| (set, t)));
        }
        Self { tools }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> impl Iterator<Item = &ToolDef> {
        self.tools.iter().map(|(_, t)| t)
    }

    /// Dispatch a tool call to the appropriate handler.
    pub fn dispatch(
        &self,
        session: &mut McpSession,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<ToolOutput> {
        let set = self
            .tools
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(set, _)| *set)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, ?set, "dispatching tool call");

        match set {
            ToolSet::Dice => dice::dispatch(session, name, args),
            ToolSet::Character => creature::dispatch(session, CreatureKind::Character, name, args),
            ToolSet::Monster => creature::dispatch(session, CreatureKind::Monster, name, args),
            ToolSet::Greeting => greeting::dispatch(name, args),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@type $req_type));)*
        $(props.insert($opt_name.to_string(), schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($req_name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), schema!(@type $req_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only optional properties
    (object {
        optional: { $($opt_name:literal : $opt_type:tt),* $(,)? }
    }) => {{
        let mut props = serde_json::Map::new();
        $(props.insert($opt_name.to_string(), schema!(@type $opt_type));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": []
        })
    }};

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type object) => { serde_json::json!({"type": "object", "additionalProperties": true}) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        let registry = ToolRegistry::new();
        let mut names: Vec<&str> = registry.tools().map(|t| t.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 12);
    }

    #[test]
    fn test_with_sets_filters_tools() {
        let registry = ToolRegistry::with_sets(&[ToolSet::Dice]);
        let names: Vec<&str> = registry.tools().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Throw Dice"]);

        let mut session = McpSession::with_seed(1);
        let err = registry
            .dispatch(&mut session, "Get Character", Map::new())
            .unwrap_err();
        assert!(matches!(err, McpError::UnknownTool(_)));
    }

    #[test]
    fn test_schema_macro() {
        let schema = schema!(object {
            required: { "id": string },
            optional: { "props": object }
        });
        assert_eq!(schema["required"], serde_json::json!(["id"]));
        assert_eq!(schema["properties"]["props"]["type"], "object");
    }
}
