//! Dice tools.
//!
//! Tools: Throw Dice

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value as JsonValue};

use crate::convert::{get_optional_string, get_string_arg};
use crate::dice;
use crate::error::{McpError, Result};
use crate::schema;
use crate::session::McpSession;
use crate::tools::{ToolDef, ToolOutput};

/// Get all dice tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![ToolDef::new(
        "Throw Dice",
        "Roll dice written in standard notation, e.g. '1d20+5' or '2d3 + 1d6'. \
         Returns the total as a string with a per-group breakdown of every die.",
        schema!(object {
            required: { "rollId": string, "notation": string },
            optional: { "mcp_type": string, "action": string, "reason": string }
        }),
    )
    .with_output(schema!(object {
        required: { "rollId": string, "notation": string, "result": string, "rolledAt": string }
    }))]
}

/// Dispatch a dice tool call.
pub fn dispatch(
    session: &mut McpSession,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<ToolOutput> {
    match name {
        "Throw Dice" => {
            let notation = get_string_arg(&args, "notation")?;
            let roll_id = get_string_arg(&args, "rollId")?;
            let reason = get_optional_string(&args, "reason")?;

            let outcome = dice::roll_with(&notation, session.rng())?;
            tracing::debug!(%roll_id, %notation, total = outcome.total, "rolled dice");

            let mut text = format!(
                "Rolled {}: {} (roll ID: {})\nDetails: {}",
                notation, outcome.total, roll_id, outcome.breakdown
            );
            if let Some(reason) = reason.filter(|r| !r.is_empty()) {
                text.push_str("\nReason: ");
                text.push_str(&reason);
            }

            let structured = json!({
                "rollId": roll_id,
                "notation": notation,
                "result": outcome.total.to_string(),
                "rolledAt": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            });

            Ok(ToolOutput::new(text, structured))
        }

        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}
