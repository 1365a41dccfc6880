//! Integration tests for the MCP server.

use dnd_mcp::{McpServer, McpSession, ToolOutput, ToolRegistry, ToolSet};
use serde_json::{json, Map, Value as JsonValue};

/// Create a test session with a fixed dice seed.
fn test_session() -> McpSession {
    McpSession::with_seed(2024)
}

/// Helper to dispatch a tool call.
fn call_tool(
    session: &mut McpSession,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> ToolOutput {
    let args_map: Map<String, JsonValue> = match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    };
    registry
        .dispatch(session, name, args_map)
        .unwrap_or_else(|e| panic!("Tool {} failed: {}", name, e))
}

/// Helper to dispatch a tool call and expect an error.
fn call_tool_err(
    session: &mut McpSession,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> dnd_mcp::McpError {
    let args_map: Map<String, JsonValue> = match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    };
    registry
        .dispatch(session, name, args_map)
        .expect_err(&format!("Expected tool {} to fail", name))
}

/// Roll `notation` and return the integer total.
fn roll_total(session: &mut McpSession, registry: &ToolRegistry, notation: &str) -> i64 {
    let output = call_tool(
        session,
        registry,
        "Throw Dice",
        json!({"mcp_type": "test", "action": "roll", "rollId": "t", "notation": notation}),
    );
    output.structured["result"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("result is an integer string")
}

fn aria() -> JsonValue {
    json!({
        "characterId": "char-1",
        "name": "Aria",
        "currentHp": 20,
        "maxHp": 25,
        "currentMagicPoints": 5,
        "maxMagicPoints": 10,
        "properties": {"class": "wizard", "intelligence": 17}
    })
}

// =============================================================================
// Dice Tools
// =============================================================================

#[test]
fn test_throw_dice_simple_roll() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let output = call_tool(
        &mut session,
        &registry,
        "Throw Dice",
        json!({"mcp_type": "test", "action": "roll", "rollId": "test-123", "notation": "2d6"}),
    );

    assert_eq!(output.structured["rollId"], "test-123");
    assert_eq!(output.structured["notation"], "2d6");
    assert!(output.structured.get("rolledAt").is_some());

    let result = output.structured["result"].as_str().unwrap();
    let value: i64 = result.parse().unwrap();
    assert!((2..=12).contains(&value));
    assert!(output.text.contains("2d6"));
    assert!(output.text.contains(result));
}

#[test]
fn test_throw_dice_with_modifier() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let output = call_tool(
        &mut session,
        &registry,
        "Throw Dice",
        json!({"rollId": "test-456", "notation": "1d20+5"}),
    );
    let value: i64 = output.structured["result"].as_str().unwrap().parse().unwrap();
    assert!((6..=25).contains(&value));
    assert!(output.text.contains("Details:"));
    assert!(output.text.contains("modifier: +5"));
}

#[test]
fn test_throw_dice_bounds() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    for (notation, min, max) in [
        ("1d6", 1, 6),
        ("3d8", 3, 24),
        ("2d10+5", 7, 25),
        ("2d3 + 1d6", 3, 12),
        ("2d6-1", 1, 11),
    ] {
        for _ in 0..200 {
            let total = roll_total(&mut session, &registry, notation);
            assert!((min..=max).contains(&total), "{} rolled {}", notation, total);
        }
    }
}

#[test]
fn test_throw_dice_missing_notation() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let err = call_tool_err(
        &mut session,
        &registry,
        "Throw Dice",
        json!({"mcp_type": "test", "action": "roll", "rollId": "test-error"}),
    );
    assert_eq!(err.to_string(), "missing required argument: notation");

    let err = call_tool_err(
        &mut session,
        &registry,
        "Throw Dice",
        json!({"rollId": "r", "notation": "1d6", "reason": 7}),
    );
    assert_eq!(err.to_string(), "invalid argument 'reason': Expected a string");
}

#[test]
fn test_throw_dice_invalid_notation() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    for (notation, message) in [
        ("invalid", "Invalid dice notation part: invalid"),
        ("", "Empty dice notation"),
        ("0d6", "Number of dice must be at least 1, got 0"),
        ("2d0", "Number of sides must be at least 1, got 0"),
        ("3 + 4", "No valid dice notation found in: 3+4"),
        (
            "2d6+9223372036854775807",
            "Dice notation total out of range: 2d6+9223372036854775807",
        ),
    ] {
        let err = call_tool_err(
            &mut session,
            &registry,
            "Throw Dice",
            json!({"rollId": "bad", "notation": notation}),
        );
        assert_eq!(err.to_string(), message);
    }
}

// =============================================================================
// Character Tools
// =============================================================================

#[test]
fn test_character_lifecycle() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let created = call_tool(&mut session, &registry, "Set Character", aria());
    assert_eq!(created.structured["characterId"], "char-1");
    assert_eq!(created.structured["currentHp"], 20);
    assert!(created.text.starts_with("Character 'Aria' (ID: char-1) created/updated"));

    let fetched = call_tool(
        &mut session,
        &registry,
        "Get Character",
        json!({"characterId": "char-1"}),
    );
    assert_eq!(fetched.structured["properties"]["intelligence"], 17);
    assert!(fetched.text.contains("Created: "));

    let updated = call_tool(
        &mut session,
        &registry,
        "Update Character",
        json!({"characterId": "char-1", "currentHp": 8, "properties": {"level": 4}}),
    );
    assert_eq!(updated.structured["currentHp"], 8);
    assert_eq!(updated.structured["maxHp"], 25);
    assert_eq!(updated.structured["properties"]["class"], "wizard");
    assert_eq!(updated.structured["properties"]["level"], 4);

    let listed = call_tool(&mut session, &registry, "List Characters", json!({}));
    assert_eq!(listed.structured["count"], 1);
    assert_eq!(listed.structured["characters"][0]["name"], "Aria");

    let deleted = call_tool(
        &mut session,
        &registry,
        "Delete Character",
        json!({"characterId": "char-1"}),
    );
    assert_eq!(deleted.structured, json!({"characterId": "char-1", "deleted": true}));

    let err = call_tool_err(
        &mut session,
        &registry,
        "Get Character",
        json!({"characterId": "char-1"}),
    );
    assert_eq!(err.to_string(), "Character with ID 'char-1' not found");
}

#[test]
fn test_character_validation() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let mut bad = aria();
    bad["currentHp"] = json!(30);
    let err = call_tool_err(&mut session, &registry, "Set Character", bad);
    assert_eq!(err.to_string(), "Current HP cannot exceed maximum HP");

    let mut bad = aria();
    bad["maxHp"] = json!(0);
    let err = call_tool_err(&mut session, &registry, "Set Character", bad);
    assert_eq!(err.to_string(), "Maximum HP must be at least 1");

    let mut bad = aria();
    bad["currentMagicPoints"] = json!(-2);
    let err = call_tool_err(&mut session, &registry, "Set Character", bad);
    assert_eq!(err.to_string(), "Current magic points cannot be negative");

    call_tool(&mut session, &registry, "Set Character", aria());
    let err = call_tool_err(
        &mut session,
        &registry,
        "Update Character",
        json!({"characterId": "char-1", "currentMagicPoints": 11}),
    );
    assert_eq!(
        err.to_string(),
        "Current magic points cannot exceed maximum magic points"
    );

    let err = call_tool_err(
        &mut session,
        &registry,
        "Update Character",
        json!({"characterId": "char-1", "currentHp": "full"}),
    );
    assert!(matches!(err, dnd_mcp::McpError::InvalidArg { .. }));

    let err = call_tool_err(
        &mut session,
        &registry,
        "Update Character",
        json!({"characterId": "char-1", "name": 42}),
    );
    assert_eq!(err.to_string(), "invalid argument 'name': Expected a string");

    let err = call_tool_err(
        &mut session,
        &registry,
        "Update Character",
        json!({"characterId": "char-1", "name": ""}),
    );
    assert_eq!(err.to_string(), "invalid argument 'name': Must not be empty");

    // Failed updates leave the record untouched.
    let fetched = call_tool(
        &mut session,
        &registry,
        "Get Character",
        json!({"characterId": "char-1"}),
    );
    assert_eq!(fetched.structured["name"], "Aria");
    assert_eq!(fetched.structured["currentMagicPoints"], 5);
    assert_eq!(fetched.structured["currentHp"], 20);
}

// =============================================================================
// Monster Tools
// =============================================================================

#[test]
fn test_monsters_are_separate_from_characters() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    call_tool(
        &mut session,
        &registry,
        "Set Monster",
        json!({
            "monsterId": "char-1",
            "name": "Owlbear",
            "currentHp": 59,
            "maxHp": 59,
            "currentMagicPoints": 0,
            "maxMagicPoints": 0
        }),
    );

    let err = call_tool_err(
        &mut session,
        &registry,
        "Get Character",
        json!({"characterId": "char-1"}),
    );
    assert_eq!(err.to_string(), "Character with ID 'char-1' not found");

    let monsters = call_tool(&mut session, &registry, "List Monsters", json!({}));
    assert_eq!(monsters.structured["count"], 1);
    assert_eq!(monsters.structured["monsters"][0]["monsterId"], "char-1");
    assert!(monsters.structured["monsters"][0]["properties"]
        .as_object()
        .unwrap()
        .is_empty());

    let err = call_tool_err(
        &mut session,
        &registry,
        "Delete Monster",
        json!({"monsterId": "ghost"}),
    );
    assert_eq!(err.to_string(), "Monster with ID 'ghost' not found");
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_unknown_tool() {
    let mut session = test_session();
    let registry = ToolRegistry::new();

    let err = call_tool_err(&mut session, &registry, "Cast Fireball", json!({}));
    assert_eq!(err.to_string(), "unknown tool: Cast Fireball");
}

#[test]
fn test_restricted_tool_sets() {
    let registry = ToolRegistry::with_sets(&[ToolSet::Monster, ToolSet::Greeting]);
    let names: Vec<&str> = registry.tools().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"Set Monster"));
    assert!(names.contains(&"say_hello"));
    assert!(!names.contains(&"Throw Dice"));
    assert!(!names.contains(&"Set Character"));
}

// =============================================================================
// Stdio Protocol
// =============================================================================

async fn exchange(input: &str) -> Vec<JsonValue> {
    let mut server = McpServer::new(test_session());
    let mut output: Vec<u8> = Vec::new();
    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("server loop failed");

    String::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect()
}

#[tokio::test]
async fn test_stdio_session() {
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "Throw Dice", "arguments": {"rollId": "r-9", "notation": "2d6-1"}}}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "Throw Dice", "arguments": {"rollId": "r-10", "notation": "d6"}}}),
    ]
    .iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let responses = exchange(&input).await;
    // The notification gets no reply.
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "dnd-mcp");

    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 12);

    let call = &responses[2]["result"];
    assert_eq!(call["content"][0]["type"], "text");
    assert!(call["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Rolled 2d6-1: "));
    assert_eq!(call["structuredContent"]["rollId"], "r-9");
    let total: i64 = call["structuredContent"]["result"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=11).contains(&total));

    assert_eq!(responses[3]["id"], 4);
    assert_eq!(responses[3]["error"]["code"], -32602);
    assert_eq!(responses[3]["error"]["message"], "Invalid dice notation part: d6");
}

#[tokio::test]
async fn test_stdio_parse_error_and_blank_lines() {
    let responses = exchange("\n   \n{not json}\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n").await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[1]["result"], json!({}));
}
