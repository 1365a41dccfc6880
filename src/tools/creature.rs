//! Character and monster tools.
//!
//! Tools (for each kind): Set {Kind}, Get {Kind}, Update {Kind}, List {Kinds}, Delete {Kind}

use serde_json::{json, Map, Value as JsonValue};

use crate::convert::{
    get_i64_arg, get_nonempty_string_arg, get_optional_i64, get_optional_nonempty_string,
    get_optional_object,
};
use crate::error::{McpError, Result};
use crate::roster::{Creature, CreatureKind, CreatureUpdate, Vitals};
use crate::session::McpSession;
use crate::tools::{ToolDef, ToolOutput};

fn record_schema(kind: CreatureKind) -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            kind.id_key(): {"type": "string"},
            "name": {"type": "string"},
            "currentHp": {"type": "integer"},
            "maxHp": {"type": "integer"},
            "currentMagicPoints": {"type": "integer"},
            "maxMagicPoints": {"type": "integer"},
            "properties": {"type": "object"},
            "createdAt": {"type": "string"},
            "updatedAt": {"type": "string"}
        },
        "required": [
            kind.id_key(), "name", "currentHp", "maxHp",
            "currentMagicPoints", "maxMagicPoints", "createdAt", "updatedAt"
        ]
    })
}

fn id_description(kind: CreatureKind) -> String {
    format!("Unique identifier for the {}", kind.label().to_lowercase())
}

fn input_schema(kind: CreatureKind, required: &[&str]) -> JsonValue {
    let id_key = kind.id_key();
    json!({
        "type": "object",
        "properties": {
            id_key: {"type": "string", "description": id_description(kind)},
            "name": {"type": "string", "description": format!("{} name", kind.label())},
            "currentHp": {"type": "integer", "description": "Current hit points"},
            "maxHp": {"type": "integer", "description": "Maximum hit points"},
            "currentMagicPoints": {"type": "integer", "description": "Current magic points"},
            "maxMagicPoints": {"type": "integer", "description": "Maximum magic points"},
            "properties": {
                "type": "object",
                "description": "Free-form properties (e.g., strength, dexterity, intelligence)",
                "additionalProperties": true
            }
        },
        "required": required
    })
}

fn id_only_schema(kind: CreatureKind) -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            kind.id_key(): {"type": "string", "description": id_description(kind)}
        },
        "required": [kind.id_key()]
    })
}

/// Tool names for a kind, in the order: set, get, update, list, delete.
fn names(kind: CreatureKind) -> [String; 5] {
    let (one, many) = (kind.label(), kind.plural());
    [
        format!("Set {one}"),
        format!("Get {one}"),
        format!("Update {one}"),
        format!("List {many}"),
        format!("Delete {one}"),
    ]
}

/// Get all tool definitions for one kind of creature.
pub fn tools(kind: CreatureKind) -> Vec<ToolDef> {
    let [set, get, update, list, delete] = names(kind);
    let lower = kind.label().to_lowercase();
    let id_key = kind.id_key();

    vec![
        ToolDef::new(
            &set,
            &format!("Create a new {lower} or completely replace an existing one with new data"),
            input_schema(
                kind,
                &[id_key, "name", "currentHp", "maxHp", "currentMagicPoints", "maxMagicPoints"],
            ),
        )
        .with_output(record_schema(kind)),
        ToolDef::new(
            &get,
            &format!("Retrieve a {lower} by their unique identifier"),
            id_only_schema(kind),
        )
        .with_output(record_schema(kind)),
        ToolDef::new(
            &update,
            &format!(
                "Update specific fields of an existing {lower}. Omitted fields are kept; \
                 properties are merged into the existing ones"
            ),
            input_schema(kind, &[id_key]),
        )
        .with_output(record_schema(kind)),
        ToolDef::new(
            &list,
            &format!("List all {} in the system", kind.plural().to_lowercase()),
            crate::schema!(object {}),
        )
        .with_output(json!({
            "type": "object",
            "properties": {
                kind.list_key(): {"type": "array", "items": record_schema(kind)},
                "count": {"type": "integer"}
            },
            "required": [kind.list_key(), "count"]
        })),
        ToolDef::new(
            &delete,
            &format!("Delete a {lower} by their unique identifier"),
            id_only_schema(kind),
        )
        .with_output(json!({
            "type": "object",
            "properties": {
                id_key: {"type": "string"},
                "deleted": {"type": "boolean"}
            },
            "required": [id_key, "deleted"]
        })),
    ]
}

fn summary(creature: &Creature) -> String {
    let v = &creature.vitals;
    format!(
        "HP: {}/{}\nMagic Points: {}/{}\nProperties: {}",
        v.current_hp,
        v.max_hp,
        v.current_magic_points,
        v.max_magic_points,
        JsonValue::Object(creature.properties.clone())
    )
}

/// Dispatch a character or monster tool call.
pub fn dispatch(
    session: &mut McpSession,
    kind: CreatureKind,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<ToolOutput> {
    let [set, get, update, list, delete] = names(kind);
    let id_key = kind.id_key();

    if name == set {
        let id = get_nonempty_string_arg(&args, id_key)?;
        let display_name = get_nonempty_string_arg(&args, "name")?;
        let vitals = Vitals {
            current_hp: get_i64_arg(&args, "currentHp")?,
            max_hp: get_i64_arg(&args, "maxHp")?,
            current_magic_points: get_i64_arg(&args, "currentMagicPoints")?,
            max_magic_points: get_i64_arg(&args, "maxMagicPoints")?,
        };
        let properties = get_optional_object(&args, "properties")?.unwrap_or_default();

        let creature = session
            .roster_mut(kind)
            .set(&id, &display_name, vitals, properties)?;
        tracing::debug!(%kind, %id, "stored record");

        let text = format!(
            "{} '{}' (ID: {}) created/updated\n{}",
            kind,
            creature.name,
            creature.id,
            summary(creature)
        );
        Ok(ToolOutput::new(text, creature.to_json(kind)?))
    } else if name == get {
        let id = get_nonempty_string_arg(&args, id_key)?;
        let creature = session.roster(kind).get(&id)?;

        let text = format!(
            "{}: {} (ID: {})\n{}\nCreated: {}\nUpdated: {}",
            kind,
            creature.name,
            creature.id,
            summary(creature),
            creature.created_at.to_rfc3339(),
            creature.updated_at.to_rfc3339()
        );
        Ok(ToolOutput::new(text, creature.to_json(kind)?))
    } else if name == update {
        let id = get_nonempty_string_arg(&args, id_key)?;
        let changes = CreatureUpdate {
            name: get_optional_nonempty_string(&args, "name")?,
            current_hp: get_optional_i64(&args, "currentHp")?,
            max_hp: get_optional_i64(&args, "maxHp")?,
            current_magic_points: get_optional_i64(&args, "currentMagicPoints")?,
            max_magic_points: get_optional_i64(&args, "maxMagicPoints")?,
            properties: get_optional_object(&args, "properties")?,
        };

        let creature = session.roster_mut(kind).update(&id, changes)?;
        tracing::debug!(%kind, %id, "updated record");

        let text = format!(
            "{} '{}' (ID: {}) updated\n{}",
            kind,
            creature.name,
            creature.id,
            summary(creature)
        );
        Ok(ToolOutput::new(text, creature.to_json(kind)?))
    } else if name == list {
        let roster = session.roster(kind);
        let records = roster
            .list()
            .map(|c| c.to_json(kind))
            .collect::<serde_json::Result<Vec<JsonValue>>>()?;

        let text = if roster.is_empty() {
            format!("No {} found.", kind.plural().to_lowercase())
        } else {
            let mut lines = vec![format!(
                "Found {} {}(s):\n",
                roster.len(),
                kind.label().to_lowercase()
            )];
            lines.extend(roster.list().map(|c| {
                format!(
                    "- {} (ID: {}): HP {}/{}, MP {}/{}",
                    c.name,
                    c.id,
                    c.vitals.current_hp,
                    c.vitals.max_hp,
                    c.vitals.current_magic_points,
                    c.vitals.max_magic_points
                )
            }));
            lines.join("\n")
        };

        let structured = json!({
            kind.list_key(): records,
            "count": roster.len(),
        });
        Ok(ToolOutput::new(text, structured))
    } else if name == delete {
        let id = get_nonempty_string_arg(&args, id_key)?;
        session.roster_mut(kind).delete(&id)?;
        tracing::debug!(%kind, %id, "deleted record");

        Ok(ToolOutput::new(
            format!("{} with ID '{}' has been deleted.", kind, id),
            json!({ id_key: id, "deleted": true }),
        ))
    } else {
        Err(McpError::UnknownTool(name.to_string()))
    }
}
