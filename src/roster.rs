//! In-memory stores for characters and monsters.
//!
//! Both kinds share one record shape and one set of hit point / magic point rules,
//! so a single [`Roster`] type is instantiated once per [`CreatureKind`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Which roster a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureKind {
    /// Player or non-player character
    Character,
    /// Monster
    Monster,
}

impl CreatureKind {
    /// Singular display name, e.g. "Character".
    pub fn label(&self) -> &'static str {
        match self {
            CreatureKind::Character => "Character",
            CreatureKind::Monster => "Monster",
        }
    }

    /// Plural display name, e.g. "Characters".
    pub fn plural(&self) -> &'static str {
        match self {
            CreatureKind::Character => "Characters",
            CreatureKind::Monster => "Monsters",
        }
    }

    /// Name of the identifier argument and field, e.g. "characterId".
    pub fn id_key(&self) -> &'static str {
        match self {
            CreatureKind::Character => "characterId",
            CreatureKind::Monster => "monsterId",
        }
    }

    /// Name of the collection field in list results, e.g. "characters".
    pub fn list_key(&self) -> &'static str {
        match self {
            CreatureKind::Character => "characters",
            CreatureKind::Monster => "monsters",
        }
    }
}

impl fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hit point and magic point rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VitalsError {
    /// `max_hp < 1`
    #[error("Maximum HP must be at least 1")]
    MaxHpTooLow,
    /// `current_hp < 0`
    #[error("Current HP cannot be negative")]
    NegativeHp,
    /// `current_hp > max_hp`
    #[error("Current HP cannot exceed maximum HP")]
    HpExceedsMax,
    /// `max_magic_points < 0`
    #[error("Maximum magic points cannot be negative")]
    NegativeMaxMagic,
    /// `current_magic_points < 0`
    #[error("Current magic points cannot be negative")]
    NegativeMagic,
    /// `current_magic_points > max_magic_points`
    #[error("Current magic points cannot exceed maximum magic points")]
    MagicExceedsMax,
}

/// Roster errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No record with this identifier.
    #[error("{kind} with ID '{id}' not found")]
    NotFound {
        /// Roster that was searched
        kind: CreatureKind,
        /// Identifier that was requested
        id: String,
    },

    /// The record would break a hit point or magic point rule.
    #[error(transparent)]
    Vitals(#[from] VitalsError),
}

/// Hit points and magic points of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Current hit points
    pub current_hp: i64,
    /// Maximum hit points
    pub max_hp: i64,
    /// Current magic points
    pub current_magic_points: i64,
    /// Maximum magic points
    pub max_magic_points: i64,
}

impl Vitals {
    /// Check every rule, in a fixed order, reporting the first violation.
    pub fn validate(&self) -> Result<(), VitalsError> {
        if self.max_hp < 1 {
            return Err(VitalsError::MaxHpTooLow);
        }
        if self.current_hp < 0 {
            return Err(VitalsError::NegativeHp);
        }
        if self.current_hp > self.max_hp {
            return Err(VitalsError::HpExceedsMax);
        }
        if self.max_magic_points < 0 {
            return Err(VitalsError::NegativeMaxMagic);
        }
        if self.current_magic_points < 0 {
            return Err(VitalsError::NegativeMagic);
        }
        if self.current_magic_points > self.max_magic_points {
            return Err(VitalsError::MagicExceedsMax);
        }
        Ok(())
    }
}

/// A character or monster record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    /// Identifier, unique within its roster
    #[serde(skip)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Hit points and magic points
    #[serde(flatten)]
    pub vitals: Vitals,
    /// Free-form attributes (strength, class, ...)
    pub properties: Map<String, JsonValue>,
    /// When the record was created or last replaced
    pub created_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,
}

impl Creature {
    /// Structured form, with the identifier under the kind's id key.
    pub fn to_json(&self, kind: CreatureKind) -> serde_json::Result<JsonValue> {
        let mut value = serde_json::to_value(self)?;
        if let JsonValue::Object(obj) = &mut value {
            obj.insert(kind.id_key().to_string(), JsonValue::String(self.id.clone()));
        }
        Ok(value)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CreatureUpdate {
    /// New display name
    pub name: Option<String>,
    /// New current hit points
    pub current_hp: Option<i64>,
    /// New maximum hit points
    pub max_hp: Option<i64>,
    /// New current magic points
    pub current_magic_points: Option<i64>,
    /// New maximum magic points
    pub max_magic_points: Option<i64>,
    /// Merged into the existing properties key by key.
    pub properties: Option<Map<String, JsonValue>>,
}

/// In-memory store of creatures of one kind, keyed by identifier.
#[derive(Debug, Clone)]
pub struct Roster {
    kind: CreatureKind,
    entries: BTreeMap<String, Creature>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(kind: CreatureKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// The kind of creature this roster holds.
    pub fn kind(&self) -> CreatureKind {
        self.kind
    }

    /// Create a creature, or completely replace an existing one.
    pub fn set(
        &mut self,
        id: &str,
        name: &str,
        vitals: Vitals,
        properties: Map<String, JsonValue>,
    ) -> Result<&Creature, RosterError> {
        vitals.validate()?;

        let now = Utc::now();
        let creature = Creature {
            id: id.to_string(),
            name: name.to_string(),
            vitals,
            properties,
            created_at: now,
            updated_at: now,
        };

        self.entries.insert(id.to_string(), creature);
        self.get(id)
    }

    /// Look up a creature.
    pub fn get(&self, id: &str) -> Result<&Creature, RosterError> {
        self.entries.get(id).ok_or_else(|| self.not_found(id))
    }

    /// Apply a partial update. Nothing changes if the result would be invalid.
    pub fn update(&mut self, id: &str, update: CreatureUpdate) -> Result<&Creature, RosterError> {
        let mut next = self.get(id)?.clone();

        if let Some(name) = update.name {
            next.name = name;
        }
        let vitals = &mut next.vitals;
        if let Some(max_hp) = update.max_hp {
            vitals.max_hp = max_hp;
        }
        if let Some(current_hp) = update.current_hp {
            vitals.current_hp = current_hp;
        }
        if let Some(max_mp) = update.max_magic_points {
            vitals.max_magic_points = max_mp;
        }
        if let Some(current_mp) = update.current_magic_points {
            vitals.current_magic_points = current_mp;
        }
        next.vitals.validate()?;

        if let Some(properties) = update.properties {
            next.properties.extend(properties);
        }
        next.updated_at = Utc::now();

        self.entries.insert(id.to_string(), next);
        self.get(id)
    }

    /// All creatures, ordered by identifier.
    pub fn list(&self) -> impl Iterator<Item = &Creature> {
        self.entries.values()
    }

    /// Number of creatures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a creature.
    pub fn delete(&mut self, id: &str) -> Result<Creature, RosterError> {
        self.entries.remove(id).ok_or_else(|| self.not_found(id))
    }

    fn not_found(&self, id: &str) -> RosterError {
        RosterError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        }
    }
}
