//! Translation keys and display-text resolution.
//!
//! Display text for galleries and prints lives only in the `translations`
//! table, keyed by `(entity_type, entity_id, field_name, language_code)`.
//! Lookups never substitute another language: a missing row resolves to a
//! caller-supplied default.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Title shown when an entity has no title in the requested language.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Description shown when an entity has no description in the requested language.
pub const DEFAULT_DESCRIPTION: &str = "";

/// Maximum length of a translated title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of a translated description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Entity type
// ---------------------------------------------------------------------------

/// The closed set of entity kinds that own translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Gallery,
    Print,
}

impl EntityType {
    /// Value stored in `translations.entity_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Print => "print",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "gallery" => Ok(Self::Gallery),
            "print" => Ok(Self::Print),
            other => Err(CoreError::Validation(format!(
                "Unknown entity type '{other}'. Must be one of: gallery, print"
            ))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminated key of a translatable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub entity_id: DbId,
}

impl EntityRef {
    pub fn gallery(id: DbId) -> Self {
        Self {
            entity_type: EntityType::Gallery,
            entity_id: id,
        }
    }

    pub fn print(id: DbId) -> Self {
        Self {
            entity_type: EntityType::Print,
            entity_id: id,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Localised text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Title,
    Description,
}

impl TextField {
    /// Fields rendered on every listing card and detail page.
    pub const DISPLAY: [TextField; 2] = [TextField::Title, TextField::Description];

    /// Value stored in `translations.field_name`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            _ => None,
        }
    }

    /// The fallback used when no row exists for the requested language.
    pub fn default_value(self) -> &'static str {
        match self {
            Self::Title => DEFAULT_TITLE,
            Self::Description => DEFAULT_DESCRIPTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Upsert outcome
// ---------------------------------------------------------------------------

/// What an upsert did to the translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// A row existed with identical content; nothing was written.
    Unchanged,
}

impl UpsertOutcome {
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Return the resolved value, or `default` when the row is absent.
pub fn resolve_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.unwrap_or(default)
}

/// Title and description resolved for one entity in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayText {
    pub title: String,
    pub description: String,
}

impl DisplayText {
    /// Build display text from the rows found by a batch lookup, applying
    /// the per-field defaults for anything missing.
    pub fn from_resolved(resolved: &HashMap<TextField, String>) -> Self {
        let pick = |field: TextField| {
            resolve_or(resolved.get(&field).map(String::as_str), field.default_value()).to_string()
        };
        Self {
            title: pick(TextField::Title),
            description: pick(TextField::Description),
        }
    }
}

impl Default for DisplayText {
    fn default() -> Self {
        Self::from_resolved(&HashMap::new())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a title: required, non-blank, within length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional description (may be empty).
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}
