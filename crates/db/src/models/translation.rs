//! Translation rows.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Translation {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub field_name: String,
    pub language_code: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
