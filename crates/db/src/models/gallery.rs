//! Gallery entity rows.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `galleries` table. Display text lives in `translations`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gallery {
    pub id: DbId,
    pub artist_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
