//! Print entity rows and their structured metadata.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prints` table. Display text lives in `translations`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Print {
    pub id: DbId,
    pub artist_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `print_metadata` table.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct PrintMetadata {
    #[serde(skip_serializing)]
    pub print_id: DbId,
    pub technique: Option<String>,
    pub year_created: Option<i32>,
    pub plate_material: Option<String>,
    pub paper_type: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub edition_size: Option<i32>,
    pub ink_type: Option<String>,
    pub printing_press: Option<String>,
}

/// Metadata input for create and patch. On update, `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrintMetadataInput {
    pub technique: Option<String>,
    pub year_created: Option<i32>,
    pub plate_material: Option<String>,
    pub paper_type: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub edition_size: Option<i32>,
    pub ink_type: Option<String>,
    pub printing_press: Option<String>,
}
