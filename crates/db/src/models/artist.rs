//! Artist accounts.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: DbId,
    /// Subject claim issued by the identity provider.
    pub external_id: String,
    pub username: String,
    pub email: String,
    pub default_language: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering an artist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArtist {
    pub external_id: String,
    pub username: String,
    pub email: String,
    /// Defaults to the server's default language if omitted.
    pub default_language: Option<String>,
}

/// DTO for updating an artist. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArtist {
    pub username: Option<String>,
    pub email: Option<String>,
    pub default_language: Option<String>,
}
