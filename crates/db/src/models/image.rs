//! Image variant rows.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub print_id: DbId,
    /// Variant tag such as `original` or `thumbnail`.
    pub version: String,
    pub storage_key: String,
    pub public_url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub content_type: String,
    pub file_size: i64,
    pub checksum_sha256: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for recording a stored image variant.
#[derive(Debug, Clone)]
pub struct CreateImage {
    pub print_id: DbId,
    pub version: String,
    pub storage_key: String,
    pub public_url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub content_type: String,
    pub file_size: i64,
    pub checksum_sha256: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
}

/// The public view of one image variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl From<&Image> for ImageInfo {
    fn from(image: &Image) -> Self {
        Self {
            url: image.public_url.clone(),
            width: image.width,
            height: image.height,
        }
    }
}
