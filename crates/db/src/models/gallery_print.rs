//! Ordered gallery membership rows.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `gallery_prints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryPrint {
    pub gallery_id: DbId,
    pub print_id: DbId,
    /// One-based position, dense per gallery.
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
