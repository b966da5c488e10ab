//! Composed read models returned by the catalogue aggregator.
//!
//! Every text field here has already been resolved through the
//! translation table for one language, with the per-field defaults
//! applied for missing rows.

use std::collections::BTreeMap;

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::models::image::ImageInfo;
use crate::models::print::PrintMetadata;

/// One gallery on a listing page.
#[derive(Debug, Clone, Serialize)]
pub struct GallerySummary {
    pub id: DbId,
    pub artist_id: DbId,
    pub status: String,
    pub title: String,
    pub description: String,
    pub print_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One print on a listing page or inside a gallery detail.
#[derive(Debug, Clone, Serialize)]
pub struct PrintCard {
    pub id: DbId,
    pub artist_id: DbId,
    pub status: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    /// Position inside the gallery for gallery-scoped listings.
    pub order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A gallery with its members in gallery order.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryDetail {
    #[serde(flatten)]
    pub gallery: GallerySummary,
    pub prints: Vec<PrintCard>,
}

/// A print with metadata and its image variants keyed by version.
#[derive(Debug, Clone, Serialize)]
pub struct PrintDetail {
    pub id: DbId,
    pub artist_id: DbId,
    pub status: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub metadata: PrintMetadata,
    pub images: BTreeMap<String, ImageInfo>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
