//! Catalog constants, enums, listing filters and input validators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Publication status
// ---------------------------------------------------------------------------

/// Lifecycle status shared by galleries and prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
}

impl PublicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: draft, published"
            ))),
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Version tag of the derived thumbnail image.
pub const IMAGE_VERSION_THUMBNAIL: &str = "thumbnail";

/// Version tag of the uploaded source image.
pub const IMAGE_VERSION_ORIGINAL: &str = "original";

/// Image row awaiting downstream processing.
pub const IMAGE_STATUS_PENDING: &str = "pending";

/// Accepted upload content types and the file extension stored for each.
pub const ACCEPTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// Default upper bound for an uploaded image (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Validate an upload and return the file extension for its content type.
pub fn validate_image_upload(
    content_type: &str,
    size: usize,
    max_bytes: usize,
) -> Result<&'static str, CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Uploaded image is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded image is {size} bytes; the limit is {max_bytes} bytes"
        )));
    }
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(content_type))
        .map(|&(_, ext)| ext)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Unsupported image type '{content_type}'. Supported: image/jpeg, image/png, image/webp"
            ))
        })
}

/// Object-storage key for an uploaded print image.
pub fn image_object_key(artist_id: DbId, content_id: &str, extension: &str) -> String {
    format!("artists/{artist_id}/prints/{content_id}.{extension}")
}

// ---------------------------------------------------------------------------
// Print metadata
// ---------------------------------------------------------------------------

/// Earliest plausible year for a print.
pub const MIN_YEAR_CREATED: i32 = 1400;

/// Maximum length of free-text metadata fields.
pub const MAX_METADATA_FIELD_LENGTH: usize = 100;

/// Validate `year_created`, if present.
pub fn validate_year(year: Option<i32>, current_year: i32) -> Result<(), CoreError> {
    match year {
        Some(y) if !(MIN_YEAR_CREATED..=current_year).contains(&y) => {
            Err(CoreError::Validation(format!(
                "year_created must be between {MIN_YEAR_CREATED} and {current_year}"
            )))
        }
        _ => Ok(()),
    }
}

/// Validate an optional short metadata field such as `technique`.
pub fn validate_metadata_field(name: &str, value: Option<&str>) -> Result<(), CoreError> {
    if let Some(v) = value {
        if v.chars().count() > MAX_METADATA_FIELD_LENGTH {
            return Err(CoreError::Validation(format!(
                "{name} exceeds maximum length of {MAX_METADATA_FIELD_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate `edition_size`, if present.
pub fn validate_edition_size(edition_size: Option<i32>) -> Result<(), CoreError> {
    match edition_size {
        Some(n) if n < 1 => Err(CoreError::Validation(
            "edition_size must be at least 1".into(),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Sort order for unscoped listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    #[default]
    CreatedDesc,
    UpdatedDesc,
}

impl CatalogSort {
    /// SQL `ORDER BY` body for a table alias.
    pub fn order_clause(self, alias: &str) -> String {
        match self {
            Self::CreatedDesc => format!("{alias}.created_at DESC, {alias}.id DESC"),
            Self::UpdatedDesc => format!("{alias}.updated_at DESC, {alias}.id DESC"),
        }
    }
}

/// Who may see a single gallery or print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Public surface: published rows only.
    Published,
    /// Artist surface: rows owned by this artist, any status.
    OwnedBy(DbId),
}

impl Visibility {
    pub fn allows(self, owner_id: DbId, status: &str) -> bool {
        match self {
            Self::Published => status == PublicationStatus::Published.as_str(),
            Self::OwnedBy(artist_id) => artist_id == owner_id,
        }
    }
}

/// Narrowing predicates for print listings.
///
/// Every present field is an equality predicate; all present predicates
/// are ANDed. `gallery_id` additionally switches ordering to gallery order.
#[derive(Debug, Clone, Default)]
pub struct PrintFilter {
    pub gallery_id: Option<DbId>,
    pub technique: Option<String>,
    pub year: Option<i32>,
    pub plate_material: Option<String>,
    pub paper_type: Option<String>,
}

impl PrintFilter {
    /// Whether the listing is scoped to one gallery.
    pub fn is_gallery_scoped(&self) -> bool {
        self.gallery_id.is_some()
    }

    /// Drop blank text predicates so `?technique=` does not narrow to "".
    pub fn normalised(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.technique = clean(self.technique);
        self.plate_material = clean(self.plate_material);
        self.paper_type = clean(self.paper_type);
        self
    }
}
