//! Shared query parameter types for API handlers.
//!
//! Flat structs on purpose: `serde(flatten)` does not survive
//! urlencoded numeric fields.

use atelier_core::catalog::{CatalogSort, PrintFilter};
use atelier_core::error::CoreError;
use atelier_core::language::LanguageCode;
use atelier_core::pagination::PageRequest;
use atelier_core::types::DbId;
use serde::Deserialize;

fn resolve_language(
    requested: Option<&str>,
    fallback: &LanguageCode,
) -> Result<LanguageCode, CoreError> {
    LanguageCode::resolve(requested, fallback.as_str())
}

/// `?language=&page=&limit=&sort=` for gallery listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub language: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<CatalogSort>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn language(&self, fallback: &LanguageCode) -> Result<LanguageCode, CoreError> {
        resolve_language(self.language.as_deref(), fallback)
    }
}

/// Print listing parameters: pagination plus metadata filters.
///
/// `plate_type` is the public name of the `plate_material` column.
#[derive(Debug, Default, Deserialize)]
pub struct PrintListParams {
    pub language: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<CatalogSort>,
    pub gallery_id: Option<DbId>,
    pub technique: Option<String>,
    pub year: Option<i32>,
    pub plate_type: Option<String>,
    pub paper_type: Option<String>,
}

impl PrintListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn language(&self, fallback: &LanguageCode) -> Result<LanguageCode, CoreError> {
        resolve_language(self.language.as_deref(), fallback)
    }

    pub fn filter(&self) -> PrintFilter {
        PrintFilter {
            gallery_id: self.gallery_id,
            technique: self.technique.clone(),
            year: self.year,
            plate_material: self.plate_type.clone(),
            paper_type: self.paper_type.clone(),
        }
        .normalised()
    }
}

/// `?language=&image_version=` for single-entity reads.
#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub language: Option<String>,
    pub image_version: Option<String>,
}

impl DetailParams {
    pub fn language(&self, fallback: &LanguageCode) -> Result<LanguageCode, CoreError> {
        resolve_language(self.language.as_deref(), fallback)
    }

    pub fn image_version(&self) -> Option<&str> {
        self.image_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}
