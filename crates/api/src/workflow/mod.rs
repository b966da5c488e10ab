//! Transactional write side of the catalogue.
//!
//! [`CatalogWorkflow`] is the only layer that opens and commits
//! transactions. Every operation validates its input before the first
//! write, checks ownership inside the transaction, and either commits all
//! of its changes or none. Ownership mismatches surface as `NotFound` so
//! callers cannot probe for other artists' galleries and prints.
//!
//! The object store and processing trigger sit outside the transaction:
//! an upload is written before the transaction opens and removed again if
//! it rolls back; the processing notification is sent after commit and
//! never undoes it.

mod gallery;
mod membership;
mod print;
pub mod upload;

use std::sync::Arc;

use atelier_cloud::{ObjectStore, ObjectStoreError, ProcessingTrigger};
use atelier_core::catalog::{
    validate_edition_size, validate_metadata_field, validate_year, PublicationStatus,
};
use atelier_core::error::CoreError;
use atelier_core::language::LanguageCode;
use atelier_core::translation::{validate_description, validate_title, EntityRef, TextField};
use atelier_core::types::DbId;
use atelier_db::models::gallery::Gallery;
use atelier_db::models::print::{Print, PrintMetadataInput};
use atelier_db::repositories::{GalleryRepo, PrintRepo, TranslationRepo};
use atelier_db::{DbError, DbPool};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

pub use print::CreatedPrint;
pub use upload::ImageUpload;

/// Errors from write workflows.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
}

impl From<DbError> for WorkflowError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => WorkflowError::Core(core),
            DbError::Sqlx(sqlx) => WorkflowError::Database(sqlx),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Create or patch body for a gallery.
///
/// `title` is required on create. Text is written in `language`, or the
/// artist's default language when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PublicationStatus>,
    pub language: Option<String>,
}

/// Create or patch body for a print.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrintInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PublicationStatus>,
    pub language: Option<String>,
    #[serde(flatten)]
    pub metadata: PrintMetadataInput,
}

/// Whether the downstream pipeline acknowledged a new upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// No image was uploaded.
    NotRequested,
    Confirmed,
    /// The print exists; the pipeline did not acknowledge it.
    Unconfirmed,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

pub struct CatalogWorkflow {
    pool: DbPool,
    store: Arc<dyn ObjectStore>,
    trigger: Arc<dyn ProcessingTrigger>,
    max_upload_bytes: usize,
}

impl CatalogWorkflow {
    pub fn new(
        pool: DbPool,
        store: Arc<dyn ObjectStore>,
        trigger: Arc<dyn ProcessingTrigger>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            pool,
            store,
            trigger,
            max_upload_bytes,
        }
    }

    /// The gallery if it exists and belongs to `artist_id`.
    pub async fn owned_gallery<'e, E: PgExecutor<'e>>(
        executor: E,
        artist_id: DbId,
        gallery_id: DbId,
    ) -> WorkflowResult<Gallery> {
        GalleryRepo::find_owned(executor, gallery_id, artist_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Gallery",
                    id: gallery_id,
                }
                .into()
            })
    }

    /// The print if it exists and belongs to `artist_id`.
    pub async fn owned_print<'e, E: PgExecutor<'e>>(
        executor: E,
        artist_id: DbId,
        print_id: DbId,
    ) -> WorkflowResult<Print> {
        PrintRepo::find_owned(executor, print_id, artist_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Print",
                    id: print_id,
                }
                .into()
            })
    }
}

// ---------------------------------------------------------------------------
// Shared steps
// ---------------------------------------------------------------------------

/// Validate display text. On create the title must be present.
fn validate_texts(
    title: Option<&str>,
    description: Option<&str>,
    title_required: bool,
) -> Result<(), CoreError> {
    match title {
        Some(title) => validate_title(title)?,
        None if title_required => {
            return Err(CoreError::Validation("title is required".into()));
        }
        None => {}
    }
    if let Some(description) = description {
        validate_description(description)?;
    }
    Ok(())
}

fn validate_metadata(input: &PrintMetadataInput) -> Result<(), CoreError> {
    validate_year(input.year_created, chrono::Utc::now().year())?;
    validate_edition_size(input.edition_size)?;
    for (name, value) in [
        ("technique", &input.technique),
        ("plate_material", &input.plate_material),
        ("paper_type", &input.paper_type),
        ("medium", &input.medium),
        ("dimensions", &input.dimensions),
        ("ink_type", &input.ink_type),
        ("printing_press", &input.printing_press),
    ] {
        validate_metadata_field(name, value.as_deref())?;
    }
    Ok(())
}

fn metadata_is_empty(input: &PrintMetadataInput) -> bool {
    input.technique.is_none()
        && input.year_created.is_none()
        && input.plate_material.is_none()
        && input.paper_type.is_none()
        && input.medium.is_none()
        && input.dimensions.is_none()
        && input.edition_size.is_none()
        && input.ink_type.is_none()
        && input.printing_press.is_none()
}

/// Upsert whichever display fields are present. Returns `true` if any
/// row was inserted or changed.
async fn write_texts(
    conn: &mut PgConnection,
    entity: EntityRef,
    title: Option<&str>,
    description: Option<&str>,
    language: &LanguageCode,
) -> Result<bool, sqlx::Error> {
    let mut changed = false;
    for (field, content) in [
        (TextField::Title, title.map(str::trim)),
        (TextField::Description, description),
    ] {
        if let Some(content) = content {
            let outcome =
                TranslationRepo::upsert(&mut *conn, entity, field, language, content).await?;
            changed |= outcome.is_change();
        }
    }
    Ok(changed)
}
