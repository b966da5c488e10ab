//! Repository for the `prints` and `print_metadata` tables.

use atelier_core::catalog::PublicationStatus;
use atelier_core::translation::EntityRef;
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::print::{Print, PrintMetadata, PrintMetadataInput};
use crate::repositories::{GalleryPrintRepo, ImageRepo, TranslationRepo};
use crate::DbResult;

const COLUMNS: &str = "id, artist_id, status, created_at, updated_at";

const METADATA_COLUMNS: &str = "print_id, technique, year_created, plate_material, paper_type, \
    medium, dimensions, edition_size, ink_type, printing_press";

/// Provides CRUD operations for prints and their metadata.
pub struct PrintRepo;

impl PrintRepo {
    /// Insert a new print, returning the created row.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        artist_id: DbId,
        status: PublicationStatus,
    ) -> Result<Print, sqlx::Error> {
        let query =
            format!("INSERT INTO prints (artist_id, status) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Print>(&query)
            .bind(artist_id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Print>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prints WHERE id = $1");
        sqlx::query_as::<_, Print>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a print only if it belongs to `artist_id`.
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        artist_id: DbId,
    ) -> Result<Option<Print>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prints WHERE id = $1 AND artist_id = $2");
        sqlx::query_as::<_, Print>(&query)
            .bind(id)
            .bind(artist_id)
            .fetch_optional(executor)
            .await
    }

    /// Change the publication status. Returns `None` if the row is missing.
    pub async fn set_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        status: PublicationStatus,
    ) -> Result<Option<Print>, sqlx::Error> {
        let query = format!("UPDATE prints SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Print>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Bump `updated_at` after a change that only touched translations or
    /// metadata.
    pub async fn touch<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE prints SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// Create or patch the metadata row. On conflict, `None` fields keep
    /// their stored value.
    pub async fn upsert_metadata<'e, E: PgExecutor<'e>>(
        executor: E,
        print_id: DbId,
        input: &PrintMetadataInput,
    ) -> Result<PrintMetadata, sqlx::Error> {
        let query = format!(
            "INSERT INTO print_metadata \
                (print_id, technique, year_created, plate_material, paper_type, \
                 medium, dimensions, edition_size, ink_type, printing_press) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (print_id) DO UPDATE SET \
                technique = COALESCE(EXCLUDED.technique, print_metadata.technique), \
                year_created = COALESCE(EXCLUDED.year_created, print_metadata.year_created), \
                plate_material = COALESCE(EXCLUDED.plate_material, print_metadata.plate_material), \
                paper_type = COALESCE(EXCLUDED.paper_type, print_metadata.paper_type), \
                medium = COALESCE(EXCLUDED.medium, print_metadata.medium), \
                dimensions = COALESCE(EXCLUDED.dimensions, print_metadata.dimensions), \
                edition_size = COALESCE(EXCLUDED.edition_size, print_metadata.edition_size), \
                ink_type = COALESCE(EXCLUDED.ink_type, print_metadata.ink_type), \
                printing_press = COALESCE(EXCLUDED.printing_press, print_metadata.printing_press) \
             RETURNING {METADATA_COLUMNS}"
        );
        sqlx::query_as::<_, PrintMetadata>(&query)
            .bind(print_id)
            .bind(&input.technique)
            .bind(input.year_created)
            .bind(&input.plate_material)
            .bind(&input.paper_type)
            .bind(&input.medium)
            .bind(&input.dimensions)
            .bind(input.edition_size)
            .bind(&input.ink_type)
            .bind(&input.printing_press)
            .fetch_one(executor)
            .await
    }

    pub async fn find_metadata<'e, E: PgExecutor<'e>>(
        executor: E,
        print_id: DbId,
    ) -> Result<Option<PrintMetadata>, sqlx::Error> {
        let query = format!("SELECT {METADATA_COLUMNS} FROM print_metadata WHERE print_id = $1");
        sqlx::query_as::<_, PrintMetadata>(&query)
            .bind(print_id)
            .fetch_optional(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete a print and everything hanging off it.
    ///
    /// The print leaves every gallery through the membership operations
    /// first, so those galleries stay dense. Images and translations are
    /// removed explicitly; metadata follows the foreign key.
    ///
    /// Returns the ids of the galleries the print was removed from, or
    /// `None` if the print did not exist.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> DbResult<Option<Vec<DbId>>> {
        // Waits for in-flight additions of this print, which hold FOR SHARE.
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM prints WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let galleries = GalleryPrintRepo::remove_print_everywhere(conn, id).await?;
        ImageRepo::delete_for_print(&mut *conn, id).await?;
        TranslationRepo::delete_for_entity(&mut *conn, EntityRef::print(id)).await?;

        sqlx::query("DELETE FROM prints WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(Some(galleries))
    }
}
