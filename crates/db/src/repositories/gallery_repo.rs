//! Repository for the `galleries` table.

use atelier_core::catalog::PublicationStatus;
use atelier_core::translation::EntityRef;
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::gallery::Gallery;
use crate::repositories::TranslationRepo;

const COLUMNS: &str = "id, artist_id, status, created_at, updated_at";

/// Provides CRUD operations for galleries.
pub struct GalleryRepo;

impl GalleryRepo {
    /// Insert a new gallery, returning the created row.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        artist_id: DbId,
        status: PublicationStatus,
    ) -> Result<Gallery, sqlx::Error> {
        let query = format!(
            "INSERT INTO galleries (artist_id, status) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gallery>(&query)
            .bind(artist_id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Gallery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM galleries WHERE id = $1");
        sqlx::query_as::<_, Gallery>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a gallery only if it belongs to `artist_id`.
    ///
    /// A gallery owned by someone else is indistinguishable from a missing one.
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        artist_id: DbId,
    ) -> Result<Option<Gallery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM galleries WHERE id = $1 AND artist_id = $2");
        sqlx::query_as::<_, Gallery>(&query)
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
    ) -> Result<Option<Gallery>, sqlx::Error> {
        let query =
            format!("UPDATE galleries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Gallery>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Bump `updated_at` after a change that only touched translations.
    pub async fn touch<'e, E: PgExecutor<'e>>(executor: E, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE galleries SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Delete a gallery with its translations. Membership rows go with the
    /// gallery through the foreign key.
    ///
    /// Returns `true` if the gallery existed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        TranslationRepo::delete_for_entity(&mut *conn, EntityRef::gallery(id)).await?;
        let result = sqlx::query("DELETE FROM galleries WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
