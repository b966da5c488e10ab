//! Repository for the `artists` table.

use atelier_core::language::DEFAULT_LANGUAGE;
use atelier_core::pagination::{Page, PageRequest};
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::artist::{Artist, CreateArtist, UpdateArtist};

const COLUMNS: &str = "id, external_id, username, email, default_language, created_at, updated_at";

/// Provides CRUD operations for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist, returning the created row.
    ///
    /// If `default_language` is `None`, defaults to `en`.
    pub async fn create(pool: &PgPool, input: &CreateArtist) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (external_id, username, email, default_language) \
             VALUES ($1, $2, $3, COALESCE($4, $5)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(&input.external_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.default_language)
            .bind(DEFAULT_LANGUAGE)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the artist registered for an identity-provider subject.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE external_id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of artists, newest first.
    pub async fn list(pool: &PgPool, request: PageRequest) -> Result<Page<Artist>, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
            .fetch_one(pool)
            .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM artists ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, Artist>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;
        Ok(Page::new(items, total, request))
    }

    /// Update an artist. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                username = COALESCE($2, username), \
                email = COALESCE($3, email), \
                default_language = COALESCE($4, default_language) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.default_language)
            .fetch_optional(pool)
            .await
    }

    /// Delete an artist with all of their galleries and prints.
    ///
    /// Entity rows and membership go through the foreign keys; the
    /// translations of those entities are removed first because their key
    /// is polymorphic. Returns `true` if the artist existed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query(
            "DELETE FROM translations t \
             WHERE (t.entity_type = 'gallery' \
                    AND t.entity_id IN (SELECT id FROM galleries WHERE artist_id = $1)) \
                OR (t.entity_type = 'print' \
                    AND t.entity_id IN (SELECT id FROM prints WHERE artist_id = $1))",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
