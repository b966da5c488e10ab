//! Repository for the `images` table.

use std::collections::HashMap;

use atelier_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::image::{CreateImage, Image};

const COLUMNS: &str = "id, print_id, version, storage_key, public_url, width, height, \
    content_type, file_size, checksum_sha256, status, created_at, updated_at";

/// Provides access to stored image variants.
pub struct ImageRepo;

impl ImageRepo {
    /// Record a variant, replacing any existing row for the same
    /// `(print_id, version)`.
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateImage,
    ) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images \
                (print_id, version, storage_key, public_url, width, height, \
                 content_type, file_size, checksum_sha256, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'pending')) \
             ON CONFLICT ON CONSTRAINT uq_images_print_version DO UPDATE SET \
                storage_key = EXCLUDED.storage_key, \
                public_url = EXCLUDED.public_url, \
                width = EXCLUDED.width, \
                height = EXCLUDED.height, \
                content_type = EXCLUDED.content_type, \
                file_size = EXCLUDED.file_size, \
                checksum_sha256 = EXCLUDED.checksum_sha256, \
                status = EXCLUDED.status \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(input.print_id)
            .bind(&input.version)
            .bind(&input.storage_key)
            .bind(&input.public_url)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.content_type)
            .bind(input.file_size)
            .bind(&input.checksum_sha256)
            .bind(&input.status)
            .fetch_one(executor)
            .await
    }

    /// All variants of a print, ordered by version tag.
    pub async fn list_for_print<'e, E: PgExecutor<'e>>(
        executor: E,
        print_id: DbId,
    ) -> Result<Vec<Image>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM images WHERE print_id = $1 ORDER BY version");
        sqlx::query_as::<_, Image>(&query)
            .bind(print_id)
            .fetch_all(executor)
            .await
    }

    /// Public URL of one variant for each of `print_ids` that has it.
    pub async fn urls_for_version<'e, E: PgExecutor<'e>>(
        executor: E,
        print_ids: &[DbId],
        version: &str,
    ) -> Result<HashMap<DbId, String>, sqlx::Error> {
        if print_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(DbId, String)> = sqlx::query_as(
            "SELECT print_id, public_url FROM images \
             WHERE print_id = ANY($1) AND version = $2",
        )
        .bind(print_ids)
        .bind(version)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Delete every variant of a print. Returns the number removed.
    pub async fn delete_for_print<'e, E: PgExecutor<'e>>(
        executor: E,
        print_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE print_id = $1")
            .bind(print_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
