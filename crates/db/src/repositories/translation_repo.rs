//! Repository for the `translations` table.
//!
//! Lookups are exact on `(entity_type, entity_id, field_name,
//! language_code)`. Nothing here substitutes another language for a
//! missing row; callers pass the default they want shown instead.

use std::collections::HashMap;

use atelier_core::language::LanguageCode;
use atelier_core::translation::{EntityRef, EntityType, TextField, UpsertOutcome};
use atelier_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::translation::Translation;

const COLUMNS: &str =
    "id, entity_type, entity_id, field_name, language_code, content, created_at, updated_at";

fn field_names(fields: &[TextField]) -> Vec<String> {
    fields.iter().map(|f| f.as_str().to_string()).collect()
}

/// Read and write access to localised text.
pub struct TranslationRepo;

impl TranslationRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The content of one field in one language, or `None` if no row exists.
    pub async fn resolve<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
        field: TextField,
        language: &LanguageCode,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT content FROM translations \
             WHERE entity_type = $1 AND entity_id = $2 \
               AND field_name = $3 AND language_code = $4",
        )
        .bind(entity.entity_type.as_str())
        .bind(entity.entity_id)
        .bind(field.as_str())
        .bind(language.as_str())
        .fetch_optional(executor)
        .await
    }

    /// Like [`resolve`](Self::resolve) but substitutes `default` for a
    /// missing row.
    pub async fn resolve_or<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
        field: TextField,
        language: &LanguageCode,
        default: &str,
    ) -> Result<String, sqlx::Error> {
        let found = Self::resolve(executor, entity, field, language).await?;
        Ok(found.unwrap_or_else(|| default.to_string()))
    }

    /// Resolve several fields at once. Only fields that have a row appear
    /// in the result.
    pub async fn resolve_all<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
        fields: &[TextField],
        language: &LanguageCode,
    ) -> Result<HashMap<TextField, String>, sqlx::Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT field_name, content FROM translations \
             WHERE entity_type = $1 AND entity_id = $2 \
               AND field_name = ANY($3) AND language_code = $4",
        )
        .bind(entity.entity_type.as_str())
        .bind(entity.entity_id)
        .bind(field_names(fields))
        .bind(language.as_str())
        .fetch_all(executor)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(name, content)| TextField::from_name(&name).map(|f| (f, content)))
            .collect())
    }

    /// Batch form of [`resolve_all`](Self::resolve_all) for a page of
    /// entities of one type. Entities with no rows are absent from the map.
    pub async fn resolve_for_entities<'e, E: PgExecutor<'e>>(
        executor: E,
        entity_type: EntityType,
        entity_ids: &[DbId],
        fields: &[TextField],
        language: &LanguageCode,
    ) -> Result<HashMap<DbId, HashMap<TextField, String>>, sqlx::Error> {
        if entity_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(DbId, String, String)> = sqlx::query_as(
            "SELECT entity_id, field_name, content FROM translations \
             WHERE entity_type = $1 AND entity_id = ANY($2) \
               AND field_name = ANY($3) AND language_code = $4",
        )
        .bind(entity_type.as_str())
        .bind(entity_ids)
        .bind(field_names(fields))
        .bind(language.as_str())
        .fetch_all(executor)
        .await?;

        let mut resolved: HashMap<DbId, HashMap<TextField, String>> = HashMap::new();
        for (entity_id, name, content) in rows {
            if let Some(field) = TextField::from_name(&name) {
                resolved.entry(entity_id).or_default().insert(field, content);
            }
        }
        Ok(resolved)
    }

    /// Every translation row of an entity, all fields and languages.
    pub async fn list_for_entity<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
    ) -> Result<Vec<Translation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM translations \
             WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY field_name, language_code"
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(entity.entity_type.as_str())
            .bind(entity.entity_id)
            .fetch_all(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create the row if absent, update it if the content differs, and do
    /// nothing if the content is identical.
    ///
    /// The `WHERE` on the conflict branch suppresses no-op updates, so an
    /// unchanged row is neither rewritten nor returned. `xmax = 0` holds
    /// only for a freshly inserted tuple.
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
        field: TextField,
        language: &LanguageCode,
        content: &str,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        let inserted = sqlx::query_scalar::<_, bool>(
            "INSERT INTO translations (entity_type, entity_id, field_name, language_code, content) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_translations_entity_field_language \
             DO UPDATE SET content = EXCLUDED.content \
             WHERE translations.content IS DISTINCT FROM EXCLUDED.content \
             RETURNING (xmax = 0)",
        )
        .bind(entity.entity_type.as_str())
        .bind(entity.entity_id)
        .bind(field.as_str())
        .bind(language.as_str())
        .bind(content)
        .fetch_optional(executor)
        .await?;

        Ok(match inserted {
            Some(true) => UpsertOutcome::Inserted,
            Some(false) => UpsertOutcome::Updated,
            None => UpsertOutcome::Unchanged,
        })
    }

    /// Delete one field in one language. Returns `true` if a row was removed.
    pub async fn delete<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
        field: TextField,
        language: &LanguageCode,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM translations \
             WHERE entity_type = $1 AND entity_id = $2 \
               AND field_name = $3 AND language_code = $4",
        )
        .bind(entity.entity_type.as_str())
        .bind(entity.entity_id)
        .bind(field.as_str())
        .bind(language.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every translation of an entity. Returns the number removed.
    pub async fn delete_for_entity<'e, E: PgExecutor<'e>>(
        executor: E,
        entity: EntityRef,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM translations WHERE entity_type = $1 AND entity_id = $2")
                .bind(entity.entity_type.as_str())
                .bind(entity.entity_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
