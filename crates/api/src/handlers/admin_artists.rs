//! Handlers for `/admin/artists` (admin only).

use atelier_core::error::CoreError;
use atelier_core::language::LanguageCode;
use atelier_core::pagination::Page;
use atelier_core::types::DbId;
use atelier_db::models::artist::{Artist, CreateArtist, UpdateArtist};
use atelier_db::repositories::ArtistRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Artist",
        id,
    })
}

/// Normalise an optional language code, rejecting malformed ones.
fn normalise_language(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    raw.map(|code| LanguageCode::parse(code).map(String::from))
        .transpose()
}

fn require_non_blank(name: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

/// GET /api/v1/admin/artists
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<Artist>>>> {
    let page = ArtistRepo::list(&state.pool, params.page_request()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/admin/artists
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateArtist>,
) -> AppResult<(StatusCode, Json<DataResponse<Artist>>)> {
    require_non_blank("external_id", &input.external_id)?;
    require_non_blank("username", &input.username)?;
    require_non_blank("email", &input.email)?;
    input.default_language = normalise_language(input.default_language.as_deref())?;

    let artist = ArtistRepo::create(&state.pool, &input).await?;
    tracing::info!(
        artist_id = artist.id,
        admin = %admin.external_id,
        "Artist registered",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: artist })))
}

/// GET /api/v1/admin/artists/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Artist>>> {
    let artist = ArtistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: artist }))
}

/// PUT /api/v1/admin/artists/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateArtist>,
) -> AppResult<Json<DataResponse<Artist>>> {
    if let Some(username) = &input.username {
        require_non_blank("username", username)?;
    }
    if let Some(email) = &input.email {
        require_non_blank("email", email)?;
    }
    input.default_language = normalise_language(input.default_language.as_deref())?;

    let artist = ArtistRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: artist }))
}

/// DELETE /api/v1/admin/artists/{id}
///
/// Removes the artist with all of their galleries, prints and text.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = ArtistRepo::delete(&mut tx, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    tx.commit().await?;

    tracing::info!(artist_id = id, admin = %admin.external_id, "Artist deleted");
    Ok(StatusCode::NO_CONTENT)
}
