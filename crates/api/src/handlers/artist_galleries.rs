//! Handlers for `/artist/galleries`: the calling artist's own galleries
//! and their ordered membership.
//!
//! Another artist's gallery answers exactly like a missing one (404).

use atelier_core::catalog::{PrintFilter, Visibility};
use atelier_core::error::CoreError;
use atelier_core::language::LanguageCode;
use atelier_core::ordering::OrderAssignment;
use atelier_core::pagination::Page;
use atelier_core::types::DbId;
use atelier_db::models::artist::Artist;
use atelier_db::models::catalog::{GalleryDetail, GallerySummary, PrintCard};
use atelier_db::models::gallery_print::GalleryPrint;
use atelier_db::repositories::CatalogRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthArtist;
use crate::query::{DetailParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::{CatalogWorkflow, GalleryInput};

/// Body of a bulk reorder.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub prints: Vec<OrderAssignment>,
}

/// `?position=` for adding a print; omitted means append.
#[derive(Debug, Deserialize)]
pub struct AddPrintParams {
    pub position: Option<i64>,
}

/// The requested language, else the artist's default.
pub(crate) fn artist_language(
    requested: Option<&str>,
    artist: &Artist,
) -> Result<LanguageCode, CoreError> {
    LanguageCode::resolve(requested, &artist.default_language)
}

async fn load_detail(
    state: &AppState,
    artist: &Artist,
    id: DbId,
    language: &LanguageCode,
) -> AppResult<GalleryDetail> {
    CatalogRepo::gallery_detail(&state.pool, id, Visibility::OwnedBy(artist.id), language)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Gallery",
            id,
        }))
}

/// GET /api/v1/artist/galleries
pub async fn list(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<GallerySummary>>>> {
    let language = artist_language(params.language.as_deref(), &artist)?;
    let page = CatalogRepo::list_galleries(
        &state.pool,
        Visibility::OwnedBy(artist.id),
        params.sort.unwrap_or_default(),
        params.page_request(),
        &language,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/artist/galleries
pub async fn create(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Json(input): Json<GalleryInput>,
) -> AppResult<(StatusCode, Json<DataResponse<GalleryDetail>>)> {
    let language = artist_language(input.language.as_deref(), &artist)?;
    let id = state
        .workflow
        .create_gallery(artist.id, &input, &language)
        .await?;
    let gallery = load_detail(&state, &artist, id, &language).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: gallery })))
}

/// GET /api/v1/artist/galleries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<DataResponse<GalleryDetail>>> {
    let language = artist_language(params.language.as_deref(), &artist)?;
    let gallery = load_detail(&state, &artist, id, &language).await?;
    Ok(Json(DataResponse { data: gallery }))
}

/// PUT /api/v1/artist/galleries/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Json(input): Json<GalleryInput>,
) -> AppResult<Json<DataResponse<GalleryDetail>>> {
    let language = artist_language(input.language.as_deref(), &artist)?;
    state
        .workflow
        .update_gallery(artist.id, id, &input, &language)
        .await?;
    let gallery = load_detail(&state, &artist, id, &language).await?;
    Ok(Json(DataResponse { data: gallery }))
}

/// DELETE /api/v1/artist/galleries/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.workflow.delete_gallery(artist.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/artist/galleries/{id}/prints
///
/// Members in gallery order, any status.
pub async fn list_prints(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<PrintCard>>>> {
    let language = artist_language(params.language.as_deref(), &artist)?;
    CatalogWorkflow::owned_gallery(&state.pool, artist.id, id).await?;

    let filter = PrintFilter {
        gallery_id: Some(id),
        ..Default::default()
    };
    let page = CatalogRepo::list_prints(
        &state.pool,
        &filter,
        Visibility::OwnedBy(artist.id),
        params.sort.unwrap_or_default(),
        params.page_request(),
        &language,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/v1/artist/galleries/{id}/prints
///
/// Returns the gallery's full order after the batch is applied.
pub async fn reorder_prints(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<OrderAssignment>>>> {
    let order = state
        .workflow
        .update_print_order(artist.id, id, &input.prints)
        .await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/artist/galleries/{id}/prints/{print_id}
pub async fn add_print(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path((id, print_id)): Path<(DbId, DbId)>,
    Query(params): Query<AddPrintParams>,
) -> AppResult<(StatusCode, Json<DataResponse<GalleryPrint>>)> {
    let member = state
        .workflow
        .add_print_to_gallery(artist.id, id, print_id, params.position)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// DELETE /api/v1/artist/galleries/{id}/prints/{print_id}
pub async fn remove_print(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path((id, print_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    state
        .workflow
        .remove_print_from_gallery(artist.id, id, print_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
