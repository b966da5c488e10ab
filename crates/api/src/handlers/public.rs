//! Handlers for the public catalogue. Only published content is visible.

use atelier_core::catalog::Visibility;
use atelier_core::error::CoreError;
use atelier_core::pagination::Page;
use atelier_core::types::DbId;
use atelier_db::models::catalog::{GalleryDetail, GallerySummary, PrintCard, PrintDetail};
use atelier_db::repositories::CatalogRepo;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::AppResult;
use crate::query::{DetailParams, ListParams, PrintListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/galleries
pub async fn list_galleries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<GallerySummary>>>> {
    let language = params.language(&state.config.default_language)?;
    let page = CatalogRepo::list_galleries(
        &state.pool,
        Visibility::Published,
        params.sort.unwrap_or_default(),
        params.page_request(),
        &language,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/galleries/{id}
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<DataResponse<GalleryDetail>>> {
    let language = params.language(&state.config.default_language)?;
    let gallery = CatalogRepo::gallery_detail(&state.pool, id, Visibility::Published, &language)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Gallery",
            id,
        })?;
    Ok(Json(DataResponse { data: gallery }))
}

/// GET /api/v1/prints
pub async fn list_prints(
    State(state): State<AppState>,
    Query(params): Query<PrintListParams>,
) -> AppResult<Json<DataResponse<Page<PrintCard>>>> {
    let language = params.language(&state.config.default_language)?;
    let page = CatalogRepo::list_prints(
        &state.pool,
        &params.filter(),
        Visibility::Published,
        params.sort.unwrap_or_default(),
        params.page_request(),
        &language,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/prints/{id}
pub async fn get_print(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<DataResponse<PrintDetail>>> {
    let language = params.language(&state.config.default_language)?;
    let print = CatalogRepo::print_detail(
        &state.pool,
        id,
        Visibility::Published,
        &language,
        params.image_version(),
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Print",
        id,
    })?;
    Ok(Json(DataResponse { data: print }))
}
