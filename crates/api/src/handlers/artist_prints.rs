//! Handlers for `/artist/prints`: the calling artist's own prints.

use atelier_core::catalog::Visibility;
use atelier_core::error::CoreError;
use atelier_core::language::LanguageCode;
use atelier_core::pagination::Page;
use atelier_core::types::DbId;
use atelier_db::models::artist::Artist;
use atelier_db::models::catalog::{PrintCard, PrintDetail};
use atelier_db::repositories::CatalogRepo;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::artist_galleries::artist_language;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthArtist;
use crate::query::{DetailParams, PrintListParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::{ImageUpload, PrintInput, ProcessingStatus};

/// Multipart part carrying the JSON [`PrintInput`].
const DATA_PART: &str = "data";
/// Multipart part carrying the image file.
const IMAGE_PART: &str = "image";

/// A freshly created print and whether processing was acknowledged.
#[derive(Debug, Serialize)]
pub struct PrintCreated {
    #[serde(flatten)]
    pub print: PrintDetail,
    pub processing: ProcessingStatus,
}

async fn load_detail(
    state: &AppState,
    artist: &Artist,
    id: DbId,
    language: &LanguageCode,
    image_version: Option<&str>,
) -> AppResult<PrintDetail> {
    CatalogRepo::print_detail(
        &state.pool,
        id,
        Visibility::OwnedBy(artist.id),
        language,
        image_version,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "Print", id }))
}

/// GET /api/v1/artist/prints
pub async fn list(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Query(params): Query<PrintListParams>,
) -> AppResult<Json<DataResponse<Page<PrintCard>>>> {
    let language = artist_language(params.language.as_deref(), &artist)?;
    let page = CatalogRepo::list_prints(
        &state.pool,
        &params.filter(),
        Visibility::OwnedBy(artist.id),
        params.sort.unwrap_or_default(),
        params.page_request(),
        &language,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/artist/prints
///
/// Multipart body: a `data` part with the print as JSON and an optional
/// `image` file part.
pub async fn create(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PrintCreated>>)> {
    let mut input: Option<PrintInput> = None;
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            DATA_PART => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid print data: {e}")))?;
                input = Some(parsed);
            }
            IMAGE_PART => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::BadRequest("The image part needs a Content-Type".into())
                    })?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                upload = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    let input =
        input.ok_or_else(|| AppError::BadRequest(format!("Missing '{DATA_PART}' part")))?;
    let language = artist_language(input.language.as_deref(), &artist)?;

    let created = state
        .workflow
        .create_print(artist.id, &input, &language, upload)
        .await?;
    let print = load_detail(&state, &artist, created.print_id, &language, None).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PrintCreated {
                print,
                processing: created.processing,
            },
        }),
    ))
}

/// GET /api/v1/artist/prints/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<DataResponse<PrintDetail>>> {
    let language = artist_language(params.language.as_deref(), &artist)?;
    let print = load_detail(&state, &artist, id, &language, params.image_version()).await?;
    Ok(Json(DataResponse { data: print }))
}

/// PUT /api/v1/artist/prints/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
    Json(input): Json<PrintInput>,
) -> AppResult<Json<DataResponse<PrintDetail>>> {
    let language = artist_language(input.language.as_deref(), &artist)?;
    state
        .workflow
        .update_print(artist.id, id, &input, &language)
        .await?;
    let print = load_detail(&state, &artist, id, &language, None).await?;
    Ok(Json(DataResponse { data: print }))
}

/// DELETE /api/v1/artist/prints/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthArtist(artist): AuthArtist,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.workflow.delete_print(artist.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
