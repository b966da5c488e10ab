//! JWT-based identity extractors for Axum handlers.

use atelier_core::error::CoreError;
use atelier_db::models::artist::Artist;
use atelier_db::repositories::ArtistRepo;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity taken from a Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider subject (`claims.sub`).
    pub external_id: String,
    /// Role name (e.g. `"admin"`, `"artist"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            external_id: claims.sub,
            role: claims.role,
        })
    }
}

/// The artist record behind the caller's token.
///
/// Rejects with `ArtistNotFound` (404) when the subject has no artist row.
///
/// ```ignore
/// async fn my_galleries(AuthArtist(artist): AuthArtist) -> AppResult<Json<()>> {
///     tracing::info!(artist_id = artist.id, "listing galleries");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthArtist(pub Artist);

impl FromRequestParts<AppState> for AuthArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let artist = ArtistRepo::find_by_external_id(&state.pool, &user.external_id)
            .await?
            .ok_or(CoreError::ArtistNotFound {
                external_id: user.external_id,
            })?;
        Ok(AuthArtist(artist))
    }
}
