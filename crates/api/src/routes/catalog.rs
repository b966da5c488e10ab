//! Public catalogue routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// ```text
/// GET /galleries        -> list_galleries
/// GET /galleries/{id}   -> get_gallery
/// GET /prints           -> list_prints
/// GET /prints/{id}      -> get_print
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/galleries", get(public::list_galleries))
        .route("/galleries/{id}", get(public::get_gallery))
        .route("/prints", get(public::list_prints))
        .route("/prints/{id}", get(public::get_print))
}
