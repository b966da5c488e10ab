//! Routes mounted at `/admin` (admin role only).

use axum::routing::get;
use axum::Router;

use crate::handlers::admin_artists;
use crate::state::AppState;

/// ```text
/// GET    /artists        -> list
/// POST   /artists        -> create
/// GET    /artists/{id}   -> get_by_id
/// PUT    /artists/{id}   -> update
/// DELETE /artists/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/artists",
            get(admin_artists::list).post(admin_artists::create),
        )
        .route(
            "/artists/{id}",
            get(admin_artists::get_by_id)
                .put(admin_artists::update)
                .delete(admin_artists::delete),
        )
}
