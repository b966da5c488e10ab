//! Routes mounted at `/artist`. Every handler requires a token whose
//! subject is a registered artist.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{artist_galleries, artist_prints};
use crate::state::AppState;

/// ```text
/// GET    /galleries                          -> list
/// POST   /galleries                          -> create
/// GET    /galleries/{id}                     -> get_by_id
/// PUT    /galleries/{id}                     -> update
/// DELETE /galleries/{id}                     -> delete
/// GET    /galleries/{id}/prints              -> list_prints
/// PUT    /galleries/{id}/prints              -> reorder_prints
/// POST   /galleries/{id}/prints/{print_id}   -> add_print (?position=)
/// DELETE /galleries/{id}/prints/{print_id}   -> remove_print
///
/// GET    /prints                             -> list
/// POST   /prints                             -> create
/// GET    /prints/{id}                        -> get_by_id
/// PUT    /prints/{id}                        -> update
/// DELETE /prints/{id}                        -> delete
/// ```
pub fn router() -> Router<AppState> {
    let gallery_routes = Router::new()
        .route(
            "/",
            get(artist_galleries::list).post(artist_galleries::create),
        )
        .route(
            "/{id}",
            get(artist_galleries::get_by_id)
                .put(artist_galleries::update)
                .delete(artist_galleries::delete),
        )
        .route(
            "/{id}/prints",
            get(artist_galleries::list_prints).put(artist_galleries::reorder_prints),
        )
        .route(
            "/{id}/prints/{print_id}",
            post(artist_galleries::add_print).delete(artist_galleries::remove_print),
        );

    let print_routes = Router::new()
        .route("/", get(artist_prints::list).post(artist_prints::create))
        .route(
            "/{id}",
            get(artist_prints::get_by_id)
                .put(artist_prints::update)
                .delete(artist_prints::delete),
        );

    Router::new()
        .nest("/galleries", gallery_routes)
        .nest("/prints", print_routes)
}
