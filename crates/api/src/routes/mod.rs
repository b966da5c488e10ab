pub mod admin;
pub mod artist;
pub mod catalog;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /galleries                                     public listing
/// /galleries/{id}                                public detail
/// /prints                                        public listing (filters)
/// /prints/{id}                                   public detail
///
/// /artist/galleries                              list, create (artist)
/// /artist/galleries/{id}                         get, update, delete
/// /artist/galleries/{id}/prints                  ordered members, bulk reorder
/// /artist/galleries/{id}/prints/{print_id}       add, remove
/// /artist/prints                                 list, create (multipart)
/// /artist/prints/{id}                            get, update, delete
///
/// /admin/artists                                 list, create (admin only)
/// /admin/artists/{id}                            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/artist", artist::router())
        .nest("/admin", admin::router())
}
