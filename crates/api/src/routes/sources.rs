//! Route definitions for the `/sources` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::sources;
use crate::state::AppState;

/// Routes mounted at `/sources`.
///
/// ```text
/// GET    /      -> list_sources
/// POST   /      -> create_source (admin+)
/// GET    /{id}  -> get_source
/// PUT    /{id}  -> update_source (admin+)
/// DELETE /{id}  -> delete_source (admin+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sources::list_sources).post(sources::create_source))
        .route(
            "/{id}",
            get(sources::get_source)
                .put(sources::update_source)
                .delete(sources::delete_source),
        )
}
