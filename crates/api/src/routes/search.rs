//! Route definitions for the `/search` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET /              -> search (?q=&category=&tag=&page=&limit=)
/// GET /suggestions   -> suggestions (?q=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/suggestions", get(search::suggestions))
}
