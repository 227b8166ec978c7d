//! Route definitions for the `/articles` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// `GET /{slug}` and `PUT|DELETE /{id}` share one path segment; the handler
/// chosen by method decides how the segment is parsed.
///
/// ```text
/// GET    /                 -> list_articles
/// POST   /                 -> create_article (editor+)
/// GET    /{slug}           -> get_article (counts a view)
/// PUT    /{slug}           -> update_article by id (editor+)
/// DELETE /{slug}           -> delete_article by id (editor+)
/// GET    /{id}/revisions   -> list_revisions (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/{key}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/{key}/revisions", get(articles::list_revisions))
}
