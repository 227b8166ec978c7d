//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                          -> list_users (admin+)
/// GET    /{id}                      -> get_user (requires auth)
/// DELETE /{id}                      -> delete_user (super_admin)
/// POST   /request-editor            -> request_editor (requires auth)
/// PUT    /editor-request/{id}       -> resolve_request (admin+)
/// PUT    /role/{id}                 -> change_role (super_admin)
/// GET    /editor-requests/pending   -> pending_requests (admin+)
/// GET    /stats/overview            -> stats (admin+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/request-editor", post(users::request_editor))
        .route("/editor-requests/pending", get(users::pending_requests))
        .route("/stats/overview", get(users::stats))
        .route("/editor-request/{id}", put(users::resolve_request))
        .route("/role/{id}", put(users::change_role))
        .route("/{id}", get(users::get_user).delete(users::delete_user))
}
