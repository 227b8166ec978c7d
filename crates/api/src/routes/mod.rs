pub mod ai;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod health;
pub mod search;
pub mod sources;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth         register, login, me, profile, password
/// /articles     list, create, get by slug, update, delete, revisions
/// /categories   list, create, get by slug, update, delete
/// /sources      list, create, get, update, delete
/// /search       full-text search, title suggestions
/// /ai           ask, suggest-improvements
/// /users        administration and editor requests
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/articles", articles::router())
        .nest("/categories", categories::router())
        .nest("/sources", sources::router())
        .nest("/search", search::router())
        .nest("/ai", ai::router())
        .nest("/users", users::router())
}
