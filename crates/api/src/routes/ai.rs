//! Route definitions for the `/ai` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /ask                   -> ask
/// POST /suggest-improvements  -> suggest_improvements (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ai::ask))
        .route("/suggest-improvements", post(ai::suggest_improvements))
}
