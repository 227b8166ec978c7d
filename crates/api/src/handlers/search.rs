//! Handlers for full-text search and title suggestions.

use axum::extract::State;
use serde::Deserialize;
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::search::{
    build_tsquery, contains_pattern, meets_minimum, validate_query, SUGGESTION_LIMIT,
};
use yemenpedia_core::types::DbId;
use yemenpedia_db::models::article::ArticleSuggestion;
use yemenpedia_db::repositories::SearchRepo;

use super::articles::hydrate_summaries;
use crate::error::AppResult;
use crate::extract::{lenient_int, optional_id, ValidQuery};
use crate::middleware::auth::MaybeUser;
use crate::response::Envelope;
use crate::state::AppState;

/// Query parameters for `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub category: Option<DbId>,
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
}

/// Query parameters for `GET /search/suggestions`.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/search
///
/// Ranked published articles. Queries with no searchable terms yield an
/// empty page rather than an error.
pub async fn search(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidQuery(params): ValidQuery<SearchParams>,
) -> AppResult<Envelope> {
    validate_query(&params.q)?;
    let query = params.q.trim().to_string();
    let page = PageRequest::new(params.page, params.limit);
    let tag = params.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let (rows, total) = match build_tsquery(&query) {
        Some(tsquery) => {
            let rows =
                SearchRepo::search(&state.pool, &tsquery, params.category, tag, page).await?;
            let total = SearchRepo::count(&state.pool, &tsquery, params.category, tag).await?;
            (rows, total)
        }
        None => (Vec::new(), 0),
    };

    tracing::debug!(viewer_id = ?viewer.user_id(), query = %query, total, "Search");

    let results = hydrate_summaries(&state.pool, rows).await?;
    Ok(Envelope::ok()
        .with("query", query)
        .with("results", results)
        .with("pagination", page.summary(total)))
}

/// GET /api/v1/search/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SuggestParams>,
) -> AppResult<Envelope> {
    if !meets_minimum(&params.q) {
        return Ok(Envelope::ok().with("suggestions", Vec::<ArticleSuggestion>::new()));
    }

    let pattern = contains_pattern(&params.q);
    let suggestions = SearchRepo::suggest(&state.pool, &pattern, SUGGESTION_LIMIT).await?;
    Ok(Envelope::ok().with("suggestions", suggestions))
}
