//! Handlers for the `/sources` resource.

use axum::extract::State;
use serde::Deserialize;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::source::SourceType;
use yemenpedia_core::types::DbId;
use yemenpedia_db::models::source::{CreateSource, SourceFilter, UpdateSource};
use yemenpedia_db::repositories::SourceRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{flag, ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{message_only, Envelope};
use crate::state::AppState;

/// Query parameters for `GET /sources`.
#[derive(Debug, Default, Deserialize)]
pub struct SourceListParams {
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub verified: Option<bool>,
    #[serde(default, alias = "isOfficial", deserialize_with = "flag")]
    pub official: Option<bool>,
}

/// GET /api/v1/sources
pub async fn list_sources(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SourceListParams>,
) -> AppResult<Envelope> {
    let source_type = match params.source_type.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Some(t.parse::<SourceType>()?),
        _ => None,
    };
    let filter = SourceFilter {
        source_type,
        verified: params.verified,
        is_official: params.official,
    };

    let sources = SourceRepo::list(&state.pool, &filter).await?;
    Ok(Envelope::ok().with("sources", sources))
}

/// GET /api/v1/sources/{id}
pub async fn get_source(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    let source = SourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("source", id)))?;
    Ok(Envelope::ok().with("source", source))
}

/// POST /api/v1/sources
pub async fn create_source(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateSource>,
) -> AppResult<Envelope> {
    let source = SourceRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        source_id = source.id,
        name = %source.name,
        "Source created"
    );

    Ok(Envelope::created()
        .message("تم إضافة المصدر بنجاح")
        .with("source", source))
}

/// PUT /api/v1/sources/{id}
pub async fn update_source(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateSource>,
) -> AppResult<Envelope> {
    let source = SourceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("source", id)))?;

    tracing::info!(user_id = admin.user_id, source_id = id, "Source updated");

    Ok(Envelope::ok()
        .message("تم تحديث المصدر بنجاح")
        .with("source", source))
}

/// DELETE /api/v1/sources/{id}
pub async fn delete_source(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    if !SourceRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("source", id)));
    }

    tracing::info!(user_id = admin.user_id, source_id = id, "Source deleted");

    Ok(message_only("تم حذف المصدر بنجاح"))
}
