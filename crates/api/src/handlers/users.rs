//! Handlers for user administration and the editor-request workflow.

use axum::extract::State;
use chrono::{Datelike, TimeZone, Utc};
use serde::Deserialize;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::moderation::{
    check_editor_request, check_role_change, check_user_deletion, resolve_editor_request,
    EditorStatus, ModerationError,
};
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::roles::Role;
use yemenpedia_core::types::{DbId, Timestamp};
use yemenpedia_db::models::user::{UserFilter, UserResponse};
use yemenpedia_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{lenient_int, JsonBody, ValidPath, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::response::{message_only, Envelope};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    pub role: Option<String>,
    pub editor_status: Option<String>,
    pub search: Option<String>,
}

/// Request body for `PUT /users/editor-request/{id}`.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub action: String,
}

/// Request body for `PUT /users/role/{id}`.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    #[serde(default)]
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidQuery(params): ValidQuery<UserListParams>,
) -> AppResult<Envelope> {
    let filter = UserFilter {
        role: non_blank(params.role.as_deref())
            .map(str::parse::<Role>)
            .transpose()?,
        editor_status: non_blank(params.editor_status.as_deref())
            .map(str::parse::<EditorStatus>)
            .transpose()?,
        search: non_blank(params.search.as_deref()).map(str::to_string),
    };
    let page = PageRequest::new(params.page, params.limit);

    let users: Vec<UserResponse> = UserRepo::list(&state.pool, &filter, page)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    let total = UserRepo::count(&state.pool, &filter).await?;

    Ok(Envelope::ok()
        .with("users", users)
        .with("pagination", page.summary(total)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", id)))?;
    Ok(Envelope::ok().with("user", UserResponse::from(user)))
}

/// DELETE /api/v1/users/{id}
///
/// Super-admins can never be deleted.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireSuperAdmin(actor): RequireSuperAdmin,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", id)))?;
    check_user_deletion(target.role())?;

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("user", id)));
    }

    tracing::info!(user_id = actor.user_id, target_id = id, "User deleted");

    Ok(message_only("تم حذف المستخدم بنجاح"))
}

/// POST /api/v1/users/request-editor
pub async fn request_editor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Envelope> {
    check_editor_request(auth.role, auth.user.editor_status())?;

    // The SQL guard also rejects a request that raced with another one.
    let user = UserRepo::submit_editor_request(&state.pool, auth.user_id, Utc::now())
        .await?
        .ok_or(ModerationError::AlreadyPending)?;

    tracing::info!(user_id = user.id, "Editor request submitted");

    Ok(Envelope::ok()
        .message("تم إرسال طلبك للتحرير بنجاح")
        .with("user", UserResponse::from(user)))
}

/// PUT /api/v1/users/editor-request/{id}
///
/// Body: `{ "action": "approve" | "reject" }`.
pub async fn resolve_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
    JsonBody(input): JsonBody<ResolveRequest>,
) -> AppResult<Envelope> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", id)))?;

    let resolution = resolve_editor_request(admin.user_id, target.editor_status(), &input.action)?;

    let user = UserRepo::resolve_editor_request(&state.pool, id, &resolution)
        .await?
        .ok_or(ModerationError::NoPendingRequest)?;

    tracing::info!(
        user_id = admin.user_id,
        target_id = id,
        status = resolution.status.as_str(),
        "Editor request resolved"
    );

    let message = match resolution.status {
        EditorStatus::Approved => "تمت الموافقة على الطلب",
        _ => "تم رفض الطلب",
    };
    Ok(Envelope::ok()
        .message(message)
        .with("user", UserResponse::from(user)))
}

/// PUT /api/v1/users/role/{id}
pub async fn change_role(
    State(state): State<AppState>,
    RequireSuperAdmin(actor): RequireSuperAdmin,
    ValidPath(id): ValidPath<DbId>,
    JsonBody(input): JsonBody<ChangeRoleRequest>,
) -> AppResult<Envelope> {
    let role: Role = input.role.trim().parse()?;

    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", id)))?;
    check_role_change(actor.user_id, id, target.role())?;

    let user = UserRepo::update_role(&state.pool, id, role)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", id)))?;

    tracing::info!(
        user_id = actor.user_id,
        target_id = id,
        from = %target.role,
        to = %role,
        "Role changed"
    );

    Ok(Envelope::ok()
        .message("تم تغيير الدور بنجاح")
        .with("user", UserResponse::from(user)))
}

/// GET /api/v1/users/editor-requests/pending
pub async fn pending_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Envelope> {
    let requests: Vec<UserResponse> = UserRepo::list_pending_requests(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Envelope::ok()
        .with("count", requests.len())
        .with("requests", requests))
}

/// GET /api/v1/users/stats/overview
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Envelope> {
    let stats = UserRepo::stats(&state.pool, month_start(Utc::now())).await?;
    Ok(Envelope::ok().with("stats", stats))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Midnight UTC on the first day of `now`'s month.
fn month_start(now: Timestamp) -> Timestamp {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
