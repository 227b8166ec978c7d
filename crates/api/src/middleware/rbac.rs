//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers below a minimum
//! role with 403. Roles are ordered `user < editor < admin < super_admin`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Reject `user` unless their role is at least `required`.
fn require_role(user: AuthUser, required: Role, message: &str) -> Result<AuthUser, AppError> {
    if !user.role.at_least(required) {
        tracing::debug!(
            user_id = user.user_id,
            role = %user.role,
            required = %required,
            "Insufficient role"
        );
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    Ok(user)
}

/// Requires `editor` or above.
///
/// ```ignore
/// async fn edit(RequireEditor(user): RequireEditor) -> AppResult<Envelope> { ... }
/// ```
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, Role::Editor, "ليس لديك صلاحية للتحرير").map(RequireEditor)
    }
}

/// Requires `admin` or `super_admin`.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, Role::Admin, "ليس لديك صلاحية المدير").map(RequireAdmin)
    }
}

/// Requires `super_admin`.
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, Role::SuperAdmin, "ليس لديك صلاحية المدير الرئيسي")
            .map(RequireSuperAdmin)
    }
}
