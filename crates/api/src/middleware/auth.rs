//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::roles::Role;
use yemenpedia_core::types::DbId;
use yemenpedia_db::models::user::User;
use yemenpedia_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

const MISSING_TOKEN: &str = "الرجاء تسجيل الدخول للمتابعة";
const INVALID_TOKEN: &str = "الرجاء تسجيل الدخول مجدداً";
const USER_GONE: &str = "المستخدم غير موجود";

/// Authenticated caller.
///
/// The token only identifies the user; the row is loaded on every request
/// so role changes and deletions apply immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Envelope> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Envelope::ok())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MISSING_TOKEN.into())))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::Unauthorized(INVALID_TOKEN.into())))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(USER_GONE.into())))?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role(),
            user,
        })
    }
}

/// Optional caller for public routes that behave differently when signed in.
///
/// A missing, malformed or expired token, or a token for a deleted user,
/// yields `MaybeUser(None)`. Database failures still propagate.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Core(CoreError::Unauthorized(_))) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

impl MaybeUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
