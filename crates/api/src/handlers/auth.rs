//! Handlers for the `/auth` resource (register, login, profile, password).

use axum::extract::State;
use serde::Deserialize;
use validator::Validate;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::roles::Role;
use yemenpedia_db::models::user::{CreateUser, UpdateProfile, User, UserResponse};
use yemenpedia_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_dummy, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::{trimmed, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::response::{message_only, Envelope};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "البريد الإلكتروني أو كلمة المرور غير صحيحة";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 30, message = "اسم المستخدم يجب أن يكون بين 3 و 30 حرف"))]
    pub username: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "البريد الإلكتروني غير صالح"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "الاسم المعروض مطلوب"))]
    pub display_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "البريد الإلكتروني مطلوب"))]
    pub email: String,
    #[validate(length(min = 1, message = "كلمة المرور مطلوبة"))]
    pub password: String,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "كلمة المرور الحالية مطلوبة"))]
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a plain `user` account and return a token for it.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<Envelope> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let username = input.username;
    let email = input.email.to_lowercase();

    if UserRepo::identity_taken(&state.pool, &username, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "المستخدم موجود مسبقاً".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            display_name: input.display_name,
            role: Role::User,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let token = issue_token(&state, &user)?;
    Ok(Envelope::created()
        .message("تم إنشاء الحساب بنجاح")
        .with("token", token)
        .with("user", UserResponse::from(user)))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Envelope> {
    let email = input.email.trim().to_lowercase();
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        verify_dummy(&input.password);
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    };

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::debug!(user_id = user.id, "Login rejected");
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    }

    tracing::info!(user_id = user.id, "User logged in");

    let token = issue_token(&state, &user)?;
    Ok(Envelope::ok()
        .message("تم تسجيل الدخول بنجاح")
        .with("token", token)
        .with("user", UserResponse::from(user)))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser) -> AppResult<Envelope> {
    Ok(Envelope::ok().with("user", UserResponse::from(auth.user)))
}

/// PUT /api/v1/auth/profile
///
/// Update display name, bio and avatar. Never touches the password.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<UpdateProfile>,
) -> AppResult<Envelope> {
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("user", auth.user_id)))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Envelope::ok()
        .message("تم تحديث الملف الشخصي")
        .with("user", UserResponse::from(user)))
}

/// PUT /api/v1/auth/password
///
/// Verify the current password, then store a freshly salted hash of the new one.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<ChangePasswordRequest>,
) -> AppResult<Envelope> {
    let valid = verify_password(&input.current_password, &auth.user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::BadRequest("كلمة المرور الحالية غير صحيحة".into()));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, auth.user_id, &password_hash).await? {
        return Err(AppError::Core(CoreError::not_found("user", auth.user_id)));
    }

    tracing::info!(user_id = auth.user_id, "Password changed");

    Ok(message_only("تم تغيير كلمة المرور بنجاح"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    generate_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}
