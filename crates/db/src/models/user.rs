//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yemenpedia_core::moderation::EditorStatus;
use yemenpedia_core::roles::Role;
use yemenpedia_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub editor_status: Option<String>,
    pub editor_request_date: Option<Timestamp>,
    pub editor_approved_by: Option<DbId>,
    pub bio: String,
    pub avatar: String,
    pub contributions: i32,
    pub verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. The column is CHECK-constrained, so an unknown value
    /// can only come from manual tampering and is treated as the lowest role.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }

    pub fn editor_status(&self) -> Option<EditorStatus> {
        self.editor_status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub editor_status: Option<String>,
    pub editor_request_date: Option<Timestamp>,
    pub editor_approved_by: Option<DbId>,
    pub bio: String,
    pub avatar: String,
    pub contributions: i32,
    pub verified: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            role: u.role,
            editor_status: u.editor_status,
            editor_request_date: u.editor_request_date,
            editor_approved_by: u.editor_approved_by,
            bio: u.bio,
            avatar: u.avatar,
            contributions: u.contributions,
            verified: u.verified,
            created_at: u.created_at,
        }
    }
}

/// Public identity embedded in articles and revisions.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
}

/// Self-service profile changes. All fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 100, message = "الاسم المعروض يجب أن يكون بين 1 و 100 حرف"))]
    pub display_name: Option<String>,
    #[validate(length(max = 500, message = "النبذة يجب ألا تتجاوز 500 حرف"))]
    pub bio: Option<String>,
    #[validate(length(max = 2048, message = "رابط الصورة طويل جداً"))]
    pub avatar: Option<String>,
}

/// Filters for the admin user listing.
#[derive(Debug, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub editor_status: Option<EditorStatus>,
    /// Case-insensitive substring over username, email and display name.
    pub search: Option<String>,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub total_editors: i64,
    /// Admins and super-admins together.
    pub total_admins: i64,
    pub pending_requests: i64,
    pub new_users_this_month: i64,
}
