//! Repository for the `users` table.

use sqlx::PgPool;
use yemenpedia_core::moderation::{EditorResolution, EditorStatus};
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::roles::Role;
use yemenpedia_core::search::contains_pattern;
use yemenpedia_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateProfile, User, UserFilter, UserStats, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, display_name, role, \
                       editor_status, editor_request_date, editor_approved_by, \
                       bio, avatar, contributions, verified, created_at, updated_at";

/// Shared WHERE clause for [`UserRepo::list`] and [`UserRepo::count`].
const FILTER: &str = "($1::TEXT IS NULL OR role = $1)
               AND ($2::TEXT IS NULL OR editor_status = $2)
               AND ($3::TEXT IS NULL
                    OR username ILIKE $3 OR email ILIKE $3 OR display_name ILIKE $3)";

/// Provides CRUD and moderation operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, display_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether a username or email is already taken.
    pub async fn identity_taken(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Whether any super-admin account exists.
    pub async fn super_admin_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = $1)")
            .bind(Role::SuperAdmin.as_str())
            .fetch_one(pool)
            .await
    }

    /// List users matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(filter.role.map(Role::as_str))
            .bind(filter.editor_status.map(EditorStatus::as_str))
            .bind(filter.search.as_deref().map(contains_pattern))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count users matching `filter`.
    pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.role.map(Role::as_str))
            .bind(filter.editor_status.map(EditorStatus::as_str))
            .bind(filter.search.as_deref().map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    /// Public identities for a set of ids, in no particular order.
    pub async fn summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, display_name, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Update profile fields. Only non-`None` fields are applied; the
    /// password hash is never touched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                avatar = COALESCE($4, avatar)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.bio)
            .bind(&input.avatar)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add one to a user's contribution counter.
    pub async fn increment_contributions(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET contributions = contributions + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark an editor request as pending.
    ///
    /// Guarded in SQL as well: only a plain user without a pending request
    /// is updated, so two concurrent requests cannot both succeed. Returns
    /// `None` when the guard did not match.
    pub async fn submit_editor_request(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                editor_status = $2,
                editor_request_date = $3
             WHERE id = $1
               AND role = $4
               AND editor_status IS DISTINCT FROM $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(EditorStatus::Pending.as_str())
            .bind(now)
            .bind(Role::User.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Apply an approve/reject outcome to a user whose request is still
    /// pending. Returns `None` if the request was no longer pending.
    pub async fn resolve_editor_request(
        pool: &PgPool,
        id: DbId,
        resolution: &EditorResolution,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                editor_status = $2,
                role = COALESCE($3, role),
                editor_approved_by = COALESCE($4, editor_approved_by)
             WHERE id = $1 AND editor_status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(resolution.status.as_str())
            .bind(resolution.new_role.map(Role::as_str))
            .bind(resolution.approved_by)
            .bind(EditorStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Set a user's role. Returns `None` if no row with the given `id` exists.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a non-super-admin user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role <> $2")
            .bind(id)
            .bind(Role::SuperAdmin.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users with a pending editor request, most recent request first.
    pub async fn list_pending_requests(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE editor_status = $1
             ORDER BY editor_request_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(EditorStatus::Pending.as_str())
            .fetch_all(pool)
            .await
    }

    /// Dashboard counters. `month_start` bounds the "new this month" count.
    pub async fn stats(pool: &PgPool, month_start: Timestamp) -> Result<UserStats, sqlx::Error> {
        sqlx::query_as::<_, UserStats>(
            "SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE role = 'editor') AS total_editors,
                COUNT(*) FILTER (WHERE role IN ('admin', 'super_admin')) AS total_admins,
                COUNT(*) FILTER (WHERE editor_status = 'pending') AS pending_requests,
                COUNT(*) FILTER (WHERE created_at >= $1) AS new_users_this_month
             FROM users",
        )
        .bind(month_start)
        .fetch_one(pool)
        .await
    }
}
