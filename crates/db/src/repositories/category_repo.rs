//! Repository for the `categories` table.

use sqlx::PgPool;
use yemenpedia_core::category::{DEFAULT_COLOR, DEFAULT_ICON};
use yemenpedia_core::types::DbId;

use crate::models::category::{
    ArticleCategoryRow, Category, CategoryRef, CreateCategory, UpdateCategory,
};

/// Column list for categories queries.
const COLUMNS: &str = "id, name, name_ar, slug, description, parent_id, icon, color, \
                       sort_order, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category with an already validated slug.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories
                (name, name_ar, slug, description, parent_id, icon, color, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(input.name_ar.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(input.parent_id)
            .bind(input.icon.as_deref().unwrap_or(DEFAULT_ICON))
            .bind(input.color.as_deref().unwrap_or(DEFAULT_COLOR))
            .bind(input.sort_order.unwrap_or(0))
            .fetch_one(pool)
            .await
    }

    /// All categories ordered by `sort_order`, then Arabic name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order ASC, name_ar ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied;
    /// `slug` is the already normalized replacement slug, if any.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
        slug: Option<&str>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                name_ar = COALESCE($3, name_ar),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                parent_id = COALESCE($6, parent_id),
                icon = COALESCE($7, icon),
                color = COALESCE($8, color),
                sort_order = COALESCE($9, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.name_ar.as_deref().map(str::trim))
            .bind(slug)
            .bind(&input.description)
            .bind(input.parent_id)
            .bind(&input.icon)
            .bind(&input.color)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Article links go with it; the articles stay.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Categories attached to any of `article_ids`, for batch hydration.
    pub async fn refs_for_articles(
        pool: &PgPool,
        article_ids: &[DbId],
    ) -> Result<Vec<ArticleCategoryRow>, sqlx::Error> {
        if article_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ArticleCategoryRow>(
            "SELECT ac.article_id, c.id, c.name, c.name_ar, c.slug
             FROM article_categories ac
             JOIN categories c ON c.id = ac.category_id
             WHERE ac.article_id = ANY($1)
             ORDER BY c.sort_order ASC, c.name_ar ASC",
        )
        .bind(article_ids)
        .fetch_all(pool)
        .await
    }

    /// Categories of a single article.
    pub async fn refs_for_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<CategoryRef>, sqlx::Error> {
        let rows = Self::refs_for_articles(pool, &[article_id]).await?;
        Ok(rows.into_iter().map(|r| r.category).collect())
    }
}
