//! Repository for the `articles` table and its link tables.
//!
//! Updates append to the revision ledger inside the same transaction, under
//! a row lock, so concurrent edits of one article serialize.

use sqlx::types::Json;
use sqlx::PgPool;
use yemenpedia_core::article::{
    normalize_tags, published_at_after, revision_for_update, ArticleStatus, Language,
};
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::types::{DbId, Timestamp};

use crate::models::article::{
    Article, ArticleFilter, ArticleSummary, CreateArticle, RelatedArticle, UpdateArticle,
};
use crate::repositories::revision_repo::ArticleRevisionRepo;

/// Column list for full article queries.
const COLUMNS: &str = "id, title, slug, content, summary, author_id, tags, language, status, \
                       featured, views, images, citations, last_edited_by, last_edited_at, \
                       published_at, created_at, updated_at";

/// Column list for listing projections (no body).
pub(crate) const SUMMARY_COLUMNS: &str = "id, title, slug, summary, author_id, tags, language, \
                                          status, featured, views, published_at, created_at, \
                                          updated_at";

/// Shared WHERE clause for [`ArticleRepo::list`] and [`ArticleRepo::count`].
const FILTER: &str = "status = $1
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM article_categories ac
                    WHERE ac.article_id = articles.id AND ac.category_id = $2))
               AND ($3::TEXT IS NULL OR $3 = ANY(tags))
               AND ($4::BOOL IS NULL OR featured = $4)";

/// Provides CRUD operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article with its category and related-article links.
    ///
    /// New articles get no revision. `published_at` is stamped when the
    /// initial status is published.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        slug: &str,
        author_id: DbId,
        now: Timestamp,
    ) -> Result<Article, sqlx::Error> {
        let status = input.status.unwrap_or_default();
        let published_at = published_at_after(None, status, now);

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO articles
                (title, slug, content, summary, author_id, tags, language, status, featured,
                 images, citations, last_edited_by, last_edited_at, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $5, $12, $13)
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(input.title.trim())
            .bind(slug)
            .bind(&input.content)
            .bind(&input.summary)
            .bind(author_id)
            .bind(normalize_tags(&input.tags))
            .bind(input.language.unwrap_or_default().as_str())
            .bind(status.as_str())
            .bind(input.featured.unwrap_or(false))
            .bind(Json(input.images.clone()))
            .bind(Json(input.references.clone()))
            .bind(now)
            .bind(published_at)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_categories_inner(&mut tx, article.id, &input.categories).await?;
        Self::set_related_inner(&mut tx, article.id, &input.related_articles).await?;

        tx.commit().await?;
        Ok(article)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE slug = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether another article already uses this slug or title.
    pub async fn slug_or_title_taken(
        pool: &PgPool,
        slug: &str,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM articles
                WHERE (slug = $1 OR title = $2)
                  AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(slug)
        .bind(title)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Atomically count one view and return the updated article.
    ///
    /// Returns `None` when no article has this slug.
    pub async fn record_view(pool: &PgPool, slug: &str) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET views = views + 1
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List article summaries matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
        page: PageRequest,
    ) -> Result<Vec<ArticleSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM articles
             WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(filter.status.as_str())
            .bind(filter.category)
            .bind(&filter.tag)
            .bind(filter.featured)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count articles matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ArticleFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM articles WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.status.as_str())
            .bind(filter.category)
            .bind(&filter.tag)
            .bind(filter.featured)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update as `editor_id`.
    ///
    /// Within one transaction: lock the row, append a revision if the body
    /// changes, write the new values and replace link sets that were
    /// provided. `last_edited_*` always move to the caller and `now`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
        slug: Option<&str>,
        editor_id: DbId,
        now: Timestamp,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(revision) =
            revision_for_update(&current.content, input.content.as_deref(), editor_id, now)
        {
            let seq = ArticleRevisionRepo::append_inner(&mut tx, id, &revision).await?;
            tracing::debug!(article_id = id, seq, editor_id, "Article revision appended");
        }

        let status = input.status.unwrap_or_else(|| current.status());
        let published_at = published_at_after(current.published_at, status, now);

        let query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                summary = COALESCE($5, summary),
                tags = COALESCE($6, tags),
                language = COALESCE($7, language),
                status = $8,
                featured = COALESCE($9, featured),
                images = COALESCE($10, images),
                citations = COALESCE($11, citations),
                last_edited_by = $12,
                last_edited_at = $13,
                published_at = $14,
                updated_at = $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(slug)
            .bind(&input.content)
            .bind(&input.summary)
            .bind(input.tags.as_deref().map(normalize_tags))
            .bind(input.language.map(Language::as_str))
            .bind(status.as_str())
            .bind(input.featured)
            .bind(input.images.clone().map(Json))
            .bind(input.references.clone().map(Json))
            .bind(editor_id)
            .bind(now)
            .bind(published_at)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(ref categories) = input.categories {
            Self::set_categories_inner(&mut tx, id, categories).await?;
        }
        if let Some(ref related) = input.related_articles {
            Self::set_related_inner(&mut tx, id, related).await?;
        }

        tx.commit().await?;
        Ok(Some(article))
    }

    /// Hard-delete an article. Revisions and links cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Articles this one links to, in title order.
    pub async fn related_for(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<RelatedArticle>, sqlx::Error> {
        sqlx::query_as::<_, RelatedArticle>(
            "SELECT a.id, a.title, a.slug, a.summary
             FROM article_related r
             JOIN articles a ON a.id = r.related_article_id
             WHERE r.article_id = $1
             ORDER BY a.title ASC",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace category links within an existing transaction.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO article_categories (article_id, category_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(article_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Replace related-article links within an existing transaction.
    /// Self-links are dropped.
    async fn set_related_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
        related_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM article_related WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut **tx)
            .await?;

        let related: Vec<DbId> = related_ids
            .iter()
            .copied()
            .filter(|&r| r != article_id)
            .collect();

        sqlx::query(
            "INSERT INTO article_related (article_id, related_article_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(article_id)
        .bind(&related)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
