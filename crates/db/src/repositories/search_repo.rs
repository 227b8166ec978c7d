//! Full-text search and typeahead over published articles.
//!
//! Queries run against the trigger-maintained `search_vector` column and
//! are ranked with `ts_rank`. Callers pass a tsquery already sanitized by
//! `yemenpedia_core::search::build_tsquery`.

use sqlx::PgPool;
use yemenpedia_core::article::STATUS_PUBLISHED;
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::types::DbId;

use crate::models::article::{ArticleContext, ArticleSuggestion, ArticleSummary};
use crate::repositories::article_repo::SUMMARY_COLUMNS;

/// Shared WHERE clause for [`SearchRepo::search`] and [`SearchRepo::count`].
const MATCH: &str = "status = $4
               AND search_vector @@ to_tsquery('simple', $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM article_categories ac
                    WHERE ac.article_id = articles.id AND ac.category_id = $2))
               AND ($3::TEXT IS NULL OR $3 = ANY(tags))";

/// Search queries. Only published articles are ever returned.
pub struct SearchRepo;

impl SearchRepo {
    /// Ranked page of published articles matching `tsquery`.
    pub async fn search(
        pool: &PgPool,
        tsquery: &str,
        category: Option<DbId>,
        tag: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<ArticleSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM articles
             WHERE {MATCH}
             ORDER BY ts_rank(search_vector, to_tsquery('simple', $1)) DESC, created_at DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(tsquery)
            .bind(category)
            .bind(tag)
            .bind(STATUS_PUBLISHED)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of matches for [`SearchRepo::search`].
    pub async fn count(
        pool: &PgPool,
        tsquery: &str,
        category: Option<DbId>,
        tag: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM articles WHERE {MATCH}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(tsquery)
            .bind(category)
            .bind(tag)
            .bind(STATUS_PUBLISHED)
            .fetch_one(pool)
            .await
    }

    /// Published titles containing `pattern` (an escaped `ILIKE` pattern).
    pub async fn suggest(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ArticleSuggestion>, sqlx::Error> {
        sqlx::query_as::<_, ArticleSuggestion>(
            "SELECT id, title, slug FROM articles
             WHERE status = $1 AND title ILIKE $2
             ORDER BY views DESC, title ASC
             LIMIT $3",
        )
        .bind(STATUS_PUBLISHED)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Best-ranked published articles for grounding an assistant answer.
    pub async fn context_articles(
        pool: &PgPool,
        tsquery: &str,
        limit: i64,
    ) -> Result<Vec<ArticleContext>, sqlx::Error> {
        sqlx::query_as::<_, ArticleContext>(
            "SELECT title, summary, content FROM articles
             WHERE status = $2 AND search_vector @@ to_tsquery('simple', $1)
             ORDER BY ts_rank(search_vector, to_tsquery('simple', $1)) DESC
             LIMIT $3",
        )
        .bind(tsquery)
        .bind(STATUS_PUBLISHED)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
