//! Repository for the append-only `article_revisions` ledger.

use sqlx::PgPool;
use yemenpedia_core::article::RevisionDraft;
use yemenpedia_core::types::DbId;

use crate::models::revision::RevisionRow;

/// Read access plus transactional append for article revisions.
///
/// There is deliberately no update or delete: rows only disappear when
/// their article is deleted (`ON DELETE CASCADE`).
pub struct ArticleRevisionRepo;

impl ArticleRevisionRepo {
    /// Append a revision with the next sequence number for the article.
    ///
    /// Must run inside the transaction that holds the article's row lock so
    /// the `MAX(seq) + 1` read cannot race.
    pub(crate) async fn append_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
        draft: &RevisionDraft,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO article_revisions (article_id, seq, content, summary, editor_id, edited_at)
             SELECT $1, COALESCE(MAX(seq), 0) + 1, $2, $3, $4, $5
             FROM article_revisions WHERE article_id = $1
             RETURNING seq",
        )
        .bind(article_id)
        .bind(&draft.content)
        .bind(&draft.summary)
        .bind(draft.editor_id)
        .bind(draft.edited_at)
        .fetch_one(&mut **tx)
        .await
    }

    /// All revisions of an article, newest first, with editor identities.
    pub async fn list_for_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<RevisionRow>, sqlx::Error> {
        sqlx::query_as::<_, RevisionRow>(
            "SELECT r.id, r.article_id, r.seq, r.content, r.summary, r.editor_id,
                    u.username AS editor_username, u.display_name AS editor_display_name,
                    r.edited_at
             FROM article_revisions r
             LEFT JOIN users u ON u.id = r.editor_id
             WHERE r.article_id = $1
             ORDER BY r.seq DESC",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_article(pool: &PgPool, article_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM article_revisions WHERE article_id = $1")
            .bind(article_id)
            .fetch_one(pool)
            .await
    }
}
