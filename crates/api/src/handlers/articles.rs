//! Handlers for the `/articles` resource and its revision history.

use std::collections::HashMap;

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use yemenpedia_core::article::{
    generate_slug, normalize_slug, validate_content, validate_slug, validate_summary,
    validate_tags, validate_title, ArticleStatus,
};
use yemenpedia_core::error::CoreError;
use yemenpedia_core::pagination::PageRequest;
use yemenpedia_core::types::DbId;
use yemenpedia_db::models::article::{
    Article, ArticleFilter, ArticleSummary, CreateArticle, RelatedArticle, UpdateArticle,
};
use yemenpedia_db::models::category::CategoryRef;
use yemenpedia_db::models::revision::RevisionResponse;
use yemenpedia_db::models::user::UserSummary;
use yemenpedia_db::repositories::{ArticleRepo, ArticleRevisionRepo, CategoryRepo, UserRepo};
use yemenpedia_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{flag, lenient_int, optional_id, ValidJson, ValidPath, ValidQuery};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::middleware::rbac::RequireEditor;
use crate::response::{message_only, Envelope};
use crate::state::AppState;

const SLUG_TAKEN: &str = "الرابط موجود مسبقاً";

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /articles`.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListParams {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    /// Defaults to `published`.
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub category: Option<DbId>,
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub featured: Option<bool>,
}

/// Listing entry: summary plus author and categories.
#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    #[serde(flatten)]
    pub article: ArticleSummary,
    pub author: Option<UserSummary>,
    pub categories: Vec<CategoryRef>,
}

/// Full article with its links resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub author: Option<UserSummary>,
    pub last_editor: Option<UserSummary>,
    pub categories: Vec<CategoryRef>,
    pub related_articles: Vec<RelatedArticle>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/articles
///
/// Paginated article summaries, newest first. Anonymous callers may pass a
/// `status` filter too; without one only published articles are listed.
pub async fn list_articles(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidQuery(params): ValidQuery<ArticleListParams>,
) -> AppResult<Envelope> {
    let status = match params.status.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse::<ArticleStatus>()?,
        _ => ArticleStatus::Published,
    };
    let filter = ArticleFilter {
        status,
        category: params.category,
        tag: params.tag.filter(|t| !t.trim().is_empty()),
        featured: params.featured,
    };
    let page = PageRequest::new(params.page, params.limit);

    let rows = ArticleRepo::list(&state.pool, &filter, page).await?;
    let total = ArticleRepo::count(&state.pool, &filter).await?;

    tracing::debug!(
        viewer_id = ?viewer.user_id(),
        status = %filter.status,
        total,
        "Listed articles"
    );

    let articles = hydrate_summaries(&state.pool, rows).await?;
    Ok(Envelope::ok()
        .with("articles", articles)
        .with("pagination", page.summary(total)))
}

/// GET /api/v1/articles/{slug}
///
/// Every read counts one view.
pub async fn get_article(
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<Envelope> {
    let article = ArticleRepo::record_view(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("article", &slug)))?;

    let detail = hydrate_detail(&state.pool, article).await?;
    Ok(Envelope::ok().with("article", detail))
}

/// POST /api/v1/articles
///
/// Editors and above. The slug is derived from the title when omitted.
pub async fn create_article(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    ValidJson(input): ValidJson<CreateArticle>,
) -> AppResult<Envelope> {
    validate_title(&input.title)?;
    validate_content(&input.content)?;
    if let Some(summary) = &input.summary {
        validate_summary(summary)?;
    }
    validate_tags(&input.tags)?;

    let slug = match input.slug.as_deref() {
        Some(s) if !s.trim().is_empty() => normalize_slug(s),
        _ => generate_slug(&input.title),
    };
    validate_slug(&slug)?;

    if ArticleRepo::slug_or_title_taken(&state.pool, &slug, input.title.trim(), None).await? {
        return Err(AppError::Core(CoreError::Conflict(SLUG_TAKEN.into())));
    }

    let article =
        ArticleRepo::create(&state.pool, &input, &slug, editor.user_id, Utc::now()).await?;
    UserRepo::increment_contributions(&state.pool, editor.user_id).await?;

    tracing::info!(
        user_id = editor.user_id,
        article_id = article.id,
        slug = %article.slug,
        status = %article.status,
        "Article created"
    );

    let detail = hydrate_detail(&state.pool, article).await?;
    Ok(Envelope::created()
        .message("تم إنشاء المقالة بنجاح")
        .with("article", detail))
}

/// PUT /api/v1/articles/{id}
///
/// Editors and above, no ownership check. Replacing the body appends a
/// revision holding the previous body.
pub async fn update_article(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateArticle>,
) -> AppResult<Envelope> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    if let Some(summary) = &input.summary {
        validate_summary(summary)?;
    }
    if let Some(tags) = &input.tags {
        validate_tags(tags)?;
    }

    let slug = match input.slug.as_deref() {
        Some(s) => {
            let slug = normalize_slug(s);
            validate_slug(&slug)?;
            Some(slug)
        }
        None => None,
    };

    if slug.is_some() || input.title.is_some() {
        let current = ArticleRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("article", id)))?;
        let new_slug = slug.as_deref().unwrap_or(&current.slug);
        let new_title = input.title.as_deref().map(str::trim).unwrap_or(&current.title);
        if ArticleRepo::slug_or_title_taken(&state.pool, new_slug, new_title, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(SLUG_TAKEN.into())));
        }
    }

    let article = ArticleRepo::update(
        &state.pool,
        id,
        &input,
        slug.as_deref(),
        editor.user_id,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::not_found("article", id)))?;

    tracing::info!(
        user_id = editor.user_id,
        article_id = article.id,
        slug = %article.slug,
        status = %article.status,
        "Article updated"
    );

    let detail = hydrate_detail(&state.pool, article).await?;
    Ok(Envelope::ok()
        .message("تم تحديث المقالة بنجاح")
        .with("article", detail))
}

/// DELETE /api/v1/articles/{id}
///
/// Revisions and links go with the article.
pub async fn delete_article(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    if !ArticleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("article", id)));
    }

    tracing::info!(user_id = editor.user_id, article_id = id, "Article deleted");

    Ok(message_only("تم حذف المقالة بنجاح"))
}

/// GET /api/v1/articles/{id}/revisions
///
/// Newest first.
pub async fn list_revisions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    if ArticleRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("article", id)));
    }

    let revisions: Vec<RevisionResponse> = ArticleRevisionRepo::list_for_article(&state.pool, id)
        .await?
        .into_iter()
        .map(RevisionResponse::from)
        .collect();

    Ok(Envelope::ok().with("revisions", revisions))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Attach authors and categories to a page of summaries with two batch
/// queries.
pub(crate) async fn hydrate_summaries(
    pool: &DbPool,
    rows: Vec<ArticleSummary>,
) -> AppResult<Vec<ArticleListItem>> {
    let article_ids: Vec<DbId> = rows.iter().map(|a| a.id).collect();
    let author_ids: Vec<DbId> = rows.iter().filter_map(|a| a.author_id).collect();

    let mut categories: HashMap<DbId, Vec<CategoryRef>> = HashMap::new();
    for row in CategoryRepo::refs_for_articles(pool, &article_ids).await? {
        categories.entry(row.article_id).or_default().push(row.category);
    }
    let authors = user_map(pool, &author_ids).await?;

    Ok(rows
        .into_iter()
        .map(|article| ArticleListItem {
            author: article.author_id.and_then(|id| authors.get(&id).cloned()),
            categories: categories.remove(&article.id).unwrap_or_default(),
            article,
        })
        .collect())
}

/// Resolve author, last editor, categories and related articles.
async fn hydrate_detail(pool: &DbPool, article: Article) -> AppResult<ArticleDetail> {
    let user_ids: Vec<DbId> = article
        .author_id
        .into_iter()
        .chain(article.last_edited_by)
        .collect();
    let users = user_map(pool, &user_ids).await?;
    let categories = CategoryRepo::refs_for_article(pool, article.id).await?;
    let related_articles = ArticleRepo::related_for(pool, article.id).await?;

    Ok(ArticleDetail {
        author: article.author_id.and_then(|id| users.get(&id).cloned()),
        last_editor: article.last_edited_by.and_then(|id| users.get(&id).cloned()),
        categories,
        related_articles,
        article,
    })
}

async fn user_map(pool: &DbPool, ids: &[DbId]) -> AppResult<HashMap<DbId, UserSummary>> {
    Ok(UserRepo::summaries_by_ids(pool, ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}
