//! Article entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;
use yemenpedia_core::article::{ArticleStatus, Language};
use yemenpedia_core::types::{DbId, Timestamp};

/// An embedded image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleImage {
    pub url: String,
    pub caption: Option<String>,
    pub alt: Option<String>,
}

/// An embedded citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleReference {
    pub title: String,
    pub url: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Full row from the `articles` table (minus the search vector).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: Option<DbId>,
    pub tags: Vec<String>,
    pub language: String,
    pub status: String,
    pub featured: bool,
    pub views: i64,
    pub images: Json<Vec<ArticleImage>>,
    #[serde(rename = "references")]
    pub citations: Json<Vec<ArticleReference>>,
    pub last_edited_by: Option<DbId>,
    pub last_edited_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    pub fn status(&self) -> ArticleStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Listing projection: everything except the body.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub author_id: Option<DbId>,
    pub tags: Vec<String>,
    pub language: String,
    pub status: String,
    pub featured: bool,
    pub views: i64,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Link target in an article's related list.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedArticle {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
}

/// Typeahead entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleSuggestion {
    pub id: DbId,
    pub title: String,
    pub slug: String,
}

/// Article fields quoted to the AI assistant.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleContext {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
}

/// DTO for creating an article. A missing slug is derived from `title`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    #[validate(length(min = 1, message = "العنوان مطلوب"))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "المحتوى مطلوب"))]
    pub content: String,
    #[validate(length(max = 500, message = "يجب ألا يتجاوز الملخص 500 حرف"))]
    pub summary: Option<String>,
    #[serde(default)]
    pub categories: Vec<DbId>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub language: Option<Language>,
    pub status: Option<ArticleStatus>,
    pub featured: Option<bool>,
    #[serde(default)]
    pub images: Vec<ArticleImage>,
    #[serde(default)]
    pub references: Vec<ArticleReference>,
    #[serde(default)]
    pub related_articles: Vec<DbId>,
}

/// DTO for updating an article.
///
/// `None` (absent or `null`) leaves a field untouched; any provided value
/// replaces it, so an empty list or empty summary clears the field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    #[validate(length(min = 1, message = "العنوان مطلوب"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "المحتوى مطلوب"))]
    pub content: Option<String>,
    #[validate(length(max = 500, message = "يجب ألا يتجاوز الملخص 500 حرف"))]
    pub summary: Option<String>,
    pub categories: Option<Vec<DbId>>,
    pub tags: Option<Vec<String>>,
    pub language: Option<Language>,
    pub status: Option<ArticleStatus>,
    pub featured: Option<bool>,
    pub images: Option<Vec<ArticleImage>>,
    pub references: Option<Vec<ArticleReference>>,
    pub related_articles: Option<Vec<DbId>>,
}

/// Filters for the article listing.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub status: ArticleStatus,
    pub category: Option<DbId>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}
