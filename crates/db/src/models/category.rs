//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yemenpedia_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub name_ar: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub icon: String,
    pub color: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal category identity embedded in articles and parent links.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub name_ar: String,
    pub slug: String,
}

impl From<&Category> for CategoryRef {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            name_ar: c.name_ar.clone(),
            slug: c.slug.clone(),
        }
    }
}

/// A [`CategoryRef`] tagged with the article it is attached to, for batch
/// loading the categories of a page of articles.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleCategoryRow {
    pub article_id: DbId,
    #[sqlx(flatten)]
    pub category: CategoryRef,
}

/// DTO for creating a category. A missing slug is derived from `name`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "الاسم مطلوب"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "الاسم العربي مطلوب"))]
    pub name_ar: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

/// DTO for updating a category. All fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "الاسم مطلوب"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "الاسم العربي مطلوب"))]
    pub name_ar: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}
