//! Handlers for the `/categories` resource.

use std::collections::HashMap;

use axum::extract::State;
use serde::Serialize;
use yemenpedia_core::article::{generate_slug, normalize_slug, validate_slug};
use yemenpedia_core::category::{validate_color, validate_name};
use yemenpedia_core::error::CoreError;
use yemenpedia_core::types::DbId;
use yemenpedia_db::models::category::{Category, CategoryRef, CreateCategory, UpdateCategory};
use yemenpedia_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{message_only, Envelope};
use crate::state::AppState;

const SELF_PARENT: &str = "لا يمكن أن يكون التصنيف أباً لنفسه";

/// A category with its parent's identity, when the parent still exists.
#[derive(Debug, Serialize)]
pub struct CategoryWithParent {
    #[serde(flatten)]
    pub category: Category,
    pub parent: Option<CategoryRef>,
}

/// GET /api/v1/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Envelope> {
    let categories = CategoryRepo::list(&state.pool).await?;

    let by_id: HashMap<DbId, CategoryRef> = categories
        .iter()
        .map(|c| (c.id, CategoryRef::from(c)))
        .collect();
    let categories: Vec<CategoryWithParent> = categories
        .into_iter()
        .map(|category| CategoryWithParent {
            parent: category.parent_id.and_then(|id| by_id.get(&id).cloned()),
            category,
        })
        .collect();

    Ok(Envelope::ok().with("categories", categories))
}

/// GET /api/v1/categories/{slug}
pub async fn get_category(
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<Envelope> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("category", &slug)))?;

    let parent = match category.parent_id {
        Some(id) => CategoryRepo::find_by_id(&state.pool, id)
            .await?
            .as_ref()
            .map(CategoryRef::from),
        None => None,
    };

    Ok(Envelope::ok().with("category", CategoryWithParent { category, parent }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateCategory>,
) -> AppResult<Envelope> {
    validate_name(&input.name, "الاسم")?;
    validate_name(&input.name_ar, "الاسم العربي")?;
    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    let slug = match input.slug.as_deref() {
        Some(s) if !s.trim().is_empty() => normalize_slug(s),
        _ => generate_slug(&input.name),
    };
    validate_slug(&slug)?;

    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;

    tracing::info!(
        user_id = admin.user_id,
        category_id = category.id,
        slug = %category.slug,
        "Category created"
    );

    Ok(Envelope::created()
        .message("تم إنشاء التصنيف بنجاح")
        .with("category", category))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateCategory>,
) -> AppResult<Envelope> {
    if let Some(name) = &input.name {
        validate_name(name, "الاسم")?;
    }
    if let Some(name_ar) = &input.name_ar {
        validate_name(name_ar, "الاسم العربي")?;
    }
    if let Some(color) = &input.color {
        validate_color(color)?;
    }
    if input.parent_id == Some(id) {
        return Err(AppError::Core(CoreError::Validation(SELF_PARENT.into())));
    }

    let slug = match input.slug.as_deref() {
        Some(s) => {
            let slug = normalize_slug(s);
            validate_slug(&slug)?;
            Some(slug)
        }
        None => None,
    };

    let category = CategoryRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("category", id)))?;

    tracing::info!(user_id = admin.user_id, category_id = id, "Category updated");

    Ok(Envelope::ok()
        .message("تم تحديث التصنيف بنجاح")
        .with("category", category))
}

/// DELETE /api/v1/categories/{id}
///
/// Articles keep existing; only their membership links are removed.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Envelope> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("category", id)));
    }

    tracing::info!(user_id = admin.user_id, category_id = id, "Category deleted");

    Ok(message_only("تم حذف التصنيف بنجاح"))
}
