//! Repository for the `sources` table.

use sqlx::types::Json;
use sqlx::PgPool;
use yemenpedia_core::source::{
    SourceType, DEFAULT_COUNTRY, DEFAULT_LANGUAGE, DEFAULT_RELIABILITY,
};
use yemenpedia_core::types::DbId;

use crate::models::source::{CreateSource, Source, SourceFilter, UpdateSource};

/// Column list for sources queries.
const COLUMNS: &str = "id, name, name_ar, source_type, website, description, logo, \
                       reliability, country, language, verified, is_official, \
                       contact_info, articles_count, created_at, updated_at";

/// Provides CRUD operations for citation sources.
pub struct SourceRepo;

impl SourceRepo {
    pub async fn create(pool: &PgPool, input: &CreateSource) -> Result<Source, sqlx::Error> {
        let query = format!(
            "INSERT INTO sources
                (name, name_ar, source_type, website, description, logo, reliability,
                 country, language, verified, is_official, contact_info)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Source>(&query)
            .bind(input.name.trim())
            .bind(input.name_ar.trim())
            .bind(input.source_type.unwrap_or_default().as_str())
            .bind(&input.website)
            .bind(&input.description)
            .bind(&input.logo)
            .bind(input.reliability.unwrap_or(DEFAULT_RELIABILITY))
            .bind(input.country.as_deref().unwrap_or(DEFAULT_COUNTRY))
            .bind(input.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))
            .bind(input.verified.unwrap_or(false))
            .bind(input.is_official.unwrap_or(false))
            .bind(Json(input.contact_info.clone().unwrap_or_default()))
            .fetch_one(pool)
            .await
    }

    /// List sources, most reliable first, then by Arabic name.
    pub async fn list(pool: &PgPool, filter: &SourceFilter) -> Result<Vec<Source>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sources
             WHERE ($1::TEXT IS NULL OR source_type = $1)
               AND ($2::BOOL IS NULL OR verified = $2)
               AND ($3::BOOL IS NULL OR is_official = $3)
             ORDER BY reliability DESC, name_ar ASC"
        );
        sqlx::query_as::<_, Source>(&query)
            .bind(filter.source_type.map(SourceType::as_str))
            .bind(filter.verified)
            .bind(filter.is_official)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Source>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sources WHERE id = $1");
        sqlx::query_as::<_, Source>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Source>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sources WHERE name = $1");
        sqlx::query_as::<_, Source>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Update a source. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSource,
    ) -> Result<Option<Source>, sqlx::Error> {
        let query = format!(
            "UPDATE sources SET
                name = COALESCE($2, name),
                name_ar = COALESCE($3, name_ar),
                source_type = COALESCE($4, source_type),
                website = COALESCE($5, website),
                description = COALESCE($6, description),
                logo = COALESCE($7, logo),
                reliability = COALESCE($8, reliability),
                country = COALESCE($9, country),
                language = COALESCE($10, language),
                verified = COALESCE($11, verified),
                is_official = COALESCE($12, is_official),
                contact_info = COALESCE($13, contact_info),
                articles_count = COALESCE($14, articles_count)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Source>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.name_ar.as_deref().map(str::trim))
            .bind(input.source_type.map(SourceType::as_str))
            .bind(&input.website)
            .bind(&input.description)
            .bind(&input.logo)
            .bind(input.reliability)
            .bind(&input.country)
            .bind(&input.language)
            .bind(input.verified)
            .bind(input.is_official)
            .bind(input.contact_info.clone().map(Json))
            .bind(input.articles_count)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
