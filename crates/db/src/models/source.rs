//! Source entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;
use yemenpedia_core::source::SourceType;
use yemenpedia_core::types::{DbId, Timestamp};

/// Optional contact details, stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(email(message = "البريد الإلكتروني غير صالح"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A row from the `sources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: DbId,
    pub name: String,
    pub name_ar: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub reliability: i32,
    pub country: String,
    pub language: String,
    pub verified: bool,
    pub is_official: bool,
    pub contact_info: Json<ContactInfo>,
    pub articles_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a source.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSource {
    #[validate(length(min = 1, max = 200, message = "اسم المصدر مطلوب"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "الاسم العربي للمصدر مطلوب"))]
    pub name_ar: String,
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    #[validate(url(message = "رابط الموقع غير صالح"))]
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[validate(range(min = 1, max = 5, message = "يجب أن تكون الموثوقية بين 1 و 5"))]
    pub reliability: Option<i32>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub verified: Option<bool>,
    pub is_official: Option<bool>,
    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,
}

/// DTO for updating a source. All fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSource {
    #[validate(length(min = 1, max = 200, message = "اسم المصدر مطلوب"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "الاسم العربي للمصدر مطلوب"))]
    pub name_ar: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    #[validate(url(message = "رابط الموقع غير صالح"))]
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[validate(range(min = 1, max = 5, message = "يجب أن تكون الموثوقية بين 1 و 5"))]
    pub reliability: Option<i32>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub verified: Option<bool>,
    pub is_official: Option<bool>,
    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,
    pub articles_count: Option<i32>,
}

/// Filters for the public source listing.
#[derive(Debug, Default)]
pub struct SourceFilter {
    pub source_type: Option<SourceType>,
    pub verified: Option<bool>,
    pub is_official: Option<bool>,
}
