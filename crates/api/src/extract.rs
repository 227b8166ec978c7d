//! Request extractors whose rejections render in the standard error
//! envelope, plus lenient query-string field parsers.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::AppError;

/// Extractor that deserializes a JSON body and validates it.
///
/// Malformed JSON becomes [`AppError::Json`] and rule violations become
/// [`AppError::Validation`], so both render in the standard error envelope.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Plain JSON body whose rejection renders in the standard error envelope.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string extractor; a rejection becomes [`AppError::Query`].
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameter extractor; a rejection becomes [`AppError::Path`].
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// String field trimmed before validation runs, so length rules see the
/// stored value. A missing field reads as empty.
///
/// Use with `#[serde(default, deserialize_with = "trimmed")]`.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).unwrap_or_default())
}

/// Integer query field that reads as absent when it does not parse, so
/// `?page=abc` falls back to the default page.
///
/// Use with `#[serde(default, deserialize_with = "lenient_int")]`.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Id query field where an empty value means "no filter". A non-numeric
/// value is rejected.
///
/// Use with `#[serde(default, deserialize_with = "optional_id")]`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Boolean query field: absent or empty is `None`, exactly `"true"` is
/// `Some(true)` and any other value is `Some(false)`.
///
/// Use with `#[serde(default, deserialize_with = "flag")]`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(|s| s == "true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "lenient_int")]
        page: Option<i64>,
        #[serde(default, deserialize_with = "flag")]
        featured: Option<bool>,
        #[serde(default, deserialize_with = "optional_id")]
        category: Option<i64>,
    }

    fn parse(query: &str) -> Params {
        let uri: axum::http::Uri = format!("/items?{query}").parse().unwrap();
        axum::extract::Query::<Params>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn unparsable_integers_read_as_absent() {
        assert_eq!(parse("page=3").page, Some(3));
        assert_eq!(parse("page=abc").page, None);
        assert_eq!(parse("page=").page, None);
        assert_eq!(parse("").page, None);
    }

    #[test]
    fn blank_ids_are_absent_and_garbage_is_rejected() {
        assert_eq!(parse("category=7").category, Some(7));
        assert_eq!(parse("category=").category, None);

        let uri: axum::http::Uri = "/items?category=abc".parse().unwrap();
        assert!(axum::extract::Query::<Params>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn flags_are_true_only_for_literal_true() {
        assert_eq!(parse("featured=true").featured, Some(true));
        assert_eq!(parse("featured=1").featured, Some(false));
        assert_eq!(parse("featured=false").featured, Some(false));
        assert_eq!(parse("featured=").featured, None);
        assert_eq!(parse("").featured, None);
    }
}
