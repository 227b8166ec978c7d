use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::moderation::ModerationError;

/// Generic message for failures whose detail must not reach clients.
const INTERNAL_MESSAGE: &str = "حدث خطأ في الخادم";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "success": false, "message", "code" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yemenpedia_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level validation failures from a request DTO.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body was not valid JSON for the expected shape.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    /// The query string did not match the expected parameters.
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    /// A path parameter could not be parsed, e.g. a non-numeric id.
    #[error("Invalid path parameter: {0}")]
    Path(#[from] PathRejection),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The AI provider is missing or failed. `detail` is only set when the
    /// server runs in development mode.
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        detail: Option<String>,
    },

    /// An internal error with a message for the logs.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ModerationError> for AppError {
    fn from(err: ModerationError) -> Self {
        AppError::Core(err.into())
    }
}

/// One entry of the `errors` array in a validation failure body.
#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field_errors: Vec<FieldError> = Vec::new();
        let mut detail: Option<String> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => {
                    tracing::debug!(entity, key = %key, "Entity not found");
                    (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        not_found_message(entity).to_string(),
                    )
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Upstream(msg) => {
                    tracing::error!(error = %msg, "Upstream failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "UPSTREAM_ERROR",
                        msg.clone(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Request shape errors ---
            AppError::Validation(errors) => {
                field_errors = flatten_validation_errors(errors);
                let message = field_errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "بيانات غير صالحة".to_string());
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            AppError::Json(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "بيانات الطلب غير صالحة".to_string(),
                )
            }
            AppError::Query(rejection) => {
                tracing::debug!(error = %rejection, "Rejected query string");
                (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "معاملات الاستعلام غير صالحة".to_string(),
                )
            }
            AppError::Path(rejection) => {
                tracing::debug!(error = %rejection, "Rejected path parameter");
                (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "المعرّف غير صالح".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // --- Upstream and internal errors ---
            AppError::Upstream {
                message,
                detail: upstream_detail,
            } => {
                detail = upstream_detail.clone();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    message.clone(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
            "code": code,
        });
        if !field_errors.is_empty() {
            body["errors"] = json!(field_errors);
        }
        if let Some(detail) = detail {
            body["error"] = json!(detail);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Arabic "not found" message for an entity name used with
/// [`CoreError::not_found`].
fn not_found_message(entity: &str) -> &'static str {
    match entity {
        "article" => "المقالة غير موجودة",
        "category" => "التصنيف غير موجود",
        "source" => "المصدر غير موجود",
        "user" => "المستخدم غير موجود",
        _ => "العنصر غير موجود",
    }
}

/// Flatten `validator` errors (including nested structs) into field/message
/// pairs, sorted by field so output is stable.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    fn walk(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<FieldError>) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                validator::ValidationErrorsKind::Field(list) => {
                    for err in list {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("قيمة غير صالحة للحقل {path}"));
                        out.push(FieldError {
                            field: path.clone(),
                            message,
                        });
                    }
                }
                validator::ValidationErrorsKind::Struct(inner) => walk(&path, inner, out),
                validator::ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        walk(&format!("{path}[{index}]"), inner, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (23505) map to 409.
/// - Foreign key violations (23503) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "العنصر غير موجود".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                tracing::debug!(constraint, "Unique constraint violation");
                (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    conflict_message(constraint).to_string(),
                )
            }
            Some("23503") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                tracing::debug!(constraint, "Foreign key violation");
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "مرجع غير موجود".to_string(),
                )
            }
            _ => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Message for a unique violation, keyed by constraint name.
fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "uq_articles_slug" | "uq_articles_title" => "الرابط موجود مسبقاً",
        "uq_users_username" | "uq_users_email" => "المستخدم موجود مسبقاً",
        "uq_categories_name" | "uq_categories_name_ar" | "uq_categories_slug" => {
            "التصنيف موجود مسبقاً"
        }
        "uq_sources_name" => "المصدر موجود مسبقاً",
        _ => "القيمة موجودة مسبقاً",
    }
}
