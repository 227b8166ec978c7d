//! Shared response envelope helpers.
//!
//! Every success body is a JSON object with `"success": true`, an optional
//! Arabic `message`, and one or more payload keys such as `article` or
//! `articles`. Failures are rendered by [`crate::error::AppError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

/// Builder for the `{ "success": true, ... }` envelope.
///
/// ```ignore
/// Ok(Envelope::ok().message("تم الحفظ").with("article", &article))
/// ```
#[derive(Debug)]
pub struct Envelope {
    status: StatusCode,
    body: Map<String, Value>,
}

impl Envelope {
    /// 200 OK envelope.
    pub fn ok() -> Self {
        Self::with_status(StatusCode::OK)
    }

    /// 201 Created envelope.
    pub fn created() -> Self {
        Self::with_status(StatusCode::CREATED)
    }

    fn with_status(status: StatusCode) -> Self {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(true));
        Self { status, body }
    }

    pub fn message(mut self, message: &str) -> Self {
        self.body.insert("message".into(), Value::String(message.to_string()));
        self
    }

    /// Add a payload key. Values that fail to serialize become `null`.
    pub fn with<T: serde::Serialize>(mut self, key: &str, value: T) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "Failed to serialize response payload");
            Value::Null
        });
        self.body.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}

/// Envelope carrying only a message, e.g. after a delete.
pub fn message_only(message: &str) -> Envelope {
    Envelope::ok().message(message)
}
