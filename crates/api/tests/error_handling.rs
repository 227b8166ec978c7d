//! Error envelope rendering and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, get, put_json_auth, user_with_token};
use http_body_util::BodyExt;
use sqlx::PgPool;
use yemenpedia_api::error::AppError;
use yemenpedia_core::error::CoreError;
use yemenpedia_core::moderation::ModerationError;
use yemenpedia_core::roles::Role;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_uses_entity_message() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::not_found("source", 7))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "المصدر غير موجود");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("connection string leaked".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["message"].as_str().unwrap().contains("leaked"));
}

#[tokio::test]
async fn moderation_errors_map_to_400_or_403() {
    let (status, _) = error_to_response(ModerationError::AlreadyPending.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = error_to_response(ModerationError::SuperAdminUndeletable.into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "لا يمكن حذف المدير الرئيسي");
}

#[tokio::test]
async fn upstream_detail_is_rendered_when_present() {
    let (status, json) = error_to_response(AppError::Upstream {
        message: "حدث خطأ في المساعد الذكي".into(),
        detail: Some("AI provider error (500): boom".into()),
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "AI provider error (500): boom");
}

// ---------------------------------------------------------------------------
// HTTP behaviour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["dbHealthy"], true);
    assert_eq!(json["assistantEnabled"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_carry_request_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_enveloped(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_paging_and_flags_fall_back(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/articles?page=abc&limit=xyz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 20);

    let response = get(app.clone(), "/api/v1/articles?featured=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.clone(), "/api/v1/sources?verified=yes&isOfficial=").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, "/api/v1/users?page=abc").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_ids_are_enveloped(pool: PgPool) {
    let (_editor, token) = user_with_token(&pool, "editor", Role::Editor).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/articles/abc",
        serde_json::json!({ "title": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");

    let response = get(app.clone(), "/api/v1/sources/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = get(app, "/api/v1/articles?category=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
