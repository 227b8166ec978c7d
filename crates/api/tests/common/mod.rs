#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yemenpedia_api::ai::{AiConfig, AiError, Completion, TextGenerator};
use yemenpedia_api::auth::jwt::{generate_token, JwtConfig};
use yemenpedia_api::auth::password::hash_password;
use yemenpedia_api::config::ServerConfig;
use yemenpedia_api::router::build_app_router;
use yemenpedia_api::state::AppState;
use yemenpedia_core::roles::Role;
use yemenpedia_db::models::user::{CreateUser, User};
use yemenpedia_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "secret-pass-123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        expose_error_details: false,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_days: 30,
        },
        ai: AiConfig::default(),
    }
}

/// Full application router without an AI provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_ai(pool, None)
}

/// Full application router with the given AI provider (usually a stub).
pub fn build_test_app_with_ai(pool: PgPool, ai: Option<Arc<dyn TextGenerator>>) -> Router {
    build_test_app_with_config(pool, ai, test_config())
}

pub fn build_test_app_with_config(
    pool: PgPool,
    ai: Option<Arc<dyn TextGenerator>>,
    config: ServerConfig,
) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: Arc::clone(&config),
        ai,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly through the repository.
pub async fn create_user_with_role(pool: &PgPool, username: &str, role: Role) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        display_name: username.to_string(),
        role,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_token(user.id, &user.role, &test_config().jwt).expect("token generation")
}

/// Create a user with `role` and return it with a valid bearer token.
pub async fn user_with_token(pool: &PgPool, username: &str, role: Role) -> (User, String) {
    let user = create_user_with_role(pool, username, role).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// AI stub
// ---------------------------------------------------------------------------

/// Records every prompt and answers with a fixed reply, or fails.
pub struct StubGenerator {
    reply: Option<String>,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Replies only after sleeping for `delay`.
    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            delay: Some(delay),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, request: Completion<'_>) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(AiError::Api {
                status: 503,
                body: "provider overloaded".into(),
            }),
        }
    }
}
