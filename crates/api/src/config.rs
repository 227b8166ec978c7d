use std::time::Duration;

use crate::ai::AiConfig;
use crate::auth::jwt::JwtConfig;

/// Runtime mode in which upstream error details are echoed to clients.
const DEVELOPMENT_ENV: &str = "development";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret and database URL have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Include upstream failure details in error bodies (`APP_ENV=development`).
    pub expose_error_details: bool,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `production`               |
    ///
    /// See [`JwtConfig::from_env`] and [`AiConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let expose_error_details = std::env::var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case(DEVELOPMENT_ENV))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            expose_error_details,
            jwt: JwtConfig::from_env(),
            ai: AiConfig::from_env(),
        }
    }

    /// Budget for one AI provider call: four fifths of the request timeout,
    /// so the provider error reaches the client before the request is cut.
    pub fn ai_call_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_secs.saturating_mul(800).max(1))
    }
}
