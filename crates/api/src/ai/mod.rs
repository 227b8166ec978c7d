//! AI text generation providers.
//!
//! Exactly one provider is chosen at startup from [`AiConfig`] and stored in
//! [`crate::state::AppState`] as `Option<Arc<dyn TextGenerator>>`. Calls are
//! single attempts with no retry, bounded by a call timeout that is kept
//! below the server's request timeout so a slow provider still produces an
//! error envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure talking to an AI provider.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("AI provider error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response parsed but carried no text.
    #[error("AI provider returned no text")]
    EmptyResponse,

    /// The provider did not answer within the call timeout.
    #[error("AI provider timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One completion request: a system instruction plus a user prompt.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

/// A text-completion backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Return the provider's answer text unmodified.
    async fn generate(&self, request: Completion<'_>) -> Result<String, AiError>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which provider `AI_API_PROVIDER` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Claude,
}

impl ProviderKind {
    /// Parse the `AI_API_PROVIDER` value. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "claude" | "anthropic" => Some(Self::Claude),
            _ => None,
        }
    }
}

/// AI provider settings.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    /// Overrides the provider's default model.
    pub model: Option<String>,
}

impl AiConfig {
    /// Load AI settings from environment variables.
    ///
    /// | Env Var           | Default                          |
    /// |-------------------|----------------------------------|
    /// | `AI_API_PROVIDER` | unset (`openai` or `claude`)     |
    /// | `AI_API_KEY`      | unset                            |
    /// | `AI_MODEL`        | provider default                 |
    pub fn from_env() -> Self {
        let raw_provider = std::env::var("AI_API_PROVIDER").ok();
        let provider = raw_provider.as_deref().and_then(ProviderKind::parse);
        if let (Some(raw), None) = (raw_provider.as_deref(), provider) {
            tracing::warn!(provider = raw, "Unknown AI_API_PROVIDER, assistant disabled");
        }

        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            provider,
            api_key: non_empty("AI_API_KEY"),
            model: non_empty("AI_MODEL"),
        }
    }
}

/// Build the configured provider, or `None` when the assistant is disabled.
/// `timeout` bounds each provider HTTP request.
pub fn build_generator(config: &AiConfig, timeout: Duration) -> Option<Arc<dyn TextGenerator>> {
    let kind = config.provider?;
    let Some(api_key) = config.api_key.clone() else {
        tracing::warn!(?kind, "AI_API_KEY is not set, assistant disabled");
        return None;
    };

    let generator: Arc<dyn TextGenerator> = match kind {
        ProviderKind::OpenAi => {
            Arc::new(OpenAiProvider::new(api_key, config.model.clone(), timeout))
        }
        ProviderKind::Claude => {
            Arc::new(AnthropicProvider::new(api_key, config.model.clone(), timeout))
        }
    };
    tracing::info!(provider = generator.name(), "AI assistant enabled");
    Some(generator)
}

/// Run one completion, turning an overrun of `timeout` into
/// [`AiError::Timeout`].
pub async fn generate_within(
    generator: &dyn TextGenerator,
    request: Completion<'_>,
    timeout: Duration,
) -> Result<String, AiError> {
    tokio::time::timeout(timeout, generator.generate(request))
        .await
        .map_err(|_| AiError::Timeout(timeout))?
}

/// Shared HTTP client builder for providers.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default reqwest client");
            reqwest::Client::new()
        })
}

/// Turn a non-2xx response into [`AiError::Api`].
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(AiError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse(" claude "), Some(ProviderKind::Claude));
        assert_eq!(ProviderKind::parse("gemini"), None);
    }

    #[test]
    fn no_generator_without_provider_or_key() {
        assert!(build_generator(&AiConfig::default(), Duration::from_secs(5)).is_none());

        let keyless = AiConfig {
            provider: Some(ProviderKind::OpenAi),
            api_key: None,
            model: None,
        };
        assert!(build_generator(&keyless, Duration::from_secs(5)).is_none());
    }

    #[test]
    fn generator_matches_configured_provider() {
        let config = AiConfig {
            provider: Some(ProviderKind::Claude),
            api_key: Some("key".into()),
            model: None,
        };
        let generator = build_generator(&config, Duration::from_secs(5)).expect("configured");
        assert_eq!(generator.name(), "claude");
    }

    struct Sleeper;

    #[async_trait]
    impl TextGenerator for Sleeper {
        fn name(&self) -> &'static str {
            "sleeper"
        }

        async fn generate(&self, _request: Completion<'_>) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".into())
        }
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let request = Completion {
            system: "",
            prompt: "سؤال",
            max_tokens: 16,
        };
        let err = generate_within(&Sleeper, request, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Timeout(_)));
    }
}
