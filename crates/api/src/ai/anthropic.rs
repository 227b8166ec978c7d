//! Anthropic messages API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_success, http_client, AiError, Completion, TextGenerator};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// [`TextGenerator`] backed by `POST /v1/messages`.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block.
    fn into_text(self) -> Result<String, AiError> {
        self.content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text)
            .ok_or(AiError::EmptyResponse)
    }
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn generate(&self, request: Completion<'_>) -> Result<String, AiError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: request.system,
            messages: [UserMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let parsed: MessagesResponse = ensure_success(response).await?.json().await?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn first_text_block_is_returned() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"id":"msg","content":[{"type":"text","text":"عدن"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().unwrap(), "عدن");
    }

    #[test]
    fn no_text_block_is_empty_response() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_matches!(parsed.into_text(), Err(AiError::EmptyResponse));
    }
}
