//! Handlers for the AI assistant.
//!
//! Both endpoints forward a prompt to the single provider chosen at startup
//! and return its text unmodified.

use std::sync::Arc;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use yemenpedia_core::assistant::{
    build_ask_prompt, build_improvement_prompt, validate_question, ContextArticle,
    ASK_MAX_TOKENS, ASK_SYSTEM_PROMPT, CONTEXT_ARTICLE_LIMIT, EDITOR_SYSTEM_PROMPT,
    SUGGEST_MAX_TOKENS,
};
use yemenpedia_core::error::CoreError;
use yemenpedia_core::search::build_tsquery;
use yemenpedia_db::models::article::ArticleContext;
use yemenpedia_db::repositories::SearchRepo;

use crate::ai::{generate_within, AiError, Completion, TextGenerator};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::response::Envelope;
use crate::state::AppState;

const ASSISTANT_FAILED: &str = "حدث خطأ في المساعد الذكي";
const NO_PROVIDER: &str = "مزود الذكاء الصناعي غير مُعرّف";

/// Request body for `POST /ai/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    pub context: Option<String>,
}

/// Request body for `POST /ai/suggest-improvements`.
#[derive(Debug, Deserialize)]
pub struct ImprovementRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// An article the answer was grounded on.
#[derive(Debug, Serialize)]
pub struct RelatedSnippet {
    pub title: String,
    pub summary: Option<String>,
}

/// POST /api/v1/ai/ask
pub async fn ask(
    State(state): State<AppState>,
    viewer: MaybeUser,
    JsonBody(input): JsonBody<AskRequest>,
) -> AppResult<Envelope> {
    validate_question(&input.question)?;
    let generator = provider(&state)?;

    let articles: Vec<ArticleContext> = match build_tsquery(&input.question) {
        Some(tsquery) => {
            SearchRepo::context_articles(&state.pool, &tsquery, CONTEXT_ARTICLE_LIMIT).await?
        }
        None => Vec::new(),
    };

    let quoted: Vec<ContextArticle<'_>> = articles
        .iter()
        .map(|a| ContextArticle {
            title: &a.title,
            summary: a.summary.as_deref(),
            content: &a.content,
        })
        .collect();
    let prompt = build_ask_prompt(&quoted, input.context.as_deref(), input.question.trim());

    let request = Completion {
        system: ASK_SYSTEM_PROMPT,
        prompt: &prompt,
        max_tokens: ASK_MAX_TOKENS,
    };
    let answer = generate_within(generator.as_ref(), request, state.config.ai_call_timeout())
        .await
        .map_err(|e| upstream_error(&state, generator.name(), e))?;

    tracing::info!(
        user_id = ?viewer.user_id(),
        provider = generator.name(),
        context_articles = articles.len(),
        "Assistant answered"
    );

    let related: Vec<RelatedSnippet> = articles
        .into_iter()
        .map(|a| RelatedSnippet {
            title: a.title,
            summary: a.summary,
        })
        .collect();

    Ok(Envelope::ok()
        .with("answer", answer)
        .with("relatedArticles", related))
}

/// POST /api/v1/ai/suggest-improvements
pub async fn suggest_improvements(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<ImprovementRequest>,
) -> AppResult<Envelope> {
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("المحتوى مطلوب".into())));
    }
    let generator = provider(&state)?;

    let prompt = build_improvement_prompt(input.title.as_deref(), &input.content);
    let request = Completion {
        system: EDITOR_SYSTEM_PROMPT,
        prompt: &prompt,
        max_tokens: SUGGEST_MAX_TOKENS,
    };
    let suggestions =
        generate_within(generator.as_ref(), request, state.config.ai_call_timeout())
            .await
            .map_err(|e| upstream_error(&state, generator.name(), e))?;

    tracing::info!(
        user_id = auth.user_id,
        provider = generator.name(),
        "Improvement suggestions generated"
    );

    Ok(Envelope::ok().with("suggestions", suggestions))
}

fn provider(state: &AppState) -> AppResult<Arc<dyn TextGenerator>> {
    state.ai.clone().ok_or_else(|| AppError::Upstream {
        message: NO_PROVIDER.into(),
        detail: None,
    })
}

fn upstream_error(state: &AppState, provider: &str, err: AiError) -> AppError {
    tracing::error!(provider, error = %err, "AI provider call failed");
    AppError::Upstream {
        message: ASSISTANT_FAILED.into(),
        detail: state.config.expose_error_details.then(|| err.to_string()),
    }
}
