//! Groq chat-completions client.
//!
//! Thin async client for the OpenAI-compatible endpoint that turns finalized
//! compliance results into human-readable explanations. Configured entirely
//! from the environment; an unconfigured client is a normal state surfaced at
//! startup, not a request-time panic.

use std::time::Duration;

use serde::Deserialize;

use super::prompt::{build_messages, ChatMessage};
use super::reply::LlmReply;
use crate::services::InsightContext;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Error type for explanation requests.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("missing required env var: {0}")]
    MissingConfig(&'static str),

    #[error("explanation service not configured")]
    NotConfigured,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized (401/403); check GROQ_API_KEY and project access")]
    Unauthorized,

    #[error("rate limited (429); max retries reached")]
    RateLimited,

    #[error("upstream server error ({0}); try again later")]
    Server(u16),

    #[error("request failed ({status}): {body}")]
    RequestFailed { status: u16, body: String },

    #[error("invalid response shape: {0}")]
    InvalidResponse(String),
}

/// Client configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GroqConfig {
    /// Read `GROQ_API_KEY`, `GROQ_MODEL` and optional `GROQ_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = require_env("GROQ_API_KEY")?;
        let model = require_env("GROQ_MODEL")?;
        let base_url = std::env::var("GROQ_BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, LlmError> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(LlmError::MissingConfig(name))
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Async Groq client. Cheap to clone-by-reference via `Arc` in app state.
pub struct GroqClient {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Build a client from explicit configuration.
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// Build a client from the environment.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(GroqConfig::from_env()?)
    }

    /// Generate an explanation for the given context.
    ///
    /// `question: None` requests the summary/recommendations form;
    /// `Some(question)` requests the answer/notes form.
    pub async fn generate(
        &self,
        context: &InsightContext,
        question: Option<&str>,
    ) -> Result<LlmReply, LlmError> {
        let messages = build_messages(context, question);
        let response = self.post_chat_completions(&messages).await?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(LlmReply::parse(content))
    }

    /// POST /chat/completions with bounded retries on 429.
    ///
    /// 401/403 and 5xx fail immediately; only rate limiting is retried, with
    /// exponential backoff starting at one second.
    async fn post_chat_completions(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": 0.2,
        });

        let mut backoff = Duration::from_secs(1);

        for attempt in 0..=MAX_RATE_LIMIT_RETRIES {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LlmError::Unauthorized);
            }

            if status.as_u16() == 429 {
                if attempt >= MAX_RATE_LIMIT_RETRIES {
                    return Err(LlmError::RateLimited);
                }
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            if status.is_server_error() {
                return Err(LlmError::Server(status.as_u16()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::RequestFailed {
                    status: status.as_u16(),
                    body,
                });
            }

            return response
                .json::<ChatCompletionResponse>()
                .await
                .map_err(|e| LlmError::InvalidResponse(e.to_string()));
        }

        Err(LlmError::RateLimited)
    }
}
