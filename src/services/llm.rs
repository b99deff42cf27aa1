//! OpenAI-compatible chat-completion client.
//!
//! The bot only ever needs "messages in, first choice text out", so that is
//! the whole surface. Handlers depend on the [`ChatApi`] trait rather than
//! the concrete client so tests can substitute a scripted implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::BotError;

/// Outbound call timeout. Expiry is treated as a handled provider failure,
/// never a hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatMessage>,
}

impl ChatCompletionResponse {
    /// First choice only; anything else in the body is ignored.
    pub(crate) fn first_choice_text(&self) -> Option<String> {
        self.choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.clone())
    }
}

/// The one operation handlers need from the LLM provider.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, BotError>;
}

/// Stateless wrapper around a remote chat-completion endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ChatApi for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, BotError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("llm: POST {} model={}", url, self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Provider(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BotError::Provider(format!("provider returned {status}: {text}")));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| BotError::Provider(format!("failed to parse response: {e}")))?;

        parsed
            .first_choice_text()
            .ok_or_else(|| BotError::Provider("response contained no choices".to_string()))
    }
}
