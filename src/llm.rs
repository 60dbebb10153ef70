//! Upstream chat-completion client.
//!
//! Thin wrapper over the hosted LLM endpoint: one POST, bearer auth, bounded
//! timeout, no retries. The outcome carries the raw status and body so
//! callers decide how to surface upstream failures.

use crate::chat::ChatMessage;
use crate::config::Settings;
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw outcome of a completion call. Status and body are kept as-is so the
/// processor can report `LLM Error {status}` with the upstream's own text.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub status: u16,
    pub body: Value,
    pub text: String,
}

impl CompletionOutcome {
    /// Content of the first completion choice, if any.
    #[must_use]
    pub fn first_choice_text(&self) -> Option<&str> {
        self.body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
    }
}

/// Abstraction over the upstream completion API. The HTTP implementation is
/// the only one in production; tests substitute their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<CompletionOutcome, ApiError>;
}

/// `reqwest`-backed client for OpenAI-compatible chat completion endpoints.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpCompletionClient {
    /// Builds a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<CompletionOutcome, ApiError> {
        let payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        tracing::debug!("Completion call returned status {status}");

        Ok(CompletionOutcome { status, body, text })
    }
}
