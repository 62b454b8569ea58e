//! Core [`CompletionBackend`] trait and the [`ChatClient`] implementation.
//!
//! `ChatClient` calls any OpenAI-compatible `{base_url}/chat/completions`
//! endpoint: OpenAI, Groq, Ollama (OpenAI mode), LM Studio, vLLM, etc.
//! Connection details are read from the [`PreferenceStore`] on every call, so
//! a key entered in the settings takes effect without a restart.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::PreferenceStore;
use crate::llm::prompt::truncate_chars;

/// Upstream error bodies are cut to this many characters before surfacing.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// There was nothing to send.
    #[error("no content to summarize")]
    NoContent,

    /// No API key is configured.
    #[error("no AI API key configured")]
    MissingCredential,

    /// The endpoint answered with a non-success status.
    #[error("AI request failed with status {status}: {body}")]
    UpstreamFailure { status: u16, body: String },

    /// The response did not contain `choices[0].message.content`.
    #[error("AI response did not contain any text")]
    MalformedResponse,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("AI request timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionRequest
// ---------------------------------------------------------------------------

/// One chat message in OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Everything except the model and credential, which come from preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ---------------------------------------------------------------------------
// CompletionBackend trait
// ---------------------------------------------------------------------------

/// Async seam over the chat-completions endpoint.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn CompletionBackend>`).
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// `true` when a credential is configured and requests may be attempted.
    fn has_credential(&self) -> bool;

    /// Send `request` and return the trimmed text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ChatClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatClient {
    client: reqwest::Client,
    prefs: Arc<dyn PreferenceStore>,
}

impl ChatClient {
    /// Build a client whose per-request timeout is taken from the current
    /// `ai.timeout_secs` preference.
    ///
    /// A default (no-timeout) client is used as a last-resort fallback if the
    /// builder fails.
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let timeout = Duration::from_secs(prefs.ai_config().timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_http_client(prefs, client)
    }

    /// Use a caller-supplied HTTP client.
    pub fn with_http_client(prefs: Arc<dyn PreferenceStore>, client: reqwest::Client) -> Self {
        Self { client, prefs }
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    fn has_credential(&self) -> bool {
        self.prefs.ai_config().credential().is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let ai = self.prefs.ai_config();
        let key = ai.credential().ok_or(LlmError::MissingCredential)?.to_string();
        let url = ai.completions_url();

        let body = serde_json::json!({
            "model":       ai.model,
            "temperature": request.temperature,
            "max_tokens":  request.max_tokens,
            "messages":    request.messages,
        });

        log::debug!(
            "llm: POST {url} (model={}, max_tokens={})",
            ai.model,
            request.max_tokens
        );

        let response = self.client.post(&url).bearer_auth(key).json(&body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        parse_completion(status, &text)
    }
}

/// Interpret a raw chat-completions response.
///
/// Non-2xx statuses become [`LlmError::UpstreamFailure`] with the body capped
/// at [`MAX_ERROR_BODY_CHARS`]; a 2xx body without text becomes
/// [`LlmError::MalformedResponse`].
pub fn parse_completion(status: u16, body: &str) -> Result<String, LlmError> {
    if !(200..300).contains(&status) {
        return Err(LlmError::UpstreamFailure {
            status,
            body: truncate_chars(body, MAX_ERROR_BODY_CHARS),
        });
    }

    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|_| LlmError::MalformedResponse)?;

    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(LlmError::MalformedResponse)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
