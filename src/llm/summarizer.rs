//! Summarization gateway — asks the completion endpoint for a short spoken
//! description of a page.
//!
//! The gateway reports every failure.  Falling back to the full page text is
//! the reading session's decision, not the gateway's.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{CompletionBackend, LlmError};
use super::prompt::summary_request;

// ---------------------------------------------------------------------------
// PageMetadata
// ---------------------------------------------------------------------------

/// Context sent alongside the page text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Summarizer trait
// ---------------------------------------------------------------------------

/// Async trait for page summarization.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Summarizer>`).
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str, metadata: &PageMetadata) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiSummarizer
// ---------------------------------------------------------------------------

/// Summarizes through a [`CompletionBackend`].
pub struct ApiSummarizer {
    backend: Arc<dyn CompletionBackend>,
}

impl ApiSummarizer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Summarizer for ApiSummarizer {
    /// Fails with [`LlmError::NoContent`] on blank input and
    /// [`LlmError::MissingCredential`] without an API key, before any request
    /// is made.
    async fn summarize(&self, content: &str, metadata: &PageMetadata) -> Result<String, LlmError> {
        if content.trim().is_empty() {
            return Err(LlmError::NoContent);
        }
        if !self.backend.has_credential() {
            return Err(LlmError::MissingCredential);
        }

        let request = summary_request(content, metadata);
        let summary = self.backend.complete(&request).await?;
        log::debug!(
            "llm: summary of {} chars for {:?}",
            summary.chars().count(),
            metadata.url
        );
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
