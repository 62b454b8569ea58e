//! AI completion module.
//!
//! This module provides:
//! * [`CompletionBackend`] — async trait over the chat-completions endpoint.
//! * [`ChatClient`] — OpenAI-compatible REST implementation.
//! * [`Summarizer`] / [`ApiSummarizer`] — the page summarization gateway.
//! * [`summary_request`] / [`site_request`] — prompt builders.
//! * [`LlmError`] — error variants for AI operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use page_narrator::config::{MemoryPreferences, PreferenceStore};
//! use page_narrator::llm::{ApiSummarizer, ChatClient, PageMetadata, Summarizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::default());
//!     let summarizer = ApiSummarizer::new(Arc::new(ChatClient::new(prefs)));
//!
//!     let metadata = PageMetadata { title: "Example".into(), url: "https://example.com".into() };
//!     match summarizer.summarize("Some page text", &metadata).await {
//!         Ok(summary) => println!("{summary}"),
//!         Err(e) => eprintln!("no summary: {e}"),
//!     }
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod summarizer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{
    parse_completion, ChatClient, ChatMessage, CompletionBackend, CompletionRequest, LlmError,
    MAX_ERROR_BODY_CHARS,
};
pub use prompt::{
    site_request, summary_request, truncate_chars, MAX_SUMMARY_INPUT_CHARS, UNKNOWN_SITE_TOKEN,
};
pub use summarizer::{ApiSummarizer, PageMetadata, Summarizer};
