//! Content extraction — turns an arbitrary HTML page into readable text.
//!
//! This module provides:
//! * [`extract_text`] — best-effort main-content text of a parsed document.
//! * [`find_main_content`] — same, plus which priority tier matched.
//! * [`ExtractedContent`] — text + source URL + title for one read request.
//! * [`normalize_whitespace`] — the normaliser applied to every candidate.
//!
//! Extraction never fails.  An empty result is a valid answer; deciding that
//! an empty page cannot be read is the caller's job.
//!
//! # Quick start
//!
//! ```rust
//! use page_narrator::extract::ExtractedContent;
//!
//! let html = "<html><head><title>Demo</title></head><body><p>Hello there.</p></body></html>";
//! let content = ExtractedContent::from_html(html, "https://example.com/");
//! assert_eq!(content.title, "Demo");
//! assert_eq!(content.text, "Hello there.");
//! ```

pub mod analyzer;
pub mod text;

use scraper::Html;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analyzer::{
    document_title, extract_text, find_main_content, ContentSource, MIN_BODY_CHARS,
    MIN_CANDIDATE_CHARS,
};
pub use text::normalize_whitespace;

// ---------------------------------------------------------------------------
// ExtractedContent
// ---------------------------------------------------------------------------

/// The readable content of one page, created fresh for every read request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub text: String,
    pub source_url: String,
    pub title: String,
}

impl ExtractedContent {
    /// Parse `html` and extract its main content.
    pub fn from_html(html: &str, source_url: &str) -> Self {
        let document = Html::parse_document(html);
        let (source, text) = find_main_content(&document);
        log::debug!(
            "extract: {:?} tier produced {} chars from {source_url}",
            source,
            text.chars().count()
        );
        Self {
            text,
            source_url: source_url.to_string(),
            title: document_title(&document),
        }
    }

    /// `true` when there is nothing to read.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
