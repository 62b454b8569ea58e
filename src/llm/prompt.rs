//! Prompt builders for the two AI tasks: page descriptions and website
//! name resolution.

use super::client::{ChatMessage, CompletionRequest};
use super::summarizer::PageMetadata;

/// Page text beyond this many characters is dropped before summarizing.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 12_000;

const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 400;

const SITE_TEMPERATURE: f32 = 0.0;
const SITE_MAX_TOKENS: u32 = 60;

/// The literal reply meaning "no confident answer".
pub const UNKNOWN_SITE_TOKEN: &str = "UNKNOWN";

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const SUMMARY_INSTRUCTION: &str = "\
You are an accessibility assistant who describes web pages to people who cannot see them.
Task: explain what this page is about and what matters most on it.

Rules:
1. Write 4 to 6 warm, empathetic sentences in plain spoken English.
2. Mention the page's purpose before its details.
3. Do not use lists, headings, markdown, or URLs; the text will be read aloud.
4. Reply with ONLY the description.";

const SITE_INSTRUCTION: &str = "\
You map informal website names to the canonical homepage of that website.
Rules:
1. Reply with a single absolute URL and nothing else.
2. If you are not confident which website is meant, reply with exactly UNKNOWN.";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the page-description request.  `content` is cut to
/// [`MAX_SUMMARY_INPUT_CHARS`] first.
pub fn summary_request(content: &str, metadata: &PageMetadata) -> CompletionRequest {
    let title = if metadata.title.trim().is_empty() {
        "(untitled)"
    } else {
        metadata.title.trim()
    };
    let truncated = truncate_chars(content, MAX_SUMMARY_INPUT_CHARS);

    let user_msg = format!(
        "Page title: {title}\nPage URL: {}\n\nPage content:\n{truncated}",
        metadata.url
    );

    CompletionRequest {
        messages: vec![
            ChatMessage::system(SUMMARY_INSTRUCTION),
            ChatMessage::user(user_msg),
        ],
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: SUMMARY_MAX_TOKENS,
    }
}

/// Build the "which website is this?" request.
pub fn site_request(query: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(SITE_INSTRUCTION),
            ChatMessage::user(format!("Website request: {}", query.trim())),
        ],
        temperature: SITE_TEMPERATURE,
        max_tokens: SITE_MAX_TOKENS,
    }
}

/// First `max` characters of `text` (char-boundary safe).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
