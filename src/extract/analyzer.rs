//! Main-content detection.
//!
//! Candidates are tried in priority order; the first whose normalised text is
//! longer than [`MIN_CANDIDATE_CHARS`] wins:
//!
//! ```text
//! 1. <main>
//! 2. first <article> with enough text
//! 3. [role="main"]
//! 4. [role="article"]
//! 5. best-scoring <div>/<section> that looks like content (longest text)
//! 6. <body> minus header/nav/footer/aside/.sidebar/.navigation/.menu  (> 50)
//! 7. <body> as-is, however short
//! ```

use scraper::node::Element;
use scraper::{ElementRef, Html};

use super::text::{char_len, collect_text, normalize_whitespace};

/// A candidate region must hold more than this many characters.
pub const MIN_CANDIDATE_CHARS: usize = 100;

/// The chrome-stripped body must hold more than this many characters.
pub const MIN_BODY_CHARS: usize = 50;

/// Class-name fragments that mark an element as likely main content.
const CONTENT_CLASS_HINTS: &[&str] = &["content", "main-content", "article", "post", "entry"];

/// Semantic tags that mark an element as likely main content.
const CONTENT_TAGS: &[&str] = &["main", "article", "section"];

/// ARIA roles that mark an element as likely main content.
const CONTENT_ROLES: &[&str] = &["main", "article", "region", "contentinfo"];

/// Tags treated as page chrome by the body fallback.
const CHROME_TAGS: &[&str] = &["header", "nav", "footer", "aside"];

/// Class names treated as page chrome by the body fallback.
const CHROME_CLASSES: &[&str] = &["sidebar", "navigation", "menu"];

/// Which tier produced the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Main,
    Article,
    RoleMain,
    RoleArticle,
    Heuristic,
    FilteredBody,
    Body,
}

/// Extract the best-effort readable text of `document`.
///
/// Never fails; the result may be empty.
pub fn extract_text(document: &Html) -> String {
    find_main_content(document).1
}

/// Like [`extract_text`] but also reports which tier matched.
pub fn find_main_content(document: &Html) -> (ContentSource, String) {
    let elements: Vec<ElementRef<'_>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();

    // 1. The single <main> element.
    if let Some(main) = elements.iter().find(|e| tag(e) == "main") {
        if let Some(text) = substantial(readable_text(*main)) {
            return (ContentSource::Main, text);
        }
    }

    // 2. First <article> with enough text.
    for article in elements.iter().filter(|e| tag(e) == "article") {
        if let Some(text) = substantial(readable_text(*article)) {
            return (ContentSource::Article, text);
        }
    }

    // 3./4. ARIA landmarks.
    for (role, source) in [("main", ContentSource::RoleMain), ("article", ContentSource::RoleArticle)] {
        if let Some(landmark) = elements.iter().find(|e| has_role(e.value(), role)) {
            if let Some(text) = substantial(readable_text(*landmark)) {
                return (source, text);
            }
        }
    }

    // 5. Heuristic scan over block containers.
    let mut best: Option<(usize, String)> = None;
    for candidate in elements
        .iter()
        .filter(|e| matches!(tag(e), "div" | "section"))
        .filter(|e| looks_like_content(e.value()))
    {
        let text = readable_text(*candidate);
        let score = char_len(&text);
        let beats_best = best.as_ref().map_or(true, |(s, _)| score > *s);
        if score > MIN_CANDIDATE_CHARS && beats_best {
            best = Some((score, text));
        }
    }
    if let Some((score, text)) = best {
        log::debug!("extract: heuristic candidate won with {score} chars");
        return (ContentSource::Heuristic, text);
    }

    let body = elements.iter().find(|e| tag(e) == "body").copied();

    // 6. Body without chrome.
    if let Some(body) = body {
        let text = normalize_whitespace(&collect_text(body, &is_chrome));
        if char_len(&text) > MIN_BODY_CHARS {
            return (ContentSource::FilteredBody, text);
        }
    }

    // 7. Whatever the body holds.
    let text = body.map(readable_text).unwrap_or_default();
    (ContentSource::Body, text)
}

/// The document `<title>`, normalised; empty when absent.
pub fn document_title(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| tag(e) == "title")
        .map(|t| normalize_whitespace(&t.text().collect::<String>()))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn tag<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

fn readable_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&collect_text(element, &|_| false))
}

fn substantial(text: String) -> Option<String> {
    (char_len(&text) > MIN_CANDIDATE_CHARS).then_some(text)
}

fn has_role(element: &Element, role: &str) -> bool {
    element
        .attr("role")
        .is_some_and(|r| r.trim().eq_ignore_ascii_case(role))
}

fn looks_like_content(element: &Element) -> bool {
    if CONTENT_TAGS.contains(&element.name()) {
        return true;
    }
    if CONTENT_ROLES.iter().any(|role| has_role(element, role)) {
        return true;
    }
    let class = element.attr("class").unwrap_or("").to_lowercase();
    CONTENT_CLASS_HINTS.iter().any(|hint| class.contains(hint))
}

fn is_chrome(element: &Element) -> bool {
    CHROME_TAGS.contains(&element.name())
        || element
            .classes()
            .any(|c| CHROME_CLASSES.iter().any(|chrome| c.eq_ignore_ascii_case(chrome)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
