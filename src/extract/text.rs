//! Text collection from element subtrees and whitespace normalisation.
//!
//! Non-content nodes (`script`, `style`, `noscript`, `template`, inline SVG,
//! anything `hidden` or `aria-hidden="true"`) are skipped while walking, so
//! they never contribute to either the measured length or the returned text.

use scraper::node::Element;
use scraper::{ElementRef, Node};

/// Tags whose content is never readable text.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "object",
];

/// Tags that start a new paragraph in the collected text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "td", "th", "tr", "ul",
];

/// Returns `true` for elements that must never be read or measured.
pub fn is_non_content(element: &Element) -> bool {
    if NON_CONTENT_TAGS.contains(&element.name()) {
        return true;
    }
    if element.attr("hidden").is_some() {
        return true;
    }
    matches!(element.attr("aria-hidden"), Some(v) if v.eq_ignore_ascii_case("true"))
}

/// Collect the readable text under `root`, skipping non-content nodes and
/// every element for which `exclude` returns `true`.
///
/// The result is raw: call [`normalize_whitespace`] before measuring it.
pub fn collect_text(root: ElementRef<'_>, exclude: &dyn Fn(&Element) -> bool) -> String {
    let mut out = String::new();
    walk(root, exclude, &mut out);
    out
}

fn walk(element: ElementRef<'_>, exclude: &dyn Fn(&Element) -> bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if is_non_content(el) || exclude(el) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if el.name() == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_TAGS.contains(&el.name());
                if block {
                    out.push_str("\n\n");
                }
                walk(child_ref, exclude, out);
                if block {
                    out.push_str("\n\n");
                } else {
                    // Adjacent inline elements are often separated only by
                    // markup; keep their words apart.
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace runs inside each line to a single space, collapse any
/// run of blank lines to exactly one blank line, and trim both ends.
///
/// ```
/// use page_narrator::extract::normalize_whitespace;
///
/// let raw = "  Hello \t  world \n\n\n\n  Second   paragraph  ";
/// assert_eq!(normalize_whitespace(raw), "Hello world\n\nSecond paragraph");
/// ```
pub fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_blank = false;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = true;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        out.push_str(&collapsed);
        pending_blank = false;
    }

    out
}

/// Length in characters (not bytes), the unit every threshold is given in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
