//! Voice command interpreter — maps one transcript to one [`VoiceIntent`].
//!
//! Rules are tried in a fixed order and the first match wins:
//!
//! ```text
//! 1. exactly an own phrase          → Ignore
//! 2. stop | cancel | halt           → Stop
//! 3. pause                          → Pause
//! 4. resume | continue              → Resume
//! 5. zoom …                         → Zoom(reset | ±n)
//! 6. scroll … / top / bottom        → Scroll(edge | direction n%)
//! 7. open | go to | visit | launch  → OpenSite(rest)
//! 8. describe | summary | …         → SetMode(Summary)
//!    read | full | entire | …       → SetMode(Full)
//! 9. anything else                  → Unknown
//! ```
//!
//! Matching is purely lexical.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ReadingMode;

use super::feedback::{is_self_feedback, normalize_transcript};
use super::intent::{
    ScrollDirection, ScrollTarget, VoiceIntent, ZoomChange, DEFAULT_SCROLL_PERCENT,
    DEFAULT_ZOOM_STEP,
};

/// Spoken magnitudes above this are capped.
const MAX_MAGNITUDE: u32 = 500;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

static STOP: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(stop|cancel|halt)\b"));
static PAUSE: LazyLock<Regex> = LazyLock::new(|| regex(r"\bpause\b"));
static RESUME: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(resume|continue)\b"));

static ZOOM: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(zoom|magnify)\b"));
static ZOOM_RESET: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(reset|default|normal)\b"));
static ZOOM_OUT: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(out|smaller|decrease|reduce|less)\b"));

static SCROLL: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"\bscroll(ing)?\b|\b(go|jump|back) to (the )?(top|bottom)\b|\b(top|bottom) of (the )?page\b")
});
static EDGE_TOP: LazyLock<Regex> = LazyLock::new(|| regex(r"\btop\b"));
static EDGE_BOTTOM: LazyLock<Regex> = LazyLock::new(|| regex(r"\bbottom\b"));
static DIRECTION: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(up|down|left|right)\b"));

static OPEN_SITE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(?:open|go to|visit|launch)\s+(.+)"));
static SITE_FILLER: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(website|web site|site)\b"));

static SUMMARY_MODE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"\b(describe|summary|summarize|summarise|overview|short version)\b")
});
static FULL_MODE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(read|full|entire|article|out loud)\b"));

static NUMBER: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(\d{1,4})\s*(%|percent|per cent)?"));
static FRACTION: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(half|quarter)\b"));
static SMALL_NUMBER: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(ten|twenty|thirty)\b"));

// ---------------------------------------------------------------------------
// interpret
// ---------------------------------------------------------------------------

/// Classify one transcript.  Never fails.
///
/// ```
/// use page_narrator::voice::{interpret, VoiceIntent};
///
/// assert_eq!(interpret("please stop now"), VoiceIntent::Stop);
/// assert_eq!(interpret("open youtube"), VoiceIntent::OpenSite("youtube".into()));
/// assert_eq!(interpret("asdkjf"), VoiceIntent::Unknown);
/// ```
pub fn interpret(transcript: &str) -> VoiceIntent {
    if is_self_feedback(transcript) {
        return VoiceIntent::Ignore;
    }

    let text = normalize_transcript(transcript);
    if text.is_empty() {
        return VoiceIntent::Unknown;
    }

    if STOP.is_match(&text) {
        return VoiceIntent::Stop;
    }
    if PAUSE.is_match(&text) {
        return VoiceIntent::Pause;
    }
    if RESUME.is_match(&text) {
        return VoiceIntent::Resume;
    }
    if ZOOM.is_match(&text) {
        return VoiceIntent::Zoom(zoom_change(&text));
    }
    if SCROLL.is_match(&text) {
        return VoiceIntent::Scroll(scroll_target(&text));
    }
    if let Some(query) = site_query(&text) {
        return VoiceIntent::OpenSite(query);
    }
    if SUMMARY_MODE.is_match(&text) {
        return VoiceIntent::SetMode(ReadingMode::Summary);
    }
    if FULL_MODE.is_match(&text) {
        return VoiceIntent::SetMode(ReadingMode::Full);
    }

    VoiceIntent::Unknown
}

fn zoom_change(text: &str) -> ZoomChange {
    if ZOOM_RESET.is_match(text) {
        return ZoomChange::Reset;
    }
    let step = magnitude(text).unwrap_or(DEFAULT_ZOOM_STEP) as i32;
    if ZOOM_OUT.is_match(text) {
        ZoomChange::Delta(-step)
    } else {
        ZoomChange::Delta(step)
    }
}

fn scroll_target(text: &str) -> ScrollTarget {
    if EDGE_TOP.is_match(text) {
        return ScrollTarget::Top;
    }
    if EDGE_BOTTOM.is_match(text) {
        return ScrollTarget::Bottom;
    }

    let direction = DIRECTION
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| match m.as_str() {
            "up" => ScrollDirection::Up,
            "left" => ScrollDirection::Left,
            "right" => ScrollDirection::Right,
            _ => ScrollDirection::Down,
        })
        .unwrap_or(ScrollDirection::Down);

    ScrollTarget::Direction {
        direction,
        amount_percent: magnitude(text).unwrap_or(DEFAULT_SCROLL_PERCENT),
    }
}

/// Website name after the open verb, minus a leading "the" and the words
/// "website"/"site".  `None` when nothing is left.
fn site_query(text: &str) -> Option<String> {
    let rest = OPEN_SITE.captures(text)?.get(1)?.as_str();
    let rest = SITE_FILLER.replace_all(rest, " ");
    let mut words: Vec<&str> = rest.split_whitespace().collect();
    if words.first() == Some(&"the") {
        words.remove(0);
    }
    let query = words.join(" ");
    (!query.is_empty()).then_some(query)
}

/// Spoken magnitude in percent: digits (with or without a unit), then
/// "half"/"quarter", then "ten"/"twenty"/"thirty".
pub fn magnitude(text: &str) -> Option<u32> {
    let spoken = NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .or_else(|| {
            FRACTION.captures(text).map(|c| match &c[1] {
                "half" => 50,
                _ => 25,
            })
        })
        .or_else(|| {
            SMALL_NUMBER.captures(text).map(|c| match &c[1] {
                "ten" => 10,
                "twenty" => 20,
                _ => 30,
            })
        })?;
    Some(spoken.min(MAX_MAGNITUDE))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
