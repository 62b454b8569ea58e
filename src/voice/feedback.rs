//! Spoken confirmations, and recognising them when the microphone hears them.
//!
//! Every phrase the dispatcher speaks back is listed in [`FEEDBACK_PHRASES`],
//! so a transcript that *is* one of them (give or take a hesitation word at
//! either end) is treated as an echo rather than a command.

use crate::config::ReadingMode;

use super::intent::{ScrollDirection, ScrollTarget, VoiceIntent, ZoomChange};

pub const STOPPED: &str = "stopped reading";
pub const PAUSED: &str = "paused reading";
pub const RESUMED: &str = "resumed reading";
pub const ZOOMED_IN: &str = "zoomed in";
pub const ZOOMED_OUT: &str = "zoomed out";
pub const ZOOM_RESET: &str = "zoom back to default";
pub const SCROLLED_TOP: &str = "scrolled to top";
pub const SCROLLED_BOTTOM: &str = "scrolled to bottom";
pub const SCROLLING_UP: &str = "scrolling up";
pub const SCROLLING_DOWN: &str = "scrolling down";
pub const SCROLLING_LEFT: &str = "scrolling left";
pub const SCROLLING_RIGHT: &str = "scrolling right";
pub const OPENING_WEBSITE: &str = "opening website";
pub const READING_SUMMARY: &str = "reading summary";
pub const READING_FULL: &str = "reading full page";
pub const SOMETHING_WENT_WRONG: &str = "something went wrong";

/// Spoken when a transcript maps to no command.
pub const GUIDANCE: &str = "Sorry, I didn't catch that. Try saying stop, pause, resume, \
zoom in, scroll down, describe this page, or open a website.";

/// Normalised opening of [`GUIDANCE`]; nobody starts a command this way.
const GUIDANCE_OPENING: &str = "sorry i didn't catch that";

/// Hesitation words the recogniser may add around an echo.
const FILLER_WORDS: &[&str] = &["uh", "um", "er", "erm", "ah", "oh", "hmm", "mm"];

/// Every phrase the system may say out loud.
pub static FEEDBACK_PHRASES: &[&str] = &[
    STOPPED,
    PAUSED,
    RESUMED,
    ZOOMED_IN,
    ZOOMED_OUT,
    ZOOM_RESET,
    SCROLLED_TOP,
    SCROLLED_BOTTOM,
    SCROLLING_UP,
    SCROLLING_DOWN,
    SCROLLING_LEFT,
    SCROLLING_RIGHT,
    OPENING_WEBSITE,
    READING_SUMMARY,
    READING_FULL,
    SOMETHING_WENT_WRONG,
    "didn't catch that",
];

/// `true` when `transcript` is one of the system's own phrases, ignoring
/// case, punctuation and hesitation words at either end.  A phrase embedded
/// in a longer utterance is a command, not an echo.
///
/// ```
/// use page_narrator::voice::is_self_feedback;
///
/// assert!(is_self_feedback("Stopped reading."));
/// assert!(is_self_feedback("uh, scrolling down"));
/// assert!(!is_self_feedback("keep scrolling down"));
/// assert!(!is_self_feedback("stop reading"));
/// ```
pub fn is_self_feedback(transcript: &str) -> bool {
    let cleaned = normalize_transcript(transcript);
    let core = trim_filler(&cleaned);
    FEEDBACK_PHRASES.contains(&core) || core.starts_with(GUIDANCE_OPENING)
}

fn trim_filler(text: &str) -> &str {
    let mut core = text;
    loop {
        let trimmed = FILLER_WORDS.iter().fold(core, |acc, filler| {
            let acc = acc
                .strip_prefix(filler)
                .filter(|rest| rest.is_empty() || rest.starts_with(' '))
                .unwrap_or(acc);
            acc.strip_suffix(filler)
                .filter(|rest| rest.is_empty() || rest.ends_with(' '))
                .unwrap_or(acc)
                .trim()
        });
        if trimmed == core {
            return core;
        }
        core = trimmed;
    }
}

/// Lowercase and collapse spaces, keeping only letters, digits, `%` and
/// apostrophes.
pub fn normalize_transcript(transcript: &str) -> String {
    transcript
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2019}' => '\'',
            c if c.is_alphanumeric() || c == '\'' || c == '%' => c,
            _ => ' ',
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The confirmation spoken after `intent` is carried out.
pub fn announcement(intent: &VoiceIntent) -> Option<&'static str> {
    let phrase = match intent {
        VoiceIntent::Stop => STOPPED,
        VoiceIntent::Pause => PAUSED,
        VoiceIntent::Resume => RESUMED,
        VoiceIntent::Zoom(ZoomChange::Reset) => ZOOM_RESET,
        VoiceIntent::Zoom(ZoomChange::Delta(d)) if *d < 0 => ZOOMED_OUT,
        VoiceIntent::Zoom(ZoomChange::Delta(_)) => ZOOMED_IN,
        VoiceIntent::Scroll(ScrollTarget::Top) => SCROLLED_TOP,
        VoiceIntent::Scroll(ScrollTarget::Bottom) => SCROLLED_BOTTOM,
        VoiceIntent::Scroll(ScrollTarget::Direction { direction, .. }) => match direction {
            ScrollDirection::Up => SCROLLING_UP,
            ScrollDirection::Down => SCROLLING_DOWN,
            ScrollDirection::Left => SCROLLING_LEFT,
            ScrollDirection::Right => SCROLLING_RIGHT,
        },
        VoiceIntent::OpenSite(_) => OPENING_WEBSITE,
        VoiceIntent::SetMode(ReadingMode::Summary) => READING_SUMMARY,
        VoiceIntent::SetMode(ReadingMode::Full) => READING_FULL,
        VoiceIntent::Ignore | VoiceIntent::Unknown => return None,
    };
    Some(phrase)
}
