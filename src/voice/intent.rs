//! Control intents derived from a voice transcript.

use serde::{Deserialize, Serialize};

use crate::config::ReadingMode;

/// Default zoom step, in percent, when no magnitude is spoken.
pub const DEFAULT_ZOOM_STEP: u32 = 10;

/// Default scroll distance, in percent of the viewport, when no magnitude is
/// spoken.
pub const DEFAULT_SCROLL_PERCENT: u32 = 50;

// ---------------------------------------------------------------------------
// Viewport payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "percent")]
pub enum ZoomChange {
    /// Back to 100 %.
    Reset,
    /// Signed change in percentage points; negative zooms out.
    Delta(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ScrollTarget {
    Top,
    Bottom,
    #[serde(rename_all = "camelCase")]
    Direction {
        direction: ScrollDirection,
        amount_percent: u32,
    },
}

// ---------------------------------------------------------------------------
// VoiceIntent
// ---------------------------------------------------------------------------

/// One classified voice command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceIntent {
    /// The transcript was the system's own spoken confirmation.
    Ignore,
    Stop,
    Pause,
    Resume,
    SetMode(ReadingMode),
    Zoom(ZoomChange),
    Scroll(ScrollTarget),
    /// Website name as spoken, with filler words removed.
    OpenSite(String),
    Unknown,
}
