//! Control-surface wire format.
//!
//! Messages are JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "START_READING", "mode": "full"}
//! {"type": "GET_STATUS"}
//! {"type": "OPEN_WEBSITE", "query": "bbc news", "options": {"newTab": true}}
//! ```
//!
//! Responses carry no tag; their shape depends on the request.

use serde::{Deserialize, Serialize};

use crate::config::ReadingMode;
use crate::llm::PageMetadata;
use crate::site::SiteResolution;
use crate::speech::StatusSnapshot;
use crate::voice::{ScrollTarget, ZoomChange};

/// Reply to a message whose `type` is not recognised.
pub const UNKNOWN_MESSAGE: &str = "Unknown message type";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenOptions {
    /// `None` uses the `site.open_in_new_tab` preference.
    pub new_tab: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    StartReading {
        #[serde(default)]
        mode: Option<ReadingMode>,
    },
    PauseReading,
    ResumeReading,
    StopReading,
    GetStatus,
    RequestSummary {
        content: String,
        #[serde(default)]
        metadata: PageMetadata,
    },
    OpenWebsite {
        query: String,
        #[serde(default)]
        options: OpenOptions,
    },
}

impl ControlMessage {
    /// Every accepted `type` value.
    pub const TYPES: &'static [&'static str] = &[
        "START_READING",
        "PAUSE_READING",
        "RESUME_READING",
        "STOP_READING",
        "GET_STATUS",
        "REQUEST_SUMMARY",
        "OPEN_WEBSITE",
    ];

    /// Decode one message.  The error text is ready to send back as-is.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| format!("invalid message: {e}"))?;

        let known = value
            .get("type")
            .and_then(|t| t.as_str())
            .is_some_and(|t| Self::TYPES.contains(&t));
        if !known {
            return Err(UNKNOWN_MESSAGE.to_string());
        }

        serde_json::from_value(value).map_err(|e| format!("invalid message: {e}"))
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    /// `{success: true}` for fire-and-forget commands.
    Ack { success: bool },
    /// `{status, isReading, isPaused}`.
    Status(StatusSnapshot),
    /// `{summary}`.
    Summary { summary: String },
    /// `{success: true, matchedUrl, finalUrl, matched}`.
    #[serde(rename_all = "camelCase")]
    Website {
        success: bool,
        matched_url: Option<String>,
        final_url: String,
        matched: bool,
    },
    /// `{error}`, or `{success: false, error}` where the request shape
    /// promises a `success` field.
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        success: Option<bool>,
        error: String,
    },
}

impl ControlResponse {
    pub fn ok() -> Self {
        ControlResponse::Ack { success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ControlResponse::Error {
            success: None,
            error: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ControlResponse::Error {
            success: Some(false),
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ControlResponse::Error { .. })
    }
}

impl From<SiteResolution> for ControlResponse {
    fn from(res: SiteResolution) -> Self {
        ControlResponse::Website {
            success: true,
            matched_url: res.matched_url,
            final_url: res.final_url,
            matched: res.matched,
        }
    }
}

// ---------------------------------------------------------------------------
// Viewport commands
// ---------------------------------------------------------------------------

/// Sent to the page's viewport controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "change", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewportCommand {
    Zoom(ZoomChange),
    Scroll(ScrollTarget),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
