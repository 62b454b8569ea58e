//! Reading status and the views control surfaces derive from it.
//!
//! [`ReadingStatus`] is owned by the [`ReadingSession`](super::ReadingSession);
//! everything else only ever sees copies.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReadingStatus
// ---------------------------------------------------------------------------

/// States of one reading session.
///
/// ```text
/// start(Full)    ──▶ Idle ──engine start──▶ Reading
/// start(Summary) ──▶ Idle ─▶ Summarizing ──engine start──▶ Reading
/// Reading ──engine pause──▶ Paused ──engine resume──▶ Reading
/// Reading / Paused ──engine end──▶ Complete
/// any state ──stop──▶ Stopped
/// any state ──empty text / engine error──▶ Error
/// Complete / Stopped / Error ──next start──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    /// No session, or a session that has not started speaking yet.
    Idle,
    /// Waiting for the AI summary.
    Summarizing,
    /// The engine is speaking.
    Reading,
    /// The engine acknowledged a pause.
    Paused,
    /// Stopped by the user.
    Stopped,
    /// The engine finished the text.
    Complete,
    /// The text was empty or the engine failed.
    Error,
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::Idle
    }
}

impl ReadingStatus {
    /// Returns `true` while a session is in flight.
    ///
    /// ```
    /// use page_narrator::speech::ReadingStatus;
    ///
    /// assert!(!ReadingStatus::Idle.is_active());
    /// assert!(ReadingStatus::Summarizing.is_active());
    /// assert!(ReadingStatus::Reading.is_active());
    /// assert!(ReadingStatus::Paused.is_active());
    /// assert!(!ReadingStatus::Complete.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReadingStatus::Summarizing | ReadingStatus::Reading | ReadingStatus::Paused
        )
    }

    /// Terminal states: only a new start request leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReadingStatus::Stopped | ReadingStatus::Complete | ReadingStatus::Error
        )
    }

    /// Text shown by the popup and the on-page panel.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Idle => "Ready to read",
            ReadingStatus::Summarizing => "Summarizing…",
            ReadingStatus::Reading => "Reading…",
            ReadingStatus::Paused => "Paused",
            ReadingStatus::Stopped => "Stopped",
            ReadingStatus::Complete => "Reading complete",
            ReadingStatus::Error => "Error reading page",
        }
    }

    /// Which controls a surface should enable in this state.
    pub fn controls(&self) -> ControlAvailability {
        match self {
            ReadingStatus::Reading => ControlAvailability {
                can_start: false,
                can_pause: true,
                can_resume: false,
                can_stop: true,
            },
            ReadingStatus::Paused => ControlAvailability {
                can_start: false,
                can_pause: false,
                can_resume: true,
                can_stop: true,
            },
            ReadingStatus::Summarizing => ControlAvailability {
                can_start: false,
                can_pause: false,
                can_resume: false,
                can_stop: true,
            },
            ReadingStatus::Idle
            | ReadingStatus::Stopped
            | ReadingStatus::Complete
            | ReadingStatus::Error => ControlAvailability {
                can_start: true,
                can_pause: false,
                can_resume: false,
                can_stop: false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ControlAvailability
// ---------------------------------------------------------------------------

/// Enabled/disabled state of the four reading controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAvailability {
    pub can_start: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_stop: bool,
}

// ---------------------------------------------------------------------------
// StatusSnapshot
// ---------------------------------------------------------------------------

/// Answer to a status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: ReadingStatus,
    pub is_reading: bool,
    pub is_paused: bool,
}

impl From<ReadingStatus> for StatusSnapshot {
    fn from(status: ReadingStatus) -> Self {
        Self {
            status,
            is_reading: status == ReadingStatus::Reading,
            is_paused: status == ReadingStatus::Paused,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
