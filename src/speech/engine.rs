//! Speech engine seam.
//!
//! The engine is an external collaborator: it accepts an [`UtteranceRequest`],
//! returns a handle immediately, and reports lifecycle changes later as
//! [`EngineEvent`]s on a channel.  Events carry the handle of the utterance
//! they belong to so the session can drop events for utterances it has
//! already abandoned.

use std::fmt;

use thiserror::Error;

use crate::config::SpeechSettings;

// ---------------------------------------------------------------------------
// UtteranceId
// ---------------------------------------------------------------------------

/// Handle to one playback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UtteranceRequest
// ---------------------------------------------------------------------------

/// Everything the engine needs to speak one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Voice name or URI.  An engine with no such voice speaks in its
    /// default voice rather than refusing the request.
    pub voice: Option<String>,
}

impl UtteranceRequest {
    /// Build a request, clamping `settings` into the engine's ranges.
    pub fn new(text: impl Into<String>, settings: &SpeechSettings) -> Self {
        let settings = settings.clamped();
        Self {
            text: text.into(),
            rate: settings.rate,
            pitch: settings.pitch,
            volume: settings.volume,
            voice: settings.voice,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineEvent
// ---------------------------------------------------------------------------

/// Lifecycle notifications emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    Started,
    Paused,
    Resumed,
    Ended,
    Failed(String),
}

/// An [`EngineEventKind`] tagged with the utterance it concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub utterance: UtteranceId,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn new(utterance: UtteranceId, kind: EngineEventKind) -> Self {
        Self { utterance, kind }
    }
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// The engine refused a playback request outright.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// A text-to-speech backend.
///
/// Every method must return promptly; acknowledgements for `pause` and
/// `resume` arrive later as events.  Events must be delivered through a
/// channel, never by calling back into the session from inside these methods.
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn SpeechEngine>`.
pub trait SpeechEngine: Send + Sync {
    /// Queue `request` for playback and return its handle.
    fn speak(&self, request: UtteranceRequest) -> Result<UtteranceId, EngineError>;

    /// Ask the engine to pause the current utterance.
    fn pause(&self);

    /// Ask the engine to resume a paused utterance.
    fn resume(&self);

    /// Drop the current utterance without emitting further events for it.
    fn cancel(&self);

    /// `true` while an utterance is playing or paused.
    fn is_speaking(&self) -> bool;

    /// `true` while an utterance is paused.
    fn is_paused(&self) -> bool;
}
