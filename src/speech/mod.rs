//! Speech output module.
//!
//! This module provides:
//! * [`ReadingStatus`] — the reading state machine's states, plus the
//!   presentation helpers control surfaces derive from them.
//! * [`SpeechEngine`] — the text-to-speech seam and its [`EngineEvent`]s.
//! * [`ReadingSession`] — the session state machine that owns the status.
//! * [`ConsoleEngine`] — a stdout engine for the command-line binary.
//!
//! # Architecture
//!
//! ```text
//! control surface / voice dispatcher
//!        │ start / pause / resume / stop
//!        ▼
//! ReadingSession ──speak/pause/resume/cancel──▶ SpeechEngine
//!        ▲                                          │
//!        └──────── EngineEvent (mpsc) ◀─────────────┘
//!
//! status() ◀── polled by any number of surfaces
//! observer ◀── pushed on every transition
//! ```

pub mod console;
pub mod engine;
pub mod session;
pub mod status;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use console::ConsoleEngine;
pub use engine::{
    EngineError, EngineEvent, EngineEventKind, SpeechEngine, UtteranceId, UtteranceRequest,
};
pub use session::{ReadingSession, SessionError, SessionSnapshot, StatusObserver};
pub use status::{ControlAvailability, ReadingStatus, StatusSnapshot};
