//! Voice command module.
//!
//! This module provides:
//! * [`interpret`] — pure transcript → [`VoiceIntent`] classifier.
//! * [`VoiceIntent`] and its viewport payloads ([`ZoomChange`], [`ScrollTarget`]).
//! * [`announcement`] / [`is_self_feedback`] — spoken confirmations and the
//!   filter that stops the system obeying its own voice.
//!
//! Speech recognition itself is external; this module consumes one final
//! transcript at a time.

pub mod feedback;
pub mod intent;
pub mod interpreter;

pub use feedback::{announcement, is_self_feedback, normalize_transcript, FEEDBACK_PHRASES, GUIDANCE};
pub use intent::{
    ScrollDirection, ScrollTarget, VoiceIntent, ZoomChange, DEFAULT_SCROLL_PERCENT,
    DEFAULT_ZOOM_STEP,
};
pub use interpreter::{interpret, magnitude};
