//! Page Narrator — reads web pages aloud, optionally summarized, under voice
//! control.
//!
//! * [`extract`] — main-content text extraction from HTML.
//! * [`speech`]  — the reading session state machine and speech engine seam.
//! * [`llm`]     — OpenAI-compatible client and the summarization gateway.
//! * [`site`]    — "open a website" resolution (alias → AI → search).
//! * [`voice`]   — transcript → intent interpreter.
//! * [`control`] — message protocol and dispatcher for control surfaces.
//! * [`config`]  — TOML preferences.

pub mod config;
pub mod control;
pub mod extract;
pub mod llm;
pub mod site;
pub mod speech;
pub mod voice;
