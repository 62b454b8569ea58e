//! Control surface module.
//!
//! This module provides:
//! * [`ControlMessage`] / [`ControlResponse`] — the JSON message protocol
//!   spoken by popups and on-page panels.
//! * [`PageSource`], [`Navigator`], [`ViewportSink`] — seams to the page.
//! * [`Dispatcher`] — routes messages and voice transcripts to the core.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use page_narrator::config::{MemoryPreferences, PreferenceStore};
//! use page_narrator::control::{
//!     Collaborators, Dispatcher, LoggingNavigator, LoggingViewport, StaticPage,
//! };
//! use page_narrator::llm::{ApiSummarizer, ChatClient, CompletionBackend, Summarizer};
//! use page_narrator::site::SiteResolver;
//! use page_narrator::speech::{ConsoleEngine, ReadingSession};
//!
//! #[tokio::main]
//! async fn main() {
//!     let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::default());
//!     let client: Arc<dyn CompletionBackend> = Arc::new(ChatClient::new(prefs.clone()));
//!     let summarizer: Arc<dyn Summarizer> = Arc::new(ApiSummarizer::new(client.clone()));
//!     let (engine, _events) = ConsoleEngine::new();
//!     let session = ReadingSession::new(Arc::new(engine), summarizer.clone(), prefs.clone());
//!     let resolver = Arc::new(SiteResolver::new(Some(client), &prefs.snapshot().site));
//!
//!     let dispatcher = Dispatcher::new(
//!         session,
//!         summarizer,
//!         resolver,
//!         prefs,
//!         Collaborators {
//!             page: Arc::new(StaticPage::new("<p>Hello</p>", "https://example.com/")),
//!             navigator: Arc::new(LoggingNavigator::default()),
//!             viewport: Arc::new(LoggingViewport),
//!         },
//!     );
//!
//!     let reply = dispatcher.handle_json(r#"{"type":"GET_STATUS"}"#).await;
//!     println!("{}", serde_json::to_string(&reply).unwrap());
//! }
//! ```

pub mod collaborators;
pub mod dispatcher;
pub mod messages;

pub use collaborators::{
    is_readable_url, page_origin, Collaborators, LoggingNavigator, LoggingViewport, Navigator,
    PageSnapshot, PageSource, StaticPage, ViewportSink, NAVIGATION_HISTORY_LIMIT,
};
pub use dispatcher::{ControlError, DispatchOutcome, Dispatcher};
pub use messages::{ControlMessage, ControlResponse, OpenOptions, ViewportCommand, UNKNOWN_MESSAGE};
