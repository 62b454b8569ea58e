//! Dispatcher — routes control-surface messages and voice intents to the
//! reading session, the summarizer, the site resolver and the viewport.
//!
//! # Flow
//!
//! ```text
//! ControlMessage ──▶ handle_message ──▶ ControlResponse
//!
//! transcript ──▶ interpret ──▶ VoiceIntent
//!   Ignore            → nothing
//!   Stop/Pause/Resume → ReadingSession
//!   Zoom/Scroll       → ViewportSink
//!   OpenSite          → SiteResolver → Navigator
//!   SetMode           → persist preference for the page's origin
//!                       → start_reading(mode)
//!   Unknown           → guidance message
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::config::{PreferenceStore, ReadingMode};
use crate::extract::ExtractedContent;
use crate::llm::{PageMetadata, Summarizer};
use crate::site::{SiteError, SiteResolution, SiteResolver};
use crate::speech::{ReadingSession, SessionError};
use crate::voice::{announcement, interpret, VoiceIntent, GUIDANCE};
use crate::voice::feedback::SOMETHING_WENT_WRONG;

use super::collaborators::{is_readable_url, Collaborators};
use super::messages::{ControlMessage, ControlResponse, ViewportCommand};

// ---------------------------------------------------------------------------
// ControlError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ControlError {
    /// Browser-internal or otherwise unreadable page.
    #[error("Cannot read this page ({0}). Please navigate to a regular webpage.")]
    UnreadablePage(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Site(#[from] SiteError),

    /// The navigator or viewport collaborator reported a failure.
    #[error("could not update the page: {0}")]
    Navigation(String),
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// What happened to one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transcript was the system's own voice.
    Ignored,
    /// The intent was carried out.
    Handled { announcement: Option<&'static str> },
    /// Nothing matched; tell the user what they can say.
    Guidance(&'static str),
    /// The intent was recognised but could not be carried out.
    Failed(String),
}

impl DispatchOutcome {
    /// Text to speak or show back to the user, if any.
    pub fn feedback(&self) -> Option<String> {
        match self {
            DispatchOutcome::Ignored => None,
            DispatchOutcome::Handled { announcement } => announcement.map(str::to_string),
            DispatchOutcome::Guidance(text) => Some(text.to_string()),
            DispatchOutcome::Failed(reason) => Some(format!("{SOMETHING_WENT_WRONG}: {reason}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes requests to the core components.  Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    session: ReadingSession,
    summarizer: Arc<dyn Summarizer>,
    resolver: Arc<SiteResolver>,
    prefs: Arc<dyn PreferenceStore>,
    collab: Collaborators,
}

impl Dispatcher {
    pub fn new(
        session: ReadingSession,
        summarizer: Arc<dyn Summarizer>,
        resolver: Arc<SiteResolver>,
        prefs: Arc<dyn PreferenceStore>,
        collab: Collaborators,
    ) -> Self {
        Self {
            session,
            summarizer,
            resolver,
            prefs,
            collab,
        }
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Control messages
    // -----------------------------------------------------------------------

    /// Decode and handle one JSON message.
    pub async fn handle_json(&self, json: &str) -> ControlResponse {
        match ControlMessage::from_json(json) {
            Ok(message) => self.handle_message(message).await,
            Err(error) => {
                log::warn!("control: rejected message: {error}");
                ControlResponse::error(error)
            }
        }
    }

    pub async fn handle_message(&self, message: ControlMessage) -> ControlResponse {
        log::debug!("control: {message:?}");
        match message {
            ControlMessage::StartReading { mode } => match self.start_reading(mode).await {
                Ok(()) => ControlResponse::ok(),
                Err(e) => ControlResponse::error(e.to_string()),
            },
            ControlMessage::PauseReading => {
                self.session.pause_reading();
                ControlResponse::ok()
            }
            ControlMessage::ResumeReading => {
                self.session.resume_reading();
                ControlResponse::ok()
            }
            ControlMessage::StopReading => {
                self.session.stop_reading();
                ControlResponse::ok()
            }
            ControlMessage::GetStatus => ControlResponse::Status(self.session.status_snapshot()),
            ControlMessage::RequestSummary { content, metadata } => {
                match self.summarizer.summarize(&content, &metadata).await {
                    Ok(summary) => ControlResponse::Summary { summary },
                    Err(e) => ControlResponse::error(e.to_string()),
                }
            }
            ControlMessage::OpenWebsite { query, options } => {
                match self.open_website(&query, options.new_tab).await {
                    Ok(resolution) => resolution.into(),
                    Err(e) => ControlResponse::failure(e.to_string()),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Extract the current page and read it in `mode`, or the mode preferred
    /// for the page's origin when `None`.
    pub async fn start_reading(&self, mode: Option<ReadingMode>) -> Result<(), ControlError> {
        let page = self.collab.page.snapshot();
        if !is_readable_url(&page.url) {
            log::warn!("control: refusing to read {:?}", page.url);
            return Err(ControlError::UnreadablePage(page.url));
        }

        let content = ExtractedContent::from_html(&page.html, &page.url);
        if content.is_blank() {
            log::warn!("control: no readable content on {}", content.source_url);
        }
        let mode = mode.unwrap_or_else(|| self.prefs.reading_mode(page.origin().as_deref()));
        log::info!(
            "control: reading {:?} ({} chars) in {} mode",
            content.title,
            content.text.chars().count(),
            mode.label()
        );

        let metadata = PageMetadata {
            title: content.title,
            url: content.source_url,
        };
        self.session
            .start_reading(&content.text, mode, &metadata)
            .await?;
        Ok(())
    }

    /// Resolve `query` and navigate to the result.  `new_tab` overrides the
    /// `site.open_in_new_tab` preference.
    pub async fn open_website(
        &self,
        query: &str,
        new_tab: Option<bool>,
    ) -> Result<SiteResolution, ControlError> {
        let resolution = self.resolver.resolve(query).await?;
        let new_tab = new_tab.unwrap_or_else(|| self.prefs.snapshot().site.open_in_new_tab);

        self.collab
            .navigator
            .open(&resolution.final_url, new_tab)
            .await
            .map_err(|e| ControlError::Navigation(e.to_string()))?;
        Ok(resolution)
    }

    // -----------------------------------------------------------------------
    // Voice
    // -----------------------------------------------------------------------

    /// Interpret and carry out one recognised transcript.
    pub async fn handle_transcript(&self, transcript: &str) -> DispatchOutcome {
        let intent = interpret(transcript);
        log::info!("voice: {transcript:?} → {intent:?}");

        let result = match &intent {
            VoiceIntent::Ignore => return DispatchOutcome::Ignored,
            VoiceIntent::Unknown => return DispatchOutcome::Guidance(GUIDANCE),
            VoiceIntent::Stop => {
                self.session.stop_reading();
                Ok(())
            }
            VoiceIntent::Pause => {
                self.session.pause_reading();
                Ok(())
            }
            VoiceIntent::Resume => {
                self.session.resume_reading();
                Ok(())
            }
            VoiceIntent::Zoom(change) => self.viewport(ViewportCommand::Zoom(*change)).await,
            VoiceIntent::Scroll(target) => self.viewport(ViewportCommand::Scroll(*target)).await,
            VoiceIntent::OpenSite(query) => self.open_website(query, None).await.map(|_| ()),
            VoiceIntent::SetMode(mode) => {
                let origin = self.collab.page.snapshot().origin();
                if let Err(e) = self.prefs.set_reading_mode(origin.as_deref(), *mode) {
                    log::warn!("voice: could not save reading mode: {e:#}");
                }
                self.start_reading(Some(*mode)).await
            }
        };

        match result {
            Ok(()) => DispatchOutcome::Handled {
                announcement: announcement(&intent),
            },
            Err(e) => {
                log::warn!("voice: {intent:?} failed: {e}");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn viewport(&self, command: ViewportCommand) -> Result<(), ControlError> {
        self.collab
            .viewport
            .apply(command)
            .await
            .map_err(|e| ControlError::Navigation(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MemoryPreferences, SiteConfig};
    use crate::control::collaborators::{LoggingNavigator, StaticPage, ViewportSink};
    use crate::llm::LlmError;
    use crate::speech::{
        EngineError, EngineEvent, EngineEventKind, ReadingStatus, SpeechEngine, UtteranceId,
        UtteranceRequest,
    };
    use crate::voice::{ScrollDirection, ScrollTarget, ZoomChange};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct QuietEngine {
        next_id: AtomicU64,
        spoken: Mutex<Vec<String>>,
        speaking: AtomicBool,
    }

    impl SpeechEngine for QuietEngine {
        fn speak(&self, request: UtteranceRequest) -> Result<UtteranceId, EngineError> {
            self.spoken.lock().unwrap().push(request.text);
            self.speaking.store(true, Ordering::SeqCst);
            Ok(UtteranceId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
        }
        fn pause(&self) {}
        fn resume(&self) {}
        fn cancel(&self) {
            self.speaking.store(false, Ordering::SeqCst);
        }
        fn is_speaking(&self) -> bool {
            self.speaking.load(Ordering::SeqCst)
        }
        fn is_paused(&self) -> bool {
            false
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, content: &str, meta: &PageMetadata) -> Result<String, LlmError> {
            if content.trim().is_empty() {
                return Err(LlmError::NoContent);
            }
            Ok(format!("Summary of {}", meta.title))
        }
    }

    #[derive(Default)]
    struct RecordingViewport {
        commands: Mutex<Vec<ViewportCommand>>,
        fail: bool,
    }

    #[async_trait]
    impl ViewportSink for RecordingViewport {
        async fn apply(&self, command: ViewportCommand) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("page not responding");
            }
            self.commands.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct Harness {
        dispatcher: Dispatcher,
        engine: Arc<QuietEngine>,
        page: Arc<StaticPage>,
        navigator: Arc<LoggingNavigator>,
        viewport: Arc<RecordingViewport>,
        prefs: Arc<MemoryPreferences>,
    }

    const HOME: Option<&str> = Some("https://example.com");

    const ARTICLE: &str = "<html><head><title>Otters</title></head><body>\
        <nav>Home About Contact</nav>\
        <main><p>Sea otters hold hands while they sleep so that they do not drift \
        apart. They also keep a favourite rock in a pouch of loose skin under \
        each forearm.</p></main></body></html>";

    fn harness_with(viewport: RecordingViewport) -> Harness {
        let engine = Arc::new(QuietEngine::default());
        let prefs = Arc::new(MemoryPreferences::new(AppConfig::default()));
        let summarizer: Arc<dyn Summarizer> = Arc::new(EchoSummarizer);
        let session = ReadingSession::new(engine.clone(), summarizer.clone(), prefs.clone());
        let resolver = Arc::new(SiteResolver::new(None, &SiteConfig::default()));

        let page = Arc::new(StaticPage::new(ARTICLE, "https://example.com/otters"));
        let navigator = Arc::new(LoggingNavigator::default());
        let viewport = Arc::new(viewport);
        let collab = Collaborators {
            page: page.clone(),
            navigator: navigator.clone(),
            viewport: viewport.clone(),
        };

        Harness {
            dispatcher: Dispatcher::new(session, summarizer, resolver, prefs.clone(), collab),
            engine,
            page,
            navigator,
            viewport,
            prefs,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingViewport::default())
    }

    impl Harness {
        fn spoken(&self) -> Vec<String> {
            self.engine.spoken.lock().unwrap().clone()
        }

        fn start_engine(&self) {
            let session = self.dispatcher.session();
            let id = session.snapshot().utterance.expect("live utterance");
            session.handle_engine_event(EngineEvent::new(id, EngineEventKind::Started));
        }

        async fn json(&self, message: serde_json::Value) -> serde_json::Value {
            let response = self.dispatcher.handle_json(&message.to_string()).await;
            serde_json::to_value(response).unwrap()
        }
    }

    // -----------------------------------------------------------------------
    // Control messages
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn status_starts_idle() {
        let h = harness();
        assert_eq!(
            h.json(json!({"type": "GET_STATUS"})).await,
            json!({"status": "idle", "isReading": false, "isPaused": false})
        );
    }

    #[tokio::test]
    async fn start_full_reads_main_content() {
        let h = harness();
        assert_eq!(
            h.json(json!({"type": "START_READING", "mode": "full"})).await,
            json!({"success": true})
        );
        let spoken = h.spoken();
        assert!(spoken[0].starts_with("Sea otters hold hands"));
        assert!(!spoken[0].contains("Contact"));

        h.start_engine();
        assert_eq!(
            h.json(json!({"type": "GET_STATUS"})).await,
            json!({"status": "reading", "isReading": true, "isPaused": false})
        );
    }

    #[tokio::test]
    async fn start_without_mode_uses_preference() {
        let h = harness();
        // Default preference is Summary.
        h.json(json!({"type": "START_READING"})).await;
        assert_eq!(h.spoken(), vec!["Summary of Otters".to_string()]);
        assert!(h.dispatcher.session().snapshot().is_summary);
    }

    #[tokio::test]
    async fn unreadable_page_is_refused() {
        let h = harness();
        h.page.replace(ARTICLE, "chrome://settings");
        let response = h.json(json!({"type": "START_READING", "mode": "full"})).await;
        assert!(response["error"].as_str().unwrap().contains("Cannot read this page"));
        assert!(h.spoken().is_empty());
    }

    #[tokio::test]
    async fn empty_page_reports_error_status() {
        let h = harness();
        h.page.replace("<html><body></body></html>", "https://example.com/");
        let response = h.json(json!({"type": "START_READING", "mode": "full"})).await;
        assert_eq!(
            response,
            json!({"error": "No readable content found on this page"})
        );
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Error);
    }

    #[tokio::test]
    async fn stop_message_stops() {
        let h = harness();
        h.json(json!({"type": "START_READING", "mode": "full"})).await;
        h.start_engine();
        assert_eq!(h.json(json!({"type": "STOP_READING"})).await, json!({"success": true}));
        assert_eq!(h.json(json!({"type": "STOP_READING"})).await, json!({"success": true}));
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Stopped);
    }

    #[tokio::test]
    async fn pause_and_resume_messages_ack() {
        let h = harness();
        assert_eq!(h.json(json!({"type": "PAUSE_READING"})).await, json!({"success": true}));
        assert_eq!(h.json(json!({"type": "RESUME_READING"})).await, json!({"success": true}));
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Idle);
    }

    #[tokio::test]
    async fn request_summary_round_trip() {
        let h = harness();
        assert_eq!(
            h.json(json!({
                "type": "REQUEST_SUMMARY",
                "content": "text",
                "metadata": {"title": "Page", "url": "https://example.com/"}
            }))
            .await,
            json!({"summary": "Summary of Page"})
        );
        assert_eq!(
            h.json(json!({"type": "REQUEST_SUMMARY", "content": " "})).await,
            json!({"error": "no content to summarize"})
        );
    }

    #[tokio::test]
    async fn open_website_navigates() {
        let h = harness();
        assert_eq!(
            h.json(json!({"type": "OPEN_WEBSITE", "query": "YouTube"})).await,
            json!({
                "success": true,
                "matchedUrl": "https://www.youtube.com/",
                "finalUrl": "https://www.youtube.com/",
                "matched": true
            })
        );
        h.json(json!({"type": "OPEN_WEBSITE", "query": "corner cafe", "options": {"newTab": true}}))
            .await;

        assert_eq!(
            h.navigator.history(),
            vec![
                ("https://www.youtube.com/".to_string(), false),
                ("https://www.google.com/search?q=corner+cafe".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn open_website_blank_query_fails() {
        let h = harness();
        let response = h.json(json!({"type": "OPEN_WEBSITE", "query": "  "})).await;
        assert_eq!(response["success"], json!(false));
        assert!(response["error"].is_string());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn unknown_message_type() {
        let h = harness();
        assert_eq!(
            h.json(json!({"type": "SING"})).await,
            json!({"error": "Unknown message type"})
        );
    }

    // -----------------------------------------------------------------------
    // Voice
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn own_voice_is_ignored() {
        let h = harness();
        h.json(json!({"type": "START_READING", "mode": "full"})).await;
        h.start_engine();

        let outcome = h.dispatcher.handle_transcript("Stopped reading.").await;
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(outcome.feedback(), None);
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Reading);
    }

    #[tokio::test]
    async fn stop_by_voice() {
        let h = harness();
        h.json(json!({"type": "START_READING", "mode": "full"})).await;
        h.start_engine();

        let outcome = h.dispatcher.handle_transcript("please stop now").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled {
                announcement: Some("stopped reading")
            }
        );
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Stopped);
    }

    #[tokio::test]
    async fn unknown_transcript_gets_guidance() {
        let h = harness();
        let outcome = h.dispatcher.handle_transcript("asdkjf").await;
        assert_eq!(outcome, DispatchOutcome::Guidance(GUIDANCE));
        assert_eq!(h.dispatcher.session().status(), ReadingStatus::Idle);
    }

    #[tokio::test]
    async fn viewport_intents_are_forwarded() {
        let h = harness();
        h.dispatcher.handle_transcript("zoom out by 20 percent").await;
        h.dispatcher.handle_transcript("scroll up").await;
        assert_eq!(
            *h.viewport.commands.lock().unwrap(),
            vec![
                ViewportCommand::Zoom(ZoomChange::Delta(-20)),
                ViewportCommand::Scroll(ScrollTarget::Direction {
                    direction: ScrollDirection::Up,
                    amount_percent: 50
                }),
            ]
        );
    }

    #[tokio::test]
    async fn viewport_failure_is_reported() {
        let h = harness_with(RecordingViewport {
            fail: true,
            ..Default::default()
        });
        let outcome = h.dispatcher.handle_transcript("zoom in").await;
        match &outcome {
            DispatchOutcome::Failed(reason) => assert!(reason.contains("page not responding")),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(outcome.feedback().unwrap().starts_with("something went wrong"));
    }

    #[tokio::test]
    async fn mode_command_persists_and_reads() {
        let h = harness();
        let outcome = h.dispatcher.handle_transcript("read the full article").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled {
                announcement: Some("reading full page")
            }
        );
        assert_eq!(h.prefs.reading_mode(HOME), ReadingMode::Full);
        assert!(h.spoken()[0].starts_with("Sea otters"));

        h.dispatcher.handle_transcript("summarize this page").await;
        assert_eq!(h.prefs.reading_mode(HOME), ReadingMode::Summary);
        assert_eq!(h.spoken()[1], "Summary of Otters");
    }

    #[tokio::test]
    async fn mode_choice_stays_with_its_origin() {
        let h = harness();
        h.dispatcher.handle_transcript("read the full article").await;
        assert_eq!(h.prefs.reading_mode(HOME), ReadingMode::Full);

        // Another site still gets the default (summary) mode.
        h.page.replace(ARTICLE, "https://other.example/otters");
        h.dispatcher
            .handle_message(ControlMessage::StartReading { mode: None })
            .await;
        assert_eq!(h.spoken()[1], "Summary of Otters");
        assert_eq!(
            h.prefs.reading_mode(Some("https://other.example")),
            ReadingMode::Summary
        );

        // Back on the first site the full-text choice is remembered.
        h.page.replace(ARTICLE, "https://example.com/more-otters");
        h.dispatcher
            .handle_message(ControlMessage::StartReading { mode: None })
            .await;
        assert!(h.spoken()[2].starts_with("Sea otters"));
    }

    #[tokio::test]
    async fn open_site_by_voice() {
        let h = harness();
        let outcome = h.dispatcher.handle_transcript("open youtube").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Handled {
                announcement: Some("opening website")
            }
        );
        assert_eq!(
            h.navigator.history(),
            vec![("https://www.youtube.com/".to_string(), false)]
        );
    }
}
