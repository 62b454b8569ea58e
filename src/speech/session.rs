//! Reading session — the single owner of [`ReadingStatus`].
//!
//! [`ReadingSession`] wraps a [`SpeechEngine`], drives the status state
//! machine, and answers status polls from any number of control surfaces.
//!
//! # Flow
//!
//! ```text
//! start_reading(text, mode)
//!   └─▶ cancel previous utterance, generation += 1, status = Idle
//!         ├─ blank text          → Error, Err(EmptyContent)
//!         ├─ Full                → engine.speak(text)
//!         └─ Summary → Summarizing → summarizer (async)
//!               ├─ Ok  → engine.speak(summary)
//!               └─ Err → warn + engine.speak(text)
//!         (result dropped if the generation moved on meanwhile)
//!
//! engine events (async, tagged with the utterance id)
//!   Started → Reading   Paused → Paused   Resumed → Reading
//!   Ended → Complete    Failed → Error
//! ```
//!
//! Status transitions are pushed synchronously to one optional observer;
//! other surfaces poll [`status`](ReadingSession::status), which is a short
//! lock and a copy.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{PreferenceStore, ReadingMode};
use crate::llm::{PageMetadata, Summarizer};

use super::engine::{EngineEvent, EngineEventKind, SpeechEngine, UtteranceId, UtteranceRequest};
use super::status::{ReadingStatus, StatusSnapshot};

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Failures reported to the caller of [`ReadingSession::start_reading`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// There was no text to read.
    #[error("No readable content found on this page")]
    EmptyContent,

    /// The speech engine refused the utterance.
    #[error("speech engine failure: {0}")]
    EngineFailure(String),
}

// ---------------------------------------------------------------------------
// Observer plumbing
// ---------------------------------------------------------------------------

/// Callback invoked on every status transition.
pub type StatusObserver = Arc<dyn Fn(ReadingStatus) + Send + Sync>;

/// A transition waiting to be announced once the state lock is released.
#[must_use]
struct Notification(Option<(StatusObserver, ReadingStatus)>);

impl Notification {
    fn none() -> Self {
        Notification(None)
    }

    fn fire(self) {
        if let Some((observer, status)) = self.0 {
            observer(status);
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Read-only copy of the session record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub status: ReadingStatus,
    pub mode: Option<ReadingMode>,
    pub raw_text: Option<String>,
    pub spoken_text: Option<String>,
    /// `true` when `spoken_text` is an AI summary rather than the page text.
    pub is_summary: bool,
    pub utterance: Option<UtteranceId>,
    pub generation: u64,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct SessionState {
    record: SessionSnapshot,
    observer: Option<StatusObserver>,
}

impl SessionState {
    fn set_status(&mut self, status: ReadingStatus) -> Notification {
        if self.record.status == status {
            return Notification::none();
        }
        log::debug!("session: {:?} → {:?}", self.record.status, status);
        self.record.status = status;
        Notification(self.observer.clone().map(|o| (o, status)))
    }
}

// ---------------------------------------------------------------------------
// ReadingSession
// ---------------------------------------------------------------------------

/// The speech session state machine.
///
/// Cheap to clone; clones share one session.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use page_narrator::config::{MemoryPreferences, PreferenceStore, ReadingMode};
/// use page_narrator::llm::{ApiSummarizer, ChatClient, PageMetadata};
/// use page_narrator::speech::{ConsoleEngine, ReadingSession};
///
/// # async fn example() {
/// let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::default());
/// let (engine, events) = ConsoleEngine::new();
/// let summarizer = Arc::new(ApiSummarizer::new(Arc::new(ChatClient::new(prefs.clone()))));
///
/// let session = ReadingSession::new(Arc::new(engine), summarizer, prefs);
/// tokio::spawn({
///     let session = session.clone();
///     async move { session.run_engine_events(events).await }
/// });
///
/// session
///     .start_reading("Hello world", ReadingMode::Full, &PageMetadata::default())
///     .await
///     .unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct ReadingSession {
    state: Arc<Mutex<SessionState>>,
    engine: Arc<dyn SpeechEngine>,
    summarizer: Arc<dyn Summarizer>,
    prefs: Arc<dyn PreferenceStore>,
}

impl ReadingSession {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        summarizer: Arc<dyn Summarizer>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            engine,
            summarizer,
            prefs,
        }
    }

    /// Register the observer notified on every transition, replacing any
    /// previous one.  It runs on the caller's task and must not block.
    pub fn set_status_observer<F>(&self, observer: F)
    where
        F: Fn(ReadingStatus) + Send + Sync + 'static,
    {
        self.lock().observer = Some(Arc::new(observer));
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Start a new session reading `text` in `mode`.
    ///
    /// Any previous session is torn down first.  Returns once the engine has
    /// accepted the utterance (or the session was superseded while waiting
    /// for a summary); playback progress is reported through status changes.
    pub async fn start_reading(
        &self,
        text: &str,
        mode: ReadingMode,
        metadata: &PageMetadata,
    ) -> Result<(), SessionError> {
        let settings = self.prefs.speech_settings();

        let (generation, note) = {
            let mut st = self.lock();
            if st.record.utterance.take().is_some() || self.engine.is_speaking() {
                log::debug!("session: cancelling previous utterance");
                self.engine.cancel();
            }
            st.record.generation += 1;
            st.record.mode = Some(mode);
            st.record.raw_text = Some(text.to_string());
            st.record.spoken_text = None;
            st.record.is_summary = false;
            st.record.last_error = None;
            (st.record.generation, st.set_status(ReadingStatus::Idle))
        };
        note.fire();

        if text.trim().is_empty() {
            log::warn!("session: refusing to read empty text");
            self.fail_if_current(generation, SessionError::EmptyContent.to_string());
            return Err(SessionError::EmptyContent);
        }

        let (to_speak, is_summary) = match mode {
            ReadingMode::Full => (text.to_string(), false),
            ReadingMode::Summary => {
                self.transition_if_current(generation, ReadingStatus::Summarizing);
                match self.summarizer.summarize(text, metadata).await {
                    Ok(summary) if !summary.trim().is_empty() => (summary, true),
                    Ok(_) => {
                        log::warn!("session: summary was empty, reading full text");
                        (text.to_string(), false)
                    }
                    Err(e) => {
                        log::warn!("session: summary failed ({e}), reading full text");
                        (text.to_string(), false)
                    }
                }
            }
        };

        let mut st = self.lock();
        if st.record.generation != generation {
            log::debug!(
                "session: generation {generation} superseded by {}, dropping result",
                st.record.generation
            );
            return Ok(());
        }

        match self.engine.speak(UtteranceRequest::new(to_speak.clone(), &settings)) {
            Ok(id) => {
                log::info!(
                    "session: speaking {} chars as {id} ({})",
                    to_speak.chars().count(),
                    if is_summary { "summary" } else { "full text" }
                );
                st.record.utterance = Some(id);
                st.record.spoken_text = Some(to_speak);
                st.record.is_summary = is_summary;
                Ok(())
            }
            Err(e) => {
                log::error!("session: engine refused utterance: {e}");
                st.record.last_error = Some(e.to_string());
                let note = st.set_status(ReadingStatus::Error);
                drop(st);
                note.fire();
                Err(SessionError::EngineFailure(e.to_string()))
            }
        }
    }

    /// Ask the engine to pause.  No-op unless currently `Reading`; the status
    /// changes only when the engine acknowledges.
    pub fn pause_reading(&self) {
        let st = self.lock();
        if st.record.status != ReadingStatus::Reading || st.record.utterance.is_none() {
            log::debug!("session: pause ignored in {:?}", st.record.status);
            return;
        }
        self.engine.pause();
    }

    /// Ask the engine to resume.  No-op unless the engine is paused; the
    /// status changes only when the engine acknowledges.
    pub fn resume_reading(&self) {
        let st = self.lock();
        if st.record.utterance.is_none() || !self.engine.is_paused() {
            log::debug!("session: resume ignored in {:?}", st.record.status);
            return;
        }
        self.engine.resume();
    }

    /// Stop immediately.  Idempotent; never waits for the engine.
    ///
    /// Also invalidates any summary still in flight.
    pub fn stop_reading(&self) {
        let note = {
            let mut st = self.lock();
            if st.record.utterance.take().is_some() || self.engine.is_speaking() {
                self.engine.cancel();
            }
            st.record.generation += 1;
            st.set_status(ReadingStatus::Stopped)
        };
        note.fire();
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn status(&self) -> ReadingStatus {
        self.lock().record.status
    }

    pub fn is_reading(&self) -> bool {
        self.status() == ReadingStatus::Reading
    }

    pub fn is_paused(&self) -> bool {
        self.status() == ReadingStatus::Paused
    }

    /// Status plus the derived flags, as answered to `GetStatus`.
    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::from(self.status())
    }

    /// Copy of the whole session record.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().record.clone()
    }

    // -----------------------------------------------------------------------
    // Engine events
    // -----------------------------------------------------------------------

    /// Apply one engine event.  Events for any utterance other than the live
    /// one are dropped.
    pub fn handle_engine_event(&self, event: EngineEvent) {
        let note = {
            let mut st = self.lock();
            if st.record.utterance != Some(event.utterance) {
                log::debug!(
                    "session: ignoring {:?} for stale {}",
                    event.kind,
                    event.utterance
                );
                return;
            }

            match event.kind {
                EngineEventKind::Started => match st.record.status {
                    ReadingStatus::Idle | ReadingStatus::Summarizing => {
                        st.set_status(ReadingStatus::Reading)
                    }
                    _ => Notification::none(),
                },
                EngineEventKind::Paused => match st.record.status {
                    ReadingStatus::Reading => st.set_status(ReadingStatus::Paused),
                    _ => Notification::none(),
                },
                EngineEventKind::Resumed => match st.record.status {
                    ReadingStatus::Paused => st.set_status(ReadingStatus::Reading),
                    _ => Notification::none(),
                },
                EngineEventKind::Ended => {
                    st.record.utterance = None;
                    st.set_status(ReadingStatus::Complete)
                }
                EngineEventKind::Failed(message) => {
                    log::warn!("session: engine error on {}: {message}", event.utterance);
                    st.record.utterance = None;
                    st.record.last_error = Some(message);
                    st.set_status(ReadingStatus::Error)
                }
            }
        };
        note.fire();
    }

    /// Consume engine events until the channel closes.
    pub async fn run_engine_events(&self, mut events: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_engine_event(event);
        }
        log::info!("session: engine event channel closed");
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition_if_current(&self, generation: u64, status: ReadingStatus) {
        let note = {
            let mut st = self.lock();
            if st.record.generation != generation {
                return;
            }
            st.set_status(status)
        };
        note.fire();
    }

    fn fail_if_current(&self, generation: u64, message: String) {
        let note = {
            let mut st = self.lock();
            if st.record.generation != generation {
                return;
            }
            st.record.last_error = Some(message);
            st.set_status(ReadingStatus::Error)
        };
        note.fire();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MemoryPreferences, SpeechSettings};
    use crate::llm::LlmError;
    use crate::speech::engine::EngineError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Records every call; never emits events on its own.
    #[derive(Default)]
    struct RecordingEngine {
        next_id: AtomicU64,
        spoken: Mutex<Vec<UtteranceRequest>>,
        pauses: AtomicUsize,
        resumes: AtomicUsize,
        cancels: AtomicUsize,
        speaking: AtomicBool,
        paused: AtomicBool,
        refuse: AtomicBool,
    }

    impl RecordingEngine {
        fn spoken(&self) -> Vec<UtteranceRequest> {
            self.spoken.lock().unwrap().clone()
        }
    }

    impl SpeechEngine for RecordingEngine {
        fn speak(&self, request: UtteranceRequest) -> Result<UtteranceId, EngineError> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(EngineError::Unavailable("no audio device".into()));
            }
            self.spoken.lock().unwrap().push(request);
            self.speaking.store(true, Ordering::SeqCst);
            Ok(UtteranceId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
        }

        fn pause(&self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
            self.paused.store(true, Ordering::SeqCst);
        }

        fn resume(&self) {
            self.resumes.fetch_add(1, Ordering::SeqCst);
            self.paused.store(false, Ordering::SeqCst);
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            self.speaking.store(false, Ordering::SeqCst);
            self.paused.store(false, Ordering::SeqCst);
        }

        fn is_speaking(&self) -> bool {
            self.speaking.load(Ordering::SeqCst)
        }

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }
    }

    /// Always succeeds with a fixed summary.
    struct OkSummarizer(String);

    #[async_trait]
    impl Summarizer for OkSummarizer {
        async fn summarize(&self, _c: &str, _m: &PageMetadata) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Always fails.
    struct FailSummarizer;

    #[async_trait]
    impl Summarizer for FailSummarizer {
        async fn summarize(&self, _c: &str, _m: &PageMetadata) -> Result<String, LlmError> {
            Err(LlmError::MissingCredential)
        }
    }

    /// Blocks until released, then succeeds.
    struct GatedSummarizer {
        gate: Notify,
    }

    #[async_trait]
    impl Summarizer for GatedSummarizer {
        async fn summarize(&self, _c: &str, _m: &PageMetadata) -> Result<String, LlmError> {
            self.gate.notified().await;
            Ok("late summary".into())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_session(
        summarizer: Arc<dyn Summarizer>,
    ) -> (ReadingSession, Arc<RecordingEngine>, Arc<Mutex<Vec<ReadingStatus>>>) {
        let engine = Arc::new(RecordingEngine::default());
        let prefs = Arc::new(MemoryPreferences::default());
        let session = ReadingSession::new(engine.clone(), summarizer, prefs);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.set_status_observer(move |s| sink.lock().unwrap().push(s));

        (session, engine, seen)
    }

    fn full_session() -> (ReadingSession, Arc<RecordingEngine>, Arc<Mutex<Vec<ReadingStatus>>>) {
        make_session(Arc::new(FailSummarizer))
    }

    fn live(session: &ReadingSession) -> UtteranceId {
        session.snapshot().utterance.expect("live utterance")
    }

    fn event(id: UtteranceId, kind: EngineEventKind) -> EngineEvent {
        EngineEvent::new(id, kind)
    }

    async fn start_full(session: &ReadingSession, text: &str) -> Result<(), SessionError> {
        session
            .start_reading(text, ReadingMode::Full, &PageMetadata::default())
            .await
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_text_fails_and_sets_error() {
        let (session, engine, _) = full_session();
        let err = start_full(&session, "").await.unwrap_err();
        assert_eq!(err, SessionError::EmptyContent);
        assert_eq!(session.status(), ReadingStatus::Error);
        assert!(engine.spoken().is_empty());

        let err = start_full(&session, "   \n").await.unwrap_err();
        assert_eq!(err, SessionError::EmptyContent);
    }

    #[tokio::test]
    async fn full_mode_reads_after_engine_start() {
        let (session, engine, seen) = full_session();
        start_full(&session, "hello").await.unwrap();

        // Nothing is optimistic: still Idle until the engine says so.
        assert_eq!(session.status(), ReadingStatus::Idle);
        assert_eq!(engine.spoken()[0].text, "hello");

        session.handle_engine_event(event(live(&session), EngineEventKind::Started));
        assert_eq!(session.status(), ReadingStatus::Reading);
        assert!(session.is_reading());
        assert_eq!(*seen.lock().unwrap(), vec![ReadingStatus::Reading]);
    }

    #[tokio::test]
    async fn pause_in_idle_is_noop() {
        let (session, engine, _) = full_session();
        session.pause_reading();
        assert_eq!(session.status(), ReadingStatus::Idle);
        assert_eq!(engine.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pause_and_resume_wait_for_acknowledgement() {
        let (session, engine, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        let id = live(&session);
        session.handle_engine_event(event(id, EngineEventKind::Started));

        session.pause_reading();
        assert_eq!(engine.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(session.status(), ReadingStatus::Reading);
        session.handle_engine_event(event(id, EngineEventKind::Paused));
        assert_eq!(session.status(), ReadingStatus::Paused);
        assert!(session.is_paused());

        // Pausing again while paused does nothing.
        session.pause_reading();
        assert_eq!(engine.pauses.load(Ordering::SeqCst), 1);

        session.resume_reading();
        assert_eq!(engine.resumes.load(Ordering::SeqCst), 1);
        assert_eq!(session.status(), ReadingStatus::Paused);
        session.handle_engine_event(event(id, EngineEventKind::Resumed));
        assert_eq!(session.status(), ReadingStatus::Reading);
    }

    #[tokio::test]
    async fn resume_without_engine_pause_is_noop() {
        let (session, engine, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        session.handle_engine_event(event(live(&session), EngineEventKind::Started));

        session.resume_reading();
        assert_eq!(engine.resumes.load(Ordering::SeqCst), 0);
        assert_eq!(session.status(), ReadingStatus::Reading);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (session, engine, seen) = full_session();
        start_full(&session, "hello").await.unwrap();
        session.handle_engine_event(event(live(&session), EngineEventKind::Started));

        session.stop_reading();
        session.stop_reading();
        assert_eq!(session.status(), ReadingStatus::Stopped);
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 1);
        assert!(session.snapshot().utterance.is_none());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![ReadingStatus::Reading, ReadingStatus::Stopped]
        );
    }

    #[tokio::test]
    async fn stop_from_idle_reaches_stopped() {
        let (session, _, _) = full_session();
        session.stop_reading();
        assert_eq!(session.status(), ReadingStatus::Stopped);
    }

    #[tokio::test]
    async fn events_after_stop_do_not_resurrect_session() {
        let (session, _, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        let id = live(&session);
        session.stop_reading();

        session.handle_engine_event(event(id, EngineEventKind::Failed("interrupted".into())));
        session.handle_engine_event(event(id, EngineEventKind::Started));
        assert_eq!(session.status(), ReadingStatus::Stopped);
    }

    #[tokio::test]
    async fn end_event_completes_and_clears_handle() {
        let (session, engine, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        let id = live(&session);
        session.handle_engine_event(event(id, EngineEventKind::Started));
        session.handle_engine_event(event(id, EngineEventKind::Ended));

        assert_eq!(session.status(), ReadingStatus::Complete);
        assert!(session.snapshot().utterance.is_none());

        session.pause_reading();
        assert_eq!(engine.pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn engine_error_sets_error_without_panicking() {
        let (session, _, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        let id = live(&session);
        session.handle_engine_event(event(id, EngineEventKind::Failed("synthesis-failed".into())));

        let snap = session.snapshot();
        assert_eq!(snap.status, ReadingStatus::Error);
        assert!(snap.utterance.is_none());
        assert_eq!(snap.last_error.as_deref(), Some("synthesis-failed"));
    }

    #[tokio::test]
    async fn engine_refusal_is_engine_failure() {
        let (session, engine, _) = full_session();
        engine.refuse.store(true, Ordering::SeqCst);
        let err = start_full(&session, "hello").await.unwrap_err();
        assert!(matches!(err, SessionError::EngineFailure(_)));
        assert_eq!(session.status(), ReadingStatus::Error);
    }

    #[tokio::test]
    async fn new_start_cancels_previous_utterance() {
        let (session, engine, _) = full_session();
        start_full(&session, "first").await.unwrap();
        let first = live(&session);
        session.handle_engine_event(event(first, EngineEventKind::Started));

        start_full(&session, "second").await.unwrap();
        let second = live(&session);
        assert_ne!(first, second);
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 1);
        assert_eq!(session.status(), ReadingStatus::Idle);

        // The cancelled utterance's late end must not complete the new one.
        session.handle_engine_event(event(first, EngineEventKind::Ended));
        assert_eq!(session.status(), ReadingStatus::Idle);

        session.handle_engine_event(event(second, EngineEventKind::Started));
        assert_eq!(session.status(), ReadingStatus::Reading);
    }

    #[tokio::test]
    async fn summary_mode_speaks_summary() {
        let (session, engine, seen) =
            make_session(Arc::new(OkSummarizer("A short description.".into())));
        session
            .start_reading("long page text", ReadingMode::Summary, &PageMetadata::default())
            .await
            .unwrap();

        assert_eq!(session.status(), ReadingStatus::Summarizing);
        assert_eq!(engine.spoken()[0].text, "A short description.");
        let snap = session.snapshot();
        assert!(snap.is_summary);
        assert_eq!(snap.raw_text.as_deref(), Some("long page text"));
        assert_eq!(snap.mode, Some(ReadingMode::Summary));

        let id = live(&session);
        session.handle_engine_event(event(id, EngineEventKind::Started));
        session.handle_engine_event(event(id, EngineEventKind::Ended));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ReadingStatus::Summarizing,
                ReadingStatus::Reading,
                ReadingStatus::Complete
            ]
        );
    }

    #[tokio::test]
    async fn summary_failure_falls_back_to_raw_text() {
        let (session, engine, _) = full_session();
        session
            .start_reading("the page text", ReadingMode::Summary, &PageMetadata::default())
            .await
            .unwrap();

        assert_eq!(engine.spoken()[0].text, "the page text");
        assert!(!session.snapshot().is_summary);
        assert_ne!(session.status(), ReadingStatus::Error);
    }

    #[tokio::test]
    async fn stop_during_summary_discards_late_result() {
        let summarizer = Arc::new(GatedSummarizer { gate: Notify::new() });
        let (session, engine, _) = make_session(summarizer.clone());

        let task = tokio::spawn({
            let session = session.clone();
            async move {
                session
                    .start_reading("page", ReadingMode::Summary, &PageMetadata::default())
                    .await
            }
        });

        while session.status() != ReadingStatus::Summarizing {
            tokio::task::yield_now().await;
        }
        session.stop_reading();
        summarizer.gate.notify_one();

        assert!(task.await.unwrap().is_ok());
        assert_eq!(session.status(), ReadingStatus::Stopped);
        assert!(engine.spoken().is_empty());
        assert!(session.snapshot().utterance.is_none());
    }

    #[tokio::test]
    async fn speech_settings_come_from_preferences() {
        let engine = Arc::new(RecordingEngine::default());
        let mut config = AppConfig::default();
        config.speech = SpeechSettings {
            rate: 1.4,
            pitch: 0.8,
            volume: 0.6,
            voice: Some("Karen".into()),
        };
        let prefs = Arc::new(MemoryPreferences::new(config));
        let session = ReadingSession::new(engine.clone(), Arc::new(FailSummarizer), prefs);

        start_full(&session, "hello").await.unwrap();
        let req = &engine.spoken()[0];
        assert_eq!(req.rate, 1.4);
        assert_eq!(req.pitch, 0.8);
        assert_eq!(req.volume, 0.6);
        assert_eq!(req.voice.as_deref(), Some("Karen"));
    }

    #[tokio::test]
    async fn engine_events_are_consumed_from_channel() {
        let (session, _, _) = full_session();
        start_full(&session, "hello").await.unwrap();
        let id = live(&session);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(event(id, EngineEventKind::Started)).unwrap();
        tx.send(event(id, EngineEventKind::Ended)).unwrap();
        drop(tx);

        session.run_engine_events(rx).await;
        assert_eq!(session.status(), ReadingStatus::Complete);
    }

    #[test]
    fn session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReadingSession>();
    }
}
