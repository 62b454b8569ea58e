//! [`ConsoleEngine`] — a [`SpeechEngine`] that "speaks" by printing words to
//! stdout at a pace derived from the requested rate.
//!
//! Used by the binary when no platform voice is wired in, and handy for
//! watching the session state machine react to real asynchronous events.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use super::engine::{
    EngineError, EngineEvent, EngineEventKind, SpeechEngine, UtteranceId, UtteranceRequest,
};

/// Time per word at rate 1.0.
const BASE_WORD_DELAY: Duration = Duration::from_millis(280);

/// How often a paused utterance checks whether it may continue.
const PAUSE_POLL: Duration = Duration::from_millis(40);

#[derive(Debug, Default)]
struct ConsoleState {
    issued: u64,
    current: Option<UtteranceId>,
    paused: bool,
}

/// Prints utterances word by word and reports lifecycle events on a channel.
pub struct ConsoleEngine {
    state: Arc<Mutex<ConsoleState>>,
    events: mpsc::UnboundedSender<EngineEvent>,
    word_delay: Duration,
}

impl ConsoleEngine {
    /// Create the engine and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        Self::with_word_delay(BASE_WORD_DELAY)
    }

    /// Like [`new`](Self::new) with a custom per-word delay at rate 1.0.
    pub fn with_word_delay(word_delay: Duration) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            state: Arc::new(Mutex::new(ConsoleState::default())),
            events: tx,
            word_delay,
        };
        (engine, rx)
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        lock_state(&self.state)
    }

    fn emit(&self, id: UtteranceId, kind: EngineEventKind) {
        // A closed receiver just means nobody is listening any more.
        let _ = self.events.send(EngineEvent::new(id, kind));
    }
}

fn lock_state(state: &Mutex<ConsoleState>) -> MutexGuard<'_, ConsoleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SpeechEngine for ConsoleEngine {
    fn speak(&self, request: UtteranceRequest) -> Result<UtteranceId, EngineError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| EngineError::Unavailable(format!("no async runtime: {e}")))?;

        let id = {
            let mut st = self.lock();
            st.issued += 1;
            let id = UtteranceId(st.issued);
            st.current = Some(id);
            st.paused = false;
            id
        };

        // Started goes out before speak() returns so a pause issued right
        // after it can never overtake it on the channel.
        self.emit(id, EngineEventKind::Started);

        let delay = self.word_delay.div_f32(request.rate.max(0.1));
        let state = Arc::clone(&self.state);
        let events = self.events.clone();

        log::debug!(
            "console-tts: {id} rate={} pitch={} volume={} voice={:?}",
            request.rate,
            request.pitch,
            request.volume,
            request.voice
        );

        runtime.spawn(async move {
            for word in request.text.split_whitespace() {
                loop {
                    let (live, paused) = {
                        let st = lock_state(&state);
                        (st.current == Some(id), st.paused)
                    };
                    if !live {
                        log::debug!("console-tts: {id} cancelled");
                        return;
                    }
                    if !paused {
                        break;
                    }
                    tokio::time::sleep(PAUSE_POLL).await;
                }

                {
                    let mut out = std::io::stdout().lock();
                    let _ = write!(out, "{word} ");
                    let _ = out.flush();
                }

                tokio::time::sleep(delay).await;
            }

            let finished = {
                let mut st = lock_state(&state);
                if st.current == Some(id) {
                    st.current = None;
                    st.paused = false;
                    true
                } else {
                    false
                }
            };
            if finished {
                println!();
                let _ = events.send(EngineEvent::new(id, EngineEventKind::Ended));
            }
        });

        Ok(id)
    }

    fn pause(&self) {
        let id = {
            let mut st = self.lock();
            match st.current {
                Some(id) if !st.paused => {
                    st.paused = true;
                    id
                }
                _ => return,
            }
        };
        self.emit(id, EngineEventKind::Paused);
    }

    fn resume(&self) {
        let id = {
            let mut st = self.lock();
            match st.current {
                Some(id) if st.paused => {
                    st.paused = false;
                    id
                }
                _ => return,
            }
        };
        self.emit(id, EngineEventKind::Resumed);
    }

    fn cancel(&self) {
        let mut st = self.lock();
        st.current = None;
        st.paused = false;
    }

    fn is_speaking(&self) -> bool {
        self.lock().current.is_some()
    }

    fn is_paused(&self) -> bool {
        let st = self.lock();
        st.current.is_some() && st.paused
    }
}
