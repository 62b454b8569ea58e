//! Application entry point — Page Narrator.
//!
//! ```text
//! page-narrator <page.html> [url]
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Open the preference store (`settings.toml`, defaults on first run).
//! 3. Build the AI client, summarizer, site resolver and console speech engine.
//! 4. Spawn the engine-event loop on the tokio runtime.
//! 5. Load the page and start reading it in the preferred mode.
//! 6. Treat every stdin line as a recognised voice transcript, or as a raw
//!    control message when it starts with `{`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use page_narrator::{
    config::{AppConfig, AppPaths, FilePreferences, MemoryPreferences, PreferenceStore},
    control::{
        Collaborators, ControlMessage, Dispatcher, LoggingNavigator, LoggingViewport, StaticPage,
    },
    llm::{ApiSummarizer, ChatClient, CompletionBackend, Summarizer},
    site::SiteResolver,
    speech::{ConsoleEngine, ReadingSession},
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_preferences() -> Arc<dyn PreferenceStore> {
    let path = AppPaths::new().settings_file;
    match FilePreferences::open(&path) {
        Ok(prefs) => {
            log::info!("Preferences loaded from {}", prefs.path().display());
            Arc::new(prefs)
        }
        Err(e) => {
            log::warn!("Failed to load {} ({e:#}); using defaults", path.display());
            Arc::new(MemoryPreferences::new(AppConfig::default()))
        }
    }
}

fn page_url(file: &Path, explicit: Option<String>) -> Result<String> {
    if let Some(url) = explicit {
        return Ok(url);
    }
    let absolute = std::fs::canonicalize(file)
        .with_context(|| format!("cannot resolve {}", file.display()))?;
    Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .map_err(|_| anyhow::anyhow!("cannot build a file URL for {}", absolute.display()))
}

async fn handle_line(dispatcher: Dispatcher, line: String) {
    if line.starts_with('{') {
        let reply = dispatcher.handle_json(&line).await;
        match serde_json::to_string(&reply) {
            Ok(json) => println!("← {json}"),
            Err(e) => log::error!("Failed to encode reply: {e}"),
        }
        return;
    }

    let outcome = dispatcher.handle_transcript(&line).await;
    if let Some(feedback) = outcome.feedback() {
        println!("🔊 {feedback}");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(file) = args.next().map(PathBuf::from) else {
        bail!("usage: page-narrator <page.html> [url]");
    };
    let url = page_url(&file, args.next())?;

    log::info!("Page Narrator starting up");

    // 2. Preferences
    let prefs = open_preferences();

    // 3. Components
    let client: Arc<dyn CompletionBackend> = Arc::new(ChatClient::new(prefs.clone()));
    if !client.has_credential() {
        log::warn!("No AI API key configured; summaries fall back to the full text");
    }
    let summarizer: Arc<dyn Summarizer> = Arc::new(ApiSummarizer::new(client.clone()));
    let resolver = Arc::new(SiteResolver::new(Some(client), &prefs.snapshot().site));

    let (engine, events) = ConsoleEngine::new();
    let session = ReadingSession::new(Arc::new(engine), summarizer.clone(), prefs.clone());
    session.set_status_observer(|status| log::info!("status: {}", status.label()));

    // 4. Engine events
    tokio::spawn({
        let session = session.clone();
        async move { session.run_engine_events(events).await }
    });

    // 5. Page
    let html = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let page = Arc::new(StaticPage::new(html, url));

    let dispatcher = Dispatcher::new(
        session.clone(),
        summarizer,
        resolver,
        prefs,
        Collaborators {
            page,
            navigator: Arc::new(LoggingNavigator::default()),
            viewport: Arc::new(LoggingViewport),
        },
    );

    tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move {
            let reply = dispatcher
                .handle_message(ControlMessage::StartReading { mode: None })
                .await;
            if reply.is_error() {
                log::error!("Could not start reading: {reply:?}");
            }
        }
    });

    // 6. Transcripts
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        tokio::spawn(handle_line(dispatcher.clone(), line));
    }

    session.stop_reading();
    log::info!("Page Narrator shutting down");
    Ok(())
}
