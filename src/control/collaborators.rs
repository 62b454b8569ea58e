//! Seams to the page the dispatcher acts on: where the HTML comes from, how a
//! URL gets opened, and where zoom/scroll commands go.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use url::Url;

use super::messages::ViewportCommand;

/// URL schemes whose pages cannot be read.
const UNREADABLE_SCHEMES: &[&str] = &["chrome", "chrome-extension", "moz-extension", "about"];

/// Navigations remembered by [`LoggingNavigator`]; older ones are dropped.
pub const NAVIGATION_HISTORY_LIMIT: usize = 32;

// ---------------------------------------------------------------------------
// Page source
// ---------------------------------------------------------------------------

/// The current page at the moment of a read request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub html: String,
    pub url: String,
}

impl PageSnapshot {
    /// See [`page_origin`].
    pub fn origin(&self) -> Option<String> {
        page_origin(&self.url)
    }
}

pub trait PageSource: Send + Sync {
    fn snapshot(&self) -> PageSnapshot;
}

/// A page whose content can be swapped, e.g. after navigation.
#[derive(Debug, Default)]
pub struct StaticPage {
    page: Mutex<PageSnapshot>,
}

impl StaticPage {
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            page: Mutex::new(PageSnapshot {
                html: html.into(),
                url: url.into(),
            }),
        }
    }

    pub fn replace(&self, html: impl Into<String>, url: impl Into<String>) {
        let mut page = self.page.lock().unwrap_or_else(PoisonError::into_inner);
        page.html = html.into();
        page.url = url.into();
    }
}

impl PageSource for StaticPage {
    fn snapshot(&self) -> PageSnapshot {
        self.page
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// `false` for browser-internal pages and anything that is not a URL.
///
/// ```
/// use page_narrator::control::is_readable_url;
///
/// assert!(is_readable_url("https://example.com/post"));
/// assert!(is_readable_url("file:///tmp/page.html"));
/// assert!(!is_readable_url("chrome://settings"));
/// assert!(!is_readable_url("not a url"));
/// ```
pub fn is_readable_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => !UNREADABLE_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Serialised origin of `url` (`https://example.com`), the key reading-mode
/// preferences are stored under.  `None` for opaque origins such as `file:`
/// URLs and for anything that does not parse.
///
/// ```
/// use page_narrator::control::page_origin;
///
/// assert_eq!(
///     page_origin("https://Example.com:443/a/b?c").as_deref(),
///     Some("https://example.com")
/// );
/// assert_eq!(page_origin("file:///tmp/page.html"), None);
/// ```
pub fn page_origin(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Open `url` in the current tab, or a new one when `new_tab` is set.
    async fn open(&self, url: &str, new_tab: bool) -> anyhow::Result<()>;
}

/// Logs navigation requests instead of performing them, keeping the most
/// recent [`NAVIGATION_HISTORY_LIMIT`] of them.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    opened: Mutex<VecDeque<(String, bool)>>,
}

impl LoggingNavigator {
    /// Recent navigations, oldest first.
    pub fn history(&self) -> Vec<(String, bool)> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Navigator for LoggingNavigator {
    async fn open(&self, url: &str, new_tab: bool) -> anyhow::Result<()> {
        log::info!(
            "navigate: {url} ({})",
            if new_tab { "new tab" } else { "current tab" }
        );
        let mut opened = self.opened.lock().unwrap_or_else(PoisonError::into_inner);
        if opened.len() == NAVIGATION_HISTORY_LIMIT {
            opened.pop_front();
        }
        opened.push_back((url.to_string(), new_tab));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ViewportSink: Send + Sync {
    async fn apply(&self, command: ViewportCommand) -> anyhow::Result<()>;
}

/// Prints each command as the JSON a page-side controller would receive.
#[derive(Debug, Default)]
pub struct LoggingViewport;

#[async_trait]
impl ViewportSink for LoggingViewport {
    async fn apply(&self, command: ViewportCommand) -> anyhow::Result<()> {
        let json = serde_json::to_string(&command)?;
        log::info!("viewport: {json}");
        Ok(())
    }
}

/// Shared handles the dispatcher is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub page: Arc<dyn PageSource>,
    pub navigator: Arc<dyn Navigator>,
    pub viewport: Arc<dyn ViewportSink>,
}
