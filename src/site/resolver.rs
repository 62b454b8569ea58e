//! Website resolution pipeline — turns "open the bbc" into a URL.
//!
//! # Flow
//!
//! ```text
//! raw query ─▶ lowercase + trim ─▶ blank? ─▶ Err(EmptyQuery)
//!    ├─ alias table (exact, then substring)      → matched, Alias
//!    ├─ AI completion (only with a credential)   → matched, Ai
//!    │     UNKNOWN / invalid URL / request error → silently skipped
//!    └─ search URL built from the raw query      → unmatched, Search
//! ```

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;
use crate::llm::{site_request, CompletionBackend, UNKNOWN_SITE_TOKEN};

use super::aliases::lookup_alias;

// ---------------------------------------------------------------------------
// SiteError
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// Nothing left to look up after normalisation.
    #[error("no website name given")]
    EmptyQuery,
}

// ---------------------------------------------------------------------------
// SiteResolution
// ---------------------------------------------------------------------------

/// Which stage produced the final URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Alias,
    Ai,
    Search,
}

/// Outcome of one open-site request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResolution {
    pub requested_query: String,
    pub matched_url: Option<String>,
    /// Always populated; equals `matched_url` when there is one.
    pub final_url: String,
    pub matched: bool,
    pub source: ResolutionSource,
}

// ---------------------------------------------------------------------------
// SiteResolver
// ---------------------------------------------------------------------------

/// Resolves free-text website requests.
pub struct SiteResolver {
    backend: Option<Arc<dyn CompletionBackend>>,
    search_url: String,
}

impl SiteResolver {
    /// `backend` is consulted only when it reports a credential.
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>, site: &SiteConfig) -> Self {
        Self {
            backend,
            search_url: site.search_url.clone(),
        }
    }

    /// Resolve `raw_query`.  Only a blank query is an error; every other
    /// input ends in at least a search URL.
    pub async fn resolve(&self, raw_query: &str) -> Result<SiteResolution, SiteError> {
        let query = raw_query.trim().to_lowercase();
        if query.is_empty() {
            return Err(SiteError::EmptyQuery);
        }

        if let Some(url) = lookup_alias(&query) {
            log::info!("site: {query:?} matched alias → {url}");
            return Ok(Self::matched(query, url.to_string(), ResolutionSource::Alias));
        }

        if let Some(url) = self.ask_ai(&query).await {
            log::info!("site: {query:?} resolved by AI → {url}");
            return Ok(Self::matched(query, url, ResolutionSource::Ai));
        }

        let final_url = self.search_url_for(raw_query.trim());
        log::info!("site: {query:?} unresolved, searching");
        Ok(SiteResolution {
            requested_query: query,
            matched_url: None,
            final_url,
            matched: false,
            source: ResolutionSource::Search,
        })
    }

    fn matched(query: String, url: String, source: ResolutionSource) -> SiteResolution {
        SiteResolution {
            requested_query: query,
            matched_url: Some(url.clone()),
            final_url: url,
            matched: true,
            source,
        }
    }

    async fn ask_ai(&self, query: &str) -> Option<String> {
        let backend = self.backend.as_ref().filter(|b| b.has_credential())?;

        match backend.complete(&site_request(query)).await {
            Ok(reply) => {
                let url = normalize_ai_url(&reply);
                if url.is_none() {
                    log::debug!("site: AI gave no usable URL for {query:?}: {reply:?}");
                }
                url
            }
            Err(e) => {
                log::warn!("site: AI resolution failed ({e}), falling back to search");
                None
            }
        }
    }

    /// Deterministic search URL for `query`.
    pub fn search_url_for(&self, query: &str) -> String {
        match Url::parse_with_params(&self.search_url, &[("q", query)]) {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::warn!("site: bad search_url {:?} ({e}), using default", self.search_url);
                let fallback = SiteConfig::default().search_url;
                Url::parse_with_params(&fallback, &[("q", query)])
                    .map(|u| u.to_string())
                    .unwrap_or(fallback)
            }
        }
    }
}

/// Turn an AI reply into an absolute http(s) URL, or `None` for `UNKNOWN`
/// and anything that does not parse.
///
/// ```
/// use page_narrator::site::normalize_ai_url;
///
/// assert_eq!(normalize_ai_url("bbc.co.uk").as_deref(), Some("https://bbc.co.uk/"));
/// assert_eq!(normalize_ai_url("UNKNOWN"), None);
/// ```
pub fn normalize_ai_url(reply: &str) -> Option<String> {
    let candidate = reply
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '<' | '>' | '.' | ','));

    if candidate.is_empty() || candidate.eq_ignore_ascii_case(UNKNOWN_SITE_TOKEN) {
        return None;
    }

    let with_scheme = if candidate.contains("://") {
        candidate.to_string()
    } else {
        format!("https://{candidate}")
    };

    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?;
    if !matches!(url.scheme(), "http" | "https") || !host.contains('.') {
        return None;
    }
    Some(url.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
