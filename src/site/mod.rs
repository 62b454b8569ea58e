//! Website resolution module.
//!
//! This module provides:
//! * [`SiteResolver`] — alias table → AI → search fallback pipeline.
//! * [`SITE_ALIASES`] / [`lookup_alias`] — the curated alias table.
//! * [`SiteResolution`] / [`SiteError`] — results and the one hard failure.
//!
//! Navigating to the resolved URL is the caller's job.
//!
//! # Quick start
//!
//! ```rust
//! use page_narrator::config::SiteConfig;
//! use page_narrator::site::SiteResolver;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let resolver = SiteResolver::new(None, &SiteConfig::default());
//! let res = resolver.resolve("open youtube".trim_start_matches("open ")).await.unwrap();
//! assert_eq!(res.final_url, "https://www.youtube.com/");
//! assert!(res.matched);
//! # }
//! ```

pub mod aliases;
pub mod resolver;

pub use aliases::{comparison_key, lookup_alias, SiteAlias, SITE_ALIASES};
pub use resolver::{normalize_ai_url, ResolutionSource, SiteError, SiteResolution, SiteResolver};
