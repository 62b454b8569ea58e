//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings) and its sections, `AppPaths` for
//! cross-platform data directories, TOML persistence via `AppConfig::load` /
//! `AppConfig::save`, and the [`PreferenceStore`] seam the rest of the crate
//! reads preferences through.

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::AppPaths;
pub use settings::{AiConfig, AppConfig, ReadingConfig, ReadingMode, SiteConfig, SpeechSettings};
pub use store::{FilePreferences, MemoryPreferences, PreferenceStore};
