//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing keys fall back to their defaults, so a hand-edited file only needs
//! the values the user actually changed.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ReadingMode
// ---------------------------------------------------------------------------

/// How a page is read aloud.
///
/// | Variant | Pipeline                                   | Requires AI key |
/// |---------|--------------------------------------------|-----------------|
/// | Summary | Extract → Summarize → Speak (raw on error) | Yes (degrades)  |
/// | Full    | Extract → Speak                            | No              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    /// Speak a short AI-written description of the page.
    Summary,
    /// Speak the whole extracted text.
    Full,
}

impl Default for ReadingMode {
    fn default() -> Self {
        Self::Summary
    }
}

impl ReadingMode {
    pub fn label(&self) -> &'static str {
        match self {
            ReadingMode::Summary => "summary",
            ReadingMode::Full => "full",
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSettings
// ---------------------------------------------------------------------------

/// Voice parameters handed to the speech engine at session start.
///
/// Ranges follow the engine contract: rate 0.1 – 10, pitch 0 – 2,
/// volume 0 – 1.  Out-of-range values are clamped by [`clamped`](Self::clamped)
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Speaking rate multiplier.
    pub rate: f32,
    /// Pitch multiplier.
    pub pitch: f32,
    /// Output volume.
    pub volume: f32,
    /// Engine voice identifier (name or URI); `None` uses the engine default.
    pub voice: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice: None,
        }
    }
}

impl SpeechSettings {
    /// Return a copy with every numeric field forced into the engine range.
    ///
    /// Non-finite values are replaced by the default for that field.
    pub fn clamped(&self) -> Self {
        fn clamp(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        }

        Self {
            rate: clamp(self.rate, 0.1, 10.0, 1.0),
            pitch: clamp(self.pitch, 0.0, 2.0, 1.0),
            volume: clamp(self.volume, 0.0, 1.0, 1.0),
            voice: self
                .voice
                .as_ref()
                .filter(|v| !v.trim().is_empty())
                .cloned(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReadingConfig
// ---------------------------------------------------------------------------

/// Reading preferences.
///
/// The mode is remembered per origin (`scheme://host[:port]`), so choosing
/// "summary" on one site leaves every other site alone.
///
/// ```toml
/// [reading]
/// mode = "summary"
///
/// [reading.per_origin]
/// "https://en.wikipedia.org" = "full"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    /// Mode for origins with no entry of their own.
    pub mode: ReadingMode,
    /// Modes chosen on particular origins.
    pub per_origin: BTreeMap<String, ReadingMode>,
}

impl ReadingConfig {
    /// The mode for `origin`, or the default mode when it has no entry.
    /// `None` (a page without a tuple origin) always gets the default.
    pub fn mode_for(&self, origin: Option<&str>) -> ReadingMode {
        origin
            .and_then(|o| self.per_origin.get(o))
            .copied()
            .unwrap_or(self.mode)
    }

    /// Remember `mode` for `origin`; `None` changes the default instead.
    pub fn set_mode_for(&mut self, origin: Option<&str>, mode: ReadingMode) {
        match origin {
            Some(origin) => {
                self.per_origin.insert(origin.to_string(), mode);
            }
            None => self.mode = mode,
        }
    }
}

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

/// Settings for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Bearer credential.  `None` (or blank) disables every AI feature:
    /// summaries fall back to the full text and site resolution skips
    /// straight to the search fallback.
    pub api_key: Option<String>,
    /// Model identifier sent with every request (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Base URL; `/chat/completions` is appended.
    ///
    /// - OpenAI: `https://api.openai.com/v1`
    /// - Ollama: `http://localhost:11434/v1`
    pub base_url: String,
    /// Maximum seconds to wait for a completion before timing out.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            timeout_secs: 30,
        }
    }
}

impl AiConfig {
    /// The configured key, if it is a non-empty string.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

/// Settings for "open a website" requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Search endpoint used when a query cannot be resolved; the query is
    /// appended as the `q` parameter.
    pub search_url: String,
    /// Open resolved sites in a new tab instead of replacing the current one.
    pub open_in_new_tab: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".into(),
            open_in_new_tab: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use page_narrator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Voice parameters.
    pub speech: SpeechSettings,
    /// Reading-mode preference.
    pub reading: ReadingConfig,
    /// AI completion endpoint.
    pub ai: AiConfig,
    /// Website resolution.
    pub site: SiteConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.reading.mode = ReadingMode::Full;
        cfg.speech.rate = 1.5;
        cfg.speech.voice = Some("Samantha".into());
        cfg.ai.api_key = Some("sk-test".into());
        cfg.ai.base_url = "http://localhost:11434/v1".into();
        cfg.site.open_in_new_tab = true;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.reading.mode, ReadingMode::Full);
        assert_eq!(loaded.speech.rate, 1.5);
        assert_eq!(loaded.speech.voice.as_deref(), Some("Samantha"));
        assert_eq!(loaded.ai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(loaded.ai.base_url, "http://localhost:11434/v1");
        assert!(loaded.site.open_in_new_tab);
    }

    #[test]
    fn per_origin_modes_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("origins.toml");

        let mut cfg = AppConfig::default();
        cfg.reading
            .set_mode_for(Some("https://en.wikipedia.org"), ReadingMode::Full);
        cfg.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(
            loaded.reading.mode_for(Some("https://en.wikipedia.org")),
            ReadingMode::Full
        );
        assert_eq!(
            loaded.reading.mode_for(Some("https://news.example")),
            ReadingMode::Summary
        );
        assert_eq!(loaded.reading.mode_for(None), ReadingMode::Summary);
    }

    #[test]
    fn origin_without_entry_follows_default() {
        let mut reading = ReadingConfig::default();
        reading.set_mode_for(None, ReadingMode::Full);
        reading.set_mode_for(Some("https://a.example"), ReadingMode::Summary);

        assert_eq!(reading.mode_for(Some("https://a.example")), ReadingMode::Summary);
        assert_eq!(reading.mode_for(Some("https://b.example")), ReadingMode::Full);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.reading.mode, ReadingMode::Summary);
        assert_eq!(config.speech, SpeechSettings::default());
        assert!(config.ai.api_key.is_none());
    }

    /// A file that only sets one key keeps defaults for everything else.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[speech]\nrate = 2.0\n").unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.speech.rate, 2.0);
        assert_eq!(config.speech.pitch, 1.0);
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.site.search_url, "https://www.google.com/search");
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.speech.rate, 1.0);
        assert_eq!(cfg.speech.pitch, 1.0);
        assert_eq!(cfg.speech.volume, 1.0);
        assert!(cfg.speech.voice.is_none());
        assert_eq!(cfg.ai.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.ai.timeout_secs, 30);
        assert!(!cfg.site.open_in_new_tab);
    }

    #[test]
    fn clamped_forces_engine_ranges() {
        let settings = SpeechSettings {
            rate: 50.0,
            pitch: -1.0,
            volume: f32::NAN,
            voice: Some("  ".into()),
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.rate, 10.0);
        assert_eq!(clamped.pitch, 0.0);
        assert_eq!(clamped.volume, 1.0);
        assert!(clamped.voice.is_none());
    }

    #[test]
    fn credential_ignores_blank_key() {
        let mut ai = AiConfig::default();
        assert!(ai.credential().is_none());
        ai.api_key = Some("   ".into());
        assert!(ai.credential().is_none());
        ai.api_key = Some("sk-1".into());
        assert_eq!(ai.credential(), Some("sk-1"));
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let mut ai = AiConfig::default();
        ai.base_url = "http://localhost:11434/v1/".into();
        assert_eq!(
            ai.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
