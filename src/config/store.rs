//! Preference store — the key/value collaborator every component reads from.
//!
//! Preferences are read at the point of use (session start, each AI call) so
//! a change made through one control surface is seen by the next operation
//! without restarting anything.
//!
//! * [`FilePreferences`] — backed by `settings.toml`; writes persist.
//! * [`MemoryPreferences`] — in-process only; used by tests and embedders.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::settings::{AiConfig, AppConfig, ReadingMode, SpeechSettings};

// ---------------------------------------------------------------------------
// PreferenceStore trait
// ---------------------------------------------------------------------------

/// Read/write access to user preferences.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn PreferenceStore>`.
pub trait PreferenceStore: Send + Sync {
    /// A copy of the current configuration.
    fn snapshot(&self) -> AppConfig;

    /// Apply `edit` to the configuration and persist the result.
    fn update(&self, edit: &mut dyn FnMut(&mut AppConfig)) -> Result<()>;

    fn speech_settings(&self) -> SpeechSettings {
        self.snapshot().speech
    }

    /// Preferred mode for pages on `origin`; an origin without an entry
    /// gets the default mode.
    fn reading_mode(&self, origin: Option<&str>) -> ReadingMode {
        self.snapshot().reading.mode_for(origin)
    }

    fn ai_config(&self) -> AiConfig {
        self.snapshot().ai
    }

    fn set_reading_mode(&self, origin: Option<&str>, mode: ReadingMode) -> Result<()> {
        self.update(&mut |config| config.reading.set_mode_for(origin, mode))
    }
}

// ---------------------------------------------------------------------------
// FilePreferences
// ---------------------------------------------------------------------------

/// Preferences cached in memory and written back to a TOML file on update.
pub struct FilePreferences {
    path: PathBuf,
    cache: Mutex<AppConfig>,
}

impl FilePreferences {
    /// Load from `path`; a missing file yields defaults.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = AppConfig::load_from(&path)?;
        Ok(Self {
            path,
            cache: Mutex::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn snapshot(&self) -> AppConfig {
        match self.cache.lock() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, edit: &mut dyn FnMut(&mut AppConfig)) -> Result<()> {
        let updated = {
            let mut config = self
                .cache
                .lock()
                .map_err(|e| anyhow!("preference cache poisoned: {e}"))?;
            edit(&mut *config);
            config.clone()
        };
        updated.save_to(&self.path)?;
        log::debug!("preferences: saved {}", self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryPreferences
// ---------------------------------------------------------------------------

/// Preferences that live only in memory.
#[derive(Default)]
pub struct MemoryPreferences {
    config: Mutex<AppConfig>,
}

impl MemoryPreferences {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn snapshot(&self) -> AppConfig {
        match self.config.lock() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, edit: &mut dyn FnMut(&mut AppConfig)) -> Result<()> {
        let mut config = self
            .config
            .lock()
            .map_err(|e| anyhow!("preference cache poisoned: {e}"))?;
        edit(&mut *config);
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

    const NEWS: Option<&str> = Some("https://news.example");
    const BLOG: Option<&str> = Some("https://blog.example");

    #[test]
    fn memory_store_updates_mode_per_origin() {
        let store = MemoryPreferences::default();
        assert_eq!(store.reading_mode(NEWS), ReadingMode::Summary);

        store.set_reading_mode(NEWS, ReadingMode::Full).unwrap();
        assert_eq!(store.reading_mode(NEWS), ReadingMode::Full);
        assert_eq!(store.reading_mode(BLOG), ReadingMode::Summary);
        assert_eq!(store.reading_mode(None), ReadingMode::Summary);
    }

    #[test]
    fn file_store_persists_mode_change() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let store = FilePreferences::open(&path).unwrap();
        store.set_reading_mode(NEWS, ReadingMode::Full).unwrap();

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.reading_mode(NEWS), ReadingMode::Full);
        assert_eq!(reopened.reading_mode(BLOG), ReadingMode::Summary);
    }

    #[test]
    fn file_store_reads_existing_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[ai]\napi_key = \"sk-x\"\n[speech]\nvolume = 0.5\n").unwrap();

        let store = FilePreferences::open(&path).unwrap();
        assert_eq!(store.ai_config().credential(), Some("sk-x"));
        assert_eq!(store.speech_settings().volume, 0.5);
        assert_eq!(store.path(), path.as_path());
    }
}
