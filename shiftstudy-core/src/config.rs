//! Configuration management
//!
//! settings.json in the data directory:
//! ```json
//! {
//!   "shiftstudy_preferences": { "audioEnabled": false, "audioVolume": 0.5 },
//!   "quoteApi": { "baseUrl": "https://api.quotable.io", "timeoutSecs": 10 }
//! }
//! ```
//! Fields this crate does not know about are kept when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::quotable::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::result::{Error, Result};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// Overrides the quote API base URL (CI/testing)
pub const QUOTE_URL_ENV: &str = "SHIFTSTUDY_QUOTE_URL";

/// Audio volume used when none is stored
pub const DEFAULT_AUDIO_VOLUME: f64 = 0.5;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, rename = "shiftstudy_preferences")]
    preferences: Preferences,
    #[serde(default)]
    quote_api: QuoteApiSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Audio preferences. Playback itself is not handled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub audio_enabled: bool,
    #[serde(default = "default_volume")]
    pub audio_volume: f64,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

fn default_volume() -> f64 {
    DEFAULT_AUDIO_VOLUME
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            audio_enabled: false,
            audio_volume: DEFAULT_AUDIO_VOLUME,
            other: HashMap::new(),
        }
    }
}

/// Remote quote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for QuoteApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// ShiftStudy configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub preferences: Preferences,
    /// Quote API settings as stored in the file
    pub quote_api: QuoteApiSettings,
    quote_url_override: Option<String>,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(&settings_path(data_dir))?;
        Ok(Self::from_settings(raw, std::env::var(QUOTE_URL_ENV).ok()))
    }

    fn from_settings(raw: SettingsFile, quote_url_override: Option<String>) -> Self {
        let mut preferences = raw.preferences;
        preferences.audio_volume = clamp_volume(preferences.audio_volume);

        Self {
            preferences,
            quote_api: raw.quote_api,
            quote_url_override: quote_url_override.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Save config to the data directory, keeping fields we don't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = settings_path(data_dir);
        let mut settings = read_settings(&path)?;

        settings.preferences.audio_enabled = self.preferences.audio_enabled;
        settings.preferences.audio_volume = self.preferences.audio_volume;
        settings.quote_api = self.quote_api.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Quote API settings with the environment override applied
    pub fn effective_quote_api(&self) -> QuoteApiSettings {
        match &self.quote_url_override {
            Some(url) => QuoteApiSettings {
                base_url: url.clone(),
                timeout_secs: self.quote_api.timeout_secs,
            },
            None => self.quote_api.clone(),
        }
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.preferences.audio_enabled = enabled;
    }

    /// Set the volume, clamped to 0.0..=1.0
    pub fn set_audio_volume(&mut self, volume: f64) {
        self.preferences.audio_volume = clamp_volume(volume);
    }

    pub fn set_quote_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Quote API URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        self.quote_api.base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn set_quote_timeout(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            return Err(Error::Config("Quote API timeout must be at least 1 second".into()));
        }
        self.quote_api.timeout_secs = secs;
        Ok(())
    }
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILENAME)
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        DEFAULT_AUDIO_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_settings(read_settings(&settings_path(dir.path())).unwrap(), None);

        assert!(!config.preferences.audio_enabled);
        assert_eq!(config.preferences.audio_volume, 0.5);
        assert_eq!(config.quote_api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.quote_api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.set_audio_enabled(true);
        config.set_audio_volume(0.8);
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert!(reloaded.preferences.audio_enabled);
        assert_eq!(reloaded.preferences.audio_volume, 0.8);
    }

    #[test]
    fn test_file_uses_preferences_namespace() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set_audio_enabled(true);
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILENAME)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["shiftstudy_preferences"]["audioEnabled"], true);
        assert_eq!(json["quoteApi"]["timeoutSecs"], 10);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut config = Config::default();
        config.set_audio_volume(1.7);
        assert_eq!(config.preferences.audio_volume, 1.0);
        config.set_audio_volume(-0.2);
        assert_eq!(config.preferences.audio_volume, 0.0);
        config.set_audio_volume(f64::NAN);
        assert_eq!(config.preferences.audio_volume, DEFAULT_AUDIO_VOLUME);
    }

    #[test]
    fn test_out_of_range_volume_in_file_is_clamped() {
        let raw: SettingsFile =
            serde_json::from_str(r#"{"shiftstudy_preferences": {"audioVolume": 3.0}}"#).unwrap();
        let config = Config::from_settings(raw, None);
        assert_eq!(config.preferences.audio_volume, 1.0);
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"theme": "dark", "shiftstudy_preferences": {"audioEnabled": false, "ringtone": "bell"}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.set_audio_enabled(true);
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILENAME)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["shiftstudy_preferences"]["ringtone"], "bell");
        assert_eq!(json["shiftstudy_preferences"]["audioEnabled"], true);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "{ not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.preferences.audio_enabled);
    }

    #[test]
    fn test_quote_url_override() {
        let config = Config::from_settings(
            SettingsFile::default(),
            Some("http://127.0.0.1:9999".to_string()),
        );
        assert_eq!(config.effective_quote_api().base_url, "http://127.0.0.1:9999");
        assert_eq!(config.quote_api.base_url, DEFAULT_BASE_URL);

        let blank = Config::from_settings(SettingsFile::default(), Some("  ".to_string()));
        assert_eq!(blank.effective_quote_api().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_quote_settings_validation() {
        let mut config = Config::default();
        assert!(config.set_quote_base_url("ftp://example.com").is_err());
        config.set_quote_base_url("https://quotes.example.com/").unwrap();
        assert_eq!(config.quote_api.base_url, "https://quotes.example.com");

        assert!(config.set_quote_timeout(0).is_err());
        config.set_quote_timeout(3).unwrap();
        assert_eq!(config.effective_quote_api().timeout_secs, 3);
    }
}
