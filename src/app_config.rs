use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Local database path; defaults to the user data directory when unset
    #[serde(default)]
    pub database_path: Option<String>,

    /// Preferences file path; defaults to the user data directory when unset
    #[serde(default)]
    pub preferences_path: Option<String>,

    /// Content endpoint base URL
    #[serde(default = "default_content_endpoint")]
    pub content_endpoint: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Sync config
    #[serde(default)]
    pub sync: SyncConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation defaults
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Target language used when the CLI does not specify one
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_target_language: default_target_language(),
        }
    }
}

/// Background sync settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Hours between sync runs
    #[serde(default = "default_sync_period_hours")]
    pub period_hours: u64,

    /// Seconds between scheduler due-checks
    #[serde(default = "default_sync_poll_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            period_hours: default_sync_period_hours(),
            poll_interval_secs: default_sync_poll_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_content_endpoint() -> String {
    crate::apod::client::DEFAULT_BASE_URL.to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_sync_period_hours() -> u64 {
    24
}

fn default_sync_poll_secs() -> u64 {
    300
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.content_endpoint)
            .map_err(|e| anyhow!("Invalid content endpoint '{}': {}", self.content_endpoint, e))?;

        if !crate::language_utils::is_valid_code(&self.translation.default_target_language) {
            return Err(anyhow!(
                "Invalid default target language: {}",
                self.translation.default_target_language
            ));
        }

        if self.sync.period_hours == 0 {
            return Err(anyhow!("Sync period must be at least one hour"));
        }
        if self.sync.poll_interval_secs == 0 {
            return Err(anyhow!("Sync poll interval must be at least one second"));
        }

        Ok(())
    }

    /// Load the configuration file, or create a default one if missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
            Ok(config)
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            preferences_path: None,
            content_endpoint: default_content_endpoint(),
            translation: TranslationConfig::default(),
            sync: SyncConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
