/*!
 * User preference store.
 *
 * Preferences live in a JSON document on disk. Every mutation persists the
 * document and then publishes the full snapshot on a watch channel, so
 * consumers can either read a current-value snapshot or subscribe to a
 * stream of updates. Dropping the receiver is the unsubscribe.
 */

use anyhow::{Context, Result};
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Built-in content API key used when no custom key is configured
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Default screen-saver delay: 3 minutes
pub const DEFAULT_SCREEN_SAVER_DELAY_SECS: u32 = 3 * 60;

/// Maximum number of remembered translation languages
const RECENT_LANGUAGES_CAP: usize = 5;

/// Default preferences filename under the user's data directory
const DEFAULT_PREFS_FILENAME: &str = "prefs.json";

/// Point-in-time view of all preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesSnapshot {
    /// Dark theme flag
    #[serde(default)]
    pub dark_theme: bool,

    /// Screen-saver activation delay in seconds
    #[serde(default = "default_screen_saver_delay")]
    pub screen_saver_delay_secs: u32,

    /// Keywords watched by the sync job for match notifications
    #[serde(default)]
    pub watched_keywords: BTreeSet<String>,

    /// Whether sync notifications are raised at all
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// Custom content API key override; None falls back to the built-in key
    #[serde(default)]
    pub api_key: Option<String>,

    /// App display language code; empty means system default
    #[serde(default)]
    pub app_language: String,

    /// Recently used translation target languages, most recent last
    #[serde(default)]
    pub recent_languages: Vec<String>,
}

fn default_screen_saver_delay() -> u32 {
    DEFAULT_SCREEN_SAVER_DELAY_SECS
}

fn default_true() -> bool {
    true
}

impl Default for PreferencesSnapshot {
    fn default() -> Self {
        Self {
            dark_theme: false,
            screen_saver_delay_secs: DEFAULT_SCREEN_SAVER_DELAY_SECS,
            watched_keywords: BTreeSet::new(),
            notifications_enabled: true,
            api_key: None,
            app_language: String::new(),
            recent_languages: Vec::new(),
        }
    }
}

impl PreferencesSnapshot {
    /// Effective content API key: custom override or the built-in default
    pub fn effective_api_key(&self) -> String {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => key.clone(),
            _ => DEFAULT_API_KEY.to_string(),
        }
    }
}

/// Preference store with snapshot reads and a subscription stream
pub struct Preferences {
    /// Backing file path
    path: PathBuf,
    /// Current state
    state: RwLock<PreferencesSnapshot>,
    /// Update broadcaster; receivers get the latest value plus updates
    tx: watch::Sender<PreferencesSnapshot>,
}

impl Preferences {
    /// Load preferences from the given path, falling back to defaults
    /// when the file does not exist yet
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse preferences file: {:?}", path))?
        } else {
            debug!("No preferences file at {:?}, using defaults", path);
            PreferencesSnapshot::default()
        };

        let (tx, _) = watch::channel(snapshot.clone());

        Ok(Self {
            path,
            state: RwLock::new(snapshot),
            tx,
        })
    }

    /// Load preferences from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    /// Default preferences path under the user's data directory
    pub fn default_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join("astropod").join(DEFAULT_PREFS_FILENAME))
    }

    /// Current-value snapshot
    pub fn snapshot(&self) -> PreferencesSnapshot {
        self.state.read().clone()
    }

    /// Subscribe to preference updates.
    ///
    /// The receiver yields the current snapshot first, then every
    /// subsequent update. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<PreferencesSnapshot> {
        self.tx.subscribe()
    }

    /// Effective content API key
    pub fn api_key(&self) -> String {
        self.state.read().effective_api_key()
    }

    /// Apply a mutation, persist it, and publish the new snapshot
    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut PreferencesSnapshot),
    {
        let snapshot = {
            let mut state = self.state.write();
            mutate(&mut state);
            state.clone()
        };

        self.persist(&snapshot)?;
        // send_replace never fails even with no subscribers
        self.tx.send_replace(snapshot);
        Ok(())
    }

    fn persist(&self, snapshot: &PreferencesSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preferences directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .context("Failed to serialize preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences file: {:?}", self.path))?;

        Ok(())
    }

    /// Set the dark theme flag
    pub fn set_dark_theme(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.dark_theme = enabled)
    }

    /// Set the screen-saver activation delay
    pub fn set_screen_saver_delay(&self, delay_secs: u32) -> Result<()> {
        self.update(|prefs| prefs.screen_saver_delay_secs = delay_secs)
    }

    /// Enable or disable sync notifications
    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.notifications_enabled = enabled)
    }

    /// Add a keyword to the watch set
    pub fn add_watched_keyword(&self, keyword: &str) -> Result<()> {
        let keyword = keyword.trim().to_string();
        self.update(|prefs| {
            if !keyword.is_empty() {
                prefs.watched_keywords.insert(keyword);
            }
        })
    }

    /// Remove a keyword from the watch set
    pub fn remove_watched_keyword(&self, keyword: &str) -> Result<()> {
        let keyword = keyword.trim().to_string();
        self.update(|prefs| {
            prefs.watched_keywords.remove(&keyword);
        })
    }

    /// Set or clear the custom API key; blank clears the override
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim().to_string();
        self.update(|prefs| {
            prefs.api_key = if api_key.is_empty() { None } else { Some(api_key) };
        })
    }

    /// Set the app display language code
    pub fn set_app_language(&self, language_code: &str) -> Result<()> {
        let code = language_code.trim().to_lowercase();
        self.update(|prefs| prefs.app_language = code)
    }

    /// Remember a translation target language, most recent last, capped
    pub fn add_recent_language(&self, language_code: &str) -> Result<()> {
        let code = language_code.trim().to_lowercase();
        self.update(|prefs| {
            if code.is_empty() {
                return;
            }
            prefs.recent_languages.retain(|existing| existing != &code);
            prefs.recent_languages.push(code);
            while prefs.recent_languages.len() > RECENT_LANGUAGES_CAP {
                prefs.recent_languages.remove(0);
            }
        })
    }
}
