//! Startup configuration
//!
//! Read once from `settings.json`:
//! ```json
//! {
//!   "firebase": { "apiKey": "...", "projectId": "...", ... },
//!   "advice": { "apiKey": "...", "model": "gemini-1.5-flash" },
//!   "dataDir": "/home/me/.smartfinance",
//!   "pollIntervalMs": 2000,
//!   "loadTimeoutMs": 10000
//! }
//! ```
//! Environment variables override the file. A missing file is not an error:
//! the defaults describe a fully local, offline setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Placeholder left in templates in place of a real API key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

pub const ENV_FIREBASE_API_KEY: &str = "SMARTFINANCE_FIREBASE_API_KEY";
pub const ENV_FIREBASE_PROJECT_ID: &str = "SMARTFINANCE_FIREBASE_PROJECT_ID";
pub const ENV_OFFLINE: &str = "SMARTFINANCE_OFFLINE";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY: &str = "API_KEY";

const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_LOAD_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ADVICE_MODEL: &str = "gemini-1.5-flash";

/// Credentials of the remote document backend (a Firebase web app config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    /// Firestore database id
    pub database_id: String,
    /// Collection holding one document per user
    pub collection: String,
}

impl RemoteConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Structurally valid: a real (non-placeholder) API key and a project id.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY && !self.project_id.trim().is_empty()
    }

    pub fn database(&self) -> &str {
        if self.database_id.is_empty() {
            "(default)"
        } else {
            &self.database_id
        }
    }

    pub fn user_collection(&self) -> &str {
        if self.collection.is_empty() {
            "users"
        } else {
            &self.collection
        }
    }
}

/// Settings for the financial-advice collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdviceConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ADVICE_MODEL.to_string(),
        }
    }
}

/// Process-wide configuration, established at startup and passed explicitly
/// to everything that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    #[serde(rename = "firebase")]
    pub remote: Option<RemoteConfig>,
    pub advice: AdviceConfig,
    /// Directory for file-backed local storage; in-memory when unset
    pub data_dir: Option<PathBuf>,
    /// How often the REST backend polls for remote changes
    pub poll_interval_ms: u64,
    /// How long a remote write waits for the session's first snapshot
    pub load_timeout_ms: u64,
    /// Force local mode even when remote credentials are present
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: None,
            advice: AdviceConfig::default(),
            data_dir: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
            offline: false,
        }
    }
}

impl AppConfig {
    /// Local-only configuration.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Configuration with remote credentials.
    pub fn with_remote(remote: RemoteConfig) -> Self {
        Self {
            remote: Some(remote),
            ..Self::default()
        }
    }

    /// Load `settings.json` from `path` and apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_json_str(&content)?
        } else {
            log::debug!("no settings file at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Invalid settings file: {e}")))
    }

    /// Apply overrides from an environment lookup.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_FIREBASE_API_KEY) {
            self.remote.get_or_insert_with(RemoteConfig::default).api_key = key;
        }
        if let Some(project) = lookup(ENV_FIREBASE_PROJECT_ID) {
            self.remote.get_or_insert_with(RemoteConfig::default).project_id = project;
        }
        match lookup(ENV_OFFLINE).as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => self.offline = true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => self.offline = false,
            _ => {}
        }
        if let Some(key) = lookup(ENV_GEMINI_API_KEY).or_else(|| lookup(ENV_API_KEY)) {
            if !key.trim().is_empty() {
                self.advice.api_key = Some(key);
            }
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}
