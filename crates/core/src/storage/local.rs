use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;

/// Prefix applied to every key written to device storage.
pub const KEY_PREFIX: &str = "finance_app_";

pub const USER_KEY: &str = "user";
pub const LUCKY_DRAW_KEY: &str = "lucky_draw";

/// Full storage key for a logical key (`accounts` → `finance_app_accounts`).
pub fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Raw string key/value storage on the device.
///
/// Implementations receive already-namespaced keys.
pub trait LocalStore: Send + Sync {
    /// Human-readable name of this store (for logs).
    fn name(&self) -> &str;

    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Typed, namespaced access to a [`LocalStore`].
#[derive(Clone)]
pub struct LocalAdapter {
    store: Arc<dyn LocalStore>,
}

impl LocalAdapter {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Serialize `value` as JSON and write it under `finance_app_<key>`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode '{key}': {e}")))?;
        self.store.write(&namespaced(key), &json)?;
        log::debug!("saved '{key}' to {}", self.store.name());
        Ok(())
    }

    /// Read `finance_app_<key>`. Returns `default` when the key is missing,
    /// unreadable, or holds data that does not decode as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.read(&namespaced(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                log::warn!("could not read '{key}' from {}: {e}", self.store.name());
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("stored '{key}' is corrupt, using default: {e}");
                default
            }
        }
    }
}

impl std::fmt::Debug for LocalAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAdapter")
            .field("store", &self.store.name())
            .finish()
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for MemoryLocalStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── File store ──────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a data directory.
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(CoreError::ValidationError(format!(
                "Invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStore for FileLocalStore {
    fn name(&self) -> &str {
        "file"
    }

    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write-then-rename: readers never see a partial value.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
