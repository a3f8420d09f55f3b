//! Persistent key/value storage for the session pair.
//!
//! Mirrors browser local storage: string keys to string values. Writes and
//! removals take several entries at once so the token and the user record
//! always change together.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::{ClientError, ClientResult};

/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the JSON-encoded session user.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key/value store surviving page loads.
pub trait SessionStorage: Send + Sync {
    /// Read one entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Write all entries in one step.
    fn set_all(&self, entries: &[(&str, &str)]) -> ClientResult<()>;

    /// Remove all keys in one step. Missing keys are not an error.
    fn remove_all(&self, keys: &[&str]) -> ClientResult<()>;
}

/// Process-local storage, for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> ClientResult<()> {
        let mut map = self.entries();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        let mut map = self.entries();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Storage backed by a JSON object on disk.
///
/// Every write replaces the file through a temporary sibling and a rename,
/// so readers see either the old or the new set of entries.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> ClientResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("Failed to read session file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ClientError::Storage(format!("Failed to parse session file: {}", e)))
    }

    fn write_map(&self, map: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let contents =
            serde_json::to_string_pretty(map).map_err(|e| ClientError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents).map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<String, String>)) -> ClientResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // A corrupt file is replaced rather than blocking every write
        let mut map = self.read_map().unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "Discarding unreadable session file");
            HashMap::new()
        });
        apply(&mut map);
        self.write_map(&map)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(error = %e, "Session file unreadable");
                None
            }
        }
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> ClientResult<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
