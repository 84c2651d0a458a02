//! Key-value store adapters.
//!
//! Both adapters implement [`KeyValueStore`]. [`InMemoryKeyValueStore`] backs
//! tests and ephemeral sessions; [`JsonFileKeyValueStore`] persists a single
//! JSON document on disk, loaded once on open and written through on every
//! mutation, matching the tab-global last-write-wins storage the client runs
//! against.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Volatile store over a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock leaves plain map data in a
        // consistent-enough state to keep serving.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Durable store persisting every entry into one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileKeyValueStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// A missing file starts the store empty; it is created on the first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Io`] when an existing file cannot be
    /// read and [`KeyValueStoreError::Serialization`] when its contents are
    /// not a JSON string map.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KeyValueStoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|error| KeyValueStoreError::serialization(error.to_string()))?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(KeyValueStoreError::io(error.to_string())),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), KeyValueStoreError> {
        let document = serde_json::to_string(entries)
            .map_err(|error| KeyValueStoreError::serialization(error.to_string()))?;
        fs::write(&self.path, document).map_err(|error| KeyValueStoreError::io(error.to_string()))
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let mut entries = self.lock();
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            return self.flush(&entries);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
