//! Key-value storage for the history log.
//!
//! [`FileStore`] keeps one JSON file per key, [`MemoryStore`] lives for the
//! session only. [`FallbackStore`] wraps a primary store and switches to
//! memory on the first storage error, so a broken disk never blocks the UI.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::data::history::HistoryLog;
use crate::error::StorageError;

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ---------- File store ----------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------- Memory store ----------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.map.remove(key);
        Ok(())
    }
}

// ---------- Fallback ----------

/// Uses `primary` until it fails once, then memory for the rest of the session.
///
/// A failed read also degrades the store, so a record that could not be read
/// is never overwritten by a later write.
pub struct FallbackStore {
    primary: Option<Box<dyn KeyValueStore>>,
    read_failed: Cell<bool>,
    memory: MemoryStore,
}

impl FallbackStore {
    pub fn new(primary: Box<dyn KeyValueStore>) -> Self {
        Self {
            primary: Some(primary),
            read_failed: Cell::new(false),
            memory: MemoryStore::new(),
        }
    }

    pub fn memory_only() -> Self {
        Self {
            primary: None,
            read_failed: Cell::new(false),
            memory: MemoryStore::new(),
        }
    }

    /// `true` once the primary store has failed (or was never configured).
    pub fn is_degraded(&self) -> bool {
        self.primary.is_none() || self.read_failed.get()
    }

    fn degrade(&mut self, err: &StorageError) {
        log::warn!("storage error, keeping history in memory for this session: {err}");
        self.primary = None;
    }

    fn active_primary(&mut self) -> Option<&mut Box<dyn KeyValueStore>> {
        if self.read_failed.get() {
            self.primary = None;
        }
        self.primary.as_mut()
    }
}

impl KeyValueStore for FallbackStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.primary {
            Some(p) if !self.read_failed.get() => match p.get(key) {
                Ok(v) => Ok(v),
                Err(err) => {
                    log::warn!("storage read failed for {key}, keeping history in memory for this session: {err}");
                    self.read_failed.set(true);
                    self.memory.get(key)
                }
            },
            _ => self.memory.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(p) = self.active_primary() {
            match p.set(key, value) {
                Ok(()) => return Ok(()),
                Err(err) => self.degrade(&err),
            }
        }
        self.memory.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(p) = self.active_primary() {
            match p.remove(key) {
                Ok(()) => return Ok(()),
                Err(err) => self.degrade(&err),
            }
        }
        self.memory.remove(key)
    }
}

// ---------- History records ----------

/// Read the history under `key`. Missing or unreadable records give an empty log.
pub fn load_history(store: &dyn KeyValueStore, key: &str, capacity: usize) -> HistoryLog {
    match store.get(key) {
        Ok(Some(text)) => match HistoryLog::from_json(&text, capacity) {
            Ok(log) => {
                log::info!("loaded {} history entries", log.len());
                log
            }
            Err(e) => {
                log::warn!("ignoring malformed history record {key}: {e}");
                HistoryLog::new(capacity)
            }
        },
        Ok(None) => HistoryLog::new(capacity),
        Err(e) => {
            log::warn!("could not read history record {key}: {e}");
            HistoryLog::new(capacity)
        }
    }
}

pub fn save_history(store: &mut dyn KeyValueStore, key: &str, history: &HistoryLog) -> Result<(), StorageError> {
    let json = history.to_json()?;
    store.set(key, &json)
}
