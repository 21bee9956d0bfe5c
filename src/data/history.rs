//! Newest-first log of settled functions.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// One remembered session. Field names match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub func: String,
    #[serde(default)]
    pub guided_mode: bool,
    /// Unix time in milliseconds.
    #[serde(default)]
    pub last_saved: Option<i64>,
}

impl HistoryEntry {
    /// Local timestamp for display, e.g. `2026-10-14 09:30:00`.
    pub fn saved_label(&self) -> String {
        self.last_saved
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unsaved".to_string())
    }
}

/// Bounded list, newest first, with at most one entry per `func`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build from stored entries, re-applying the dedup and capacity rules.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for e in entries.into_iter().rev() {
            log.record(e);
        }
        log
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Put `entry` at the front, dropping an older entry with the same `func`
    /// and anything past the capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.func != entry.func);
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
    }

    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn from_json(text: &str, capacity: usize) -> Result<Self, serde_json::Error> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(text)?;
        Ok(Self::from_entries(entries, capacity))
    }
}
