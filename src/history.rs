//! Race history log
//!
//! Persisted to the key-value store, keeps the 20 most recent races.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::{load_json, save_json};

/// Maximum number of races to keep
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// A finished race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceHistoryEntry {
    /// Unique id (finish time in epoch ms)
    pub id: String,
    /// Local finish time for display
    #[serde(rename = "date")]
    pub timestamp_display: String,
    /// Everyone who raced, in lane order
    #[serde(rename = "foods")]
    pub participant_labels: Vec<String>,
    #[serde(rename = "winner")]
    pub winner_label: String,
    /// Race time (ms)
    #[serde(rename = "duration")]
    pub duration_ms: f64,
}

/// Newest-first history backed by a key-value store
pub struct RaceHistory {
    entries: Vec<RaceHistoryEntry>,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for RaceHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceHistory")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RaceHistory {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "duck_race_history";

    /// Load the log; missing, unreadable or corrupt data gives an empty log
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match load_json::<Vec<RaceHistoryEntry>>(store.as_ref(), Self::STORAGE_KEY) {
            Ok(Some(mut entries)) => {
                entries.truncate(MAX_HISTORY_ENTRIES);
                log::info!("Loaded {} past races", entries.len());
                entries
            }
            Ok(None) => {
                log::info!("No race history found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Ignoring stored race history: {e}");
                Vec::new()
            }
        };
        Self { entries, store }
    }

    /// Newest first
    pub fn entries(&self) -> &[RaceHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent race, if any
    pub fn latest(&self) -> Option<&RaceHistoryEntry> {
        self.entries.first()
    }

    /// An id based on `epoch_ms` that no kept entry uses yet
    pub fn unique_id(&self, epoch_ms: f64) -> String {
        let base = format!("{}", epoch_ms.max(0.0) as u64);
        if !self.contains_id(&base) {
            return base;
        }
        let mut n = 1;
        loop {
            let id = format!("{base}-{n}");
            if !self.contains_id(&id) {
                return id;
            }
            n += 1;
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Prepend a race, evict past the cap, and persist
    pub fn append(&mut self, entry: RaceHistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.save();
    }

    /// Forget every race, in memory and in storage
    pub fn clear(&mut self) {
        self.entries.clear();
        match self.store.remove_item(Self::STORAGE_KEY) {
            Ok(()) => log::info!("Race history cleared"),
            Err(e) => log::warn!("Race history not removed from storage: {e}"),
        }
    }

    fn save(&mut self) {
        match save_json(self.store.as_mut(), Self::STORAGE_KEY, &self.entries) {
            Ok(()) => log::debug!("Race history saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Race history not saved: {e}"),
        }
    }
}
