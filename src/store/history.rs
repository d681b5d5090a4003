//! Bounded, most-recent-first query history

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::domain::HistoryEntry;

/// Namespaced key holding the JSON-encoded history list
pub const HISTORY_KEY: &str = "taraxa-query-history";

/// Maximum number of remembered queries
pub const HISTORY_CAPACITY: usize = 10;

pub struct HistoryStore {
    backend: Box<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Wrap a backend and load whatever it already holds
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            backend,
            entries: Vec::new(),
        };
        store.entries = store.load();
        store
    }

    /// Read the persisted list.
    ///
    /// Missing, unreadable or malformed data yields an empty list.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let raw = match self.backend.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %format!("{:#}", err), "history unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(HISTORY_CAPACITY);
                debug!(count = entries.len(), "history loaded");
                entries
            }
            Err(err) => {
                warn!(error = %err, "persisted history is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Insert `entry` at the front, dropping any entry with the same literal
    /// address and anything past capacity, then persist the full list.
    ///
    /// The in-memory list is updated even when persisting fails.
    pub fn upsert(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.retain(|existing| existing.address != entry.address);
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// First `limit` entries, most recent first
    pub fn list(&self, limit: usize) -> &[HistoryEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.backend
            .remove(HISTORY_KEY)
            .context("Failed to clear persisted history")
    }

    /// Hand the backend back, e.g. to reopen it in tests
    pub fn into_backend(self) -> Box<dyn KeyValueStore> {
        self.backend
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.entries).context("Failed to encode history")?;
        self.backend
            .set(HISTORY_KEY, &json)
            .context("Failed to persist history")
    }
}
