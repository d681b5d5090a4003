//! Persisted client state

mod history;
mod kv;

pub use history::{HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
