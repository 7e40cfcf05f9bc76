//! Local store: durable, synchronous persistence of one collection snapshot.

mod migrations;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::Story;

/// Storage key the snapshot lives under unless a store is built with another.
pub const DEFAULT_STORAGE_KEY: &str = "fanboard.stories";

/// Device-local persistence of the whole collection.
///
/// Implementations never hand out references into their own state; `load`
/// always returns a fresh copy.
pub trait LocalStore {
    /// Load the persisted collection.
    ///
    /// Missing or undecodable snapshots both yield an empty collection; a
    /// decode failure is logged, never returned.
    fn load(&self) -> Vec<Story>;

    /// Replace the persisted snapshot with `stories`.
    fn save(&mut self, stories: &[Story]) -> Result<()>;

    /// Whether any snapshot (decodable or not) is stored under the key.
    fn has_snapshot(&self) -> bool;
}

/// In-process store holding the serialized snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw snapshot payload, decodable or not.
    #[cfg(test)]
    pub(crate) fn with_raw_snapshot(raw: impl Into<String>) -> Self {
        Self {
            snapshot: Some(raw.into()),
        }
    }
}

impl LocalStore for MemoryStore {
    fn load(&self) -> Vec<Story> {
        self.snapshot
            .as_deref()
            .map(|raw| decode_snapshot(raw, "memory"))
            .unwrap_or_default()
    }

    fn save(&mut self, stories: &[Story]) -> Result<()> {
        self.snapshot = Some(encode_snapshot(stories)?);
        Ok(())
    }

    fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

pub(crate) fn encode_snapshot(stories: &[Story]) -> Result<String> {
    Ok(serde_json::to_string(stories)?)
}

pub(crate) fn decode_snapshot(raw: &str, source: &str) -> Vec<Story> {
    match serde_json::from_str::<Vec<Story>>(raw) {
        Ok(stories) => {
            tracing::debug!("Loaded {} stories from {source} store", stories.len());
            stories
        }
        Err(error) => {
            tracing::warn!("Discarding undecodable {source} snapshot: {error}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::story;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(store.load().is_empty());
        assert!(!store.has_snapshot());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let mut store = MemoryStore::new();
        store.save(&[story(1, 0), story(2, 0)]).unwrap();
        store.save(&[story(3, 4)]).unwrap();

        assert_eq!(store.load(), vec![story(3, 4)]);
        assert!(store.has_snapshot());
    }

    #[test]
    fn corrupt_snapshot_loads_as_empty() {
        let store = MemoryStore::with_raw_snapshot("{not json");
        assert!(store.has_snapshot());
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_returns_independent_copies() {
        let mut store = MemoryStore::new();
        store.save(&[story(1, 0)]).unwrap();

        let mut first = store.load();
        first[0].likes = 99;
        assert_eq!(store.load()[0].likes, 0);
    }
}
