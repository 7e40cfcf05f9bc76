//! `SQLite`-backed local store

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{decode_snapshot, encode_snapshot, migrations, LocalStore, DEFAULT_STORAGE_KEY};
use crate::error::Result;
use crate::models::Story;
use crate::util::unix_millis_now;

/// Collection snapshot kept in a single row of a `SQLite` key-value table.
pub struct SqliteStore {
    conn: Connection,
    key: String,
}

impl SqliteStore {
    /// Open a store at the given path, creating the file if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(mut conn: Connection) -> Result<Self> {
        // WAL is unavailable for in-memory databases; ignore the refusal.
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        migrations::run(&mut conn)?;
        Ok(Self {
            conn,
            key: DEFAULT_STORAGE_KEY.to_string(),
        })
    }

    /// Use a different storage key for the snapshot row
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_raw(&self) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Write a raw payload under the key, bypassing encoding.
    #[cfg(test)]
    fn write_raw(&self, raw: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.key, raw, unix_millis_now()],
        )?;
        Ok(())
    }
}

impl LocalStore for SqliteStore {
    fn load(&self) -> Vec<Story> {
        match self.read_raw() {
            Ok(Some(raw)) => decode_snapshot(&raw, "sqlite"),
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!("Failed to read local snapshot '{}': {error}", self.key);
                Vec::new()
            }
        }
    }

    fn save(&mut self, stories: &[Story]) -> Result<()> {
        let payload = encode_snapshot(stories)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.key, payload, unix_millis_now()],
        )?;
        tx.commit()?;
        tracing::debug!("Saved {} stories to local store", stories.len());
        Ok(())
    }

    fn has_snapshot(&self) -> bool {
        matches!(self.read_raw(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::story;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
        assert!(!store.has_snapshot());
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_returns_collection() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save(&[story(2, 1), story(1, 0)]).unwrap();

        assert_eq!(store.load(), vec![story(2, 1), story(1, 0)]);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("board.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save(&[story(10, 3)]).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.has_snapshot());
        assert_eq!(reopened.load(), vec![story(10, 3)]);
    }

    #[test]
    fn keys_are_independent() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("board.db");

        let mut first = SqliteStore::open(&path).unwrap();
        first.save(&[story(1, 0)]).unwrap();

        let second = SqliteStore::open(&path).unwrap().with_key("other");
        assert!(!second.has_snapshot());
        assert!(second.load().is_empty());
    }

    #[test]
    fn corrupt_snapshot_loads_as_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.write_raw("[{\"id\": ").unwrap();

        assert!(store.has_snapshot());
        assert!(store.load().is_empty());
    }
}
