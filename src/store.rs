// 🗄️ Key-Value Storage
// One string value per key; the registry keeps its whole collection under a single key.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Durable string storage addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// When the value under `key` was last written (RFC 3339, UTC)
    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let updated = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(updated)
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key {}", key))?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key {}", key))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_store(store: &mut dyn KeyValueStore) {
        assert_eq!(store.get("entries").unwrap(), None);

        store.set("entries", "[]").unwrap();
        assert_eq!(store.get("entries").unwrap().as_deref(), Some("[]"));

        store.set("entries", "[1]").unwrap();
        assert_eq!(store.get("entries").unwrap().as_deref(), Some("[1]"), "Set overwrites");

        store.remove("entries").unwrap();
        assert_eq!(store.get("entries").unwrap(), None);

        // Removing a missing key is not an error
        store.remove("entries").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise_store(&mut MemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_in_memory() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        exercise_store(&mut store);
    }

    #[test]
    fn test_sqlite_store_records_update_time() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.updated_at("entries").unwrap(), None);

        store.set("entries", "[]").unwrap();
        let stamp = store.updated_at("entries").unwrap().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parking.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("entries", r#"[{"owner":"Jane"}]"#).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("entries").unwrap().as_deref(),
            Some(r#"[{"owner":"Jane"}]"#)
        );
    }
}
