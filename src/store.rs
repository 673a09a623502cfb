use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create store directory: {0}")]
    DirectoryError(String),
}

/// The shared remote store, reduced to the two operations the sync engine
/// needs: read one slot, overwrite one slot. Implementations provide
/// read-after-write visibility; there are no transactions and no locking,
/// so concurrent writers race and the last write wins.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Key-value store backed by a SQLite file, typically on a shared path so
/// every client sees the same slot.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store file and initialize the schema
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let store = SqliteStore { conn };
        store.initialize_schema()?;

        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(rusqlite::params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = crate::utils::now_timestamp();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared").join("logs.db");
        let store = SqliteStore::new(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn get_absent_key_returns_none() {
        let (_dir, store) = test_store();
        assert_eq!(store.get("facility_logs").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, store) = test_store();
        store.set("facility_logs", "[]").unwrap();
        assert_eq!(store.get("facility_logs").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let (_dir, store) = test_store();
        store.set("facility_logs", "old").unwrap();
        store.set("facility_logs", "new").unwrap();
        assert_eq!(store.get("facility_logs").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn keys_are_independent() {
        let (_dir, store) = test_store();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn reopening_the_file_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs.db");
        let path_str = path.to_str().unwrap();
        {
            let store = SqliteStore::new(path_str).unwrap();
            store.set("facility_logs", "persisted").unwrap();
        }
        let store = SqliteStore::new(path_str).unwrap();
        assert_eq!(
            store.get("facility_logs").unwrap().as_deref(),
            Some("persisted")
        );
    }
}
