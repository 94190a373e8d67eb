//! SQLite-backed key/value store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{KvStore, StoreError};

/// SQLite-backed key/value store.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT value FROM kv WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteKvStore {
        SqliteKvStore::in_memory().unwrap()
    }

    #[test]
    fn test_get_missing_key() {
        let store = create_test_store();
        let result = store.get("credentials/translation").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_set_and_get() {
        let store = create_test_store();

        store.set("credentials/translation", r#"[{"id":"a"}]"#).unwrap();
        let value = store.get("credentials/translation").unwrap();

        assert_eq!(value.as_deref(), Some(r#"[{"id":"a"}]"#));
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let store = create_test_store();

        store.set("credentials/translation", "[]").unwrap();
        store.set("credentials/translation", r#"[{"id":"b"}]"#).unwrap();

        let value = store.get("credentials/translation").unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"b"}]"#));
    }

    #[test]
    fn test_keys_are_independent() {
        let store = create_test_store();

        store.set("credentials/translation", "[1]").unwrap();
        store.set("credentials/speech-synthesis", "[2]").unwrap();

        assert_eq!(
            store.get("credentials/translation").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(
            store.get("credentials/speech-synthesis").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("overdub.db");

        let store = SqliteKvStore::new(&db_path).unwrap();
        store.set("credentials/translation", "[]").unwrap();

        // Verify file was created
        assert!(db_path.exists());

        // Reopen and verify the value survived
        drop(store);
        let reopened = SqliteKvStore::new(&db_path).unwrap();
        assert_eq!(
            reopened.get("credentials/translation").unwrap().as_deref(),
            Some("[]")
        );
    }
}
