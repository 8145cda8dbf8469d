//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist string values in the single `kv_store` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - One row per key; writes are upserts.
//! - Rows that do not hold UTF-8 text are reported, never rewritten.

use super::{KeyValueStore, StorageResult};
use crate::db::{open_db, open_db_in_memory, DbError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value store over a migrated SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| match err {
                rusqlite::Error::InvalidColumnType(_, _, column_type)
                | rusqlite::Error::FromSqlConversionFailure(_, column_type, _) => {
                    DbError::UnreadableValue {
                        key: key.to_string(),
                        column_type: column_type.to_string(),
                    }
                }
                other => DbError::Sqlite(other),
            })?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        debug!("event=kv_remove module=storage status=ok key={key} removed={removed}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::db::DbError;
    use crate::storage::{KeyValueStore, StorageError};

    #[test]
    fn set_overwrites_existing_value() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("notes", "[]").unwrap();
        store.set("notes", "[{}]").unwrap();
        assert_eq!(store.get("notes").unwrap().as_deref(), Some("[{}]"));

        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn blob_value_is_reported_as_unreadable() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES ('notes', CAST('[]' AS BLOB), 0);",
                [],
            )
            .unwrap();

        let err = store.get("notes").unwrap_err();
        assert!(matches!(
            err,
            StorageError::Db(DbError::UnreadableValue { ref key, .. }) if key == "notes"
        ));
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.remove("notes").unwrap();
        assert_eq!(store.get("notes").unwrap(), None);
    }
}
