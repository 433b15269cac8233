//! [`KeyValueStore`] backed by the `local_storage` table.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use super::connection::Database;
use crate::storage::kv_store::KeyValueStore;
use crate::types::errors::StorageError;

/// Local storage on top of SQLite, with an optional byte quota.
pub struct SqliteStore {
    db: Database,
    quota: Option<usize>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db, quota: None }
    }

    pub fn with_quota(db: Database, bytes: usize) -> Self {
        Self { db, quota: Some(bytes) }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn used_excluding(&self, key: &str) -> Result<usize, StorageError> {
        let used: i64 = self.db.connection().query_row(
            "SELECT COALESCE(SUM(byte_length), 0) FROM local_storage WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as usize)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_excluding(key)?);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    available,
                });
            }
        }
        self.db.connection().execute(
            "INSERT INTO local_storage (key, value, updated_at, byte_length) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                 updated_at = excluded.updated_at, byte_length = excluded.byte_length",
            params![key, value, Self::now(), value.len() as i64],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db
            .connection()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}
