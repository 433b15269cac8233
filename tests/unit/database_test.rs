//! Unit tests for the Cozy Hub database layer (connection, migrations, SQLite local storage).

use cozyhub::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use cozyhub::database::{Database, SqliteStore};
use cozyhub::storage::kv_store::KeyValueStore;
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_local_storage_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='local_storage'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "local_storage should exist after migrations");

    let has_byte_length: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('local_storage') WHERE name = 'byte_length'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(has_byte_length, "v2 migration should add byte_length");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    run_all(db.connection()).expect("second run should be a no-op");
    run_all(db.connection()).expect("third run should be a no-op");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_values_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cozyhub.db");
    {
        let store = SqliteStore::new(Database::open(&path).unwrap());
        store.set("bookmarkFolders", r#"{"rootBookmarks":[],"folders":[]}"#).unwrap();
    }
    let store = SqliteStore::new(Database::open(&path).unwrap());
    assert_eq!(
        store.get("bookmarkFolders").unwrap().as_deref(),
        Some(r#"{"rootBookmarks":[],"folders":[]}"#)
    );
}

#[test]
fn test_quota_counts_other_keys_only() {
    let store = SqliteStore::with_quota(Database::open_in_memory().unwrap(), 10);
    store.set("a", "12345").unwrap();
    // Overwriting the same key does not count its previous value.
    store.set("a", "1234567890").unwrap();
    assert!(store.set("b", "x").is_err());
    store.set("a", "123").unwrap();
    store.set("b", "1234567").unwrap();
}

#[test]
fn test_remove_missing_key_is_ok() {
    let store = SqliteStore::new(Database::open_in_memory().unwrap());
    assert!(store.remove("never-set").is_ok());
}
