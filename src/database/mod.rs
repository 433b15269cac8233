//! Cozy Hub database layer.
//!
//! Provides SQLite connection management, schema migrations, and the
//! SQLite-backed local storage used by the persistence adapter.
//!
//! # Usage
//!
//! ```no_run
//! use cozyhub::database::{Database, SqliteStore};
//!
//! let db = Database::open("cozyhub.db").expect("failed to open database");
//! let store = SqliteStore::new(db);
//! ```

pub mod connection;
pub mod migrations;
pub mod sqlite_store;

pub use connection::Database;
pub use sqlite_store::SqliteStore;
