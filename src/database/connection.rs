//! SQLite handle for the local storage database.
//!
//! Opening a [`Database`] applies connection pragmas and brings the schema up
//! to date, so callers never see an unmigrated file.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use super::migrations;

/// How long a write waits on a lock held by another process before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Owned SQLite connection with the Cozy Hub schema applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database file at `path`.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` when the file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        debug!(path = %path.as_ref().display(), "opening local storage database");
        Self::prepare(Connection::open(path)?)
    }

    /// A private in-memory database, gone once dropped. Used by tests and the demo.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
