//! App Core for Cozy Hub.
//!
//! Central struct holding the bookmark store, the drag engine and the
//! settings, wired together at startup.

use tracing::{info, warn};

use crate::database::{Database, SqliteStore};
use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::drag_manager::{DragEngine, Orientation};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::sync_adapter::BitSyncAdapter;
use crate::storage::persistence::PersistenceAdapter;

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub store: BookmarkStore<SqliteStore>,
    pub drag: DragEngine,
    pub bits: BitSyncAdapter,
}

impl App {
    /// Creates a new App with the local storage database at `db_path` and
    /// settings from the platform config directory.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(db_path, None)
    }

    /// Like [`App::new`], with an explicit settings file.
    pub fn open(db_path: &str, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "settings unreadable, using defaults");
        }
        let storage = settings_engine.get_settings().storage.clone();

        let db = Database::open(db_path)?;
        let persistence = PersistenceAdapter::new(SqliteStore::new(db), &storage);
        let store = BookmarkStore::open(persistence);
        info!(db_path, folders = store.tree().folders.len(), "app started");

        Ok(Self {
            settings_engine,
            store,
            drag: DragEngine::new(Orientation::Vertical),
            bits: BitSyncAdapter::default(),
        })
    }
}
