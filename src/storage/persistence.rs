//! Persistence adapter: mirrors the bookmark tree and the bookmarked-bit
//! list into a [`KeyValueStore`] as UTF-8 JSON.
//!
//! Loading never fails: a missing or unparsable value falls back to the seed
//! tree. Saving reports failures as a [`PersistenceWarning`] for the caller to
//! surface; it never rolls anything back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::storage::kv_store::KeyValueStore;
use crate::types::bit::BookmarkedBit;
use crate::types::bookmark::BookmarkTree;
use crate::types::errors::{PersistenceWarning, StorageError};
use crate::types::settings::StorageSettings;

/// Where a loaded tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOrigin {
    Stored,
    /// Nothing stored under the tree key yet.
    Seeded,
    /// A value exists but could not be read or parsed; it is left in place.
    Unreadable,
}

/// JSON mirror of the bookmark data in a key-value store.
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
    tree_key: String,
    toggles_key: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, settings: &StorageSettings) -> Self {
        Self {
            store,
            tree_key: settings.tree_key.clone(),
            toggles_key: settings.toggles_key.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tree_key(&self) -> &str {
        &self.tree_key
    }

    /// Returns the stored tree, or the seed tree when nothing usable is stored.
    pub fn load(&self) -> BookmarkTree {
        self.load_tree().0
    }

    /// Like [`load`](Self::load), also telling where the tree came from.
    pub fn load_tree(&self) -> (BookmarkTree, TreeOrigin) {
        let raw = match self.store.get(&self.tree_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no stored bookmark tree, using seed tree");
                return (BookmarkTree::seed(now()), TreeOrigin::Seeded);
            }
            Err(e) => {
                warn!(key = %self.tree_key, error = %e, "failed to read stored tree, using seed tree");
                return (BookmarkTree::seed(now()), TreeOrigin::Unreadable);
            }
        };
        match serde_json::from_str::<BookmarkTree>(&raw) {
            Ok(tree) => {
                info!(folders = tree.folders.len(), bookmarks = tree.bookmark_count(), "bookmark tree loaded");
                (tree, TreeOrigin::Stored)
            }
            Err(e) => {
                warn!(key = %self.tree_key, error = %e, "stored tree is malformed, using seed tree");
                (BookmarkTree::seed(now()), TreeOrigin::Unreadable)
            }
        }
    }

    pub fn save(&self, tree: &BookmarkTree) -> Result<(), PersistenceWarning> {
        self.write(&self.tree_key, tree)
    }

    /// Returns the stored bookmarked-bit list, empty when absent or unreadable.
    pub fn load_bookmarked_bits(&self) -> Vec<BookmarkedBit> {
        self.read(&self.toggles_key).unwrap_or_default()
    }

    pub fn save_bookmarked_bits(&self, bits: &[BookmarkedBit]) -> Result<(), PersistenceWarning> {
        self.write(&self.toggles_key, &bits)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is malformed, treating as absent");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceWarning> {
        let warning = |source| PersistenceWarning {
            key: key.to_string(),
            source,
        };
        let json = serde_json::to_string(value)
            .map_err(|e| warning(StorageError::Serialization(e.to_string())))?;
        self.store.set(key, &json).map_err(warning)
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
