//! Bookmark Store: the explicit store object handed to whatever needs the tree.
//!
//! Wraps the in-memory [`BookmarkManager`] and a [`PersistenceAdapter`] with a
//! write-through policy: every successful mutation is saved immediately. A
//! failed save is queued as a [`PersistenceWarning`] and logged; the mutation
//! stands and the in-memory tree stays authoritative for the session.

use tracing::{debug, warn};

use crate::managers::bit_toggle_manager::BitToggleManager;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::drag_manager::DropAction;
use crate::services::sync_adapter::{RemoteDataService, SyncAdapter};
use crate::storage::kv_store::KeyValueStore;
use crate::storage::persistence::{PersistenceAdapter, TreeOrigin};
use crate::types::bit::BitRecord;
use crate::types::bookmark::{
    BookmarkFolder, BookmarkItem, BookmarkPatch, BookmarkTree, Breadcrumb, NewBookmark,
};
use crate::types::errors::{BookmarkError, PersistenceWarning};

pub struct BookmarkStore<S: KeyValueStore> {
    manager: BookmarkManager,
    toggles: BitToggleManager,
    persistence: PersistenceAdapter<S>,
    warnings: Vec<PersistenceWarning>,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    /// Reads the tree and the bookmarked-bit list once, at startup.
    ///
    /// A freshly seeded tree is saved right away so its folder ids stay stable
    /// across restarts. An unreadable stored value is left alone until the
    /// next mutation overwrites it.
    pub fn open(persistence: PersistenceAdapter<S>) -> Self {
        let (tree, origin) = persistence.load_tree();
        let toggles = BitToggleManager::new(persistence.load_bookmarked_bits());
        let mut store = Self {
            manager: BookmarkManager::new(tree),
            toggles,
            persistence,
            warnings: Vec::new(),
        };
        if origin == TreeOrigin::Seeded {
            debug!("saving seed tree");
            let result = store.persistence.save(store.manager.tree());
            store.note(result);
        }
        store
    }

    pub fn tree(&self) -> &BookmarkTree {
        self.manager.tree()
    }

    pub fn manager(&self) -> &BookmarkManager {
        &self.manager
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn toggles(&self) -> &BitToggleManager {
        &self.toggles
    }

    /// Drains the persistence warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<PersistenceWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn note(&mut self, result: Result<(), PersistenceWarning>) {
        if let Err(w) = result {
            warn!(key = %w.key, error = %w.source, "persistence write failed, keeping in-memory state");
            self.warnings.push(w);
        }
    }

    /// Saves the tree, and the toggle list when mirrored bookmarks disappeared.
    fn persist(&mut self) {
        let tree_result = self.persistence.save(self.manager.tree());
        self.note(tree_result);

        let tree = self.manager.tree();
        if self.toggles.retain_existing(|id| tree.locate_bookmark(id).is_some()) {
            let toggles_result = self.persistence.save_bookmarked_bits(self.toggles.entries());
            self.note(toggles_result);
        }
    }

    fn write_through<T>(
        &mut self,
        op: impl FnOnce(&mut BookmarkManager) -> Result<T, BookmarkError>,
    ) -> Result<T, BookmarkError> {
        let value = op(&mut self.manager)?;
        self.persist();
        Ok(value)
    }

    /// Commits a finished drag gesture. Returns false for `DropAction::None`.
    pub fn apply_drop(&mut self, action: &DropAction) -> Result<bool, BookmarkError> {
        debug!(?action, "applying drop");
        match action {
            DropAction::None => Ok(false),
            DropAction::ReorderBookmark { id, folder_id, to_index } => {
                self.move_bookmark(id, folder_id.as_deref(), *to_index)?;
                Ok(true)
            }
            DropAction::MoveBookmark { id, target_folder_id, to_index } => {
                self.move_bookmark(id, target_folder_id.as_deref(), *to_index)?;
                Ok(true)
            }
            DropAction::ReorderFolder { id, to_index } => {
                self.reorder_folder(id, *to_index)?;
                Ok(true)
            }
            DropAction::MoveFolder { id, new_parent_id } => {
                self.move_folder(id, new_parent_id.as_deref())?;
                Ok(true)
            }
        }
    }

    /// Bookmarks or un-bookmarks a bit. Returns whether the bit is bookmarked afterwards.
    ///
    /// Un-bookmarking removes the mirrored bookmark by its stored id only.
    pub fn toggle_bit<A>(&mut self, adapter: &A, bit: &A::Remote) -> Result<bool, BookmarkError>
    where
        A: SyncAdapter,
    {
        let bit_id = adapter.remote_id(bit).to_string();
        let bookmarked = if let Some(bookmark_id) = self.toggles.forget(&bit_id) {
            match self.manager.delete_bookmark(&bookmark_id) {
                Ok(_) | Err(BookmarkError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            false
        } else {
            let input = adapter.to_local(bit)?;
            let bookmark_id = self.manager.create_bookmark(None, input)?;
            self.toggles.record(&bit_id, &bookmark_id);
            true
        };

        let tree_result = self.persistence.save(self.manager.tree());
        self.note(tree_result);
        let toggles_result = self.persistence.save_bookmarked_bits(self.toggles.entries());
        self.note(toggles_result);
        debug!(bit_id = %bit_id, bookmarked, "bit toggled");
        Ok(bookmarked)
    }

    /// Fetches the user's bits and pairs each with its bookmarked state.
    pub fn list_bits<R: RemoteDataService>(
        &self,
        service: &R,
        user_id: &str,
    ) -> Result<Vec<(BitRecord, bool)>, R::Error> {
        Ok(service
            .fetch_bits(user_id)?
            .into_iter()
            .map(|bit| {
                let bookmarked = self.toggles.is_bookmarked(&bit.id);
                (bit, bookmarked)
            })
            .collect())
    }
}

impl<S: KeyValueStore> BookmarkManagerTrait for BookmarkStore<S> {
    fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String, BookmarkError> {
        self.write_through(|m| m.create_folder(name, parent_id))
    }

    fn rename_folder(&mut self, id: &str, name: &str, description: Option<&str>) -> Result<(), BookmarkError> {
        self.write_through(|m| m.rename_folder(id, name, description))
    }

    fn create_bookmark(&mut self, folder_id: Option<&str>, input: NewBookmark) -> Result<String, BookmarkError> {
        self.write_through(|m| m.create_bookmark(folder_id, input))
    }

    fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> Result<(), BookmarkError> {
        self.write_through(|m| m.update_bookmark(id, patch))
    }

    fn move_bookmark(&mut self, id: &str, target_folder_id: Option<&str>, target_index: usize) -> Result<(), BookmarkError> {
        self.write_through(|m| m.move_bookmark(id, target_folder_id, target_index))
    }

    fn move_folder(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<(), BookmarkError> {
        self.write_through(|m| m.move_folder(id, new_parent_id))
    }

    fn reorder_folder(&mut self, id: &str, target_index: usize) -> Result<(), BookmarkError> {
        self.write_through(|m| m.reorder_folder(id, target_index))
    }

    fn delete_bookmark(&mut self, id: &str) -> Result<BookmarkItem, BookmarkError> {
        self.write_through(|m| m.delete_bookmark(id))
    }

    fn delete_folder(&mut self, id: &str) -> Result<(), BookmarkError> {
        self.write_through(|m| m.delete_folder(id))
    }

    fn list_breadcrumbs(&self, folder_id: Option<&str>) -> Result<Vec<Breadcrumb>, BookmarkError> {
        self.manager.list_breadcrumbs(folder_id)
    }

    fn list_bookmarks(&self, folder_id: Option<&str>) -> Result<Vec<BookmarkItem>, BookmarkError> {
        self.manager.list_bookmarks(folder_id)
    }

    fn list_child_folders(&self, parent_id: Option<&str>) -> Result<Vec<BookmarkFolder>, BookmarkError> {
        self.manager.list_child_folders(parent_id)
    }

    fn search_bookmarks(&self, query: &str) -> Vec<BookmarkItem> {
        self.manager.search_bookmarks(query)
    }
}
