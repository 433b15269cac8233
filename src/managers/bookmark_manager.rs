//! Bookmark Manager for Cozy Hub.
//!
//! Implements `BookmarkManagerTrait`: the authoritative in-memory tree of
//! folders and bookmarks and every mutation on it. Persistence is layered on
//! top by [`crate::managers::bookmark_store::BookmarkStore`].

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use uuid::Uuid;

use crate::managers::breadcrumbs;
use crate::types::bookmark::{
    BookmarkFolder, BookmarkItem, BookmarkPatch, BookmarkTree, Breadcrumb, NewBookmark,
};
use crate::types::errors::BookmarkError;

/// Trait defining bookmark tree operations.
pub trait BookmarkManagerTrait {
    fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String, BookmarkError>;
    fn rename_folder(&mut self, id: &str, name: &str, description: Option<&str>) -> Result<(), BookmarkError>;
    fn create_bookmark(&mut self, folder_id: Option<&str>, input: NewBookmark) -> Result<String, BookmarkError>;
    fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> Result<(), BookmarkError>;
    fn move_bookmark(&mut self, id: &str, target_folder_id: Option<&str>, target_index: usize) -> Result<(), BookmarkError>;
    fn move_folder(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<(), BookmarkError>;
    /// Moves a folder to `target_index` among its siblings.
    fn reorder_folder(&mut self, id: &str, target_index: usize) -> Result<(), BookmarkError>;
    fn delete_bookmark(&mut self, id: &str) -> Result<BookmarkItem, BookmarkError>;
    /// Deletes a folder and, recursively, every folder and bookmark below it.
    fn delete_folder(&mut self, id: &str) -> Result<(), BookmarkError>;
    fn list_breadcrumbs(&self, folder_id: Option<&str>) -> Result<Vec<Breadcrumb>, BookmarkError>;
    fn list_bookmarks(&self, folder_id: Option<&str>) -> Result<Vec<BookmarkItem>, BookmarkError>;
    fn list_child_folders(&self, parent_id: Option<&str>) -> Result<Vec<BookmarkFolder>, BookmarkError>;
    fn search_bookmarks(&self, query: &str) -> Vec<BookmarkItem>;
}

/// In-memory bookmark tree manager.
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager {
    tree: BookmarkTree,
}

impl BookmarkManager {
    pub fn new(tree: BookmarkTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &BookmarkTree {
        &self.tree
    }

    /// Swaps in a whole tree, e.g. after loading from storage.
    pub fn replace_tree(&mut self, tree: BookmarkTree) {
        self.tree = tree;
    }

    pub fn get_folder(&self, id: &str) -> Option<&BookmarkFolder> {
        self.tree.folder(id)
    }

    pub fn find_bookmark(&self, id: &str) -> Option<&BookmarkItem> {
        let (owner, idx) = self.tree.locate_bookmark(id)?;
        self.tree.sequence(owner.as_deref()).map(|seq| &seq[idx])
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn require_text(field: &str, value: &str) -> Result<(), BookmarkError> {
        if value.trim().is_empty() {
            return Err(BookmarkError::Validation(format!("{} must not be empty", field)));
        }
        Ok(())
    }

    fn require_url(url: &str) -> Result<(), BookmarkError> {
        Self::require_text("url", url)?;
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                BookmarkError::Validation(format!("url must start with http:// or https://: {}", url))
            })?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(BookmarkError::Validation(format!("url has no valid host: {}", url)));
        }
        Ok(())
    }

    fn require_folder(&self, folder_id: Option<&str>) -> Result<(), BookmarkError> {
        match folder_id {
            Some(id) if !self.tree.contains_folder(id) => {
                Err(BookmarkError::NotFound(format!("folder {}", id)))
            }
            _ => Ok(()),
        }
    }

    fn touch_folder(&mut self, folder_id: Option<&str>, now: i64) {
        if let Some(folder) = folder_id.and_then(|id| self.tree.folder_mut(id)) {
            folder.updated_at = now;
        }
    }

    /// Ids of every folder strictly below `id`.
    pub fn descendant_ids(&self, id: &str) -> HashSet<String> {
        let mut found = HashSet::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            for child in self.tree.child_folder_ids(Some(&current)) {
                if found.insert(child.clone()) {
                    stack.push(child);
                }
            }
        }
        found
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Creates a new folder. Returns the generated folder ID.
    fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String, BookmarkError> {
        Self::require_text("name", name)?;
        if let Some(pid) = parent_id {
            if !self.tree.contains_folder(pid) {
                return Err(BookmarkError::Validation(format!("parent folder {} does not exist", pid)));
            }
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        self.tree.folders.push(BookmarkFolder {
            id: id.clone(),
            name: name.trim().to_string(),
            description: None,
            parent_id: parent_id.map(str::to_string),
            created_at: now,
            updated_at: now,
            bookmarks: Vec::new(),
        });
        debug!(folder_id = %id, parent_id = ?parent_id, "folder created");
        Ok(id)
    }

    fn rename_folder(&mut self, id: &str, name: &str, description: Option<&str>) -> Result<(), BookmarkError> {
        Self::require_text("name", name)?;
        let folder = self
            .tree
            .folder_mut(id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", id)))?;
        folder.name = name.trim().to_string();
        folder.description = description.map(str::to_string);
        folder.updated_at = Self::now();
        Ok(())
    }

    /// Appends a new bookmark to `folder_id` (root if `None`). Returns the generated ID.
    fn create_bookmark(&mut self, folder_id: Option<&str>, input: NewBookmark) -> Result<String, BookmarkError> {
        Self::require_text("title", &input.title)?;
        Self::require_url(&input.url)?;
        self.require_folder(folder_id)?;

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let item = BookmarkItem {
            id: id.clone(),
            title: input.title.trim().to_string(),
            url: input.url.trim().to_string(),
            description: input.description,
            created_at: now,
            updated_at: now,
            icon: input.icon,
            tags: input.tags,
        };

        self.tree
            .sequence_mut(folder_id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", folder_id.unwrap_or(""))))?
            .push(item);
        self.touch_folder(folder_id, now);
        debug!(bookmark_id = %id, folder_id = ?folder_id, "bookmark created");
        Ok(id)
    }

    fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> Result<(), BookmarkError> {
        if let Some(title) = &patch.title {
            Self::require_text("title", title)?;
        }
        if let Some(url) = &patch.url {
            Self::require_url(url)?;
        }
        let (owner, idx) = self
            .tree
            .locate_bookmark(id)
            .ok_or_else(|| BookmarkError::NotFound(format!("bookmark {}", id)))?;
        let now = Self::now();
        if let Some(item) = self.tree.sequence_mut(owner.as_deref()).and_then(|s| s.get_mut(idx)) {
            if let Some(title) = patch.title {
                item.title = title.trim().to_string();
            }
            if let Some(url) = patch.url {
                item.url = url.trim().to_string();
            }
            if patch.description.is_some() {
                item.description = patch.description;
            }
            if patch.icon.is_some() {
                item.icon = patch.icon;
            }
            if patch.tags.is_some() {
                item.tags = patch.tags;
            }
            item.updated_at = now;
        }
        self.touch_folder(owner.as_deref(), now);
        Ok(())
    }

    /// Moves a bookmark into `target_folder_id` at `target_index`.
    ///
    /// The index is clamped to `[0, len]` of the target sequence as it looks
    /// after the bookmark has been taken out of its current folder.
    fn move_bookmark(&mut self, id: &str, target_folder_id: Option<&str>, target_index: usize) -> Result<(), BookmarkError> {
        let (owner, from) = self
            .tree
            .locate_bookmark(id)
            .ok_or_else(|| BookmarkError::NotFound(format!("bookmark {}", id)))?;
        self.require_folder(target_folder_id)?;

        let same_folder = owner.as_deref() == target_folder_id;
        if same_folder {
            let len = self.tree.sequence(target_folder_id).map_or(0, Vec::len);
            if from == target_index.min(len.saturating_sub(1)) {
                return Ok(());
            }
        }

        let now = Self::now();
        let mut item = match self.tree.sequence_mut(owner.as_deref()) {
            Some(seq) => seq.remove(from),
            None => return Err(BookmarkError::NotFound(format!("bookmark {}", id))),
        };
        item.updated_at = now;

        let target = self
            .tree
            .sequence_mut(target_folder_id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", target_folder_id.unwrap_or(""))))?;
        let at = target_index.min(target.len());
        target.insert(at, item);

        self.touch_folder(owner.as_deref(), now);
        if !same_folder {
            self.touch_folder(target_folder_id, now);
        }
        debug!(bookmark_id = %id, from = ?owner, to = ?target_folder_id, index = at, "bookmark moved");
        Ok(())
    }

    fn move_folder(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<(), BookmarkError> {
        if !self.tree.contains_folder(id) {
            return Err(BookmarkError::NotFound(format!("folder {}", id)));
        }
        if let Some(pid) = new_parent_id {
            if !self.tree.contains_folder(pid) {
                return Err(BookmarkError::NotFound(format!("folder {}", pid)));
            }
            if pid == id || self.descendant_ids(id).contains(pid) {
                return Err(BookmarkError::Cycle {
                    folder_id: id.to_string(),
                    target_id: pid.to_string(),
                });
            }
        }

        let pos = self
            .tree
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", id)))?;
        if self.tree.folders[pos].parent_id.as_deref() == new_parent_id {
            return Ok(());
        }

        // Re-append so the folder lands after its new siblings.
        let mut folder = self.tree.folders.remove(pos);
        folder.parent_id = new_parent_id.map(str::to_string);
        folder.updated_at = Self::now();
        self.tree.folders.push(folder);
        debug!(folder_id = %id, parent_id = ?new_parent_id, "folder moved");
        Ok(())
    }

    fn reorder_folder(&mut self, id: &str, target_index: usize) -> Result<(), BookmarkError> {
        let folder = self
            .tree
            .folder(id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", id)))?;
        let parent = folder.parent_id.clone();

        let mut siblings = self.tree.child_folder_ids(parent.as_deref());
        let from = siblings.iter().position(|s| s == id).unwrap_or(0);
        let moved = siblings.remove(from);
        let at = target_index.min(siblings.len());
        if at == from {
            return Ok(());
        }
        siblings.insert(at, moved);

        // Rewrite the sibling slots in place; other folders keep their positions.
        let slots: Vec<usize> = self
            .tree
            .folders
            .iter()
            .enumerate()
            .filter(|(_, f)| f.parent_id == parent)
            .map(|(i, _)| i)
            .collect();
        let mut pool: Vec<BookmarkFolder> = slots.iter().map(|&i| self.tree.folders[i].clone()).collect();
        for (slot, sibling_id) in slots.iter().zip(siblings.iter()) {
            if let Some(pos) = pool.iter().position(|f| &f.id == sibling_id) {
                self.tree.folders[*slot] = pool.swap_remove(pos);
            }
        }
        if let Some(folder) = self.tree.folder_mut(id) {
            folder.updated_at = Self::now();
        }
        debug!(folder_id = %id, index = at, "folder reordered");
        Ok(())
    }

    fn delete_bookmark(&mut self, id: &str) -> Result<BookmarkItem, BookmarkError> {
        let (owner, idx) = self
            .tree
            .locate_bookmark(id)
            .ok_or_else(|| BookmarkError::NotFound(format!("bookmark {}", id)))?;
        let removed = self
            .tree
            .sequence_mut(owner.as_deref())
            .map(|seq| seq.remove(idx))
            .ok_or_else(|| BookmarkError::NotFound(format!("bookmark {}", id)))?;
        self.touch_folder(owner.as_deref(), Self::now());
        debug!(bookmark_id = %id, "bookmark deleted");
        Ok(removed)
    }

    fn delete_folder(&mut self, id: &str) -> Result<(), BookmarkError> {
        if !self.tree.contains_folder(id) {
            return Err(BookmarkError::NotFound(format!("folder {}", id)));
        }
        let mut doomed = self.descendant_ids(id);
        doomed.insert(id.to_string());
        self.tree.folders.retain(|f| !doomed.contains(&f.id));
        debug!(folder_id = %id, removed = doomed.len(), "folder deleted");
        Ok(())
    }

    fn list_breadcrumbs(&self, folder_id: Option<&str>) -> Result<Vec<Breadcrumb>, BookmarkError> {
        breadcrumbs::project(&self.tree, folder_id)
    }

    fn list_bookmarks(&self, folder_id: Option<&str>) -> Result<Vec<BookmarkItem>, BookmarkError> {
        self.tree
            .sequence(folder_id)
            .cloned()
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", folder_id.unwrap_or(""))))
    }

    fn list_child_folders(&self, parent_id: Option<&str>) -> Result<Vec<BookmarkFolder>, BookmarkError> {
        self.require_folder(parent_id)?;
        Ok(self
            .tree
            .folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .cloned()
            .collect())
    }

    /// Case-insensitive search over title, url, description and tags.
    fn search_bookmarks(&self, query: &str) -> Vec<BookmarkItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let matches = |b: &BookmarkItem| {
            b.title.to_lowercase().contains(&needle)
                || b.url.to_lowercase().contains(&needle)
                || b.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&needle))
                || b.tags.as_ref().is_some_and(|t| t.iter().any(|tag| tag.to_lowercase().contains(&needle)))
        };
        self.tree
            .root_bookmarks
            .iter()
            .chain(self.tree.folders.iter().flat_map(|f| f.bookmarks.iter()))
            .filter(|b| matches(b))
            .cloned()
            .collect()
    }
}
