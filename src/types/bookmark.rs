use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Display name of the implicit root collection.
pub const ROOT_NAME: &str = "Root";

/// Represents a saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

/// Represents a folder for organizing bookmarks.
///
/// `bookmarks` holds only the items directly inside the folder. Nested
/// folders point back at this one through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkFolder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub bookmarks: Vec<BookmarkItem>,
}

/// The whole bookmark tree: the implicit root collection plus every folder.
///
/// Sibling folders are displayed in the order they appear in `folders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkTree {
    #[serde(default)]
    pub root_bookmarks: Vec<BookmarkItem>,
    #[serde(default)]
    pub folders: Vec<BookmarkFolder>,
}

impl BookmarkTree {
    /// Tree handed out on first start, or when the stored copy is unreadable.
    pub fn seed(now: i64) -> Self {
        let folder_id = uuid::Uuid::new_v4().to_string();
        let welcome = BookmarkItem {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Welcome to Cozy Hub".to_string(),
            url: "https://github.com/cozyhub/cozyhub".to_string(),
            description: Some("Drag cards to reorder them, or drop them on a folder.".to_string()),
            created_at: now,
            updated_at: now,
            icon: None,
            tags: Some(BTreeSet::from(["welcome".to_string()])),
        };
        Self {
            root_bookmarks: Vec::new(),
            folders: vec![BookmarkFolder {
                id: folder_id,
                name: "Getting Started".to_string(),
                description: None,
                parent_id: None,
                created_at: now,
                updated_at: now,
                bookmarks: vec![welcome],
            }],
        }
    }

    pub fn folder(&self, id: &str) -> Option<&BookmarkFolder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_mut(&mut self, id: &str) -> Option<&mut BookmarkFolder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    pub fn contains_folder(&self, id: &str) -> bool {
        self.folder(id).is_some()
    }

    /// Bookmark sequence owned by `folder_id` (`None` is the root collection).
    pub fn sequence(&self, folder_id: Option<&str>) -> Option<&Vec<BookmarkItem>> {
        match folder_id {
            None => Some(&self.root_bookmarks),
            Some(id) => self.folder(id).map(|f| &f.bookmarks),
        }
    }

    pub fn sequence_mut(&mut self, folder_id: Option<&str>) -> Option<&mut Vec<BookmarkItem>> {
        match folder_id {
            None => Some(&mut self.root_bookmarks),
            Some(id) => self.folder_mut(id).map(|f| &mut f.bookmarks),
        }
    }

    /// Locates a bookmark: `(owning folder id, index in that folder)`.
    pub fn locate_bookmark(&self, bookmark_id: &str) -> Option<(Option<String>, usize)> {
        if let Some(idx) = self.root_bookmarks.iter().position(|b| b.id == bookmark_id) {
            return Some((None, idx));
        }
        self.folders.iter().find_map(|f| {
            f.bookmarks
                .iter()
                .position(|b| b.id == bookmark_id)
                .map(|idx| (Some(f.id.clone()), idx))
        })
    }

    /// Ids of the direct child folders of `parent_id`, in display order.
    pub fn child_folder_ids(&self, parent_id: Option<&str>) -> Vec<String> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .map(|f| f.id.clone())
            .collect()
    }

    /// Total number of bookmarks in the tree.
    pub fn bookmark_count(&self) -> usize {
        self.root_bookmarks.len() + self.folders.iter().map(|f| f.bookmarks.len()).sum::<usize>()
    }
}

/// Input for creating a bookmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

impl NewBookmark {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }
}

/// Partial update of a bookmark; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

/// One step of the path from root to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: Option<String>,
    pub name: String,
}

impl Breadcrumb {
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_NAME.to_string(),
        }
    }
}

/// Kind of card being dragged or hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Bookmark,
    Folder,
}

/// The entity being relocated during a drag gesture. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl DragItem {
    pub fn bookmark(id: &str, parent_id: Option<&str>) -> Self {
        Self {
            kind: DragKind::Bookmark,
            id: id.to_string(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    pub fn folder(id: &str, parent_id: Option<&str>) -> Self {
        Self {
            kind: DragKind::Folder,
            id: id.to_string(),
            parent_id: parent_id.map(str::to_string),
        }
    }
}
