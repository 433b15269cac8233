//! Breadcrumb projection: the root-first path to the folder currently open.

use std::collections::HashSet;

use crate::types::bookmark::{BookmarkTree, Breadcrumb};
use crate::types::errors::BookmarkError;

/// Projects `current` to `[Root, ..ancestors, current]`.
///
/// `None` is the root itself and yields just the root crumb. A `parent_id`
/// loop in a corrupted tree is reported as `Cycle` rather than followed.
pub fn project(tree: &BookmarkTree, current: Option<&str>) -> Result<Vec<Breadcrumb>, BookmarkError> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = current.map(str::to_string);

    while let Some(id) = cursor {
        let folder = tree
            .folder(&id)
            .ok_or_else(|| BookmarkError::NotFound(format!("folder {}", id)))?;
        if !seen.insert(folder.id.clone()) {
            return Err(BookmarkError::Cycle {
                folder_id: current.unwrap_or_default().to_string(),
                target_id: folder.id.clone(),
            });
        }
        path.push(Breadcrumb {
            id: Some(folder.id.clone()),
            name: folder.name.clone(),
        });
        cursor = folder.parent_id.clone();
    }

    path.push(Breadcrumb::root());
    path.reverse();
    Ok(path)
}
