//! Unit tests for the BookmarkManager public API.
//!
//! These tests exercise bookmark and folder operations through the
//! `BookmarkManagerTrait` interface on an in-memory tree.

use cozyhub::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use cozyhub::types::bookmark::{BookmarkPatch, BookmarkTree, Breadcrumb, NewBookmark};
use cozyhub::types::errors::BookmarkError;

fn empty() -> BookmarkManager {
    BookmarkManager::new(BookmarkTree::default())
}

fn ids(items: &[cozyhub::types::bookmark::BookmarkItem]) -> Vec<String> {
    items.iter().map(|b| b.id.clone()).collect()
}

#[test]
fn test_move_root_bookmark_into_new_folder() {
    let mut mgr = empty();
    let b1 = mgr.create_bookmark(None, NewBookmark::new("B1", "https://b1.example")).unwrap();
    let f1 = mgr.create_folder("F1", None).unwrap();

    mgr.move_bookmark(&b1, Some(&f1), 0).unwrap();

    assert!(mgr.tree().root_bookmarks.iter().all(|b| b.id != b1));
    assert_eq!(ids(&mgr.list_bookmarks(Some(&f1)).unwrap()), vec![b1]);
}

#[test]
fn test_moving_folder_under_its_descendant_is_a_cycle() {
    let mut mgr = empty();
    let f1 = mgr.create_folder("F1", None).unwrap();
    let f2 = mgr.create_folder("F2", Some(&f1)).unwrap();
    let before = mgr.tree().clone();

    let err = mgr.move_folder(&f1, Some(&f2)).unwrap_err();
    assert!(matches!(err, BookmarkError::Cycle { .. }));
    assert_eq!(mgr.tree(), &before, "a rejected move leaves the tree untouched");
}

#[test]
fn test_moving_folder_into_itself_is_a_cycle() {
    let mut mgr = empty();
    let f1 = mgr.create_folder("F1", None).unwrap();
    assert!(matches!(mgr.move_folder(&f1, Some(&f1)), Err(BookmarkError::Cycle { .. })));
}

#[test]
fn test_breadcrumbs_from_root_to_folder() {
    let mut mgr = empty();
    let f2 = mgr.create_folder("Projects", None).unwrap();
    let f3 = mgr.create_folder("Rust", Some(&f2)).unwrap();

    let crumbs = mgr.list_breadcrumbs(Some(&f3)).unwrap();
    assert_eq!(
        crumbs,
        vec![
            Breadcrumb::root(),
            Breadcrumb { id: Some(f2), name: "Projects".to_string() },
            Breadcrumb { id: Some(f3), name: "Rust".to_string() },
        ]
    );
}

#[test]
fn test_breadcrumbs_for_root_and_unknown_folder() {
    let mgr = empty();
    assert_eq!(mgr.list_breadcrumbs(None).unwrap(), vec![Breadcrumb::root()]);
    assert!(matches!(mgr.list_breadcrumbs(Some("ghost")), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_delete_folder_cascades_to_descendants() {
    let mut mgr = empty();
    let keep = mgr.create_folder("Keep", None).unwrap();
    let top = mgr.create_folder("Top", None).unwrap();
    let mid = mgr.create_folder("Mid", Some(&top)).unwrap();
    let leaf = mgr.create_folder("Leaf", Some(&mid)).unwrap();
    mgr.create_bookmark(Some(&leaf), NewBookmark::new("Deep", "https://deep.example")).unwrap();

    mgr.delete_folder(&top).unwrap();

    let remaining: Vec<&str> = mgr.tree().folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(remaining, vec![keep.as_str()]);
    assert!(mgr.search_bookmarks("deep").is_empty());
}

#[test]
fn test_create_folder_with_unknown_parent_fails() {
    let mut mgr = empty();
    assert!(matches!(
        mgr.create_folder("Orphan", Some("nope")),
        Err(BookmarkError::Validation(_))
    ));
    assert!(mgr.tree().folders.is_empty());
}

#[test]
fn test_create_requires_title_and_http_url() {
    let mut mgr = empty();
    assert!(matches!(
        mgr.create_bookmark(None, NewBookmark::new("  ", "https://x.example")),
        Err(BookmarkError::Validation(_))
    ));
    assert!(matches!(
        mgr.create_bookmark(None, NewBookmark::new("X", "ftp://x.example")),
        Err(BookmarkError::Validation(_))
    ));
    assert!(matches!(
        mgr.create_folder("", None),
        Err(BookmarkError::Validation(_))
    ));
}

#[test]
fn test_create_bookmark_in_unknown_folder_fails() {
    let mut mgr = empty();
    assert!(matches!(
        mgr.create_bookmark(Some("nope"), NewBookmark::new("X", "https://x.example")),
        Err(BookmarkError::NotFound(_))
    ));
}

#[test]
fn test_reorder_within_folder_front_to_back() {
    let mut mgr = empty();
    let f = mgr.create_folder("F", None).unwrap();
    let a = mgr.create_bookmark(Some(&f), NewBookmark::new("A", "https://a.example")).unwrap();
    let b = mgr.create_bookmark(Some(&f), NewBookmark::new("B", "https://b.example")).unwrap();
    let c = mgr.create_bookmark(Some(&f), NewBookmark::new("C", "https://c.example")).unwrap();

    mgr.move_bookmark(&a, Some(&f), 2).unwrap();
    assert_eq!(ids(&mgr.list_bookmarks(Some(&f)).unwrap()), vec![b.clone(), c.clone(), a.clone()]);

    mgr.move_bookmark(&a, Some(&f), 0).unwrap();
    assert_eq!(ids(&mgr.list_bookmarks(Some(&f)).unwrap()), vec![a, b, c]);
}

#[test]
fn test_move_to_own_position_is_a_no_op() {
    let mut mgr = empty();
    let a = mgr.create_bookmark(None, NewBookmark::new("A", "https://a.example")).unwrap();
    mgr.create_bookmark(None, NewBookmark::new("B", "https://b.example")).unwrap();
    let before = mgr.tree().clone();

    mgr.move_bookmark(&a, None, 0).unwrap();
    assert_eq!(mgr.tree(), &before);
}

#[test]
fn test_move_unknown_bookmark_fails() {
    let mut mgr = empty();
    assert!(matches!(mgr.move_bookmark("nope", None, 0), Err(BookmarkError::NotFound(_))));
    assert!(matches!(mgr.delete_bookmark("nope"), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_move_folder_to_root_and_back() {
    let mut mgr = empty();
    let a = mgr.create_folder("A", None).unwrap();
    let b = mgr.create_folder("B", Some(&a)).unwrap();

    mgr.move_folder(&b, None).unwrap();
    assert_eq!(mgr.get_folder(&b).unwrap().parent_id, None);

    mgr.move_folder(&b, Some(&a)).unwrap();
    assert_eq!(mgr.get_folder(&b).unwrap().parent_id.as_deref(), Some(a.as_str()));
    assert_eq!(mgr.list_child_folders(Some(&a)).unwrap().len(), 1);
}

#[test]
fn test_reorder_folder_among_siblings() {
    let mut mgr = empty();
    let a = mgr.create_folder("A", None).unwrap();
    let b = mgr.create_folder("B", None).unwrap();
    let c = mgr.create_folder("C", None).unwrap();

    mgr.reorder_folder(&c, 0).unwrap();
    let order: Vec<String> = mgr.list_child_folders(None).unwrap().into_iter().map(|f| f.id).collect();
    assert_eq!(order, vec![c, a, b]);
}

#[test]
fn test_update_bookmark_patches_only_given_fields() {
    let mut mgr = empty();
    let mut input = NewBookmark::new("Old", "https://old.example");
    input.description = Some("keep me".to_string());
    let id = mgr.create_bookmark(None, input).unwrap();

    let patch = BookmarkPatch { title: Some("New".to_string()), ..BookmarkPatch::default() };
    mgr.update_bookmark(&id, patch).unwrap();

    let item = mgr.find_bookmark(&id).unwrap();
    assert_eq!(item.title, "New");
    assert_eq!(item.url, "https://old.example");
    assert_eq!(item.description.as_deref(), Some("keep me"));

    let bad = BookmarkPatch { url: Some("not a url".to_string()), ..BookmarkPatch::default() };
    assert!(matches!(mgr.update_bookmark(&id, bad), Err(BookmarkError::Validation(_))));
}

#[test]
fn test_rename_folder() {
    let mut mgr = empty();
    let f = mgr.create_folder("Old", None).unwrap();
    mgr.rename_folder(&f, "New", Some("described")).unwrap();
    let folder = mgr.get_folder(&f).unwrap();
    assert_eq!(folder.name, "New");
    assert_eq!(folder.description.as_deref(), Some("described"));
    assert!(matches!(mgr.rename_folder("nope", "X", None), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_search_matches_title_url_description_and_tags() {
    let mut mgr = empty();
    let f = mgr.create_folder("F", None).unwrap();
    let mut tagged = NewBookmark::new("Tagged", "https://t.example");
    tagged.tags = Some(["async".to_string()].into_iter().collect());
    mgr.create_bookmark(Some(&f), tagged).unwrap();
    mgr.create_bookmark(None, NewBookmark::new("Tokio Guide", "https://tokio.rs")).unwrap();

    assert_eq!(mgr.search_bookmarks("ASYNC").len(), 1);
    assert_eq!(mgr.search_bookmarks("tokio").len(), 1);
    assert_eq!(mgr.search_bookmarks("example").len(), 1);
    assert!(mgr.search_bookmarks("   ").is_empty());
}

#[test]
fn test_seed_tree_has_welcome_bookmark() {
    let mgr = BookmarkManager::new(BookmarkTree::seed(0));
    assert_eq!(mgr.tree().folders.len(), 1);
    assert_eq!(mgr.tree().folders[0].bookmarks.len(), 1);
    assert!(mgr.tree().root_bookmarks.is_empty());
}

// ─── Timestamps ───

/// Rebuilds `mgr` with every `created_at` and `updated_at` set to 1.
fn aged(mgr: &BookmarkManager) -> BookmarkManager {
    let mut tree = mgr.tree().clone();
    let items = tree
        .root_bookmarks
        .iter_mut()
        .chain(tree.folders.iter_mut().flat_map(|f| f.bookmarks.iter_mut()));
    for item in items {
        item.created_at = 1;
        item.updated_at = 1;
    }
    for folder in &mut tree.folders {
        folder.created_at = 1;
        folder.updated_at = 1;
    }
    BookmarkManager::new(tree)
}

fn folder_stamps(mgr: &BookmarkManager, id: &str) -> (i64, i64) {
    let f = mgr.get_folder(id).unwrap();
    (f.created_at, f.updated_at)
}

fn bookmark_stamps(mgr: &BookmarkManager, id: &str) -> (i64, i64) {
    let b = mgr.find_bookmark(id).unwrap();
    (b.created_at, b.updated_at)
}

#[test]
fn test_mutations_refresh_updated_at_and_keep_created_at() {
    let mut mgr = empty();
    let src = mgr.create_folder("Source", None).unwrap();
    let dst = mgr.create_folder("Target", None).unwrap();
    let b = mgr.create_bookmark(Some(&src), NewBookmark::new("Doc", "https://doc.example")).unwrap();
    let mut mgr = aged(&mgr);

    mgr.update_bookmark(&b, BookmarkPatch { title: Some("Docs".to_string()), ..Default::default() }).unwrap();
    let (created, updated) = bookmark_stamps(&mgr, &b);
    assert_eq!(created, 1);
    assert!(updated > 1);

    let mut mgr = aged(&mgr);
    mgr.move_bookmark(&b, Some(&dst), 0).unwrap();
    for (created, updated) in [bookmark_stamps(&mgr, &b), folder_stamps(&mgr, &src), folder_stamps(&mgr, &dst)] {
        assert_eq!(created, 1);
        assert!(updated > 1);
    }

    let mut mgr = aged(&mgr);
    mgr.rename_folder(&src, "Origin", Some("emptied")).unwrap();
    let (created, updated) = folder_stamps(&mgr, &src);
    assert_eq!(created, 1);
    assert!(updated > 1);
    assert_eq!(folder_stamps(&mgr, &dst), (1, 1), "untouched folders keep their stamps");

    let mut mgr = aged(&mgr);
    mgr.move_folder(&src, Some(&dst)).unwrap();
    let (created, updated) = folder_stamps(&mgr, &src);
    assert_eq!(created, 1);
    assert!(updated > 1);
    assert_eq!(bookmark_stamps(&mgr, &b), (1, 1));
}
