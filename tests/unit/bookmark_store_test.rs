//! Unit tests for the BookmarkStore: write-through persistence, non-fatal
//! persistence warnings, drop commits and bit toggles.

use cozyhub::database::{Database, SqliteStore};
use cozyhub::managers::bookmark_manager::BookmarkManagerTrait;
use cozyhub::managers::bookmark_store::BookmarkStore;
use cozyhub::managers::drag_manager::DropAction;
use cozyhub::services::sync_adapter::{BitSyncAdapter, RemoteDataService};
use cozyhub::storage::kv_store::{KeyValueStore, MemoryStore};
use cozyhub::storage::persistence::PersistenceAdapter;
use cozyhub::types::bit::BitRecord;
use cozyhub::types::bookmark::{BookmarkPatch, NewBookmark};
use cozyhub::types::errors::StorageError;
use cozyhub::types::settings::StorageSettings;
use tempfile::TempDir;

fn memory_store() -> BookmarkStore<MemoryStore> {
    BookmarkStore::open(PersistenceAdapter::new(MemoryStore::new(), &StorageSettings::default()))
}

fn bit(id: &str) -> BitRecord {
    BitRecord {
        id: id.to_string(),
        title: format!("Bit {}", id),
        content: "Borrowing rules in one page".to_string(),
        source_url: Some(format!("https://notes.example/{}", id)),
        tags: vec!["Rust".to_string()],
        author_id: None,
    }
}

struct FakeRemote(Vec<BitRecord>);

impl RemoteDataService for FakeRemote {
    type Error = std::io::Error;

    fn fetch_bits(&self, _user_id: &str) -> Result<Vec<BitRecord>, Self::Error> {
        Ok(self.0.clone())
    }
}

// ─── Write-through ───

#[test]
fn test_first_open_yields_seed_tree() {
    let store = memory_store();
    assert_eq!(store.tree().folders.len(), 1);
    assert_eq!(store.tree().folders[0].name, "Getting Started");
}

#[test]
fn test_every_mutation_is_saved() {
    let mut store = memory_store();
    let f = store.create_folder("Reading", None).unwrap();
    assert_eq!(&store.persistence().load(), store.tree());

    let b = store.create_bookmark(Some(&f), NewBookmark::new("Docs", "https://docs.rs")).unwrap();
    store.update_bookmark(&b, BookmarkPatch { title: Some("docs.rs".to_string()), ..Default::default() }).unwrap();
    assert_eq!(&store.persistence().load(), store.tree());

    store.delete_folder(&f).unwrap();
    assert_eq!(&store.persistence().load(), store.tree());
    assert!(store.take_warnings().is_empty());
}

#[test]
fn test_failed_mutation_writes_nothing() {
    let mut store = memory_store();
    let before = store.persistence().store().get("bookmarkFolders").unwrap();
    assert!(store.create_folder("", None).is_err());
    assert_eq!(store.persistence().store().get("bookmarkFolders").unwrap(), before);
}

#[test]
fn test_seed_tree_is_saved_on_first_open() {
    let store = memory_store();
    assert_eq!(&store.persistence().load(), store.tree());
    assert!(store.persistence().store().get("bookmarkFolders").unwrap().is_some());
}

#[test]
fn test_seed_folder_ids_are_stable_across_restarts() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cozyhub.db");
    let settings = StorageSettings::default();

    let seed_folder = {
        let db = Database::open(&path).unwrap();
        let store = BookmarkStore::open(PersistenceAdapter::new(SqliteStore::new(db), &settings));
        store.tree().folders[0].id.clone()
    };

    let db = Database::open(&path).unwrap();
    let store = BookmarkStore::open(PersistenceAdapter::new(SqliteStore::new(db), &settings));
    assert_eq!(store.tree().folders[0].id, seed_folder);
    assert_eq!(store.list_bookmarks(Some(&seed_folder)).unwrap().len(), 1);
}

#[test]
fn test_malformed_stored_tree_is_not_overwritten_at_open() {
    let kv = MemoryStore::new();
    kv.set("bookmarkFolders", "{broken").unwrap();
    let mut store = BookmarkStore::open(PersistenceAdapter::new(kv, &StorageSettings::default()));
    assert_eq!(store.persistence().store().get("bookmarkFolders").unwrap().as_deref(), Some("{broken"));
    assert!(store.take_warnings().is_empty());

    store.create_folder("Fresh", None).unwrap();
    assert_eq!(&store.persistence().load(), store.tree());
}

#[test]
fn test_tree_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cozyhub.db");
    let settings = StorageSettings::default();

    let (folder_id, saved) = {
        let db = Database::open(&path).unwrap();
        let mut store = BookmarkStore::open(PersistenceAdapter::new(SqliteStore::new(db), &settings));
        let f = store.create_folder("Later", None).unwrap();
        store.create_bookmark(Some(&f), NewBookmark::new("Paper", "https://arxiv.org")).unwrap();
        (f, store.tree().clone())
    };

    let db = Database::open(&path).unwrap();
    let store = BookmarkStore::open(PersistenceAdapter::new(SqliteStore::new(db), &settings));
    assert_eq!(store.tree(), &saved);
    assert_eq!(store.list_bookmarks(Some(&folder_id)).unwrap().len(), 1);
}

// ─── Persistence warnings ───

#[test]
fn test_quota_failure_is_non_fatal() {
    let adapter = PersistenceAdapter::new(MemoryStore::with_quota(8), &StorageSettings::default());
    let mut store = BookmarkStore::open(adapter);
    assert_eq!(store.take_warnings().len(), 1, "the seed tree does not fit either");

    let f = store.create_folder("Too big to store", None).unwrap();
    assert!(store.tree().contains_folder(&f), "the mutation stands in memory");

    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "bookmarkFolders");
    assert!(matches!(warnings[0].source, StorageError::QuotaExceeded { .. }));
    assert!(store.take_warnings().is_empty(), "warnings are drained");

    store.rename_folder(&f, "Still too big", None).unwrap();
    store.create_bookmark(None, NewBookmark::new("X", "https://x.example")).unwrap();
    assert_eq!(store.take_warnings().len(), 2, "one warning per failed save");
}

// ─── Drops ───

#[test]
fn test_apply_drop_commits_reorder() {
    let mut store = memory_store();
    let a = store.create_bookmark(None, NewBookmark::new("A", "https://a.example")).unwrap();
    let b = store.create_bookmark(None, NewBookmark::new("B", "https://b.example")).unwrap();

    let applied = store
        .apply_drop(&DropAction::ReorderBookmark { id: b.clone(), folder_id: None, to_index: 0 })
        .unwrap();
    assert!(applied);
    let order: Vec<String> = store.tree().root_bookmarks.iter().map(|x| x.id.clone()).collect();
    assert_eq!(order, vec![b, a]);
    assert_eq!(&store.persistence().load(), store.tree());

    assert!(!store.apply_drop(&DropAction::None).unwrap());
}

#[test]
fn test_apply_drop_rejects_cycle() {
    let mut store = memory_store();
    let outer = store.create_folder("Outer", None).unwrap();
    let inner = store.create_folder("Inner", Some(&outer)).unwrap();
    let action = DropAction::MoveFolder { id: outer.clone(), new_parent_id: Some(inner) };
    assert!(store.apply_drop(&action).is_err());
    assert_eq!(store.tree().folder(&outer).unwrap().parent_id, None);
}

// ─── Bit toggles ───

#[test]
fn test_toggle_bit_on_and_off() {
    let mut store = memory_store();
    let adapter = BitSyncAdapter::default();
    let before = store.tree().bookmark_count();

    assert!(store.toggle_bit(&adapter, &bit("42")).unwrap());
    assert!(store.toggles().is_bookmarked("42"));
    assert_eq!(store.tree().bookmark_count(), before + 1);
    let mirrored = store.tree().root_bookmarks.last().unwrap().clone();
    assert_eq!(mirrored.url, "https://notes.example/42");
    assert!(store.persistence().store().get("bookmarkedBits").unwrap().is_some());

    assert!(!store.toggle_bit(&adapter, &bit("42")).unwrap());
    assert!(!store.toggles().is_bookmarked("42"));
    assert_eq!(store.tree().bookmark_count(), before);
}

#[test]
fn test_untoggle_removes_by_stored_id_only() {
    let mut store = memory_store();
    let adapter = BitSyncAdapter::default();
    store.toggle_bit(&adapter, &bit("7")).unwrap();
    let mirrored_id = store.toggles().bookmark_id_for("7").unwrap().to_string();

    // A look-alike bookmark and an edited mirror.
    let twin = store
        .create_bookmark(None, NewBookmark::new("Bit 7", "https://notes.example/7"))
        .unwrap();
    store
        .update_bookmark(&mirrored_id, BookmarkPatch { title: Some("Renamed".to_string()), ..Default::default() })
        .unwrap();

    assert!(!store.toggle_bit(&adapter, &bit("7")).unwrap());
    assert!(store.manager().find_bookmark(&mirrored_id).is_none());
    assert!(store.manager().find_bookmark(&twin).is_some());
}

#[test]
fn test_deleting_mirror_clears_toggle() {
    let mut store = memory_store();
    let adapter = BitSyncAdapter::default();
    store.toggle_bit(&adapter, &bit("9")).unwrap();
    let mirrored_id = store.toggles().bookmark_id_for("9").unwrap().to_string();

    store.delete_bookmark(&mirrored_id).unwrap();
    assert!(!store.toggles().is_bookmarked("9"));
    assert_eq!(store.persistence().load_bookmarked_bits(), Vec::new());
}

#[test]
fn test_list_bits_marks_bookmarked() {
    let mut store = memory_store();
    let adapter = BitSyncAdapter::default();
    store.toggle_bit(&adapter, &bit("1")).unwrap();

    let remote = FakeRemote(vec![bit("1"), bit("2")]);
    let listed = store.list_bits(&remote, "user-1").unwrap();
    let flags: Vec<(String, bool)> = listed.into_iter().map(|(b, on)| (b.id, on)).collect();
    assert_eq!(flags, vec![("1".to_string(), true), ("2".to_string(), false)]);
}
