//! Cozy Hub: a bookmark and folder organizer.
//!
//! Runs a console walkthrough of the core against an in-memory store.
//! The presentation layer talks to `cozyhub-rpc` instead.

use std::error::Error;

use cozyhub::managers::bookmark_manager::BookmarkManagerTrait;
use cozyhub::managers::bookmark_store::BookmarkStore;
use cozyhub::managers::drag_manager::{DragEngine, DragInput, Orientation, OverTarget, Point, Rect};
use cozyhub::services::tag_extractor::extract_tags;
use cozyhub::storage::kv_store::MemoryStore;
use cozyhub::storage::persistence::PersistenceAdapter;
use cozyhub::types::bookmark::{BookmarkTree, DragItem, NewBookmark};
use cozyhub::types::settings::StorageSettings;
use tracing_subscriber::EnvFilter;

fn section(name: &str) {
    println!("───────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────");
}

fn print_tree(tree: &BookmarkTree) {
    for b in &tree.root_bookmarks {
        println!("  · {} <{}>", b.title, b.url);
    }
    for f in &tree.folders {
        let parent = f.parent_id.as_deref().unwrap_or("root");
        println!("  ▸ {} (under {}, {} bookmarks)", f.name, parent, f.bookmarks.len());
        for b in &f.bookmarks {
            println!("      · {} <{}>", b.title, b.url);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cozyhub=info")))
        .init();

    println!("Cozy Hub v{} (demo)", env!("CARGO_PKG_VERSION"));

    section("First launch");
    let persistence = PersistenceAdapter::new(MemoryStore::new(), &StorageSettings::default());
    let mut store = BookmarkStore::open(persistence);
    print_tree(store.tree());

    section("Folders and bookmarks");
    let reading = store.create_folder("Reading", None)?;
    let rust = store.create_folder("Rust", Some(&reading))?;
    let mut book = NewBookmark::new("The Rust Book", "https://doc.rust-lang.org/book/");
    book.description = Some("Ownership, borrowing and lifetimes explained".to_string());
    store.create_bookmark(Some(&rust), book)?;
    store.create_bookmark(None, NewBookmark::new("Crates", "https://crates.io"))?;
    let docs = store.create_bookmark(None, NewBookmark::new("Docs", "https://docs.rs"))?;
    print_tree(store.tree());

    let trail: Vec<String> = store.list_breadcrumbs(Some(&rust))?.into_iter().map(|c| c.name).collect();
    println!("  breadcrumbs: {}", trail.join(" / "));

    section("Cycle guard");
    if let Err(e) = store.move_folder(&reading, Some(&rust)) {
        println!("  rejected: {}", e);
    }

    section("Drag and drop");
    let mut drag = DragEngine::new(Orientation::Vertical);
    let first = store.tree().root_bookmarks[0].id.clone();
    drag.handle(DragInput::Start(DragItem::bookmark(&docs, None)), store.tree())?;
    let card = Rect { x: 0.0, y: 0.0, width: 200.0, height: 40.0 };
    let over = OverTarget::with_geometry(DragItem::bookmark(&first, None), card, Point { x: 20.0, y: 5.0 });
    drag.handle(DragInput::Over(Some(over)), store.tree())?;
    let action = drag.handle(DragInput::End, store.tree())?;
    println!("  drop: {:?}", action);
    store.apply_drop(&action)?;
    print_tree(store.tree());

    section("Tags");
    let tags = extract_tags("Rust ownership makes Rust memory safety practical; ownership rules", 3);
    println!("  {}", tags.join(", "));

    for warning in store.take_warnings() {
        println!("  warning: {}", warning);
    }
    Ok(())
}
