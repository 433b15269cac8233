//! RPC method handler for the Cozy Hub JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The presentation layer sends user intents (add, move, delete, drag
//! gestures) here; `handle_method` dispatches them to the bookmark store.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::drag_manager::{DragInput, Orientation, OverTarget};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::tag_extractor::extract_tags;
use crate::types::bit::BitRecord;
use crate::types::bookmark::{BookmarkPatch, DragItem, NewBookmark};

const DEFAULT_TAG_LIMIT: usize = 5;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn opt_str_param<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|v| v.as_str())
}

fn index_param(params: &Value, name: &str) -> Result<usize, String> {
    params
        .get(name)
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .ok_or_else(|| format!("missing {}", name))
}

fn parse_param<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid {}: {}", what, e))
}

/// Attaches queued persistence warnings to a mutation result.
fn with_warnings(app: &mut App, mut result: Value) -> Value {
    let warnings: Vec<String> = app.store.take_warnings().iter().map(|w| w.to_string()).collect();
    if !warnings.is_empty() {
        if let Value::Object(map) = &mut result {
            map.insert("warnings".to_string(), json!(warnings));
        }
    }
    result
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Tree ───
        "tree.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.store.tree()).map_err(|e| e.to_string())
        }
        "breadcrumbs" => {
            let folder = opt_str_param(params, "folder_id");
            let a = app.lock().map_err(|e| e.to_string())?;
            let crumbs = a.store.list_breadcrumbs(folder).map_err(|e| e.to_string())?;
            Ok(json!(crumbs))
        }

        // ─── Folders ───
        "folder.create" => {
            let name = str_param(params, "name")?;
            let parent = opt_str_param(params, "parent_id");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.store.create_folder(name, parent).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"id": id})))
        }
        "folder.rename" => {
            let id = str_param(params, "id")?;
            let name = str_param(params, "name")?;
            let description = opt_str_param(params, "description");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.rename_folder(id, name, description).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "folder.move" => {
            let id = str_param(params, "id")?;
            let parent = opt_str_param(params, "parent_id");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.move_folder(id, parent).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "folder.reorder" => {
            let id = str_param(params, "id")?;
            let index = index_param(params, "index")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.reorder_folder(id, index).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "folder.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.delete_folder(id).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "folder.children" => {
            let parent = opt_str_param(params, "parent_id");
            let a = app.lock().map_err(|e| e.to_string())?;
            let folders = a.store.list_child_folders(parent).map_err(|e| e.to_string())?;
            let arr: Vec<Value> = folders
                .iter()
                .map(|f| json!({"id": f.id, "name": f.name, "parent_id": f.parent_id, "bookmark_count": f.bookmarks.len()}))
                .collect();
            Ok(json!(arr))
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let input: NewBookmark = parse_param(params, "bookmark")?;
            let folder = opt_str_param(params, "folder_id");
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.store.create_bookmark(folder, input).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"id": id})))
        }
        "bookmark.update" => {
            let id = str_param(params, "id")?;
            let patch: BookmarkPatch = parse_param(params, "patch")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.update_bookmark(id, patch).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "bookmark.move" => {
            let id = str_param(params, "id")?;
            let folder = opt_str_param(params, "folder_id");
            let index = index_param(params, "index")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.move_bookmark(id, folder, index).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.store.delete_bookmark(id).map_err(|e| e.to_string())?;
            Ok(with_warnings(&mut a, json!({"ok": true})))
        }
        "bookmark.list" => {
            let folder = opt_str_param(params, "folder_id");
            let a = app.lock().map_err(|e| e.to_string())?;
            let items = a.store.list_bookmarks(folder).map_err(|e| e.to_string())?;
            Ok(json!({"items": items}))
        }
        "bookmark.search" => {
            let query = str_param(params, "query")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"items": a.store.search_bookmarks(query)}))
        }
        #[cfg(feature = "network")]
        "bookmark.summarize" => summarize(app, params),

        // ─── Drag and drop ───
        "drag.start" => {
            let item: DragItem = parse_param(params.get("item").unwrap_or(&Value::Null), "item")?;
            let mut guard = app.lock().map_err(|e| e.to_string())?;
            let a = &mut *guard;
            a.drag.handle(DragInput::Start(item), a.store.tree()).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "drag.over" => {
            let target: Option<OverTarget> =
                parse_param(params.get("target").unwrap_or(&Value::Null), "target")?;
            let mut guard = app.lock().map_err(|e| e.to_string())?;
            let a = &mut *guard;
            a.drag.handle(DragInput::Over(target), a.store.tree()).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "drag.end" => {
            let mut guard = app.lock().map_err(|e| e.to_string())?;
            let a = &mut *guard;
            let action = a.drag.handle(DragInput::End, a.store.tree()).map_err(|e| e.to_string())?;
            let applied = a.store.apply_drop(&action).map_err(|e| e.to_string())?;
            Ok(with_warnings(a, json!({"action": action, "applied": applied})))
        }
        "drag.cancel" | "drag.key" => {
            let input = match method {
                "drag.key" => DragInput::Key(str_param(params, "key")?.to_string()),
                _ => DragInput::Cancel,
            };
            let mut guard = app.lock().map_err(|e| e.to_string())?;
            let a = &mut *guard;
            a.drag.handle(input, a.store.tree()).map_err(|e| e.to_string())?;
            Ok(json!({"dragging": a.drag.is_dragging()}))
        }
        "drag.orientation" => {
            let orientation: Orientation =
                parse_param(params.get("orientation").unwrap_or(&Value::Null), "orientation")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.drag.set_orientation(orientation);
            Ok(json!({"ok": true}))
        }

        // ─── Bits ───
        "bit.toggle" => {
            let bit: BitRecord = parse_param(params.get("bit").unwrap_or(&Value::Null), "bit")?;
            let mut guard = app.lock().map_err(|e| e.to_string())?;
            let a = &mut *guard;
            let bookmarked = a.store.toggle_bit(&a.bits, &bit).map_err(|e| e.to_string())?;
            Ok(with_warnings(a, json!({"bookmarked": bookmarked})))
        }
        "bit.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!(a.store.toggles().entries()))
        }

        // ─── Tags ───
        "tags.extract" => {
            let text = str_param(params, "text")?;
            let limit = index_param(params, "limit").unwrap_or(DEFAULT_TAG_LIMIT);
            Ok(json!({"tags": extract_tags(text, limit)}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Summarizes a URL, or a stored bookmark's URL and saves the summary as its description.
///
/// The app lock is released while the network calls run.
#[cfg(feature = "network")]
fn summarize(app: &Mutex<App>, params: &Value) -> Result<Value, String> {
    use crate::services::summarizer::HttpSummarizer;

    let bookmark_id = opt_str_param(params, "id");
    let (url, settings) = {
        let a = app.lock().map_err(|e| e.to_string())?;
        let settings = a.settings_engine.get_settings().summarizer.clone();
        let url = match bookmark_id {
            Some(id) => a
                .store
                .manager()
                .find_bookmark(id)
                .map(|b| b.url.clone())
                .ok_or_else(|| format!("Not found: bookmark {}", id))?,
            None => str_param(params, "url")?.to_string(),
        };
        (url, settings)
    };
    if !settings.enabled {
        return Err("summarizer is disabled".to_string());
    }

    let summarizer = HttpSummarizer::from_settings(&settings).map_err(|e| e.to_string())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    let summary = runtime.block_on(summarizer.summarize(&url)).map_err(|e| e.to_string())?;

    let mut a = app.lock().map_err(|e| e.to_string())?;
    if let Some(id) = bookmark_id {
        let patch = BookmarkPatch {
            description: Some(summary.clone()),
            ..BookmarkPatch::default()
        };
        a.store.update_bookmark(id, patch).map_err(|e| e.to_string())?;
    }
    Ok(with_warnings(&mut a, json!({"url": url, "summary": summary})))
}
