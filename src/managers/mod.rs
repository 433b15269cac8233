// Cozy Hub state managers
// Managers handle stateful operations: the bookmark tree, its write-through
// store, drag-and-drop gestures, breadcrumbs and bookmarked-bit toggles.

pub mod bit_toggle_manager;
pub mod bookmark_manager;
pub mod bookmark_store;
pub mod breadcrumbs;
pub mod drag_manager;
