//! Drag-and-drop reordering engine.
//!
//! A small state machine (`Idle → Dragging → Idle`) fed with explicit gesture
//! inputs. It never touches the tree itself: ending a gesture yields a
//! [`DropAction`] which the bookmark store commits through the entity model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::bookmark::{BookmarkTree, DragItem, DragKind};
use crate::types::errors::DragError;

/// Layout direction of the card list being dragged over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Cards stacked top to bottom; the upper half means "before".
    #[default]
    Vertical,
    /// Cards laid out left to right; the left half means "before".
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Which side of the hovered card the dragged card lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

/// Share of a folder card's length, at each end, that reorders instead of nesting.
pub const FOLDER_EDGE_ZONE: f64 = 0.25;

impl Rect {
    /// Half-width rule: before in the upper/left half, after otherwise.
    pub fn placement(&self, pointer: Point, orientation: Orientation) -> Placement {
        let before = match orientation {
            Orientation::Vertical => pointer.y < self.y + self.height / 2.0,
            Orientation::Horizontal => pointer.x < self.x + self.width / 2.0,
        };
        if before {
            Placement::Before
        } else {
            Placement::After
        }
    }

    /// Edge rule for folder cards: `Some` only when the pointer lies within
    /// [`FOLDER_EDGE_ZONE`] of the leading or trailing edge.
    pub fn edge(&self, pointer: Point, orientation: Orientation) -> Option<Placement> {
        let (offset, length) = match orientation {
            Orientation::Vertical => (pointer.y - self.y, self.height),
            Orientation::Horizontal => (pointer.x - self.x, self.width),
        };
        if offset < length * FOLDER_EDGE_ZONE {
            Some(Placement::Before)
        } else if offset > length * (1.0 - FOLDER_EDGE_ZONE) {
            Some(Placement::After)
        } else {
            None
        }
    }
}

/// The card currently under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverTarget {
    pub item: DragItem,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub pointer: Option<Point>,
}

impl OverTarget {
    pub fn card(item: DragItem) -> Self {
        Self { item, rect: None, pointer: None }
    }

    pub fn with_geometry(item: DragItem, rect: Rect, pointer: Point) -> Self {
        Self { item, rect: Some(rect), pointer: Some(pointer) }
    }

    fn placement(&self, orientation: Orientation) -> Option<Placement> {
        match (self.rect, self.pointer) {
            (Some(rect), Some(pointer)) => Some(rect.placement(pointer, orientation)),
            _ => None,
        }
    }

    fn edge(&self, orientation: Orientation) -> Option<Placement> {
        match (self.rect, self.pointer) {
            (Some(rect), Some(pointer)) => rect.edge(pointer, orientation),
            _ => None,
        }
    }
}

/// Gesture inputs, independent of whatever produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum DragInput {
    Start(DragItem),
    /// Pointer moved onto a card, or off every card (`None`).
    Over(Option<OverTarget>),
    End,
    Cancel,
    /// A key pressed during the gesture; `Escape` cancels.
    Key(String),
}

/// Mutation requested by a finished gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DropAction {
    None,
    ReorderBookmark { id: String, folder_id: Option<String>, to_index: usize },
    ReorderFolder { id: String, to_index: usize },
    MoveBookmark { id: String, target_folder_id: Option<String>, to_index: usize },
    MoveFolder { id: String, new_parent_id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { active: DragItem, over: Option<OverTarget> },
}

/// Drag-and-drop state machine for one card list view.
#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    state: DragState,
    orientation: Orientation,
}

/// Array-move index: where the dragged card ends up when dropped on the card at `over`.
///
/// Without pointer geometry the card takes the hovered card's index.
pub fn reorder_index(from: usize, over: usize, placement: Option<Placement>) -> usize {
    match placement {
        None => over,
        Some(Placement::Before) if from < over => over - 1,
        Some(Placement::Before) => over,
        Some(Placement::After) if from < over => over,
        Some(Placement::After) => over + 1,
    }
}

impl DragEngine {
    pub fn new(orientation: Orientation) -> Self {
        Self { state: DragState::Idle, orientation }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Feeds one input. `End`, `Cancel` and `Escape` always return to `Idle`.
    pub fn handle(&mut self, input: DragInput, tree: &BookmarkTree) -> Result<DropAction, DragError> {
        match input {
            DragInput::Start(item) => {
                if let DragState::Dragging { active, .. } = &self.state {
                    return Err(DragError::AlreadyDragging(active.id.clone()));
                }
                debug!(id = %item.id, kind = ?item.kind, "drag started");
                self.state = DragState::Dragging { active: item, over: None };
                Ok(DropAction::None)
            }
            DragInput::Over(target) => match &mut self.state {
                DragState::Dragging { over, .. } => {
                    *over = target;
                    Ok(DropAction::None)
                }
                DragState::Idle => Err(DragError::NotDragging),
            },
            DragInput::End => match std::mem::take(&mut self.state) {
                DragState::Dragging { active, over } => {
                    let action = match over {
                        Some(target) => self.resolve(&active, &target, tree),
                        None => DropAction::None,
                    };
                    debug!(id = %active.id, ?action, "drag ended");
                    Ok(action)
                }
                DragState::Idle => Err(DragError::NotDragging),
            },
            DragInput::Cancel => {
                self.state = DragState::Idle;
                Ok(DropAction::None)
            }
            DragInput::Key(key) => {
                if key == "Escape" {
                    self.state = DragState::Idle;
                }
                Ok(DropAction::None)
            }
        }
    }

    fn resolve(&self, active: &DragItem, target: &OverTarget, tree: &BookmarkTree) -> DropAction {
        if active.id == target.item.id {
            return DropAction::None;
        }
        let placement = target.placement(self.orientation);

        match (active.kind, target.item.kind) {
            (DragKind::Bookmark, DragKind::Bookmark) => {
                let (Some((from_owner, from)), Some((over_owner, over))) =
                    (tree.locate_bookmark(&active.id), tree.locate_bookmark(&target.item.id))
                else {
                    return DropAction::None;
                };
                if from_owner == over_owner {
                    DropAction::ReorderBookmark {
                        id: active.id.clone(),
                        folder_id: from_owner,
                        to_index: reorder_index(from, over, placement),
                    }
                } else {
                    let to_index = match placement {
                        Some(Placement::After) => over + 1,
                        _ => over,
                    };
                    DropAction::MoveBookmark {
                        id: active.id.clone(),
                        target_folder_id: over_owner,
                        to_index,
                    }
                }
            }
            (DragKind::Bookmark, DragKind::Folder) => {
                let (Some(_), Some(folder)) =
                    (tree.locate_bookmark(&active.id), tree.folder(&target.item.id))
                else {
                    return DropAction::None;
                };
                DropAction::MoveBookmark {
                    id: active.id.clone(),
                    target_folder_id: Some(folder.id.clone()),
                    to_index: folder.bookmarks.len(),
                }
            }
            (DragKind::Folder, DragKind::Folder) => {
                let (Some(dragged), Some(over_folder)) =
                    (tree.folder(&active.id), tree.folder(&target.item.id))
                else {
                    return DropAction::None;
                };
                // Edge of a sibling card: reorder. Anywhere else: nest.
                if let Some(edge) = target.edge(self.orientation) {
                    if dragged.parent_id == over_folder.parent_id {
                        let siblings = tree.child_folder_ids(dragged.parent_id.as_deref());
                        let from = siblings.iter().position(|id| id == &dragged.id);
                        let over = siblings.iter().position(|id| id == &over_folder.id);
                        if let (Some(from), Some(over)) = (from, over) {
                            return DropAction::ReorderFolder {
                                id: dragged.id.clone(),
                                to_index: reorder_index(from, over, Some(edge)),
                            };
                        }
                    }
                }
                if dragged.parent_id.as_deref() == Some(over_folder.id.as_str()) {
                    return DropAction::None;
                }
                DropAction::MoveFolder {
                    id: dragged.id.clone(),
                    new_parent_id: Some(over_folder.id.clone()),
                }
            }
            (DragKind::Folder, DragKind::Bookmark) => DropAction::None,
        }
    }
}
