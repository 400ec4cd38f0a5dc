//! Drag-end events reported by the board's drag-and-drop layer.

use super::{TaskDomainError, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// One completed drag gesture, as emitted by the drag library.
///
/// Deserializes from the library's camelCase payload, for example
/// `{"draggedItemId": "...", "sourceContainerId": "todo",
/// "destinationContainerId": null, "sourceIndex": 0, "destinationIndex": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEnd {
    /// Identifier of the dragged card.
    pub dragged_item_id: String,
    /// Column the card was picked up from.
    pub source_container_id: String,
    /// Column the card was dropped into; `None` when dropped outside the
    /// board or cancelled.
    #[serde(default)]
    pub destination_container_id: Option<String>,
    /// Position the card was picked up from.
    pub source_index: usize,
    /// Position the card was dropped at.
    #[serde(default)]
    pub destination_index: Option<usize>,
}

/// What a drag gesture asks the board to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragIntent {
    /// Dropped outside any column or cancelled.
    Cancelled,
    /// Dropped back where it started.
    Unmoved,
    /// Move the task into `target`.
    Move {
        /// Task being moved.
        task_id: TaskId,
        /// Destination column.
        target: TaskStatus,
    },
}

impl DragEnd {
    /// Interprets the gesture.
    ///
    /// A reorder within a column is still reported as a move; the board
    /// persists no ordering, so the transition it triggers is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnknownColumn`] when the destination is not
    /// a board column, or [`TaskDomainError::InvalidTaskId`] when the dragged
    /// item id is not a task identifier.
    pub fn resolve(&self) -> Result<DragIntent, TaskDomainError> {
        let Some(destination) = self.destination_container_id.as_deref() else {
            return Ok(DragIntent::Cancelled);
        };

        let same_slot = destination == self.source_container_id
            && self.destination_index == Some(self.source_index);
        if same_slot {
            return Ok(DragIntent::Unmoved);
        }

        let target = TaskStatus::try_from(destination)?;
        let task_id = TaskId::try_from(self.dragged_item_id.as_str())?;
        Ok(DragIntent::Move { task_id, target })
    }
}
