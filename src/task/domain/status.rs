//! Derived task status and the column transition table.

use super::{Task, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kanban column a task belongs to.
///
/// Never stored; always derived from [`StatusFlags`] by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Board columns in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Returns the column identifier used by the board and drag events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    /// Returns the human-readable column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In-progress",
            Self::Completed => "Completed",
        }
    }

    /// Returns the flag assignment that places a task in this column.
    ///
    /// | column     | completed | in_progress |
    /// |------------|-----------|-------------|
    /// | todo       | false     | false       |
    /// | inProgress | false     | true        |
    /// | completed  | true      | false       |
    #[must_use]
    pub const fn flags(self) -> StatusFlags {
        match self {
            Self::Todo => StatusFlags::new(false, false),
            Self::InProgress => StatusFlags::new(false, true),
            Self::Completed => StatusFlags::new(true, false),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "todo" => Ok(Self::Todo),
            "inProgress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(TaskDomainError::UnknownColumn(value.to_owned())),
        }
    }
}

/// Persisted progress flags of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusFlags {
    completed: bool,
    in_progress: bool,
}

impl StatusFlags {
    /// Creates a flag pair exactly as stored.
    #[must_use]
    pub const fn new(completed: bool, in_progress: bool) -> Self {
        Self {
            completed,
            in_progress,
        }
    }

    /// Returns the stored `completed` flag.
    #[must_use]
    pub const fn completed(self) -> bool {
        self.completed
    }

    /// Returns the stored `in_progress` flag.
    #[must_use]
    pub const fn in_progress(self) -> bool {
        self.in_progress
    }

    /// Maps the flags to exactly one column. `completed` wins over
    /// `in_progress` when a record carries both.
    #[must_use]
    pub const fn classify(self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else if self.in_progress {
            TaskStatus::InProgress
        } else {
            TaskStatus::Todo
        }
    }
}

/// Returns the board column `task` belongs to.
#[must_use]
pub const fn classify(task: &Task) -> TaskStatus {
    task.flags().classify()
}
