//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or parsing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A board column identifier outside `todo`, `inProgress`, `completed`.
    #[error("unknown board column: {0}")]
    UnknownColumn(String),

    /// A task identifier that is not a UUID.
    #[error("invalid task identifier: {0}")]
    InvalidTaskId(String),

    /// A priority outside `low`, `medium`, `high`.
    #[error("unknown task priority: {0}")]
    UnknownPriority(String),

    /// A category outside `work`, `personal`, `study`.
    #[error("unknown task category: {0}")]
    UnknownCategory(String),
}
