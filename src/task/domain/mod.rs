//! Domain model for tasks and the kanban status state machine.
//!
//! Task progress is persisted as two flags and surfaced as exactly one
//! derived [`TaskStatus`]. Every view and every transition goes through
//! [`classify`] and [`TaskStatus::flags`]; nothing else inspects the raw
//! flags.

mod board;
mod drag;
mod error;
mod ids;
mod query;
mod stats;
mod status;
mod task;

pub use board::{Board, tasks_in_column};
pub use drag::{DragEnd, DragIntent};
pub use error::TaskDomainError;
pub use ids::TaskId;
pub use query::{
    CompletionFilter, TaskQuery, overdue_tasks, recent_tasks, tasks_due_on, upcoming_tasks,
};
pub use stats::{CategoryBreakdown, CategoryCount, PriorityBreakdown, TaskStats};
pub use status::{StatusFlags, TaskStatus, classify};
pub use task::{Category, PersistedTaskData, Priority, Task, TaskDetails, TaskPatch, TaskTitle};
