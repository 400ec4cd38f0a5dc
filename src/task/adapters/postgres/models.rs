//! Diesel row models for task persistence.

use super::schema::tasks;
use crate::task::domain::Task;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: String,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// In-progress flag.
    pub in_progress: bool,
    /// Optional priority.
    pub priority: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: String,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// In-progress flag.
    pub in_progress: bool,
    /// Optional priority.
    pub priority: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Full-state changeset for the mutable task columns.
///
/// `None` writes `NULL`, so the row always mirrors the updated aggregate.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// In-progress flag.
    pub in_progress: bool,
    /// Optional priority.
    pub priority: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for NewTaskRow {
    fn from(task: &Task) -> Self {
        let flags = task.flags();
        Self {
            id: task.id().into_inner(),
            owner_id: task.owner_id().as_str().to_owned(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            completed: flags.completed(),
            in_progress: flags.in_progress(),
            priority: task.priority().map(|value| value.as_str().to_owned()),
            category: task.category().map(|value| value.as_str().to_owned()),
            due_date: task.due_date(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

impl From<&Task> for TaskChangeset {
    fn from(task: &Task) -> Self {
        let flags = task.flags();
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            completed: flags.completed(),
            in_progress: flags.in_progress(),
            priority: task.priority().map(|value| value.as_str().to_owned()),
            category: task.category().map(|value| value.as_str().to_owned()),
            due_date: task.due_date(),
            updated_at: task.updated_at(),
        }
    }
}
