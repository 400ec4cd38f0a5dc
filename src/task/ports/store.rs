//! Store port for remote task records.

use crate::access::domain::{Actor, UserId};
use crate::task::domain::{Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Which records a fetch should return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchScope {
    /// Every task, for actors allowed to view all tasks.
    All,
    /// Only tasks owned by the given user.
    Owner(UserId),
}

impl FetchScope {
    /// Returns whether a task owned by `owner` falls inside the scope.
    #[must_use]
    pub fn includes(&self, owner: &UserId) -> bool {
        match self {
            Self::All => true,
            Self::Owner(id) => id == owner,
        }
    }
}

/// Remote task record store.
///
/// Implementations enforce ownership on their side too: the requester must
/// own the task or hold an elevated role, otherwise the call is rejected with
/// [`TaskStoreError::NotAuthorized`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns the tasks in `scope`, in store order.
    async fn fetch_tasks(&self, scope: FetchScope) -> TaskStoreResult<Vec<Task>>;

    /// Stores a newly created task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Duplicate`] when the identifier already
    /// exists.
    async fn insert_task(&self, task: &Task) -> TaskStoreResult<()>;

    /// Applies `patch` to a task and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist or
    /// [`TaskStoreError::NotAuthorized`] when the requester may not modify
    /// it.
    async fn update_task_fields(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        requester: &Actor,
    ) -> TaskStoreResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist or
    /// [`TaskStoreError::NotAuthorized`] when the requester may not delete
    /// it.
    async fn delete_task(&self, task_id: TaskId, requester: &Actor) -> TaskStoreResult<()>;
}

/// Rejections returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The requester may not act on the task.
    #[error("user {requester} is not authorized to modify task {task_id}")]
    NotAuthorized {
        /// Target task.
        task_id: TaskId,
        /// Rejected requester.
        requester: UserId,
    },

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    Duplicate(TaskId),

    /// A stored record could not be mapped back to a task.
    #[error("invalid stored record for task {task_id}: {reason}")]
    InvalidRecord {
        /// Identifier of the offending record.
        task_id: TaskId,
        /// What was wrong with it.
        reason: String,
    },

    /// Network or backend failure; the call may succeed if repeated.
    #[error("transient store failure: {0}")]
    Transient(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transient backend error.
    pub fn transient(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transient(Arc::new(err))
    }

    /// Returns whether repeating the call could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
