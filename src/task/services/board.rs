//! Board service: access checks, optimistic moves and persistence.

use super::optimistic::{BeginMove, OptimisticBoard, Settlement};
use crate::access::domain::{AccessPolicy, Actor, AuthorizationError, Capability};
use crate::config::{DashboardSettings, TaskovConfig};
use crate::task::{
    domain::{
        Category, DragEnd, DragIntent, Priority, Task, TaskDetails, TaskDomainError, TaskId,
        TaskPatch, TaskQuery, TaskStats, TaskStatus, TaskTitle, overdue_tasks, recent_tasks,
        tasks_due_on, tasks_in_column, upcoming_tasks,
    },
    ports::{FetchScope, TaskStore, TaskStoreError},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Input did not describe a valid task, column or identifier.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    /// The store rejected or failed the call.
    #[error(transparent)]
    Persistence(#[from] TaskStoreError),
    /// The task is not on the actor's board.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),
    /// A previous holder of the board lock panicked.
    #[error("board state lock poisoned")]
    LockPoisoned,
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Outcome of a transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task was already in the target column; nothing was sent.
    Unchanged,
    /// The store accepted the move and returned this record.
    Moved(Task),
    /// The store accepted the move, but a newer move of the same task had
    /// already begun, so the board kept showing that one.
    Superseded(Task),
}

/// Outcome of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped outside the board or cancelled.
    Cancelled,
    /// Dropped back into the slot it came from.
    Unmoved,
    /// Forwarded to the transition applier.
    Transition(TransitionOutcome),
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    details: TaskDetails,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: TaskDetails::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.details = self.details.with_description(description);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.details = self.details.with_priority(priority);
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.details = self.details.with_category(category);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.details = self.details.with_due_date(due_date);
        self
    }
}

/// Request payload for editing a task's descriptive fields.
///
/// Status is not editable here; columns change only through
/// [`BoardService::apply_transition`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    priority: Option<Option<Priority>>,
    category: Option<Option<Category>>,
    due_date: Option<Option<DateTime<Utc>>>,
}

impl EditTaskRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets or clears the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the category.
    #[must_use]
    pub const fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        let mut patch = TaskPatch::default();
        if let Some(title) = self.title {
            patch = patch.with_title(TaskTitle::new(title)?);
        }
        if let Some(description) = self.description {
            patch = patch.with_description(description);
        }
        if let Some(priority) = self.priority {
            patch = patch.with_priority(priority);
        }
        if let Some(category) = self.category {
            patch = patch.with_category(category);
        }
        if let Some(due_date) = self.due_date {
            patch = patch.with_due_date(due_date);
        }
        Ok(patch)
    }
}

/// Kanban board for one actor.
///
/// Holds the tasks the actor may see, applies drag-drop moves optimistically
/// and reconciles them with the store. The board lock is never held across
/// a store call.
#[derive(Clone)]
pub struct BoardService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    policy: Arc<AccessPolicy>,
    dashboard: DashboardSettings,
    actor: Actor,
    board: Arc<RwLock<OptimisticBoard>>,
}

impl<S, C> BoardService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates an empty board for `actor` with default configuration.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, actor: Actor) -> Self {
        Self {
            store,
            clock,
            policy: Arc::new(AccessPolicy::default()),
            dashboard: DashboardSettings::default(),
            actor,
            board: Arc::default(),
        }
    }

    /// Applies the access policy and dashboard limits from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &TaskovConfig) -> Self {
        self.policy = Arc::new(config.access_policy());
        self.dashboard = config.dashboard;
        self
    }

    /// Returns the actor the board belongs to.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Reloads the board from the store and returns the number of visible
    /// tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] when the fetch fails.
    pub async fn refresh(&self) -> BoardResult<usize> {
        let scope = if self.policy.allows(&self.actor, Capability::ViewAll) {
            FetchScope::All
        } else {
            FetchScope::Owner(self.actor.id().clone())
        };

        let fetched = self.store.fetch_tasks(scope).await.inspect_err(|err| {
            warn!(actor = %self.actor.id(), error = %err, "task fetch failed");
        })?;
        let visible = self.policy.retain_visible(fetched, &self.actor);
        let count = visible.len();
        self.write_board()?.replace_all(visible);
        debug!(actor = %self.actor.id(), count, "board refreshed");
        Ok(count)
    }

    /// Returns the tasks the actor may see, in fetch order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn tasks(&self) -> BoardResult<Vec<Task>> {
        let board = self.read_board()?;
        Ok(self
            .policy
            .visible(board.tasks(), &self.actor)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the visible tasks in `column`, in fetch order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn column(&self, column: TaskStatus) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(tasks_in_column(&tasks, column).into_iter().cloned().collect())
    }

    /// Moves a task into `target` and persists the change.
    ///
    /// The move shows on the board immediately. If the store rejects it,
    /// the task returns to the last column the store confirmed, unless a
    /// newer move has been made in the meantime. A success that arrives
    /// after a newer move began is reported as
    /// [`TransitionOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] when the task is not on the board,
    /// [`BoardError::Authorization`] when the actor may not edit it, or
    /// [`BoardError::Persistence`] when the store update fails.
    pub async fn apply_transition(
        &self,
        task_id: TaskId,
        target: TaskStatus,
    ) -> BoardResult<TransitionOutcome> {
        let pending = {
            let mut board = self.write_board()?;
            let task = board.get(task_id).ok_or(BoardError::UnknownTask(task_id))?;
            self.guard(Capability::Edit, task)?;

            match board.begin_move(task_id, target, &*self.clock) {
                BeginMove::Unknown => return Err(BoardError::UnknownTask(task_id)),
                BeginMove::Unchanged => {
                    debug!(task_id = %task_id, target = %target, "task already in target column");
                    return Ok(TransitionOutcome::Unchanged);
                }
                BeginMove::Started(pending) => pending,
            }
        };

        let patch = TaskPatch::transition(target);
        let result = self
            .store
            .update_task_fields(task_id, &patch, &self.actor)
            .await;

        let mut board = self.write_board()?;
        match result {
            Ok(stored) => {
                if board.confirm(&pending, stored.clone()) == Settlement::Stale {
                    debug!(task_id = %task_id, target = %target, "superseded transition confirmed");
                    return Ok(TransitionOutcome::Superseded(stored));
                }
                info!(
                    task_id = %task_id,
                    from = %pending.previous().status(),
                    target = %target,
                    "task moved"
                );
                Ok(TransitionOutcome::Moved(stored))
            }
            Err(err) => {
                let settlement = board.revert(&pending);
                warn!(
                    task_id = %task_id,
                    target = %target,
                    reverted = settlement == Settlement::Applied,
                    error = %err,
                    "task move failed"
                );
                Err(BoardError::Persistence(err))
            }
        }
    }

    /// Translates a drag-end event into a transition or a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when the event names an unknown
    /// column or a malformed task id, otherwise the errors of
    /// [`BoardService::apply_transition`].
    pub async fn handle_drag_end(&self, event: &DragEnd) -> BoardResult<DropOutcome> {
        let intent = event.resolve().inspect_err(|err| {
            error!(
                dragged = %event.dragged_item_id,
                destination = ?event.destination_container_id,
                error = %err,
                "rejected drag event"
            );
        })?;

        match intent {
            DragIntent::Cancelled => {
                debug!(dragged = %event.dragged_item_id, "drag cancelled");
                Ok(DropOutcome::Cancelled)
            }
            DragIntent::Unmoved => {
                debug!(dragged = %event.dragged_item_id, "drag ended where it started");
                Ok(DropOutcome::Unmoved)
            }
            DragIntent::Move { task_id, target } => self
                .apply_transition(task_id, target)
                .await
                .map(DropOutcome::Transition),
        }
    }

    /// Creates a task owned by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Authorization`] when the actor may not create
    /// tasks, [`BoardError::Validation`] for an empty title, or
    /// [`BoardError::Persistence`] when the store rejects the insert.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardResult<Task> {
        self.policy
            .ensure_allowed(&self.actor, Capability::Create)
            .inspect_err(|err| warn!(error = %err, "task creation rejected"))?;

        let title = TaskTitle::new(request.title)?;
        let task = Task::new(
            self.actor.id().clone(),
            title,
            request.details,
            &*self.clock,
        );
        self.store.insert_task(&task).await?;
        self.write_board()?.insert(task.clone());
        info!(task_id = %task.id(), owner = %task.owner_id(), "task created");
        Ok(task)
    }

    /// Edits a task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`], [`BoardError::Authorization`],
    /// [`BoardError::Validation`] for an empty title, or
    /// [`BoardError::Persistence`] when the store update fails.
    pub async fn edit_task(&self, task_id: TaskId, request: EditTaskRequest) -> BoardResult<Task> {
        let current = self.guarded_task(task_id, Capability::Edit)?;
        let patch = request.into_patch()?;
        if patch.is_empty() {
            return Ok(current);
        }

        let stored = self
            .store
            .update_task_fields(task_id, &patch, &self.actor)
            .await
            .inspect_err(|err| warn!(task_id = %task_id, error = %err, "task edit failed"))?;
        self.write_board()?.apply_remote(stored.clone());
        info!(task_id = %task_id, "task edited");
        Ok(stored)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`], [`BoardError::Authorization`], or
    /// [`BoardError::Persistence`] when the store rejects the delete.
    pub async fn delete_task(&self, task_id: TaskId) -> BoardResult<()> {
        self.guarded_task(task_id, Capability::Delete)?;
        self.store
            .delete_task(task_id, &self.actor)
            .await
            .inspect_err(|err| warn!(task_id = %task_id, error = %err, "task delete failed"))?;
        self.write_board()?.remove(task_id);
        info!(task_id = %task_id, "task deleted");
        Ok(())
    }

    /// Returns the visible tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn search(&self, query: &TaskQuery) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(query.apply(&tasks).into_iter().cloned().collect())
    }

    /// Returns the newest tasks, up to the configured limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn recent(&self) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(recent_tasks(&tasks, self.dashboard.recent_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the soonest-due open tasks, up to the configured limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn upcoming(&self) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(upcoming_tasks(&tasks, self.dashboard.upcoming_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the tasks due on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn due_on(&self, date: NaiveDate) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(tasks_due_on(&tasks, date).into_iter().cloned().collect())
    }

    /// Returns the open tasks past their due date.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn overdue(&self) -> BoardResult<Vec<Task>> {
        let tasks = self.tasks()?;
        Ok(overdue_tasks(&tasks, self.clock.utc())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Computes analytics over the visible tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LockPoisoned`] when the board lock is poisoned.
    pub fn stats(&self) -> BoardResult<TaskStats> {
        let tasks = self.tasks()?;
        Ok(TaskStats::compute(
            &tasks,
            self.clock.utc(),
            self.dashboard.stats_window(),
        ))
    }

    /// Looks a task up and checks the actor may exercise `capability` on it.
    fn guarded_task(&self, task_id: TaskId, capability: Capability) -> BoardResult<Task> {
        let board = self.read_board()?;
        let task = board.get(task_id).ok_or(BoardError::UnknownTask(task_id))?;
        self.guard(capability, task)?;
        Ok(task.clone())
    }

    fn guard(&self, capability: Capability, task: &Task) -> BoardResult<()> {
        self.policy
            .ensure_can(&self.actor, capability, task)
            .inspect_err(|err| {
                warn!(task_id = %task.id(), capability = %capability, error = %err, "access denied");
            })?;
        Ok(())
    }

    fn read_board(&self) -> BoardResult<RwLockReadGuard<'_, OptimisticBoard>> {
        self.board.read().map_err(|_| BoardError::LockPoisoned)
    }

    fn write_board(&self) -> BoardResult<RwLockWriteGuard<'_, OptimisticBoard>> {
        self.board.write().map_err(|_| BoardError::LockPoisoned)
    }
}
