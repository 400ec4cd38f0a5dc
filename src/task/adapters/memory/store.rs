//! In-memory task store for tests and local sessions.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::access::domain::{AccessPolicy, Actor};
use crate::config::TaskovConfig;
use crate::task::{
    domain::{Task, TaskId, TaskPatch},
    ports::{FetchScope, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Records are kept in insertion order, which is also the fetch order.
/// Ownership is enforced with an [`AccessPolicy`]. Build the store with
/// [`InMemoryTaskStore::with_config`] from the same [`TaskovConfig`] the board
/// uses so both agree on role overrides.
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    tasks: Arc<RwLock<Vec<Task>>>,
    policy: Arc<AccessPolicy>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            policy: Arc::clone(&self.policy),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("tasks", &self.tasks)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store using the system clock and default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping updates with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            tasks: Arc::default(),
            policy: Arc::new(AccessPolicy::default()),
            clock,
        }
    }

    /// Replaces the ownership policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Enforces ownership with the role table from `config`.
    #[must_use]
    pub fn with_config(self, config: &TaskovConfig) -> Self {
        self.with_policy(config.access_policy())
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transient`] when the lock is poisoned.
    pub fn len(&self) -> TaskStoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns whether the store holds no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transient`] when the lock is poisoned.
    pub fn is_empty(&self) -> TaskStoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, Vec<Task>>> {
        self.tasks
            .read()
            .map_err(|err| TaskStoreError::transient(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, Vec<Task>>> {
        self.tasks
            .write()
            .map_err(|err| TaskStoreError::transient(std::io::Error::other(err.to_string())))
    }

    /// Locates a task the requester may touch.
    fn authorized_position(
        &self,
        tasks: &[Task],
        task_id: TaskId,
        requester: &Actor,
    ) -> TaskStoreResult<usize> {
        let position = tasks
            .iter()
            .position(|task| task.id() == task_id)
            .ok_or(TaskStoreError::NotFound(task_id))?;
        let allowed = tasks
            .get(position)
            .is_some_and(|task| self.policy.can_access(requester, task));
        if !allowed {
            return Err(TaskStoreError::NotAuthorized {
                task_id,
                requester: requester.id().clone(),
            });
        }
        Ok(position)
    }
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn fetch_tasks(&self, scope: FetchScope) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.read()?;
        Ok(tasks
            .iter()
            .filter(|task| scope.includes(task.owner_id()))
            .cloned()
            .collect())
    }

    async fn insert_task(&self, task: &Task) -> TaskStoreResult<()> {
        let mut tasks = self.write()?;
        if tasks.iter().any(|existing| existing.id() == task.id()) {
            return Err(TaskStoreError::Duplicate(task.id()));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn update_task_fields(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        requester: &Actor,
    ) -> TaskStoreResult<Task> {
        let mut tasks = self.write()?;
        let position = self.authorized_position(&tasks, task_id, requester)?;
        let task = tasks
            .get_mut(position)
            .ok_or(TaskStoreError::NotFound(task_id))?;
        task.apply_patch(patch, &*self.clock);
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId, requester: &Actor) -> TaskStoreResult<()> {
        let mut tasks = self.write()?;
        let position = self.authorized_position(&tasks, task_id, requester)?;
        tasks.remove(position);
        Ok(())
    }
}
