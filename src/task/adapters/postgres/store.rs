//! `PostgreSQL` store implementation for task records.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::access::domain::{AccessPolicy, Actor, UserId};
use crate::config::TaskovConfig;
use crate::task::{
    domain::{
        Category, PersistedTaskData, Priority, StatusFlags, Task, TaskDomainError, TaskId,
        TaskPatch, TaskTitle,
    },
    ports::{FetchScope, TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
///
/// Build it with [`PostgresTaskStore::with_config`] from the board's
/// [`TaskovConfig`] so role overrides apply to reads and writes alike.
pub struct PostgresTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync + 'static,
{
    pool: TaskPgPool,
    policy: Arc<AccessPolicy>,
    clock: Arc<C>,
}

impl<C> Clone for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            policy: Arc::clone(&self.policy),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTaskStore")
            .field("pool", &self.pool)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PostgresTaskStore<DefaultClock> {
    /// Creates a store from a connection pool using the system clock.
    #[must_use]
    pub fn new(pool: TaskPgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }
}

impl<C> PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a store stamping updates with `clock`.
    #[must_use]
    pub fn with_clock(pool: TaskPgPool, clock: Arc<C>) -> Self {
        Self {
            pool,
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

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::transient)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::transient)?
    }
}

#[async_trait]
impl<C> TaskStore for PostgresTaskStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn fetch_tasks(&self, scope: FetchScope) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let ordering = (tasks::created_at.asc(), tasks::id.asc());
            let rows = match &scope {
                FetchScope::All => tasks::table
                    .select(TaskRow::as_select())
                    .order(ordering)
                    .load::<TaskRow>(connection),
                FetchScope::Owner(owner) => tasks::table
                    .filter(tasks::owner_id.eq(owner.as_str()))
                    .select(TaskRow::as_select())
                    .order(ordering)
                    .load::<TaskRow>(connection),
            }
            .map_err(TaskStoreError::transient)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn insert_task(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = NewTaskRow::from(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::Duplicate(task_id)
                    }
                    _ => TaskStoreError::transient(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_task_fields(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        requester: &Actor,
    ) -> TaskStoreResult<Task> {
        let patch_val = patch.clone();
        let requester_val = requester.clone();
        let policy = Arc::clone(&self.policy);
        let clock = Arc::clone(&self.clock);

        self.run_blocking(move |connection| {
            connection.transaction::<Task, TaskStoreError, _>(|tx| {
                let mut task = lock_authorized(tx, &policy, task_id, &requester_val)?;
                task.apply_patch(&patch_val, &*clock);

                diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&TaskChangeset::from(&task))
                    .execute(tx)
                    .map_err(TaskStoreError::transient)?;
                Ok(task)
            })
        })
        .await
    }

    async fn delete_task(&self, task_id: TaskId, requester: &Actor) -> TaskStoreResult<()> {
        let requester_val = requester.clone();
        let policy = Arc::clone(&self.policy);

        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskStoreError, _>(|tx| {
                lock_authorized(tx, &policy, task_id, &requester_val)?;
                diesel::delete(tasks::table.find(task_id.into_inner()))
                    .execute(tx)
                    .map_err(TaskStoreError::transient)?;
                Ok(())
            })
        })
        .await
    }
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::transient(err)
    }
}

/// Loads a task row with a row lock and checks the requester may touch it.
fn lock_authorized(
    connection: &mut PgConnection,
    policy: &AccessPolicy,
    task_id: TaskId,
    requester: &Actor,
) -> TaskStoreResult<Task> {
    let row = tasks::table
        .find(task_id.into_inner())
        .select(TaskRow::as_select())
        .for_update()
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskStoreError::transient)?
        .ok_or(TaskStoreError::NotFound(task_id))?;
    let task = row_to_task(row)?;

    if !policy.can_access(requester, &task) {
        return Err(TaskStoreError::NotAuthorized {
            task_id,
            requester: requester.id().clone(),
        });
    }
    Ok(task)
}

pub(super) fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title,
        description,
        completed,
        in_progress,
        priority,
        category,
        due_date,
        created_at,
        updated_at,
    } = row;
    let task_id = TaskId::from_uuid(id);
    let invalid = |reason: String| TaskStoreError::InvalidRecord { task_id, reason };

    let owner = UserId::new(owner_id).map_err(|err| invalid(err.to_string()))?;
    let parsed_title = TaskTitle::new(title).map_err(|err| invalid(err.to_string()))?;
    let parsed_priority = priority
        .as_deref()
        .map(Priority::try_from)
        .transpose()
        .map_err(|err: TaskDomainError| invalid(err.to_string()))?;
    let parsed_category = category
        .as_deref()
        .map(Category::try_from)
        .transpose()
        .map_err(|err: TaskDomainError| invalid(err.to_string()))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: task_id,
        owner_id: owner,
        title: parsed_title,
        description,
        flags: StatusFlags::new(completed, in_progress),
        priority: parsed_priority,
        category: parsed_category,
        due_date,
        created_at,
        updated_at,
    }))
}
