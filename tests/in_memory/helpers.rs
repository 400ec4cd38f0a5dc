//! Shared test helpers for in-memory store integration tests.

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use taskov::config::TaskovConfig;
use taskov::access::domain::{Actor, Role, UserId};
use taskov::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Task, TaskId, TaskPatch},
    ports::{FetchScope, TaskStore, TaskStoreError, TaskStoreResult},
    services::{BoardService, CreateTaskRequest},
};
use tokio::sync::Notify;

/// Board service over the switchable store.
pub type TestBoard = BoardService<FlakyStore, DefaultClock>;

/// In-memory store whose updates can be made to fail or stall on demand.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryTaskStore,
    failing: Arc<AtomicBool>,
    hold_next: Arc<AtomicBool>,
    held: Arc<Notify>,
    release: Arc<Notify>,
}

impl FlakyStore {
    /// Wraps a store built with `config`'s access policy.
    pub fn with_config(config: &TaskovConfig) -> Self {
        Self {
            inner: InMemoryTaskStore::new().with_config(config),
            ..Self::default()
        }
    }

    /// Makes the next update wait for [`FlakyStore::release_held_update`]
    /// before its response is returned. The write itself happens first.
    pub fn hold_next_update(&self) {
        self.hold_next.store(true, Ordering::SeqCst);
    }

    /// Waits until the held update has reached the store.
    pub async fn held_update_arrived(&self) {
        self.held.notified().await;
    }

    /// Lets the held update return its response.
    pub fn release_held_update(&self) {
        self.release.notify_one();
    }

    /// Makes subsequent updates fail with a transient error.
    pub fn fail_updates(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the wrapped store.
    pub const fn inner(&self) -> &InMemoryTaskStore {
        &self.inner
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn fetch_tasks(&self, scope: FetchScope) -> TaskStoreResult<Vec<Task>> {
        self.inner.fetch_tasks(scope).await
    }

    async fn insert_task(&self, task: &Task) -> TaskStoreResult<()> {
        self.inner.insert_task(task).await
    }

    async fn update_task_fields(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        requester: &Actor,
    ) -> TaskStoreResult<Task> {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(TaskStoreError::transient(std::io::Error::other(
                "network unreachable",
            )))
        } else {
            self.inner.update_task_fields(task_id, patch, requester).await
        };
        if self.hold_next.swap(false, Ordering::SeqCst) {
            self.held.notify_one();
            self.release.notified().await;
        }
        result
    }

    async fn delete_task(&self, task_id: TaskId, requester: &Actor) -> TaskStoreResult<()> {
        self.inner.delete_task(task_id, requester).await
    }
}

/// Provides a fresh shared store for each test.
#[fixture]
pub fn store() -> Arc<FlakyStore> {
    Arc::new(FlakyStore::default())
}

/// Builds an actor.
///
/// # Errors
///
/// Returns an error if `id` is blank.
pub fn actor(id: &str, role: Role) -> eyre::Result<Actor> {
    Ok(Actor::new(UserId::new(id)?, role))
}

/// Opens a board for `actor` over `store` and loads it.
///
/// # Errors
///
/// Returns an error if the initial refresh fails.
pub async fn open_board(store: &Arc<FlakyStore>, actor: Actor) -> eyre::Result<TestBoard> {
    let board = BoardService::new(Arc::clone(store), Arc::new(DefaultClock), actor);
    board.refresh().await?;
    Ok(board)
}

/// Creates tasks with the given titles through `board`.
///
/// # Errors
///
/// Returns an error if any creation fails.
pub async fn seed(board: &TestBoard, titles: &[&str]) -> eyre::Result<Vec<Task>> {
    let mut created = Vec::with_capacity(titles.len());
    for title in titles {
        created.push(board.create_task(CreateTaskRequest::new(*title)).await?);
    }
    Ok(created)
}
