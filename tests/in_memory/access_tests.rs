//! Visibility and ownership across actors sharing one store.

use super::helpers::{FlakyStore, TestBoard, actor, open_board, seed, store};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;
use taskov::access::domain::{AuthorizationError, Role, UserId};
use taskov::config::TaskovConfig;
use taskov::task::{
    domain::{TaskPatch, TaskStatus},
    ports::{TaskStore, TaskStoreError},
    services::{BoardError, BoardService, CreateTaskRequest, TransitionOutcome},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_see_only_their_own_tasks(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let alice = open_board(&store, actor("alice", Role::User)?).await?;
    let bob = open_board(&store, actor("bob", Role::Guest)?).await?;
    seed(&alice, &["Alice one", "Alice two"]).await?;
    seed(&bob, &["Bob one"]).await?;

    alice.refresh().await?;
    bob.refresh().await?;

    eyre::ensure!(alice.tasks()?.len() == 2, "alice sees her two tasks");
    eyre::ensure!(bob.tasks()?.len() == 1, "bob sees his one task");
    eyre::ensure!(
        bob.tasks()?
            .iter()
            .all(|task| task.owner_id().as_str() == "bob"),
        "bob sees nothing of alice's"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_sees_and_moves_every_task(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let alice = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&alice, &["Quarterly plan"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;

    let admin = open_board(&store, actor("root", Role::Admin)?).await?;
    eyre::ensure!(admin.tasks()?.len() == 1, "admin sees alice's task");

    admin.apply_transition(task.id(), TaskStatus::InProgress).await?;
    alice.refresh().await?;

    eyre::ensure!(
        alice.column(TaskStatus::InProgress)?.len() == 1,
        "alice sees the admin's move after refresh"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_foreign_update(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let alice = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&alice, &["Private"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    let bob = actor("bob", Role::User)?;

    let update = store
        .inner()
        .update_task_fields(task.id(), &TaskPatch::transition(TaskStatus::Completed), &bob)
        .await;
    let delete = store.inner().delete_task(task.id(), &bob).await;

    eyre::ensure!(
        matches!(update, Err(TaskStoreError::NotAuthorized { .. })),
        "foreign update must be refused"
    );
    eyre::ensure!(
        matches!(delete, Err(TaskStoreError::NotAuthorized { .. })),
        "foreign delete must be refused"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_task_is_not_on_the_board(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let alice = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&alice, &["Private"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    let bob = open_board(&store, actor("bob", Role::User)?).await?;

    let result = bob.apply_transition(task.id(), TaskStatus::Completed).await;

    eyre::ensure!(
        matches!(result, Err(BoardError::UnknownTask(id)) if id == task.id()),
        "bob cannot reach alice's task"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_role_claim_falls_back_to_read_only(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let config = TaskovConfig::default();
    let session = config.actor(UserId::new("mallory")?, Some("owner"));
    eyre::ensure!(session.role() == Role::Viewer, "unknown claim maps to viewer");

    let board = BoardService::new(Arc::clone(&store), Arc::new(DefaultClock), session)
        .with_config(&config);
    let result = board.create_task(CreateTaskRequest::new("Sneaky")).await;

    eyre::ensure!(
        matches!(
            result,
            Err(BoardError::Authorization(
                AuthorizationError::MissingCapability { .. }
            ))
        ),
        "viewer cannot create"
    );
    eyre::ensure!(store.inner().is_empty()?, "nothing was stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_view_all_applies_to_board_and_store() -> eyre::Result<()> {
    let config = TaskovConfig::from_json_str(
        r#"{"roles": {"user": {"can_create": true, "can_edit": true, "can_view_all": true}}}"#,
    )?;
    let store = Arc::new(FlakyStore::with_config(&config));
    let open = |id: &str| -> eyre::Result<TestBoard> {
        Ok(
            BoardService::new(Arc::clone(&store), Arc::new(DefaultClock), actor(id, Role::User)?)
                .with_config(&config),
        )
    };
    let alice = open("alice")?;
    let created = seed(&alice, &["Shared plan"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;

    let bob = open("bob")?;
    bob.refresh().await?;
    eyre::ensure!(bob.tasks()?.len() == 1, "bob sees alice's task through the override");

    let outcome = bob.apply_transition(task.id(), TaskStatus::InProgress).await?;

    eyre::ensure!(
        matches!(outcome, TransitionOutcome::Moved(ref stored) if stored.status() == TaskStatus::InProgress),
        "the store honours the same override, got {outcome:?}"
    );
    Ok(())
}
