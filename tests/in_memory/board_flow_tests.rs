//! End-to-end board flows over the in-memory store.

use super::helpers::{FlakyStore, actor, open_board, seed, store};
use chrono::{Duration, Utc};
use rstest::rstest;
use std::sync::Arc;
use taskov::access::domain::Role;
use taskov::task::{
    domain::{Category, DragEnd, Priority, Task, TaskStatus},
    ports::{FetchScope, TaskStore, TaskStoreError},
    services::{BoardError, CreateTaskRequest, DropOutcome, EditTaskRequest, TransitionOutcome},
};

fn drop_event(task: &Task, source: TaskStatus, destination: TaskStatus) -> DragEnd {
    DragEnd {
        dragged_item_id: task.id().to_string(),
        source_container_id: source.as_str().to_owned(),
        destination_container_id: Some(destination.as_str().to_owned()),
        source_index: 0,
        destination_index: Some(0),
    }
}

async fn stored_status(store: &FlakyStore, task: &Task) -> eyre::Result<Option<TaskStatus>> {
    let tasks = store.inner().fetch_tasks(FetchScope::All).await?;
    Ok(tasks
        .iter()
        .find(|stored| stored.id() == task.id())
        .map(Task::status))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn card_travels_across_all_columns(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Prepare slides"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    eyre::ensure!(task.status() == TaskStatus::Todo, "new tasks start in todo");

    let path = [
        (TaskStatus::Todo, TaskStatus::InProgress),
        (TaskStatus::InProgress, TaskStatus::Completed),
        (TaskStatus::Completed, TaskStatus::Todo),
    ];
    for (source, destination) in path {
        let outcome = board
            .handle_drag_end(&drop_event(task, source, destination))
            .await?;
        eyre::ensure!(
            matches!(outcome, DropOutcome::Transition(TransitionOutcome::Moved(_))),
            "expected a persisted move into {destination}"
        );
        eyre::ensure!(
            stored_status(&store, task).await? == Some(destination),
            "store should hold {destination}"
        );
        eyre::ensure!(
            board.column(destination)?.len() == 1,
            "board should show the card in {destination}"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_board_shows_persisted_columns(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let alice = actor("alice", Role::User)?;
    let board = open_board(&store, alice.clone()).await?;
    let created = seed(&board, &["One", "Two", "Three"]).await?;
    let [one, two, _three] = created.as_slice() else {
        eyre::bail!("expected three tasks");
    };
    board.apply_transition(one.id(), TaskStatus::Completed).await?;
    board.apply_transition(two.id(), TaskStatus::InProgress).await?;

    let reopened = open_board(&store, alice).await?;

    eyre::ensure!(reopened.column(TaskStatus::Todo)?.len() == 1, "one todo");
    eyre::ensure!(reopened.column(TaskStatus::InProgress)?.len() == 1, "one in progress");
    eyre::ensure!(reopened.column(TaskStatus::Completed)?.len() == 1, "one completed");
    eyre::ensure!(reopened.tasks()? == board.tasks()?, "both boards agree");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_write_puts_card_back(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Book venue"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    store.fail_updates(true);

    let result = board
        .handle_drag_end(&drop_event(task, TaskStatus::Todo, TaskStatus::Completed))
        .await;

    let Err(BoardError::Persistence(err)) = &result else {
        eyre::bail!("expected a persistence error, got {result:?}");
    };
    eyre::ensure!(err.is_transient(), "failure should be transient");
    eyre::ensure!(board.tasks()? == created, "card should be back in todo");
    eyre::ensure!(
        stored_status(&store, task).await? == Some(TaskStatus::Todo),
        "store should be untouched"
    );

    store.fail_updates(false);
    board.apply_transition(task.id(), TaskStatus::Completed).await?;
    eyre::ensure!(
        stored_status(&store, task).await? == Some(TaskStatus::Completed),
        "retry by the user should persist"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlapping_failed_moves_leave_card_in_stored_column(
    store: Arc<FlakyStore>,
) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Book venue"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    store.fail_updates(true);
    store.hold_next_update();

    let first = board.apply_transition(task.id(), TaskStatus::InProgress);
    let second = async {
        store.held_update_arrived().await;
        let result = board.apply_transition(task.id(), TaskStatus::Completed).await;
        store.release_held_update();
        result
    };
    let (first, second) = tokio::join!(first, second);

    eyre::ensure!(
        matches!(first, Err(BoardError::Persistence(_))),
        "first move should fail, got {first:?}"
    );
    eyre::ensure!(
        matches!(second, Err(BoardError::Persistence(_))),
        "second move should fail, got {second:?}"
    );
    eyre::ensure!(board.tasks()? == created, "card should be back in todo");
    eyre::ensure!(
        stored_status(&store, task).await? == Some(TaskStatus::Todo),
        "store should be untouched"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_response_to_older_move_is_superseded(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Call caterer"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;
    store.hold_next_update();

    let first = board.apply_transition(task.id(), TaskStatus::InProgress);
    let second = async {
        store.held_update_arrived().await;
        let result = board.apply_transition(task.id(), TaskStatus::Completed).await;
        store.release_held_update();
        result
    };
    let (first, second) = tokio::join!(first, second);

    eyre::ensure!(
        matches!(first?, TransitionOutcome::Superseded(ref stored) if stored.status() == TaskStatus::InProgress),
        "older response should be reported as superseded"
    );
    eyre::ensure!(
        matches!(second?, TransitionOutcome::Moved(ref stored) if stored.status() == TaskStatus::Completed),
        "newer move should be applied"
    );
    eyre::ensure!(board.column(TaskStatus::Completed)?.len() == 1, "board shows completed");
    eyre::ensure!(
        stored_status(&store, task).await? == Some(TaskStatus::Completed),
        "store holds the newer move"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_and_delete_round_trip(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Draft"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;

    let edited = board
        .edit_task(
            task.id(),
            EditTaskRequest::new()
                .with_title("Final draft")
                .with_priority(Some(Priority::High))
                .with_category(Some(Category::Study)),
        )
        .await?;
    eyre::ensure!(edited.title().as_str() == "Final draft", "title updated");
    eyre::ensure!(edited.priority() == Some(Priority::High), "priority updated");
    eyre::ensure!(edited.status() == TaskStatus::Todo, "edit keeps the column");
    eyre::ensure!(board.tasks()? == vec![edited.clone()], "board shows the edit");

    board.delete_task(task.id()).await?;
    eyre::ensure!(board.tasks()?.is_empty(), "board is empty after delete");
    eyre::ensure!(store.inner().is_empty()?, "store is empty after delete");

    let again = board.delete_task(task.id()).await;
    eyre::ensure!(
        matches!(again, Err(BoardError::UnknownTask(_))),
        "deleting twice is rejected"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_insert_is_rejected_by_store(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let created = seed(&board, &["Only once"]).await?;
    let task = created
        .first()
        .ok_or_else(|| eyre::eyre!("expected a created task"))?;

    let result = store.inner().insert_task(task).await;

    eyre::ensure!(
        matches!(result, Err(TaskStoreError::Duplicate(id)) if id == task.id()),
        "second insert should be a duplicate"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_views_reflect_board(store: Arc<FlakyStore>) -> eyre::Result<()> {
    let board = open_board(&store, actor("alice", Role::User)?).await?;
    let now = Utc::now();
    let late = board
        .create_task(CreateTaskRequest::new("Late").with_due_date(now - Duration::days(2)))
        .await?;
    let soon = board
        .create_task(CreateTaskRequest::new("Soon").with_due_date(now + Duration::days(1)))
        .await?;
    let done = board
        .create_task(CreateTaskRequest::new("Done").with_due_date(now - Duration::days(1)))
        .await?;
    board.apply_transition(done.id(), TaskStatus::Completed).await?;

    let overdue = board.overdue()?;
    let upcoming = board.upcoming()?;
    let due_tomorrow = board.due_on((now + Duration::days(1)).date_naive())?;
    let stats = board.stats()?;

    eyre::ensure!(overdue == vec![late.clone()], "only the open late task is overdue");
    eyre::ensure!(upcoming == vec![late, soon.clone()], "open dated tasks, soonest first");
    eyre::ensure!(due_tomorrow == vec![soon], "calendar day lookup");
    eyre::ensure!(stats.total == 3 && stats.completed == 1, "stats count the board");
    eyre::ensure!(stats.overdue == 1, "completed tasks are never overdue");
    eyre::ensure!(stats.completion_percent() == 33, "one of three completed");
    Ok(())
}
