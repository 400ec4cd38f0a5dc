//! Locally displayed board state with optimistic moves.

use crate::task::domain::{Task, TaskId, TaskStatus};
use mockable::Clock;
use std::collections::HashMap;

/// Record of a move applied locally but not yet confirmed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    task_id: TaskId,
    target: TaskStatus,
    previous: Task,
    revision: u64,
}

impl PendingMove {
    /// Returns the moved task's identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the destination column.
    #[must_use]
    pub const fn target(&self) -> TaskStatus {
        self.target
    }

    /// Returns the task as it was displayed before the move.
    ///
    /// This may itself be an unconfirmed optimistic state; failed moves are
    /// reverted to the last confirmed record instead.
    #[must_use]
    pub const fn previous(&self) -> &Task {
        &self.previous
    }

    /// Returns the revision stamped on the move.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Result of asking the board to start a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginMove {
    /// The task is not on the board.
    Unknown,
    /// The task already sits in the target column.
    Unchanged,
    /// The move was applied locally and awaits the store.
    Started(PendingMove),
}

/// How a store response was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The response was applied to the board.
    Applied,
    /// A newer move for the same task was begun. The response did not
    /// settle the displayed move; a late success still becomes the task's
    /// confirmed record.
    Stale,
}

/// Tasks as currently displayed, in fetch order.
///
/// Moves are applied immediately and stamped with a revision. Only the
/// response to the latest move of a task may change that task's status;
/// older responses are reported as [`Settlement::Stale`].
///
/// Alongside the displayed tasks the board keeps each task's last record
/// known to match the store. Refreshes, remote records and every successful
/// store response update it, and a failed latest move reverts to it.
#[derive(Debug, Clone, Default)]
pub struct OptimisticBoard {
    tasks: Vec<Task>,
    confirmed: HashMap<TaskId, Confirmed>,
    in_flight: HashMap<TaskId, u64>,
    next_revision: u64,
}

/// Last store record of a task and the revision of the move that produced it.
#[derive(Debug, Clone)]
struct Confirmed {
    task: Task,
    revision: u64,
}

impl OptimisticBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the displayed tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the displayed task with `task_id`.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Returns whether a move of `task_id` is awaiting the store.
    #[must_use]
    pub fn has_pending_move(&self, task_id: TaskId) -> bool {
        self.in_flight.contains_key(&task_id)
    }

    /// Replaces the board with freshly fetched tasks. Tasks with a move in
    /// flight keep their optimistic column.
    pub fn replace_all(&mut self, fetched: Vec<Task>) {
        for task in &fetched {
            self.record_confirmed(task.clone(), None);
        }
        let merged = fetched
            .into_iter()
            .map(|task| self.keep_pending_status(task))
            .collect();
        self.tasks = merged;
        let tasks = &self.tasks;
        self.in_flight
            .retain(|task_id, _| tasks.iter().any(|task| task.id() == *task_id));
        self.confirmed
            .retain(|task_id, _| tasks.iter().any(|task| task.id() == *task_id));
    }

    /// Appends a newly created task.
    pub fn insert(&mut self, task: Task) {
        self.record_confirmed(task.clone(), None);
        self.tasks.push(task);
    }

    /// Replaces a displayed task with a record returned by the store.
    /// A move in flight keeps its optimistic column.
    pub fn apply_remote(&mut self, task: Task) {
        if self.get(task.id()).is_none() {
            return;
        }
        self.record_confirmed(task.clone(), None);
        let merged = self.keep_pending_status(task);
        if let Some(slot) = self.slot_mut(merged.id()) {
            *slot = merged;
        }
    }

    /// Removes a task from the board.
    pub fn remove(&mut self, task_id: TaskId) -> Option<Task> {
        self.in_flight.remove(&task_id);
        self.confirmed.remove(&task_id);
        let position = self.tasks.iter().position(|task| task.id() == task_id)?;
        Some(self.tasks.remove(position))
    }

    /// Moves a task into `target` locally.
    pub fn begin_move(
        &mut self,
        task_id: TaskId,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> BeginMove {
        self.next_revision += 1;
        let revision = self.next_revision;

        let Some(task) = self.slot_mut(task_id) else {
            return BeginMove::Unknown;
        };
        if task.status() == target {
            return BeginMove::Unchanged;
        }

        let previous = task.clone();
        task.move_to(target, clock);
        self.in_flight.insert(task_id, revision);
        BeginMove::Started(PendingMove {
            task_id,
            target,
            previous,
            revision,
        })
    }

    /// Applies the store's record for a successful move.
    ///
    /// A stale success is not displayed while a newer move is in flight, but
    /// it becomes the confirmed record that a later failure reverts to. If
    /// the newer move has already been reverted, the record is displayed.
    pub fn confirm(&mut self, pending: &PendingMove, stored: Task) -> Settlement {
        if self.get(pending.task_id).is_none() {
            return Settlement::Stale;
        }
        let recorded = self.record_confirmed(stored.clone(), Some(pending.revision));
        let settlement = if self.settle(pending) {
            Settlement::Applied
        } else {
            Settlement::Stale
        };
        let shows_record = settlement == Settlement::Applied
            || (recorded && !self.has_pending_move(pending.task_id));
        if !shows_record {
            return settlement;
        }
        if let Some(slot) = self.slot_mut(pending.task_id) {
            *slot = stored;
        }
        settlement
    }

    /// Puts the task back to its last confirmed record after the latest move
    /// failed. A failure of an older move changes nothing.
    pub fn revert(&mut self, pending: &PendingMove) -> Settlement {
        if !self.settle(pending) {
            return Settlement::Stale;
        }
        let restored = self
            .confirmed
            .get(&pending.task_id)
            .map_or_else(|| pending.previous.clone(), |confirmed| confirmed.task.clone());
        if let Some(slot) = self.slot_mut(pending.task_id) {
            *slot = restored;
        }
        Settlement::Applied
    }

    /// Records `task` as matching the store. A move response only replaces a
    /// record produced by an older move; other records keep the revision.
    fn record_confirmed(&mut self, task: Task, move_revision: Option<u64>) -> bool {
        let task_id = task.id();
        let known = self.confirmed.get(&task_id).map(|confirmed| confirmed.revision);
        let revision = match (move_revision, known) {
            (Some(incoming), Some(current)) if incoming < current => return false,
            (Some(incoming), _) => incoming,
            (None, current) => current.unwrap_or_default(),
        };
        self.confirmed.insert(task_id, Confirmed { task, revision });
        true
    }

    /// Clears the in-flight marker when `pending` is the task's latest move.
    fn settle(&mut self, pending: &PendingMove) -> bool {
        let is_current = self.in_flight.get(&pending.task_id) == Some(&pending.revision);
        if is_current {
            self.in_flight.remove(&pending.task_id);
        }
        is_current
    }

    fn keep_pending_status(&self, task: Task) -> Task {
        if !self.has_pending_move(task.id()) {
            return task;
        }
        match self.get(task.id()) {
            Some(local) => task.with_flags(local.flags()),
            None => task,
        }
    }

    fn slot_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == task_id)
    }
}
