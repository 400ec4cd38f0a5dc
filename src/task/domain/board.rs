//! Partitioning of a task collection into kanban columns.

use super::{Task, TaskStatus, classify};

/// Returns the tasks that belong to `column`, in input order.
#[must_use]
pub fn tasks_in_column(tasks: &[Task], column: TaskStatus) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| classify(task) == column)
        .collect()
}

/// A task collection split into the three board columns.
///
/// Each input task lands in exactly one column; order within a column is
/// the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board<'a> {
    todo: Vec<&'a Task>,
    in_progress: Vec<&'a Task>,
    completed: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    /// Builds all three columns in a single pass.
    #[must_use]
    pub fn partition(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            board.column_mut(classify(task)).push(task);
        }
        board
    }

    /// Returns the tasks in `column`.
    #[must_use]
    pub fn column(&self, column: TaskStatus) -> &[&'a Task] {
        match column {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    /// Returns the number of tasks in `column`.
    #[must_use]
    pub fn count(&self, column: TaskStatus) -> usize {
        self.column(column).len()
    }

    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.completed.len()
    }

    /// Returns whether every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    fn column_mut(&mut self, column: TaskStatus) -> &mut Vec<&'a Task> {
        match column {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }
}
