//! Read-side selections used by the list, dashboard and calendar views.

use super::{Category, Priority, Task};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Completion filter offered by the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFilter {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks that are not completed, in progress or not.
    Pending,
}

impl CompletionFilter {
    const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.is_completed(),
            Self::Pending => !task.is_completed(),
        }
    }
}

/// Search and filter criteria for the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskQuery {
    search: Option<String>,
    priority: Option<Priority>,
    category: Option<Category>,
    completion: CompletionFilter,
}

impl TaskQuery {
    /// Creates a query that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to tasks whose title or description contains `term`,
    /// ignoring case. A blank term matches everything.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let raw = term.into();
        let trimmed = raw.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts by completion.
    #[must_use]
    pub const fn with_completion(mut self, completion: CompletionFilter) -> Self {
        self.completion = completion;
        self
    }

    /// Returns whether the query filters nothing out.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.search.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && matches!(self.completion, CompletionFilter::All)
    }

    /// Returns whether `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.priority.is_none_or(|priority| task.priority() == Some(priority))
            && self.category.is_none_or(|category| task.category() == Some(category))
            && self.completion.matches(task)
    }

    /// Returns the matching tasks in input order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    fn matches_search(&self, task: &Task) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        task.title().as_str().to_lowercase().contains(term)
            || task
                .description()
                .is_some_and(|description| description.to_lowercase().contains(term))
    }
}

/// Returns up to `limit` tasks, newest first.
#[must_use]
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut recent: Vec<&Task> = tasks.iter().collect();
    recent.sort_by_key(|task| Reverse(task.created_at()));
    recent.truncate(limit);
    recent
}

/// Returns up to `limit` open tasks with a due date, soonest first.
#[must_use]
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.is_completed() && task.due_date().is_some())
        .collect();
    upcoming.sort_by_key(|task| task.due_date());
    upcoming.truncate(limit);
    upcoming
}

/// Returns the tasks due on `date` (UTC calendar day), in input order.
#[must_use]
pub fn tasks_due_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            task.due_date()
                .is_some_and(|due| due.date_naive() == date)
        })
        .collect()
}

/// Returns the open tasks whose due date lies before `now`.
#[must_use]
pub fn overdue_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|task| is_overdue(task, now)).collect()
}

pub(super) fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.is_completed() && task.due_date().is_some_and(|due| due < now)
}
