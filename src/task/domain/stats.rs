//! Analytics counters over a task collection.

use super::{Category, Priority, Task, TaskStatus, query::is_overdue};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Task counts per priority. Tasks without a priority are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    /// High-priority tasks.
    pub high: usize,
    /// Medium-priority tasks.
    pub medium: usize,
    /// Low-priority tasks.
    pub low: usize,
}

impl PriorityBreakdown {
    /// Returns the count for `priority`.
    #[must_use]
    pub const fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    const fn slot(&mut self, priority: Priority) -> &mut usize {
        match priority {
            Priority::High => &mut self.high,
            Priority::Medium => &mut self.medium,
            Priority::Low => &mut self.low,
        }
    }
}

/// Completed and pending counts within one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Completed tasks.
    pub completed: usize,
    /// Tasks not yet completed.
    pub pending: usize,
}

impl CategoryCount {
    /// Returns the number of tasks in the category.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.completed + self.pending
    }
}

/// Task counts per category. Tasks without a category are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Work tasks.
    pub work: CategoryCount,
    /// Personal tasks.
    pub personal: CategoryCount,
    /// Study tasks.
    pub study: CategoryCount,
}

impl CategoryBreakdown {
    /// Returns the counts for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> CategoryCount {
        match category {
            Category::Work => self.work,
            Category::Personal => self.personal,
            Category::Study => self.study,
        }
    }

    const fn slot(&mut self, category: Category) -> &mut CategoryCount {
        match category {
            Category::Work => &mut self.work,
            Category::Personal => &mut self.personal,
            Category::Study => &mut self.study,
        }
    }
}

/// Snapshot of dashboard analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Tasks in the `completed` column.
    pub completed: usize,
    /// Tasks not completed (`todo` plus `inProgress`).
    pub pending: usize,
    /// Tasks in the `todo` column.
    pub todo: usize,
    /// Tasks in the `inProgress` column.
    pub in_progress: usize,
    /// Open tasks past their due date.
    pub overdue: usize,
    /// Tasks created within the reporting window.
    pub created_in_window: usize,
    /// Completed tasks last touched within the reporting window.
    pub completed_in_window: usize,
    /// Counts per priority.
    pub by_priority: PriorityBreakdown,
    /// Completed/pending counts per category.
    pub by_category: CategoryBreakdown,
}

impl TaskStats {
    /// Computes the counters at instant `now`, with the reporting window
    /// spanning `window` back from `now`.
    #[must_use]
    pub fn compute<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let window_start = now - window;
        let mut stats = Self::default();

        for task in tasks {
            stats.total += 1;
            match task.status() {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if is_overdue(task, now) {
                stats.overdue += 1;
            }
            if task.created_at() >= window_start {
                stats.created_in_window += 1;
            }
            if task.is_completed() && task.updated_at() >= window_start {
                stats.completed_in_window += 1;
            }
            if let Some(priority) = task.priority() {
                *stats.by_priority.slot(priority) += 1;
            }
            if let Some(category) = task.category() {
                let count = stats.by_category.slot(category);
                if task.is_completed() {
                    count.completed += 1;
                } else {
                    count.pending += 1;
                }
            }
        }

        stats.pending = stats.total - stats.completed;
        stats
    }

    /// Returns the completed share as a whole percentage, rounded down.
    /// An empty collection reports zero.
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        let percent = (self.completed * 100).checked_div(self.total).unwrap_or(0);
        u8::try_from(percent).unwrap_or(100)
    }
}
