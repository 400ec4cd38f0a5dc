//! Builders shared by the task unit tests.

use crate::access::domain::{Actor, Role, UserId};
use crate::task::domain::{
    Category, PersistedTaskData, Priority, StatusFlags, Task, TaskId, TaskTitle,
};
use chrono::{DateTime, TimeZone, Utc};

pub(super) fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub(super) fn actor(id: &str, role: Role) -> Actor {
    Actor::new(user(id), role)
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Fluent builder over [`PersistedTaskData`] with fixed timestamps.
pub(super) struct TaskFixture {
    data: PersistedTaskData,
}

impl TaskFixture {
    pub(super) fn new(owner: &str, title: &str) -> Self {
        Self {
            data: PersistedTaskData {
                id: TaskId::new(),
                owner_id: user(owner),
                title: TaskTitle::new(title).expect("valid title"),
                description: None,
                flags: StatusFlags::default(),
                priority: None,
                category: None,
                due_date: None,
                created_at: at(1, 9),
                updated_at: at(1, 9),
            },
        }
    }

    pub(super) const fn id(mut self, id: TaskId) -> Self {
        self.data.id = id;
        self
    }

    pub(super) const fn flags(mut self, completed: bool, in_progress: bool) -> Self {
        self.data.flags = StatusFlags::new(completed, in_progress);
        self
    }

    pub(super) fn description(mut self, description: &str) -> Self {
        self.data.description = Some(description.to_owned());
        self
    }

    pub(super) const fn priority(mut self, priority: Priority) -> Self {
        self.data.priority = Some(priority);
        self
    }

    pub(super) const fn category(mut self, category: Category) -> Self {
        self.data.category = Some(category);
        self
    }

    pub(super) const fn due(mut self, due: DateTime<Utc>) -> Self {
        self.data.due_date = Some(due);
        self
    }

    pub(super) const fn created(mut self, created_at: DateTime<Utc>) -> Self {
        self.data.created_at = created_at;
        self.data.updated_at = created_at;
        self
    }

    pub(super) const fn updated(mut self, updated_at: DateTime<Utc>) -> Self {
        self.data.updated_at = updated_at;
        self
    }

    pub(super) fn build(self) -> Task {
        Task::from_persisted(self.data)
    }
}
