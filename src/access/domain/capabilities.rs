//! Capability sets granted to roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single permission a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create new tasks.
    Create,
    /// Edit tasks, including moving them between board columns.
    Edit,
    /// Delete tasks.
    Delete,
    /// See and operate on tasks owned by other users.
    ViewAll,
    /// Manage user accounts and role assignments.
    ManageUsers,
}

impl Capability {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::ViewAll => "view_all",
            Self::ManageUsers => "manage_users",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities granted to one role.
///
/// Missing fields deserialize as `false`, so configuration overrides only
/// need to list what a role is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    can_create: bool,
    can_edit: bool,
    can_delete: bool,
    can_view_all: bool,
    can_manage_users: bool,
}

impl Capabilities {
    /// Returns an empty capability set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            can_create: false,
            can_edit: false,
            can_delete: false,
            can_view_all: false,
            can_manage_users: false,
        }
    }

    /// Returns a capability set holding every capability.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            can_create: true,
            can_edit: true,
            can_delete: true,
            can_view_all: true,
            can_manage_users: true,
        }
    }

    /// Returns a copy of this set with `capability` granted.
    #[must_use]
    pub const fn grant(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Create => self.can_create = true,
            Capability::Edit => self.can_edit = true,
            Capability::Delete => self.can_delete = true,
            Capability::ViewAll => self.can_view_all = true,
            Capability::ManageUsers => self.can_manage_users = true,
        }
        self
    }

    /// Returns whether `capability` is part of this set.
    #[must_use]
    pub const fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::Create => self.can_create,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::ViewAll => self.can_view_all,
            Capability::ManageUsers => self.can_manage_users,
        }
    }
}
