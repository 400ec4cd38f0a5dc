//! The access predicate shared by read and write paths.

use super::{Actor, AuthorizationError, Capabilities, Capability, Role, UserId};
use std::collections::HashMap;

/// Anything that belongs to exactly one user.
pub trait Owned {
    /// Returns the owning user's identifier.
    fn owner_id(&self) -> &UserId;
}

impl<T: Owned + ?Sized> Owned for &T {
    fn owner_id(&self) -> &UserId {
        (**self).owner_id()
    }
}

/// Role capability table plus the ownership rule.
///
/// An actor whose role holds [`Capability::ViewAll`] may see and operate on
/// every task; anyone else is confined to tasks they own. The same rule backs
/// [`AccessPolicy::visible`] and [`AccessPolicy::ensure_can`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    table: HashMap<Role, Capabilities>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        let owner_only = Capabilities::none()
            .grant(Capability::Create)
            .grant(Capability::Edit)
            .grant(Capability::Delete);

        let table = HashMap::from([
            (Role::Admin, Capabilities::all()),
            (Role::User, owner_only),
            (Role::Guest, owner_only),
            (Role::Viewer, Capabilities::none()),
        ]);
        Self { table }
    }
}

impl AccessPolicy {
    /// Returns a copy of the policy with `role` granted exactly
    /// `capabilities`.
    #[must_use]
    pub fn with_role(mut self, role: Role, capabilities: Capabilities) -> Self {
        self.table.insert(role, capabilities);
        self
    }

    /// Returns the capability set of `role`. Roles absent from the table
    /// hold nothing.
    #[must_use]
    pub fn capabilities(&self, role: Role) -> Capabilities {
        self.table
            .get(&role)
            .copied()
            .unwrap_or_else(Capabilities::none)
    }

    /// Returns whether the actor's role grants `capability`.
    #[must_use]
    pub fn allows(&self, actor: &Actor, capability: Capability) -> bool {
        self.capabilities(actor.role()).allows(capability)
    }

    /// Returns whether the actor may see and touch `item`.
    #[must_use]
    pub fn can_access<T: Owned + ?Sized>(&self, actor: &Actor, item: &T) -> bool {
        self.allows(actor, Capability::ViewAll) || item.owner_id() == actor.id()
    }

    /// Returns the subset of `items` the actor may see, in input order.
    #[must_use]
    pub fn visible<'a, T: Owned>(&self, items: &'a [T], actor: &Actor) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.can_access(actor, *item))
            .collect()
    }

    /// Drops every item the actor may not see, preserving order.
    #[must_use]
    pub fn retain_visible<T: Owned>(&self, mut items: Vec<T>, actor: &Actor) -> Vec<T> {
        items.retain(|item| self.can_access(actor, item));
        items
    }

    /// Checks that the actor's role grants `capability`, independent of any
    /// particular task.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::MissingCapability`] when the role lacks
    /// the capability.
    pub fn ensure_allowed(
        &self,
        actor: &Actor,
        capability: Capability,
    ) -> Result<(), AuthorizationError> {
        if self.allows(actor, capability) {
            return Ok(());
        }
        Err(AuthorizationError::MissingCapability {
            actor: actor.id().clone(),
            role: actor.role(),
            capability,
        })
    }

    /// Checks that the actor may exercise `capability` on `item`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::MissingCapability`] when the role lacks
    /// the capability, or [`AuthorizationError::NotOwner`] when the actor is
    /// confined to their own tasks and does not own `item`.
    pub fn ensure_can<T: Owned + ?Sized>(
        &self,
        actor: &Actor,
        capability: Capability,
        item: &T,
    ) -> Result<(), AuthorizationError> {
        self.ensure_allowed(actor, capability)?;
        if self.can_access(actor, item) {
            return Ok(());
        }
        Err(AuthorizationError::NotOwner {
            actor: actor.id().clone(),
            owner: item.owner_id().clone(),
        })
    }
}
