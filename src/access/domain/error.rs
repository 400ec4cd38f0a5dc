//! Error types for access control.

use super::{Capability, Role, UserId};
use thiserror::Error;

/// Errors returned while constructing access domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDomainError {
    /// The user identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,
}

/// Error returned while parsing a role name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Rejection raised before any store call when an actor lacks rights over a
/// task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The actor's role does not grant the requested capability.
    #[error("user {actor} with role {role} lacks the {capability} capability")]
    MissingCapability {
        /// Acting user.
        actor: UserId,
        /// Role in effect for the actor.
        role: Role,
        /// Capability that was requested.
        capability: Capability,
    },

    /// The actor may only touch their own tasks and does not own this one.
    #[error("user {actor} may not act on a task owned by {owner}")]
    NotOwner {
        /// Acting user.
        actor: UserId,
        /// Owner of the target task.
        owner: UserId,
    },
}
