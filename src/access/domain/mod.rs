//! Domain model for actors, roles and capability checks.

mod actor;
mod capabilities;
mod error;
mod policy;
mod role;

pub use actor::{Actor, UserId};
pub use capabilities::{Capabilities, Capability};
pub use error::{AccessDomainError, AuthorizationError, ParseRoleError};
pub use policy::{AccessPolicy, Owned};
pub use role::Role;
