//! User roles.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every task and to user management.
    Admin,
    /// Regular account; manages only its own tasks.
    User,
    /// Guest session; manages only its own tasks.
    Guest,
    /// Read-only account.
    Viewer,
}

impl Role {
    /// Every role, in descending order of privilege.
    pub const ALL: [Self; 4] = [Self::Admin, Self::User, Self::Guest, Self::Viewer];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
            Self::Viewer => "viewer",
        }
    }

    /// Parses an optional role claim, falling back when it is missing or
    /// unrecognised.
    #[must_use]
    pub fn parse_or(value: Option<&str>, fallback: Self) -> Self {
        value
            .and_then(|raw| Self::try_from(raw).ok())
            .unwrap_or(fallback)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
