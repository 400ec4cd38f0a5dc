//! Runtime configuration for the task board.
//!
//! Configuration is plain JSON. Every field has a default, so an empty
//! object yields the stock role table and dashboard limits.

use crate::access::domain::{AccessPolicy, Actor, Capabilities, Role, UserId};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Limits for the dashboard read models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Number of tasks in the "recent" list.
    pub recent_limit: usize,
    /// Number of tasks in the "upcoming" list.
    pub upcoming_limit: usize,
    /// Length of the analytics reporting window, in days.
    pub stats_window_days: u16,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_limit: 3,
            upcoming_limit: 3,
            stats_window_days: 7,
        }
    }
}

impl DashboardSettings {
    /// Returns the analytics reporting window.
    #[must_use]
    pub fn stats_window(&self) -> Duration {
        Duration::days(i64::from(self.stats_window_days))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskovConfig {
    /// Role assumed when a session carries no recognisable role claim.
    pub fallback_role: Role,
    /// Capability sets replacing the built-in entry for each listed role.
    pub roles: HashMap<Role, Capabilities>,
    /// Dashboard limits.
    pub dashboard: DashboardSettings,
}

impl Default for TaskovConfig {
    fn default() -> Self {
        Self {
            fallback_role: Role::Viewer,
            roles: HashMap::new(),
            dashboard: DashboardSettings::default(),
        }
    }
}

impl TaskovConfig {
    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the JSON is malformed or contains
    /// unknown roles.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses configuration from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the JSON is malformed or cannot be
    /// read.
    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Builds the access policy: the built-in table with configured roles
    /// replaced.
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        self.roles
            .iter()
            .fold(AccessPolicy::default(), |policy, (role, capabilities)| {
                policy.with_role(*role, *capabilities)
            })
    }

    /// Builds the actor for a session, resolving the role claim against
    /// [`TaskovConfig::fallback_role`].
    #[must_use]
    pub fn actor(&self, id: UserId, role_claim: Option<&str>) -> Actor {
        Actor::new(id, Role::parse_or(role_claim, self.fallback_role))
    }
}
