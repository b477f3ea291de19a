//! The three dashboard audiences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dashboard audience. Every event names a source role and a set of
/// target roles; subscriptions and live feeds are role-scoped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Field worker dashboard (mobile).
    Worker,
    /// Operations admin dashboard.
    Admin,
    /// Client portfolio dashboard.
    Client,
}

/// All roles, for exhaustive testing and default broadcast targets.
pub const ALL_ROLES: &[Role] = &[Role::Worker, Role::Admin, Role::Client];

impl Role {
    /// Return the canonical lowercase string (e.g. `"worker"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Serde's rename attributes are the source of truth.
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown role: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
