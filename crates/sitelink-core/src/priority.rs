//! Event priority ranking.
//!
//! Priority decides two things: `Critical` events bypass the processing
//! queue and are handled synchronously at publish time, and the offline
//! queue drains in `priority DESC, created_at ASC` order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority of a domain event.
///
/// Variant order is the ranking order — the derived `Ord` puts
/// `Low < Medium < High < Critical`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Background noise — insights, low-value metrics.
    Low,
    /// Normal operational traffic.
    Medium,
    /// Needs prompt attention — compliance, budget overruns.
    High,
    /// Processed synchronously, never queued behind other events.
    Critical,
}

/// All priorities in ascending rank order.
pub const ALL_PRIORITIES: &[Priority] = &[
    Priority::Low,
    Priority::Medium,
    Priority::High,
    Priority::Critical,
];

impl Priority {
    /// Return the canonical lowercase string (e.g. `"high"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Numeric rank used for SQL drain ordering (`Low == 0`, `Critical == 3`).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown priority: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
