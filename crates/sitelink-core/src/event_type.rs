//! The [`EventType`] enum — one discriminator per domain event family.
//!
//! Every variant has an exact `#[serde(rename)]` matching the dot-separated
//! wire string the remote sync service and the dashboards expect.
//!
//! Routing helpers like [`EventType::is_admin_alert_type()`] replace
//! string-matching at projection time with compile-time exhaustiveness.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::priority::Priority;

/// All domain event families published through the sync engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    // -- Worker shifts --
    /// Worker clocked in at a building.
    #[serde(rename = "worker.clock_in")]
    WorkerClockIn,
    /// Worker clocked out.
    #[serde(rename = "worker.clock_out")]
    WorkerClockOut,

    // -- Tasks --
    /// Routine task completed.
    #[serde(rename = "task.completed")]
    TaskCompleted,
    /// Task assigned to a worker.
    #[serde(rename = "task.assigned")]
    TaskAssigned,
    /// Verification photo captured for a task.
    #[serde(rename = "task.photo_captured")]
    PhotoCaptured,

    // -- Emergencies --
    /// Emergency reported from the field.
    #[serde(rename = "emergency.reported")]
    EmergencyReported,

    // -- Compliance --
    /// Building compliance issue opened.
    #[serde(rename = "compliance.issue_created")]
    ComplianceIssueCreated,

    // -- Alerts --
    /// Generic operations alert.
    #[serde(rename = "alert.created")]
    AlertCreated,
    /// Budget utilization crossed a threshold.
    #[serde(rename = "budget.alert")]
    BudgetAlert,
    /// Weather condition affecting field work.
    #[serde(rename = "weather.alert")]
    WeatherAlert,

    // -- Client --
    /// Client filed a service request.
    #[serde(rename = "client.request_created")]
    ClientRequestCreated,
    /// Portfolio insight generated for a client.
    #[serde(rename = "insight.generated")]
    InsightGenerated,
}

/// All event type variants, for exhaustive testing.
pub const ALL_EVENT_TYPES: &[EventType] = &[
    EventType::WorkerClockIn,
    EventType::WorkerClockOut,
    EventType::TaskCompleted,
    EventType::TaskAssigned,
    EventType::PhotoCaptured,
    EventType::EmergencyReported,
    EventType::ComplianceIssueCreated,
    EventType::AlertCreated,
    EventType::BudgetAlert,
    EventType::WeatherAlert,
    EventType::ClientRequestCreated,
    EventType::InsightGenerated,
];

impl EventType {
    /// Return the canonical string representation (e.g. `"worker.clock_in"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WorkerClockIn => "worker.clock_in",
            Self::WorkerClockOut => "worker.clock_out",
            Self::TaskCompleted => "task.completed",
            Self::TaskAssigned => "task.assigned",
            Self::PhotoCaptured => "task.photo_captured",
            Self::EmergencyReported => "emergency.reported",
            Self::ComplianceIssueCreated => "compliance.issue_created",
            Self::AlertCreated => "alert.created",
            Self::BudgetAlert => "budget.alert",
            Self::WeatherAlert => "weather.alert",
            Self::ClientRequestCreated => "client.request_created",
            Self::InsightGenerated => "insight.generated",
        }
    }

    /// Whether updates of this type belong in the admin alert feed.
    #[must_use]
    pub fn is_admin_alert_type(self) -> bool {
        matches!(
            self,
            Self::TaskCompleted
                | Self::EmergencyReported
                | Self::ComplianceIssueCreated
                | Self::AlertCreated
                | Self::ClientRequestCreated
                | Self::BudgetAlert
                | Self::WeatherAlert
        )
    }

    /// Whether updates of this type belong in the client metric feed.
    #[must_use]
    pub fn is_client_metric_type(self) -> bool {
        matches!(
            self,
            Self::TaskCompleted | Self::BudgetAlert | Self::InsightGenerated
        )
    }

    /// Whether this is a worker shift event (`worker.*`).
    #[must_use]
    pub fn is_shift_type(self) -> bool {
        matches!(self, Self::WorkerClockIn | Self::WorkerClockOut)
    }

    /// Default priority for events of this family.
    ///
    /// Publishers may override per event; emergencies are always critical.
    #[must_use]
    pub fn default_priority(self) -> Priority {
        match self {
            Self::EmergencyReported => Priority::Critical,
            Self::ComplianceIssueCreated
            | Self::TaskAssigned
            | Self::BudgetAlert
            | Self::WeatherAlert => Priority::High,
            Self::WorkerClockIn
            | Self::WorkerClockOut
            | Self::TaskCompleted
            | Self::PhotoCaptured
            | Self::AlertCreated
            | Self::ClientRequestCreated => Priority::Medium,
            Self::InsightGenerated => Priority::Low,
        }
    }

    /// The domain prefix (e.g. `"worker"`, `"task"`, `"budget"`).
    #[must_use]
    pub fn domain(self) -> &'static str {
        let s = self.as_str();
        s.split('.').next().unwrap_or(s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Use serde to parse — the `#[serde(rename)]` attributes are the source of truth.
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown event type: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
