//! Live-feed projector.
//!
//! Turns dashboard updates into three bounded, role-specific display feeds:
//! worker activity, admin alerts, and client metrics. Each feed is a
//! fixed-capacity ring buffer — oldest entries are evicted first — and
//! pushes dedupe by update id so an offline replay never produces
//! duplicate entries.
//!
//! Projection performs no I/O and has no failure modes: an update that
//! routes to no feed is ignored at debug level.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use sitelink_core::{DashboardUpdate, EventType, NameDirectory, Role};

/// Entry in the worker activity feed (worker dashboard).
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerActivityEntry {
    /// Originating update id.
    pub id: String,
    /// Worker the activity belongs to.
    pub worker_id: String,
    /// Display name from the directory, if known.
    pub worker_name: Option<String>,
    /// What happened.
    pub action: EventType,
    /// Building the activity took place at.
    pub building_id: Option<String>,
    /// When the originating event was created.
    pub timestamp: DateTime<Utc>,
}

/// Entry in the admin alert feed (admin dashboard).
#[derive(Clone, Debug, PartialEq)]
pub struct AdminAlertEntry {
    /// Originating update id.
    pub id: String,
    /// Update type that produced the alert.
    pub update_type: EventType,
    /// Domain entity the alert references (task id, issue id, ...).
    pub subject_id: Option<String>,
    /// Affected building.
    pub building_id: Option<String>,
    /// Display name from the directory, if known.
    pub building_name: Option<String>,
    /// Human-readable one-liner.
    pub summary: String,
    /// When the originating event was created.
    pub timestamp: DateTime<Utc>,
}

/// Entry in the client metric feed (client dashboard).
#[derive(Clone, Debug, PartialEq)]
pub struct ClientMetricEntry {
    /// Originating update id.
    pub id: String,
    /// Update type that produced the metric.
    pub update_type: EventType,
    /// Domain entity the metric references.
    pub subject_id: Option<String>,
    /// Affected building.
    pub building_id: Option<String>,
    /// Human-readable one-liner.
    pub summary: String,
    /// When the originating event was created.
    pub timestamp: DateTime<Utc>,
}

trait FeedEntry {
    fn entry_id(&self) -> &str;
}

impl FeedEntry for WorkerActivityEntry {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

impl FeedEntry for AdminAlertEntry {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

impl FeedEntry for ClientMetricEntry {
    fn entry_id(&self) -> &str {
        &self.id
    }
}

/// Fixed-capacity ring buffer with id-based dedupe.
struct FeedBuffer<T: FeedEntry> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: FeedEntry> FeedBuffer<T> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry at capacity. A duplicate id is a
    /// replay and is dropped.
    fn push(&mut self, entry: T) {
        if self.entries.iter().any(|e| e.entry_id() == entry.entry_id()) {
            debug!(id = entry.entry_id(), "duplicate feed entry dropped");
            return;
        }
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: FeedEntry + Clone> FeedBuffer<T> {
    fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

/// The three role-specific live feeds.
pub struct LiveFeeds {
    worker: FeedBuffer<WorkerActivityEntry>,
    admin: FeedBuffer<AdminAlertEntry>,
    client: FeedBuffer<ClientMetricEntry>,
    directory: Arc<dyn NameDirectory>,
}

impl LiveFeeds {
    /// Create feeds with the given per-feed capacity.
    #[must_use]
    pub fn new(capacity: usize, directory: Arc<dyn NameDirectory>) -> Self {
        Self {
            worker: FeedBuffer::new(capacity),
            admin: FeedBuffer::new(capacity),
            client: FeedBuffer::new(capacity),
            directory,
        }
    }

    /// Route an update into zero, one, or more feeds.
    pub fn project(&mut self, update: &DashboardUpdate) {
        let mut routed = false;

        if update.source == Role::Worker {
            if let Some(worker_id) = update.worker_id.clone() {
                let worker_name = self.directory.worker_name(&worker_id);
                self.worker.push(WorkerActivityEntry {
                    id: update.id.clone(),
                    worker_id,
                    worker_name,
                    action: update.update_type,
                    building_id: update.building_id.clone(),
                    timestamp: update.timestamp,
                });
                routed = true;
            }
        }

        if update.update_type.is_admin_alert_type() {
            let building_name = update
                .building_id
                .as_deref()
                .and_then(|id| self.directory.building_name(id));
            self.admin.push(AdminAlertEntry {
                id: update.id.clone(),
                update_type: update.update_type,
                subject_id: subject_id(update),
                building_id: update.building_id.clone(),
                building_name,
                summary: summarize(update),
                timestamp: update.timestamp,
            });
            routed = true;
        }

        if update.update_type.is_client_metric_type() {
            self.client.push(ClientMetricEntry {
                id: update.id.clone(),
                update_type: update.update_type,
                subject_id: subject_id(update),
                building_id: update.building_id.clone(),
                summary: summarize(update),
                timestamp: update.timestamp,
            });
            routed = true;
        }

        if !routed {
            debug!(id = %update.id, update_type = %update.update_type, "update not routed to any feed");
        }
    }

    /// Snapshot of the worker activity feed, oldest first.
    #[must_use]
    pub fn worker_activity(&self) -> Vec<WorkerActivityEntry> {
        self.worker.snapshot()
    }

    /// Snapshot of the admin alert feed, oldest first.
    #[must_use]
    pub fn admin_alerts(&self) -> Vec<AdminAlertEntry> {
        self.admin.snapshot()
    }

    /// Snapshot of the client metric feed, oldest first.
    #[must_use]
    pub fn client_metrics(&self) -> Vec<ClientMetricEntry> {
        self.client.snapshot()
    }

    /// Total entries across all three feeds.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.worker.len() + self.admin.len() + self.client.len()
    }

    /// Reset all three feeds.
    pub fn clear(&mut self) {
        self.worker.clear();
        self.admin.clear();
        self.client.clear();
    }
}

/// Domain entity id an update references, by type.
fn subject_id(update: &DashboardUpdate) -> Option<String> {
    let field = match update.update_type {
        EventType::TaskCompleted | EventType::TaskAssigned | EventType::PhotoCaptured => "taskId",
        EventType::ComplianceIssueCreated => "issueId",
        EventType::AlertCreated => "alertId",
        EventType::ClientRequestCreated => "requestId",
        EventType::InsightGenerated => "insightId",
        EventType::BudgetAlert => "category",
        EventType::WeatherAlert => "condition",
        EventType::WorkerClockIn | EventType::WorkerClockOut | EventType::EmergencyReported => {
            return None;
        }
    };
    update
        .payload
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
}

/// Human-readable one-liner for alert/metric entries.
fn summarize(update: &DashboardUpdate) -> String {
    let payload = &update.payload;
    let text = |field: &str| payload.get(field).and_then(|v| v.as_str()).unwrap_or("");
    match update.update_type {
        EventType::TaskCompleted => format!("Task completed: {}", text("taskName")),
        EventType::TaskAssigned => format!("Task assigned: {}", text("taskName")),
        EventType::PhotoCaptured => "Verification photo captured".to_string(),
        EventType::EmergencyReported => format!("Emergency: {}", text("description")),
        EventType::ComplianceIssueCreated => {
            format!("Compliance issue ({}): {}", text("violationType"), text("description"))
        }
        EventType::AlertCreated => format!("{}: {}", text("title"), text("message")),
        EventType::ClientRequestCreated => format!("Client request: {}", text("subject")),
        EventType::BudgetAlert => {
            let pct = payload
                .get("utilizationPct")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            format!("Budget {} at {pct:.0}% utilization", text("category"))
        }
        EventType::WeatherAlert => format!("Weather alert: {}", text("condition")),
        EventType::InsightGenerated => text("summary").to_string(),
        EventType::WorkerClockIn => "Worker clocked in".to_string(),
        EventType::WorkerClockOut => "Worker clocked out".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
