//! Typed publish API — one method per domain event family.
//!
//! Each method fills in the source role, default target roles, and default
//! priority for its family, then goes through the generic
//! [`SyncEngine::publish`]. Severe weather is the one family whose priority
//! is input-dependent: it escalates from high to critical.

use chrono::{DateTime, Utc};

use sitelink_core::payload::{
    AlertPayload, BudgetAlertPayload, ClientRequestPayload, ClockInPayload, ClockOutPayload,
    ComplianceIssuePayload, EmergencyPayload, InsightPayload, PhotoCapturedPayload,
    TaskAssignedPayload, TaskCompletedPayload, WeatherAlertPayload,
};
use sitelink_core::{EventId, EventPayload, Priority, Role};

use crate::engine::SyncEngine;
use crate::errors::Result;

impl SyncEngine {
    /// Worker clocked in at a building. Worker → admin.
    pub async fn publish_worker_clock_in(
        &self,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::ClockIn(ClockInPayload {
            worker_id: worker_id.into(),
            building_id: building_id.into(),
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Worker, vec![Role::Admin], priority, payload)
            .await
    }

    /// Worker clocked out. Worker → admin.
    pub async fn publish_worker_clock_out(
        &self,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
        hours_worked: Option<f64>,
    ) -> Result<EventId> {
        let payload = EventPayload::ClockOut(ClockOutPayload {
            worker_id: worker_id.into(),
            building_id: building_id.into(),
            hours_worked,
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Worker, vec![Role::Admin], priority, payload)
            .await
    }

    /// Routine task completed. Worker → admin + client.
    pub async fn publish_task_completed(
        &self,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::TaskCompleted(TaskCompletedPayload {
            task_id: task_id.into(),
            task_name: task_name.into(),
            worker_id: worker_id.into(),
            building_id: building_id.into(),
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Worker, vec![Role::Admin, Role::Client], priority, payload)
            .await
    }

    /// Verification photo captured. Worker → admin.
    pub async fn publish_photo_captured(
        &self,
        task_id: impl Into<String>,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::PhotoCaptured(PhotoCapturedPayload {
            task_id: task_id.into(),
            worker_id: worker_id.into(),
            building_id: building_id.into(),
            photo_url: photo_url.into(),
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Worker, vec![Role::Admin], priority, payload)
            .await
    }

    /// Emergency reported from the field. Worker → admin, critical —
    /// subscribers are notified before this call returns.
    pub async fn publish_emergency_reported(
        &self,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::Emergency(EmergencyPayload {
            worker_id: worker_id.into(),
            building_id: building_id.into(),
            description: description.into(),
        });
        self.publish(Role::Worker, vec![Role::Admin], Priority::Critical, payload)
            .await
    }

    /// Task assigned to a worker. Admin → worker.
    pub async fn publish_task_assigned(
        &self,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        worker_id: impl Into<String>,
        building_id: impl Into<String>,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<EventId> {
        let payload = EventPayload::TaskAssigned(TaskAssignedPayload {
            task_id: task_id.into(),
            task_name: task_name.into(),
            worker_id: worker_id.into(),
            building_id: building_id.into(),
            due_at,
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Admin, vec![Role::Worker], priority, payload)
            .await
    }

    /// Building compliance issue opened. Admin → admin + client.
    pub async fn publish_compliance_issue(
        &self,
        issue_id: impl Into<String>,
        building_id: impl Into<String>,
        violation_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::ComplianceIssue(ComplianceIssuePayload {
            issue_id: issue_id.into(),
            building_id: building_id.into(),
            violation_type: violation_type.into(),
            description: description.into(),
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Admin, vec![Role::Admin, Role::Client], priority, payload)
            .await
    }

    /// Generic operations alert. Admin → admin.
    pub async fn publish_alert(
        &self,
        alert_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        building_id: Option<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::Alert(AlertPayload {
            alert_id: alert_id.into(),
            title: title.into(),
            message: message.into(),
            building_id,
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Admin, vec![Role::Admin], priority, payload)
            .await
    }

    /// Client filed a service request. Client → admin.
    pub async fn publish_client_request(
        &self,
        request_id: impl Into<String>,
        client_id: impl Into<String>,
        building_id: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::ClientRequest(ClientRequestPayload {
            request_id: request_id.into(),
            client_id: client_id.into(),
            building_id: building_id.into(),
            subject: subject.into(),
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Client, vec![Role::Admin], priority, payload)
            .await
    }

    /// Budget utilization crossed a threshold. Admin → admin + client.
    pub async fn publish_budget_alert(
        &self,
        client_id: impl Into<String>,
        category: impl Into<String>,
        utilization_pct: f64,
        building_id: Option<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::BudgetAlert(BudgetAlertPayload {
            client_id: client_id.into(),
            category: category.into(),
            utilization_pct,
            building_id,
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Admin, vec![Role::Admin, Role::Client], priority, payload)
            .await
    }

    /// Weather condition affecting field work. Admin → worker + admin.
    /// Severe conditions escalate to critical.
    pub async fn publish_weather_alert(
        &self,
        condition: impl Into<String>,
        severe: bool,
        building_id: Option<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::WeatherAlert(WeatherAlertPayload {
            condition: condition.into(),
            severe,
            building_id,
        });
        let priority = if severe {
            Priority::Critical
        } else {
            payload.kind().default_priority()
        };
        self.publish(Role::Admin, vec![Role::Worker, Role::Admin], priority, payload)
            .await
    }

    /// Portfolio insight generated. Admin → client.
    pub async fn publish_insight(
        &self,
        insight_id: impl Into<String>,
        client_id: impl Into<String>,
        summary: impl Into<String>,
        building_id: Option<String>,
    ) -> Result<EventId> {
        let payload = EventPayload::Insight(InsightPayload {
            insight_id: insight_id.into(),
            client_id: client_id.into(),
            summary: summary.into(),
            building_id,
        });
        let priority = payload.kind().default_priority();
        self.publish(Role::Admin, vec![Role::Client], priority, payload)
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
