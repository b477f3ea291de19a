//! Typed event payloads.
//!
//! [`EventPayload`] is a tagged union over the domain event families; each
//! variant carries a strongly-typed serde struct. The union is the source of
//! truth — opaque JSON is *derived* from it for the wire and the durable
//! queue via [`EventPayload::to_value()`], and recovered on the receive path
//! via [`EventPayload::from_value()`] dispatching on [`EventType`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CoreError, Result};
use crate::event_type::EventType;

/// Payload for `worker.clock_in` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInPayload {
    /// Worker who clocked in.
    pub worker_id: String,
    /// Building the shift takes place at.
    pub building_id: String,
}

/// Payload for `worker.clock_out` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutPayload {
    /// Worker who clocked out.
    pub worker_id: String,
    /// Building the shift took place at.
    pub building_id: String,
    /// Hours worked this shift, if the roster computed them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
}

/// Payload for `task.completed` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletedPayload {
    /// Completed task.
    pub task_id: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Worker who completed it.
    pub worker_id: String,
    /// Building the task belongs to.
    pub building_id: String,
}

/// Payload for `task.assigned` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignedPayload {
    /// Assigned task.
    pub task_id: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Worker the task was assigned to.
    pub worker_id: String,
    /// Building the task belongs to.
    pub building_id: String,
    /// Due date, if scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
}

/// Payload for `task.photo_captured` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCapturedPayload {
    /// Task the photo verifies.
    pub task_id: String,
    /// Worker who captured it.
    pub worker_id: String,
    /// Building the task belongs to.
    pub building_id: String,
    /// Storage URL of the captured photo.
    pub photo_url: String,
}

/// Payload for `emergency.reported` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyPayload {
    /// Worker who reported the emergency.
    pub worker_id: String,
    /// Affected building.
    pub building_id: String,
    /// Free-text description from the field.
    pub description: String,
}

/// Payload for `compliance.issue_created` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceIssuePayload {
    /// Issue record ID.
    pub issue_id: String,
    /// Affected building.
    pub building_id: String,
    /// Violation category (e.g. `"hpd"`, `"dob"`, `"fdny"`).
    pub violation_type: String,
    /// Issue summary.
    pub description: String,
}

/// Payload for `alert.created` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    /// Alert record ID.
    pub alert_id: String,
    /// Short alert title.
    pub title: String,
    /// Alert body.
    pub message: String,
    /// Affected building, if building-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
}

/// Payload for `client.request_created` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequestPayload {
    /// Request record ID.
    pub request_id: String,
    /// Client who filed the request.
    pub client_id: String,
    /// Building the request concerns.
    pub building_id: String,
    /// Request subject line.
    pub subject: String,
}

/// Payload for `budget.alert` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlertPayload {
    /// Client whose budget is affected.
    pub client_id: String,
    /// Budget category (e.g. `"maintenance"`, `"supplies"`).
    pub category: String,
    /// Utilization as a percentage of the budgeted amount.
    pub utilization_pct: f64,
    /// Affected building, if the budget is building-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
}

/// Payload for `weather.alert` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlertPayload {
    /// Weather condition (e.g. `"snow"`, `"high_wind"`).
    pub condition: String,
    /// Severe conditions raise the event priority to critical.
    pub severe: bool,
    /// Affected building, if not city-wide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
}

/// Payload for `insight.generated` events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPayload {
    /// Insight record ID.
    pub insight_id: String,
    /// Client the insight was generated for.
    pub client_id: String,
    /// One-line insight summary.
    pub summary: String,
    /// Building the insight concerns, if building-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
}

/// Tagged union over all event payloads.
///
/// The variant determines the event's [`EventType`] — see
/// [`kind()`](Self::kind) — so a payload can never be published under the
/// wrong discriminator.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// `worker.clock_in`
    ClockIn(ClockInPayload),
    /// `worker.clock_out`
    ClockOut(ClockOutPayload),
    /// `task.completed`
    TaskCompleted(TaskCompletedPayload),
    /// `task.assigned`
    TaskAssigned(TaskAssignedPayload),
    /// `task.photo_captured`
    PhotoCaptured(PhotoCapturedPayload),
    /// `emergency.reported`
    Emergency(EmergencyPayload),
    /// `compliance.issue_created`
    ComplianceIssue(ComplianceIssuePayload),
    /// `alert.created`
    Alert(AlertPayload),
    /// `client.request_created`
    ClientRequest(ClientRequestPayload),
    /// `budget.alert`
    BudgetAlert(BudgetAlertPayload),
    /// `weather.alert`
    WeatherAlert(WeatherAlertPayload),
    /// `insight.generated`
    Insight(InsightPayload),
}

impl EventPayload {
    /// The event type this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> EventType {
        match self {
            Self::ClockIn(_) => EventType::WorkerClockIn,
            Self::ClockOut(_) => EventType::WorkerClockOut,
            Self::TaskCompleted(_) => EventType::TaskCompleted,
            Self::TaskAssigned(_) => EventType::TaskAssigned,
            Self::PhotoCaptured(_) => EventType::PhotoCaptured,
            Self::Emergency(_) => EventType::EmergencyReported,
            Self::ComplianceIssue(_) => EventType::ComplianceIssueCreated,
            Self::Alert(_) => EventType::AlertCreated,
            Self::ClientRequest(_) => EventType::ClientRequestCreated,
            Self::BudgetAlert(_) => EventType::BudgetAlert,
            Self::WeatherAlert(_) => EventType::WeatherAlert,
            Self::Insight(_) => EventType::InsightGenerated,
        }
    }

    /// Building this payload concerns, if any.
    #[must_use]
    pub fn building_id(&self) -> Option<&str> {
        match self {
            Self::ClockIn(p) => Some(&p.building_id),
            Self::ClockOut(p) => Some(&p.building_id),
            Self::TaskCompleted(p) => Some(&p.building_id),
            Self::TaskAssigned(p) => Some(&p.building_id),
            Self::PhotoCaptured(p) => Some(&p.building_id),
            Self::Emergency(p) => Some(&p.building_id),
            Self::ComplianceIssue(p) => Some(&p.building_id),
            Self::ClientRequest(p) => Some(&p.building_id),
            Self::Alert(p) => p.building_id.as_deref(),
            Self::BudgetAlert(p) => p.building_id.as_deref(),
            Self::WeatherAlert(p) => p.building_id.as_deref(),
            Self::Insight(p) => p.building_id.as_deref(),
        }
    }

    /// Worker this payload concerns, if any.
    #[must_use]
    pub fn worker_id(&self) -> Option<&str> {
        match self {
            Self::ClockIn(p) => Some(&p.worker_id),
            Self::ClockOut(p) => Some(&p.worker_id),
            Self::TaskCompleted(p) => Some(&p.worker_id),
            Self::TaskAssigned(p) => Some(&p.worker_id),
            Self::PhotoCaptured(p) => Some(&p.worker_id),
            Self::Emergency(p) => Some(&p.worker_id),
            Self::ComplianceIssue(_)
            | Self::Alert(_)
            | Self::ClientRequest(_)
            | Self::BudgetAlert(_)
            | Self::WeatherAlert(_)
            | Self::Insight(_) => None,
        }
    }

    /// Validate required fields.
    ///
    /// A malformed payload is rejected at publish time and never enters
    /// the processing queue.
    pub fn validate(&self) -> Result<()> {
        let require = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(CoreError::MissingField {
                    event_type: self.kind().as_str(),
                    field,
                })
            } else {
                Ok(())
            }
        };
        match self {
            Self::ClockIn(p) => {
                require(&p.worker_id, "workerId")?;
                require(&p.building_id, "buildingId")
            }
            Self::ClockOut(p) => {
                require(&p.worker_id, "workerId")?;
                require(&p.building_id, "buildingId")
            }
            Self::TaskCompleted(p) => {
                require(&p.task_id, "taskId")?;
                require(&p.worker_id, "workerId")?;
                require(&p.building_id, "buildingId")
            }
            Self::TaskAssigned(p) => {
                require(&p.task_id, "taskId")?;
                require(&p.worker_id, "workerId")?;
                require(&p.building_id, "buildingId")
            }
            Self::PhotoCaptured(p) => {
                require(&p.task_id, "taskId")?;
                require(&p.worker_id, "workerId")?;
                require(&p.photo_url, "photoUrl")
            }
            Self::Emergency(p) => {
                require(&p.worker_id, "workerId")?;
                require(&p.building_id, "buildingId")?;
                require(&p.description, "description")
            }
            Self::ComplianceIssue(p) => {
                require(&p.issue_id, "issueId")?;
                require(&p.building_id, "buildingId")?;
                require(&p.violation_type, "violationType")
            }
            Self::Alert(p) => {
                require(&p.alert_id, "alertId")?;
                require(&p.title, "title")
            }
            Self::ClientRequest(p) => {
                require(&p.request_id, "requestId")?;
                require(&p.client_id, "clientId")?;
                require(&p.building_id, "buildingId")
            }
            Self::BudgetAlert(p) => {
                require(&p.client_id, "clientId")?;
                require(&p.category, "category")
            }
            Self::WeatherAlert(p) => require(&p.condition, "condition"),
            Self::Insight(p) => {
                require(&p.insight_id, "insightId")?;
                require(&p.client_id, "clientId")
            }
        }
    }

    /// Serialize to the opaque JSON object carried on the wire.
    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            Self::ClockIn(p) => serde_json::to_value(p)?,
            Self::ClockOut(p) => serde_json::to_value(p)?,
            Self::TaskCompleted(p) => serde_json::to_value(p)?,
            Self::TaskAssigned(p) => serde_json::to_value(p)?,
            Self::PhotoCaptured(p) => serde_json::to_value(p)?,
            Self::Emergency(p) => serde_json::to_value(p)?,
            Self::ComplianceIssue(p) => serde_json::to_value(p)?,
            Self::Alert(p) => serde_json::to_value(p)?,
            Self::ClientRequest(p) => serde_json::to_value(p)?,
            Self::BudgetAlert(p) => serde_json::to_value(p)?,
            Self::WeatherAlert(p) => serde_json::to_value(p)?,
            Self::Insight(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }

    /// Deserialize a wire payload into the typed variant for `kind`.
    ///
    /// Returns `Err` if the JSON doesn't match the expected shape.
    pub fn from_value(kind: EventType, value: Value) -> Result<Self> {
        let payload = match kind {
            EventType::WorkerClockIn => Self::ClockIn(serde_json::from_value(value)?),
            EventType::WorkerClockOut => Self::ClockOut(serde_json::from_value(value)?),
            EventType::TaskCompleted => Self::TaskCompleted(serde_json::from_value(value)?),
            EventType::TaskAssigned => Self::TaskAssigned(serde_json::from_value(value)?),
            EventType::PhotoCaptured => Self::PhotoCaptured(serde_json::from_value(value)?),
            EventType::EmergencyReported => Self::Emergency(serde_json::from_value(value)?),
            EventType::ComplianceIssueCreated => {
                Self::ComplianceIssue(serde_json::from_value(value)?)
            }
            EventType::AlertCreated => Self::Alert(serde_json::from_value(value)?),
            EventType::ClientRequestCreated => Self::ClientRequest(serde_json::from_value(value)?),
            EventType::BudgetAlert => Self::BudgetAlert(serde_json::from_value(value)?),
            EventType::WeatherAlert => Self::WeatherAlert(serde_json::from_value(value)?),
            EventType::InsightGenerated => Self::Insight(serde_json::from_value(value)?),
        };
        Ok(payload)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn clock_in() -> EventPayload {
        EventPayload::ClockIn(ClockInPayload {
            worker_id: "w1".into(),
            building_id: "b1".into(),
        })
    }

    fn task_completed() -> EventPayload {
        EventPayload::TaskCompleted(TaskCompletedPayload {
            task_id: "t1".into(),
            task_name: "Lobby mopping".into(),
            worker_id: "w1".into(),
            building_id: "b1".into(),
        })
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(clock_in().kind(), EventType::WorkerClockIn);
        assert_eq!(task_completed().kind(), EventType::TaskCompleted);
        let weather = EventPayload::WeatherAlert(WeatherAlertPayload {
            condition: "snow".into(),
            severe: false,
            building_id: None,
        });
        assert_eq!(weather.kind(), EventType::WeatherAlert);
    }

    #[test]
    fn building_and_worker_projection() {
        let p = task_completed();
        assert_eq!(p.building_id(), Some("b1"));
        assert_eq!(p.worker_id(), Some("w1"));

        let insight = EventPayload::Insight(InsightPayload {
            insight_id: "i1".into(),
            client_id: "c1".into(),
            summary: "Costs trending down".into(),
            building_id: None,
        });
        assert_eq!(insight.building_id(), None);
        assert_eq!(insight.worker_id(), None);
    }

    #[test]
    fn validate_accepts_complete_payload() {
        assert!(clock_in().validate().is_ok());
        assert!(task_completed().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_required_field() {
        let p = EventPayload::ClockIn(ClockInPayload {
            worker_id: String::new(),
            building_id: "b1".into(),
        });
        assert_matches!(
            p.validate(),
            Err(CoreError::MissingField {
                event_type: "worker.clock_in",
                field: "workerId",
            })
        );
    }

    #[test]
    fn validate_rejects_whitespace_only_field() {
        let p = EventPayload::Emergency(EmergencyPayload {
            worker_id: "w1".into(),
            building_id: "b1".into(),
            description: "   ".into(),
        });
        assert_matches!(p.validate(), Err(CoreError::MissingField { field: "description", .. }));
    }

    #[test]
    fn to_value_uses_camel_case() {
        let value = task_completed().to_value().unwrap();
        assert_eq!(value["taskId"], "t1");
        assert_eq!(value["taskName"], "Lobby mopping");
        assert_eq!(value["workerId"], "w1");
        assert_eq!(value["buildingId"], "b1");
    }

    #[test]
    fn to_value_omits_absent_options() {
        let p = EventPayload::ClockOut(ClockOutPayload {
            worker_id: "w1".into(),
            building_id: "b1".into(),
            hours_worked: None,
        });
        let value = p.to_value().unwrap();
        assert!(value.get("hoursWorked").is_none());
    }

    #[test]
    fn value_roundtrip_all_variants() {
        let payloads = vec![
            clock_in(),
            EventPayload::ClockOut(ClockOutPayload {
                worker_id: "w1".into(),
                building_id: "b1".into(),
                hours_worked: Some(7.5),
            }),
            task_completed(),
            EventPayload::TaskAssigned(TaskAssignedPayload {
                task_id: "t2".into(),
                task_name: "Boiler check".into(),
                worker_id: "w2".into(),
                building_id: "b2".into(),
                due_at: None,
            }),
            EventPayload::PhotoCaptured(PhotoCapturedPayload {
                task_id: "t1".into(),
                worker_id: "w1".into(),
                building_id: "b1".into(),
                photo_url: "https://cdn.example/p.jpg".into(),
            }),
            EventPayload::Emergency(EmergencyPayload {
                worker_id: "w1".into(),
                building_id: "b1".into(),
                description: "Water main burst".into(),
            }),
            EventPayload::ComplianceIssue(ComplianceIssuePayload {
                issue_id: "ci1".into(),
                building_id: "b1".into(),
                violation_type: "hpd".into(),
                description: "Missed inspection".into(),
            }),
            EventPayload::Alert(AlertPayload {
                alert_id: "a1".into(),
                title: "Roster gap".into(),
                message: "No coverage Tuesday".into(),
                building_id: Some("b3".into()),
            }),
            EventPayload::ClientRequest(ClientRequestPayload {
                request_id: "r1".into(),
                client_id: "c1".into(),
                building_id: "b1".into(),
                subject: "Extra cleaning".into(),
            }),
            EventPayload::BudgetAlert(BudgetAlertPayload {
                client_id: "c1".into(),
                category: "maintenance".into(),
                utilization_pct: 92.5,
                building_id: None,
            }),
            EventPayload::WeatherAlert(WeatherAlertPayload {
                condition: "high_wind".into(),
                severe: true,
                building_id: None,
            }),
            EventPayload::Insight(InsightPayload {
                insight_id: "i1".into(),
                client_id: "c1".into(),
                summary: "Response times improved".into(),
                building_id: Some("b1".into()),
            }),
        ];

        for payload in payloads {
            let kind = payload.kind();
            let value = payload.to_value().unwrap();
            let back = EventPayload::from_value(kind, value).unwrap();
            assert_eq!(back, payload, "roundtrip failed for {kind}");
        }
    }

    #[test]
    fn from_value_rejects_wrong_shape() {
        let result = EventPayload::from_value(
            EventType::TaskCompleted,
            serde_json::json!({"unexpected": true}),
        );
        assert!(result.is_err());
    }
}
