//! The [`DashboardUpdate`] wire and storage projection.
//!
//! Exactly one `DashboardUpdate` is derived from each
//! [`DomainEvent`](crate::event::DomainEvent); its `id` always equals the
//! originating event's id, which is what makes offline replay idempotent.
//!
//! The JSON shape is shared by the remote sync envelope and the durable
//! queue's `update_data` column:
//!
//! ```json
//! { "id": "evt_...", "source": "worker", "type": "task.completed",
//!   "buildingId": "b1", "workerId": "w1", "payload": {...},
//!   "timestamp": "2026-08-06T10:00:00Z" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::event::DomainEvent;
use crate::event_type::EventType;
use crate::role::Role;

/// Normalized projection of an event for persistence and transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdate {
    /// Originating event ID — the idempotent dedupe key.
    pub id: String,
    /// Role that produced the originating event.
    pub source: Role,
    /// Event type discriminator.
    #[serde(rename = "type")]
    pub update_type: EventType,
    /// Building the update concerns (absent for portfolio-wide updates).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    /// Worker the update concerns (absent for non-worker updates).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// Opaque payload JSON (serialized typed payload).
    pub payload: Value,
    /// Creation time of the originating event.
    pub timestamp: DateTime<Utc>,
    /// Optional monotonic version used as the conflict tie-break.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl DashboardUpdate {
    /// Project a domain event into its wire shape.
    pub fn from_event(event: &DomainEvent) -> Result<Self> {
        Ok(Self {
            id: event.id.as_str().to_owned(),
            source: event.source,
            update_type: event.event_type,
            building_id: event.payload.building_id().map(str::to_owned),
            worker_id: event.payload.worker_id().map(str::to_owned),
            payload: event.payload.to_value()?,
            timestamp: event.timestamp,
            version: None,
        })
    }

    /// Serialize to the JSON text sent on the wire / stored in the queue.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from wire/storage JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
