//! Row mapping types for the offline queue table.

use std::str::FromStr;

use sitelink_core::{DashboardUpdate, Priority};

use crate::errors::{Result, StoreError};

/// Raw `offline_queue` row as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueRow {
    /// Update/event ID (primary key).
    pub id: String,
    /// Event type wire string.
    pub update_type: String,
    /// Serialized [`DashboardUpdate`] JSON.
    pub update_data: String,
    /// Priority wire string.
    pub priority: String,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl QueueRow {
    /// Parse the serialized update payload.
    pub fn parse_update(&self) -> Result<DashboardUpdate> {
        Ok(serde_json::from_str(&self.update_data)?)
    }

    /// Parse the stored priority string.
    pub fn parse_priority(&self) -> Result<Priority> {
        Priority::from_str(&self.priority)
            .map_err(|_| StoreError::InvalidPriority(self.priority.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sitelink_core::{DomainEvent, EventPayload, Role, payload::ClockInPayload};

    fn row() -> QueueRow {
        let event = DomainEvent::stamp(
            Role::Worker,
            vec![Role::Admin],
            Priority::Medium,
            EventPayload::ClockIn(ClockInPayload {
                worker_id: "w1".into(),
                building_id: "b1".into(),
            }),
        );
        let update = DashboardUpdate::from_event(&event).unwrap();
        QueueRow {
            id: update.id.clone(),
            update_type: update.update_type.as_str().into(),
            update_data: update.to_json().unwrap(),
            priority: "medium".into(),
            created_at: "2026-08-06T10:00:00.000000Z".into(),
        }
    }

    #[test]
    fn parse_update_roundtrips() {
        let row = row();
        let update = row.parse_update().unwrap();
        assert_eq!(update.id, row.id);
        assert_eq!(update.worker_id.as_deref(), Some("w1"));
    }

    #[test]
    fn parse_priority_valid() {
        assert_eq!(row().parse_priority().unwrap(), Priority::Medium);
    }

    #[test]
    fn parse_priority_invalid() {
        let mut bad = row();
        bad.priority = "urgent".into();
        assert!(matches!(
            bad.parse_priority(),
            Err(StoreError::InvalidPriority(_))
        ));
    }

    #[test]
    fn parse_update_rejects_corrupt_json() {
        let mut bad = row();
        bad.update_data = "{broken".into();
        assert!(bad.parse_update().is_err());
    }
}
