//! The [`DomainEvent`] envelope — the in-memory event type.
//!
//! Events are immutable once created: the orchestrator stamps the ID and
//! timestamp at publish time and nothing mutates them afterwards. The wire
//! and storage shape is the separate [`DashboardUpdate`](crate::update::DashboardUpdate)
//! projection — `DomainEvent` itself never crosses a process boundary.

use chrono::{DateTime, Utc};

use crate::event_type::EventType;
use crate::ids::EventId;
use crate::payload::EventPayload;
use crate::priority::Priority;
use crate::role::Role;

/// An immutable record of something that happened on one of the dashboards.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainEvent {
    /// Unique, creation-ordered event ID (UUID v7).
    pub id: EventId,
    /// Event type discriminator — always equals `payload.kind()`.
    pub event_type: EventType,
    /// Role that produced the event.
    pub source: Role,
    /// Roles whose subscribers should be notified.
    pub target_roles: Vec<Role>,
    /// Queue-drain and bypass priority.
    pub priority: Priority,
    /// Strongly-typed event data.
    pub payload: EventPayload,
    /// UTC creation time, stamped at publish.
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Stamp a new event from its parts.
    ///
    /// Generates the ID and timestamp; the discriminator is derived from
    /// the payload so the two can never disagree.
    #[must_use]
    pub fn stamp(
        source: Role,
        target_roles: Vec<Role>,
        priority: Priority,
        payload: EventPayload,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type: payload.kind(),
            source,
            target_roles,
            priority,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Whether `role` is among the event's targets.
    #[must_use]
    pub fn targets(&self, role: Role) -> bool {
        self.target_roles.contains(&role)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ClockInPayload;

    fn payload() -> EventPayload {
        EventPayload::ClockIn(ClockInPayload {
            worker_id: "w1".into(),
            building_id: "b1".into(),
        })
    }

    #[test]
    fn stamp_derives_type_from_payload() {
        let event = DomainEvent::stamp(
            Role::Worker,
            vec![Role::Admin],
            Priority::Medium,
            payload(),
        );
        assert_eq!(event.event_type, EventType::WorkerClockIn);
        assert!(event.id.as_str().starts_with("evt_"));
    }

    #[test]
    fn stamp_generates_unique_ids() {
        let a = DomainEvent::stamp(Role::Worker, vec![Role::Admin], Priority::Medium, payload());
        let b = DomainEvent::stamp(Role::Worker, vec![Role::Admin], Priority::Medium, payload());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn targets_checks_membership() {
        let event = DomainEvent::stamp(
            Role::Worker,
            vec![Role::Admin, Role::Client],
            Priority::Medium,
            payload(),
        );
        assert!(event.targets(Role::Admin));
        assert!(event.targets(Role::Client));
        assert!(!event.targets(Role::Worker));
    }

    #[test]
    fn timestamps_are_monotonic_enough() {
        let a = DomainEvent::stamp(Role::Worker, vec![Role::Admin], Priority::Medium, payload());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = DomainEvent::stamp(Role::Worker, vec![Role::Admin], Priority::Medium, payload());
        assert!(b.timestamp > a.timestamp);
    }
}
