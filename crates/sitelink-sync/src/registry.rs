//! In-memory subscription registry.
//!
//! Holds per-role, per-event-type callback registrations. Add and remove
//! are O(1) by id; lookup is an O(n) scan, which is fine — subscription
//! counts are bounded by dashboard component counts.
//!
//! Callbacks must be fast and non-blocking: they run synchronously on the
//! processing loop, and there is no per-callback timeout. A callback that
//! returns `Err` is logged and skipped; it never aborts sibling callbacks
//! or the loop.
//!
//! No persistence — the owning UI layer re-subscribes on process start.

use std::collections::HashMap;
use std::sync::Arc;

use sitelink_core::{DomainEvent, EventType, Role, SubscriptionId};

/// Error type a subscriber callback may return.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber callback. Invoked synchronously on the processing loop.
pub type SubscriberCallback =
    Arc<dyn Fn(&DomainEvent) -> std::result::Result<(), SubscriberError> + Send + Sync>;

struct Subscription {
    event_type: EventType,
    role: Role,
    callback: SubscriberCallback,
}

/// Registry of active subscriptions.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<SubscriptionId, Subscription>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `(event_type, role)` and return its handle.
    pub fn add(
        &mut self,
        event_type: EventType,
        role: Role,
        callback: SubscriberCallback,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        let _ = self.subscriptions.insert(
            id.clone(),
            Subscription {
                event_type,
                role,
                callback,
            },
        );
        id
    }

    /// Remove a subscription. Returns `false` if the id was unknown.
    pub fn remove(&mut self, id: &SubscriptionId) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    /// Callbacks matching an event: same event type, and the subscription's
    /// role is among the event's target roles.
    #[must_use]
    pub fn find(&self, event_type: EventType, target_roles: &[Role]) -> Vec<SubscriberCallback> {
        self.subscriptions
            .values()
            .filter(|s| s.event_type == event_type && target_roles.contains(&s.role))
            .map(|s| Arc::clone(&s.callback))
            .collect()
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Drop all subscriptions (shutdown path).
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
