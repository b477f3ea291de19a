//! Conflict resolution for remotely originated updates.
//!
//! Last-write-wins by timestamp. Exactly equal timestamps fall back to the
//! optional numeric `version` field; with no version on both sides the
//! local state wins. Invoked only on the transport receive path — locally
//! originated updates never pass through here.

use chrono::{DateTime, Utc};

use sitelink_core::DashboardUpdate;

/// Version of locally held state for one update id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateVersion {
    /// Timestamp of the last applied update.
    pub timestamp: DateTime<Utc>,
    /// Monotonic version counter, when the producer supplies one.
    pub version: Option<i64>,
}

impl StateVersion {
    /// Capture the version of an applied update.
    #[must_use]
    pub fn of(update: &DashboardUpdate) -> Self {
        Self {
            timestamp: update.timestamp,
            version: update.version,
        }
    }
}

/// Resolution verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The incoming update supersedes local state.
    ApplyIncoming,
    /// Local state stands; the incoming update is discarded.
    KeepLocal,
}

/// Decide whether an incoming remote update supersedes local state.
///
/// - No local version → always apply (no conflict).
/// - Incoming strictly newer → apply.
/// - Incoming strictly older → keep local.
/// - Equal timestamps → compare `version` fields when both are present;
///   otherwise keep local.
#[must_use]
pub fn resolve(local: Option<&StateVersion>, incoming: &DashboardUpdate) -> Resolution {
    let Some(local) = local else {
        return Resolution::ApplyIncoming;
    };

    if incoming.timestamp > local.timestamp {
        return Resolution::ApplyIncoming;
    }
    if incoming.timestamp < local.timestamp {
        return Resolution::KeepLocal;
    }

    match (local.version, incoming.version) {
        (Some(local_v), Some(incoming_v)) if incoming_v > local_v => Resolution::ApplyIncoming,
        _ => Resolution::KeepLocal,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitelink_core::{EventType, Role};

    fn update_at(ts: DateTime<Utc>, version: Option<i64>) -> DashboardUpdate {
        DashboardUpdate {
            id: "evt_1".into(),
            source: Role::Admin,
            update_type: EventType::AlertCreated,
            building_id: None,
            worker_id: None,
            payload: serde_json::json!({}),
            timestamp: ts,
            version,
        }
    }

    fn t(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, secs).unwrap()
    }

    #[test]
    fn no_local_always_applies() {
        let incoming = update_at(t(0), None);
        assert_eq!(resolve(None, &incoming), Resolution::ApplyIncoming);
    }

    #[test]
    fn newer_incoming_applies() {
        let local = StateVersion {
            timestamp: t(1),
            version: None,
        };
        let incoming = update_at(t(2), None);
        assert_eq!(resolve(Some(&local), &incoming), Resolution::ApplyIncoming);
    }

    #[test]
    fn older_incoming_keeps_local() {
        let local = StateVersion {
            timestamp: t(2),
            version: None,
        };
        let incoming = update_at(t(1), None);
        assert_eq!(resolve(Some(&local), &incoming), Resolution::KeepLocal);
    }

    #[test]
    fn equal_timestamps_no_versions_keeps_local() {
        let local = StateVersion {
            timestamp: t(1),
            version: None,
        };
        let incoming = update_at(t(1), None);
        assert_eq!(resolve(Some(&local), &incoming), Resolution::KeepLocal);
    }

    #[test]
    fn equal_timestamps_higher_version_applies() {
        let local = StateVersion {
            timestamp: t(1),
            version: Some(3),
        };
        let incoming = update_at(t(1), Some(4));
        assert_eq!(resolve(Some(&local), &incoming), Resolution::ApplyIncoming);
    }

    #[test]
    fn equal_timestamps_equal_version_keeps_local() {
        let local = StateVersion {
            timestamp: t(1),
            version: Some(3),
        };
        let incoming = update_at(t(1), Some(3));
        assert_eq!(resolve(Some(&local), &incoming), Resolution::KeepLocal);
    }

    #[test]
    fn equal_timestamps_lower_version_keeps_local() {
        let local = StateVersion {
            timestamp: t(1),
            version: Some(3),
        };
        let incoming = update_at(t(1), Some(2));
        assert_eq!(resolve(Some(&local), &incoming), Resolution::KeepLocal);
    }

    #[test]
    fn equal_timestamps_one_sided_version_keeps_local() {
        let local = StateVersion {
            timestamp: t(1),
            version: None,
        };
        let incoming = update_at(t(1), Some(9));
        assert_eq!(resolve(Some(&local), &incoming), Resolution::KeepLocal);
    }

    #[test]
    fn newer_incoming_wins_regardless_of_version() {
        let local = StateVersion {
            timestamp: t(1),
            version: Some(100),
        };
        let incoming = update_at(t(2), Some(1));
        assert_eq!(resolve(Some(&local), &incoming), Resolution::ApplyIncoming);
    }

    #[test]
    fn state_version_of_update() {
        let incoming = update_at(t(5), Some(7));
        let version = StateVersion::of(&incoming);
        assert_eq!(version.timestamp, t(5));
        assert_eq!(version.version, Some(7));
    }
}
