//! Error types for the sync engine.

use thiserror::Error;

use sitelink_core::errors::{CoreError, TransportError};
use sitelink_store::StoreError;

/// Errors surfaced by the sync engine's public API.
///
/// Transient delivery failures never appear here — they are absorbed by
/// the offline queue. What remains is malformed input, storage faults,
/// connection establishment failures, and use-after-shutdown.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The event was malformed and rejected at publish time.
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] CoreError),

    /// Offline queue I/O failed.
    #[error("offline queue error: {0}")]
    Store(#[from] StoreError),

    /// Transport connection establishment failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The engine has been shut down; no further events are accepted.
    #[error("sync engine is stopped")]
    EngineStopped,
}

/// Convenience alias for sync results.
pub type Result<T> = std::result::Result<T, SyncError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_event_display() {
        let core = CoreError::NoTargetRoles("alert.created");
        let err: SyncError = core.into();
        assert_eq!(
            err.to_string(),
            "invalid event: event alert.created has no target roles"
        );
    }

    #[test]
    fn engine_stopped_display() {
        assert_eq!(SyncError::EngineStopped.to_string(), "sync engine is stopped");
    }

    #[test]
    fn from_transport_error() {
        let err: SyncError = TransportError::NotConnected.into();
        assert!(matches!(err, SyncError::Transport(_)));
    }
}
