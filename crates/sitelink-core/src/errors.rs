//! Error types shared across the sync engine.
//!
//! [`CoreError`] covers event construction and validation failures.
//! [`TransportError`] is the boundary error type for [`TransportAdapter`]
//! implementations — a `send` error is the sole failure signal the
//! orchestrator and offline queue consume.
//!
//! [`TransportAdapter`]: crate::transport::TransportAdapter

use thiserror::Error;

/// Errors raised while building or validating events.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required payload field was empty or missing.
    #[error("event {event_type} is missing required field: {field}")]
    MissingField {
        /// Wire name of the event type being published.
        event_type: &'static str,
        /// camelCase wire name of the offending field.
        field: &'static str,
    },

    /// An event was published with no target roles.
    #[error("event {0} has no target roles")]
    NoTargetRoles(&'static str),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised by transport adapter implementations.
///
/// Adapters never retry internally — retry policy lives in the offline
/// queue, so every variant here is terminal for the single attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection establishment failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// A send was attempted while disconnected.
    #[error("not connected")]
    NotConnected,

    /// The send itself failed (socket closed, write error).
    #[error("send failed: {0}")]
    Send(String),

    /// The update could not be serialized for the wire.
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for core results.
pub type Result<T> = std::result::Result<T, CoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
