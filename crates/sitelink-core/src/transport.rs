//! Collaborator traits — the seams to everything outside the sync engine.
//!
//! [`TransportAdapter`] wraps the persistent connection to the remote sync
//! service. [`SessionProvider`] is the external auth collaborator consulted
//! by the session monitor. [`NameDirectory`] is the read-only worker/building
//! name lookup used to enrich live-feed entries.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::TransportError;
use crate::update::DashboardUpdate;

/// Persistent bidirectional connection to the remote sync service.
///
/// `send` failing is the sole failure signal the orchestrator and offline
/// queue consume; adapters must not retry internally — retry policy is
/// centralized in the offline queue.
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    /// Establish the connection using the given auth token.
    async fn connect(&self, auth_token: &str) -> Result<(), TransportError>;

    /// Send a single update. Errors are terminal for this attempt.
    async fn send(&self, update: &DashboardUpdate) -> Result<(), TransportError>;

    /// Current connection state, used as the connectivity health signal.
    fn is_connected(&self) -> bool;

    /// Tear down the connection.
    async fn disconnect(&self);

    /// Take the receive channel of remotely originated updates.
    ///
    /// Yields `Some` exactly once; the orchestrator owns the receiver for
    /// the lifetime of the engine.
    fn take_incoming(&self) -> Option<mpsc::UnboundedReceiver<DashboardUpdate>>;
}

/// Current auth session as reported by the external session collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for the transport connection.
    pub token: String,
    /// Whether the session is still valid.
    pub is_valid: bool,
}

/// External session collaborator consulted by the session monitor.
pub trait SessionProvider: Send + Sync {
    /// Snapshot of the current session.
    fn current_session(&self) -> Session;
}

/// Read-only worker/building display-name lookup.
///
/// Backed by the platform's entity storage, which is out of scope here —
/// the projector only reads names to enrich feed entries.
pub trait NameDirectory: Send + Sync {
    /// Display name for a worker, if known.
    fn worker_name(&self, worker_id: &str) -> Option<String>;

    /// Display name for a building, if known.
    fn building_name(&self, building_id: &str) -> Option<String>;
}

/// Session provider backed by a fixed token that never expires.
///
/// Useful for tools and tests; production wires the platform's real
/// auth collaborator instead.
#[derive(Clone, Debug)]
pub struct StaticSessionProvider {
    token: String,
}

impl StaticSessionProvider {
    /// Create a provider that always reports the given token as valid.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_session(&self) -> Session {
        Session {
            token: self.token.clone(),
            is_valid: true,
        }
    }
}

/// Directory that knows no names. Feed entries fall back to raw IDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDirectory;

impl NameDirectory for NullDirectory {
    fn worker_name(&self, _worker_id: &str) -> Option<String> {
        None
    }

    fn building_name(&self, _building_id: &str) -> Option<String> {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_directory_knows_nothing() {
        let dir = NullDirectory;
        assert!(dir.worker_name("w1").is_none());
        assert!(dir.building_name("b1").is_none());
    }

    #[test]
    fn session_equality() {
        let a = Session {
            token: "tok".into(),
            is_valid: true,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn static_session_always_valid() {
        let provider = StaticSessionProvider::new("tok-1");
        let session = provider.current_session();
        assert_eq!(session.token, "tok-1");
        assert!(session.is_valid);
    }
}
