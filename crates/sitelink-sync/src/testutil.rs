//! Shared test doubles for the engine and monitor tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use sitelink_core::errors::TransportError;
use sitelink_core::{DashboardUpdate, Session, SessionProvider, TransportAdapter};

/// In-memory transport double with switchable connectivity.
pub(crate) struct StubTransport {
    online: AtomicBool,
    sent: Mutex<Vec<DashboardUpdate>>,
    incoming_tx: mpsc::UnboundedSender<DashboardUpdate>,
    incoming_rx: Mutex<Option<mpsc::UnboundedReceiver<DashboardUpdate>>>,
    pub(crate) disconnects: AtomicUsize,
}

impl StubTransport {
    pub(crate) fn new(online: bool) -> Arc<Self> {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            online: AtomicBool::new(online),
            sent: Mutex::new(Vec::new()),
            incoming_tx,
            incoming_rx: Mutex::new(Some(incoming_rx)),
            disconnects: AtomicUsize::new(0),
        })
    }

    pub(crate) fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub(crate) fn sent_ids(&self) -> Vec<String> {
        self.sent.lock().iter().map(|u| u.id.clone()).collect()
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Simulate the remote sync service pushing an update down the socket.
    pub(crate) fn push_incoming(&self, update: DashboardUpdate) {
        self.incoming_tx.send(update).unwrap();
    }
}

#[async_trait]
impl TransportAdapter for StubTransport {
    async fn connect(&self, _auth_token: &str) -> Result<(), TransportError> {
        self.online.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, update: &DashboardUpdate) -> Result<(), TransportError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.sent.lock().push(update.clone());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) {
        self.online.store(false, Ordering::SeqCst);
        let _ = self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn take_incoming(&self) -> Option<mpsc::UnboundedReceiver<DashboardUpdate>> {
        self.incoming_rx.lock().take()
    }
}

/// Session provider double with a switchable validity flag.
pub(crate) struct StubSession {
    valid: AtomicBool,
}

impl StubSession {
    pub(crate) fn new(valid: bool) -> Arc<Self> {
        Arc::new(Self {
            valid: AtomicBool::new(valid),
        })
    }

    pub(crate) fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }
}

impl SessionProvider for StubSession {
    fn current_session(&self) -> Session {
        Session {
            token: "stub-token".into(),
            is_valid: self.valid.load(Ordering::SeqCst),
        }
    }
}
