//! WebSocket client adapter.
//!
//! Wraps a persistent bidirectional connection to the remote sync service.
//! Outbound updates are serialized as JSON text frames; inbound text frames
//! are parsed into [`DashboardUpdate`]s and forwarded on the incoming
//! channel (malformed frames are logged and dropped).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use sitelink_core::errors::TransportError;
use sitelink_core::{DashboardUpdate, TransportAdapter};
use sitelink_settings::TransportSettings;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// WebSocket implementation of [`TransportAdapter`].
pub struct WsTransport {
    url: String,
    connect_timeout: Duration,
    connected: Arc<AtomicBool>,
    sink: tokio::sync::Mutex<Option<WsSink>>,
    incoming_tx: mpsc::UnboundedSender<DashboardUpdate>,
    incoming_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<DashboardUpdate>>>,
    read_task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl WsTransport {
    /// Create an adapter targeting the given WebSocket URL.
    #[must_use]
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Self {
            url: url.into(),
            connect_timeout,
            connected: Arc::new(AtomicBool::new(false)),
            sink: tokio::sync::Mutex::new(None),
            incoming_tx,
            incoming_rx: parking_lot::Mutex::new(Some(incoming_rx)),
            read_task: parking_lot::Mutex::new(None),
        }
    }

    /// Create an adapter from transport settings.
    #[must_use]
    pub fn from_settings(settings: &TransportSettings) -> Self {
        Self::new(
            settings.ws_url.clone(),
            Duration::from_millis(settings.connect_timeout_ms),
        )
    }

    fn abort_read_task(&self) {
        if let Some(task) = self.read_task.lock().take() {
            task.abort();
        }
    }

    /// Read loop: parses inbound text frames and forwards them until the
    /// stream ends, then flips the connected flag.
    async fn run_reader(
        mut stream: futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
        incoming_tx: mpsc::UnboundedSender<DashboardUpdate>,
        connected: Arc<AtomicBool>,
    ) {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match DashboardUpdate::from_json(text.as_str()) {
                    Ok(update) => {
                        debug!(id = %update.id, update_type = %update.update_type, "remote update received");
                        if incoming_tx.send(update).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "malformed remote update frame, dropping");
                    }
                },
                Ok(Message::Close(_)) => {
                    info!("remote sync service closed the connection");
                    break;
                }
                Ok(_) => {
                    // Ping/pong/binary frames carry no updates.
                }
                Err(e) => {
                    warn!(error = %e, "websocket read error");
                    break;
                }
            }
        }
        connected.store(false, Ordering::Relaxed);
    }
}

#[async_trait]
impl TransportAdapter for WsTransport {
    async fn connect(&self, auth_token: &str) -> Result<(), TransportError> {
        self.abort_read_task();

        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {auth_token}"))
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let _ = request.headers_mut().insert("Authorization", bearer);

        let (stream, _response) =
            tokio::time::timeout(self.connect_timeout, connect_async(request))
                .await
                .map_err(|_| TransportError::Connect("connect timed out".into()))?
                .map_err(|e| TransportError::Connect(e.to_string()))?;

        let (sink, read_half) = stream.split();
        *self.sink.lock().await = Some(sink);
        self.connected.store(true, Ordering::Relaxed);

        let task = tokio::spawn(Self::run_reader(
            read_half,
            self.incoming_tx.clone(),
            Arc::clone(&self.connected),
        ));
        *self.read_task.lock() = Some(task);

        info!(url = %self.url, "transport connected");
        Ok(())
    }

    async fn send(&self, update: &DashboardUpdate) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let json = serde_json::to_string(update)?;

        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(TransportError::NotConnected)?;
        match sink.send(Message::text(json)).await {
            Ok(()) => {
                debug!(id = %update.id, "update sent");
                Ok(())
            }
            Err(e) => {
                // A failed write means the connection is gone; the monitor
                // will notice and schedule a reconnect drain.
                self.connected.store(false, Ordering::Relaxed);
                Err(TransportError::Send(e.to_string()))
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn disconnect(&self) {
        self.abort_read_task();
        if let Some(mut sink) = self.sink.lock().await.take() {
            let _ = sink.close().await;
        }
        self.connected.store(false, Ordering::Relaxed);
        info!("transport disconnected");
    }

    fn take_incoming(&self) -> Option<mpsc::UnboundedReceiver<DashboardUpdate>> {
        self.incoming_rx.lock().take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
