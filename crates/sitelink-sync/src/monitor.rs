//! Connectivity and session monitors.
//!
//! Two independent periodic probes run as background tasks sharing the
//! engine's cancellation token, so shutdown stops them deterministically:
//!
//! - **Connectivity probe** (default every 30s): watches the transport's
//!   connection state; an offline→online transition triggers an offline
//!   queue drain. A slower safety-net timer also drains while connected,
//!   catching entries left behind by partial drain failures.
//! - **Session probe** (default every 60s): consults the external session
//!   collaborator; an invalid session forces a disconnect and halts sends.
//!   This is fatal for the session — there is no automatic retry, a new
//!   session must be supplied via `resume_with_session`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sitelink_core::SessionProvider;
use sitelink_settings::SyncSettings;

use crate::engine::EngineInner;

/// Probe cadence for the monitors.
#[derive(Clone, Copy, Debug)]
pub struct MonitorConfig {
    /// Connectivity probe interval.
    pub connectivity_probe: Duration,
    /// Session validity probe interval.
    pub session_probe: Duration,
    /// Safety-net drain interval.
    pub drain_interval: Duration,
}

impl MonitorConfig {
    /// Build from sync settings.
    #[must_use]
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            connectivity_probe: Duration::from_secs(settings.connectivity_probe_secs),
            session_probe: Duration::from_secs(settings.session_probe_secs),
            drain_interval: Duration::from_secs(settings.drain_interval_secs),
        }
    }
}

/// Spawn both monitor tasks.
pub(crate) fn spawn_monitors(
    inner: Arc<EngineInner>,
    session: Arc<dyn SessionProvider>,
    config: MonitorConfig,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(run_connectivity_monitor(
            Arc::clone(&inner),
            config,
            cancel.clone(),
        )),
        tokio::spawn(run_session_monitor(inner, session, config, cancel)),
    ]
}

/// Connectivity probe + safety-net drain timer.
///
/// `was_online` starts false, so an engine that boots already connected
/// drains leftovers from the previous run on the first probe tick.
async fn run_connectivity_monitor(
    inner: Arc<EngineInner>,
    config: MonitorConfig,
    cancel: CancellationToken,
) {
    let mut probe = time::interval(config.connectivity_probe);
    let mut drain_tick = time::interval(config.drain_interval);
    let mut was_online = false;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = probe.tick() => {
                let now_online = inner.transport.is_connected();
                if now_online && !was_online && !inner.sends_halted() {
                    info!("connectivity regained, draining offline queue");
                    if let Err(e) = inner.drain_offline().await {
                        warn!(error = %e, "reconnect drain failed");
                    }
                }
                was_online = now_online;
            }
            _ = drain_tick.tick() => {
                if inner.transport.is_connected() && !inner.sends_halted() {
                    if let Err(e) = inner.drain_offline().await {
                        warn!(error = %e, "scheduled drain failed");
                    }
                }
            }
        }
    }
}

/// Session validity probe.
async fn run_session_monitor(
    inner: Arc<EngineInner>,
    session: Arc<dyn SessionProvider>,
    config: MonitorConfig,
    cancel: CancellationToken,
) {
    let mut probe = time::interval(config.session_probe);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = probe.tick() => {
                let current = session.current_session();
                if !current.is_valid && !inner.sends_halted() {
                    warn!("session invalid, disconnecting transport and halting sends");
                    inner.halt_sends();
                    inner.transport.disconnect().await;
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
