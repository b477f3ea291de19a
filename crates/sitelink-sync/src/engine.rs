//! The sync engine orchestrator.
//!
//! [`SyncEngine`] wires the subscription registry, live-feed projector,
//! offline queue, conflict resolver, and transport adapter behind a single
//! publish/subscribe API, and runs the event-processing loop.
//!
//! Concurrency model: publishers may call `publish` from any task; only
//! admission into the FIFO is synchronized. A single consumer task drains
//! the FIFO strictly in insertion order, which totals the order of side
//! effects (subscriber notification, projection, delivery attempt) per
//! engine instance. Critical-priority events bypass the FIFO and are
//! processed synchronously inside `publish`.
//!
//! The engine is an explicit instance — construct one at process start and
//! hand out clones (cheap, `Arc`-backed) to publishers and subscribers.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sitelink_core::{
    DashboardUpdate, DomainEvent, EventId, EventPayload, EventType, NameDirectory, Priority, Role,
    SessionProvider, SubscriptionId, TransportAdapter,
};
use sitelink_settings::SyncSettings;
use sitelink_store::{DrainOutcome, OfflineQueue};

use crate::errors::{Result, SyncError};
use crate::feeds::{AdminAlertEntry, ClientMetricEntry, LiveFeeds, WorkerActivityEntry};
use crate::monitor::{self, MonitorConfig};
use crate::registry::{SubscriberCallback, SubscriberError, SubscriptionRegistry};
use crate::resolve::{Resolution, StateVersion, resolve};

/// Everything the engine needs at construction time.
pub struct EngineConfig {
    /// Sync tunables (probe cadence, drain batch, feed capacity).
    pub settings: SyncSettings,
    /// Connection to the remote sync service.
    pub transport: Arc<dyn TransportAdapter>,
    /// Durable queue for undeliverable updates.
    pub queue: OfflineQueue,
    /// Read-only worker/building name lookup.
    pub directory: Arc<dyn NameDirectory>,
    /// External auth collaborator for the session monitor.
    pub session: Arc<dyn SessionProvider>,
}

pub(crate) struct EngineInner {
    pub(crate) registry: RwLock<SubscriptionRegistry>,
    pub(crate) feeds: Mutex<LiveFeeds>,
    pub(crate) remote_state: Mutex<HashMap<String, StateVersion>>,
    pub(crate) queue: OfflineQueue,
    pub(crate) transport: Arc<dyn TransportAdapter>,
    tx: mpsc::UnboundedSender<DomainEvent>,
    sends_halted: AtomicBool,
    drain_batch: usize,
}

impl EngineInner {
    /// Process one event to completion: notify, project, deliver-or-queue.
    pub(crate) async fn process_event(&self, event: &DomainEvent) {
        // (a) Notify matching subscriptions, each independently. A failing
        // callback is logged and skipped, never aborting its siblings.
        let callbacks = self
            .registry
            .read()
            .find(event.event_type, &event.target_roles);
        for callback in callbacks {
            if let Err(e) = callback(event) {
                warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %e,
                    "subscriber callback failed"
                );
            }
        }

        // (b) Project into the live feeds.
        let update = match DashboardUpdate::from_event(event) {
            Ok(update) => update,
            Err(e) => {
                warn!(event_id = %event.id, error = %e, "event projection failed, skipping");
                return;
            }
        };
        self.feeds.lock().project(&update);

        // (c) Deliver, or persist for the next connectivity window.
        self.deliver_or_queue(&update, event.priority).await;
    }

    async fn deliver_or_queue(&self, update: &DashboardUpdate, priority: Priority) {
        if self.transport.is_connected() && !self.sends_halted.load(Ordering::SeqCst) {
            match self.transport.send(update).await {
                Ok(()) => return,
                Err(e) => {
                    debug!(id = %update.id, error = %e, "delivery failed, queueing offline");
                }
            }
        } else {
            debug!(id = %update.id, "offline, queueing update");
        }
        if let Err(e) = self.queue.enqueue(update, priority) {
            warn!(id = %update.id, error = %e, "failed to persist update offline");
        }
    }

    /// Apply a remotely originated update after conflict resolution.
    pub(crate) fn apply_remote(&self, update: &DashboardUpdate) -> Resolution {
        let mut state = self.remote_state.lock();
        let verdict = resolve(state.get(&update.id), update);
        match verdict {
            Resolution::ApplyIncoming => {
                let _ = state.insert(update.id.clone(), StateVersion::of(update));
                drop(state);
                self.feeds.lock().project(update);
                debug!(id = %update.id, "remote update applied");
            }
            Resolution::KeepLocal => {
                debug!(id = %update.id, "remote update superseded by local state, dropped");
            }
        }
        verdict
    }

    /// Drain the offline queue through the transport.
    pub(crate) async fn drain_offline(&self) -> Result<DrainOutcome> {
        let outcome = self
            .queue
            .drain(self.drain_batch, self.transport.as_ref())
            .await?;
        Ok(outcome)
    }

    /// Stop attempting sends until a new session is supplied.
    pub(crate) fn halt_sends(&self) {
        self.sends_halted.store(true, Ordering::SeqCst);
    }

    pub(crate) fn sends_halted(&self) -> bool {
        self.sends_halted.load(Ordering::SeqCst)
    }
}

/// Cross-role real-time sync engine. Cheap to clone.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
    cancel: CancellationToken,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SyncEngine {
    /// Construct the engine and start its background tasks: the processing
    /// loop, the remote receive loop, and the connectivity/session monitors.
    #[must_use]
    pub fn start(config: EngineConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(EngineInner {
            registry: RwLock::new(SubscriptionRegistry::new()),
            feeds: Mutex::new(LiveFeeds::new(
                config.settings.feed_capacity,
                Arc::clone(&config.directory),
            )),
            remote_state: Mutex::new(HashMap::new()),
            queue: config.queue,
            transport: Arc::clone(&config.transport),
            tx,
            sends_halted: AtomicBool::new(false),
            drain_batch: config.settings.drain_batch,
        });

        let cancel = CancellationToken::new();
        let mut tasks = Vec::new();

        tasks.push(tokio::spawn(run_loop(
            Arc::clone(&inner),
            rx,
            cancel.clone(),
        )));

        if let Some(incoming) = config.transport.take_incoming() {
            tasks.push(tokio::spawn(run_remote(
                Arc::clone(&inner),
                incoming,
                cancel.clone(),
            )));
        }

        tasks.extend(monitor::spawn_monitors(
            Arc::clone(&inner),
            config.session,
            MonitorConfig::from_settings(&config.settings),
            cancel.clone(),
        ));

        info!("sync engine started");
        Self {
            inner,
            cancel,
            tasks: Arc::new(Mutex::new(tasks)),
        }
    }

    /// Publish an event.
    ///
    /// Validates the payload (malformed events are rejected, never
    /// enqueued), stamps the id and timestamp, then either processes the
    /// event synchronously (critical priority) or appends it to the FIFO
    /// and returns immediately.
    pub async fn publish(
        &self,
        source: Role,
        target_roles: Vec<Role>,
        priority: Priority,
        payload: EventPayload,
    ) -> Result<EventId> {
        let event = build_event(source, target_roles, priority, payload)?;
        let id = event.id.clone();

        if event.priority == Priority::Critical {
            self.inner.process_event(&event).await;
            return Ok(id);
        }

        self.inner
            .tx
            .send(event)
            .map_err(|_| SyncError::EngineStopped)?;
        Ok(id)
    }

    /// Sync handle for publishing from non-async contexts — including from
    /// inside a subscriber callback (the event appends to the same FIFO).
    #[must_use]
    pub fn handle(&self) -> PublishHandle {
        PublishHandle {
            tx: self.inner.tx.clone(),
        }
    }

    /// Register a callback for `(event_type, role)`.
    pub fn subscribe<F>(&self, event_type: EventType, role: Role, callback: F) -> SubscriptionId
    where
        F: Fn(&DomainEvent) -> std::result::Result<(), SubscriberError> + Send + Sync + 'static,
    {
        let callback: SubscriberCallback = Arc::new(callback);
        self.inner.registry.write().add(event_type, role, callback)
    }

    /// Remove a subscription. Returns `false` if the id was unknown.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.inner.registry.write().remove(id)
    }

    /// Apply a remotely originated update (receive path). Runs conflict
    /// resolution before touching any local state.
    pub fn apply_remote(&self, update: &DashboardUpdate) -> Resolution {
        self.inner.apply_remote(update)
    }

    /// Drain the offline queue now (normally the monitors trigger this).
    pub async fn drain_offline(&self) -> Result<DrainOutcome> {
        self.inner.drain_offline().await
    }

    /// Reconnect with a fresh session token after a session loss, then
    /// drain whatever accumulated while halted.
    pub async fn resume_with_session(&self, token: &str) -> Result<DrainOutcome> {
        self.inner.transport.connect(token).await?;
        self.inner.sends_halted.store(false, Ordering::SeqCst);
        info!("session resumed, transport reconnected");
        self.inner.drain_offline().await
    }

    /// Whether updates are currently flowing to the remote service.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.inner.transport.is_connected() && !self.inner.sends_halted()
    }

    /// Updates awaiting delivery.
    pub fn pending_count(&self) -> Result<u64> {
        Ok(self.inner.queue.pending_count()?)
    }

    /// Critical updates awaiting delivery.
    pub fn pending_critical_count(&self) -> Result<u64> {
        Ok(self.inner.queue.pending_critical_count()?)
    }

    /// Snapshot of the worker activity feed, oldest first.
    #[must_use]
    pub fn worker_activity(&self) -> Vec<WorkerActivityEntry> {
        self.inner.feeds.lock().worker_activity()
    }

    /// Snapshot of the admin alert feed, oldest first.
    #[must_use]
    pub fn admin_alerts(&self) -> Vec<AdminAlertEntry> {
        self.inner.feeds.lock().admin_alerts()
    }

    /// Snapshot of the client metric feed, oldest first.
    #[must_use]
    pub fn client_metrics(&self) -> Vec<ClientMetricEntry> {
        self.inner.feeds.lock().client_metrics()
    }

    /// Seed the offline queue directly (test-only).
    #[cfg(test)]
    pub(crate) fn test_enqueue(&self, update: &DashboardUpdate, priority: Priority) {
        self.inner.queue.enqueue(update, priority).unwrap();
    }

    /// Stop the engine: the loop finishes its in-flight event, queued but
    /// unprocessed events are dropped (criticals were already processed
    /// synchronously), registries and feeds are cleared, and the transport
    /// is disconnected.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            let _ = task.await;
        }
        self.inner.registry.write().clear();
        self.inner.feeds.lock().clear();
        self.inner.transport.disconnect().await;
        info!("sync engine stopped");
    }
}

/// Sync, clonable publisher backed by the engine's FIFO.
///
/// Critical events published through a handle do not bypass the queue —
/// use [`SyncEngine::publish`] when synchronous critical processing is
/// required.
#[derive(Clone)]
pub struct PublishHandle {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl PublishHandle {
    /// Stamp and append an event to the engine's FIFO.
    pub fn publish(
        &self,
        source: Role,
        target_roles: Vec<Role>,
        priority: Priority,
        payload: EventPayload,
    ) -> Result<EventId> {
        let event = build_event(source, target_roles, priority, payload)?;
        let id = event.id.clone();
        self.tx.send(event).map_err(|_| SyncError::EngineStopped)?;
        Ok(id)
    }
}

/// Validate and stamp a new event.
fn build_event(
    source: Role,
    target_roles: Vec<Role>,
    priority: Priority,
    payload: EventPayload,
) -> Result<DomainEvent> {
    payload.validate()?;
    if target_roles.is_empty() {
        return Err(SyncError::InvalidEvent(
            sitelink_core::CoreError::NoTargetRoles(payload.kind().as_str()),
        ));
    }
    Ok(DomainEvent::stamp(source, target_roles, priority, payload))
}

/// Single consumer: drains the FIFO strictly in insertion order.
async fn run_loop(
    inner: Arc<EngineInner>,
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            maybe = rx.recv() => match maybe {
                Some(event) => inner.process_event(&event).await,
                None => break,
            },
        }
    }
    debug!("processing loop stopped");
}

/// Receive loop: conflict-resolves and applies remote updates.
async fn run_remote(
    inner: Arc<EngineInner>,
    mut rx: mpsc::UnboundedReceiver<DashboardUpdate>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            maybe = rx.recv() => match maybe {
                Some(update) => {
                    let _ = inner.apply_remote(&update);
                }
                None => break,
            },
        }
    }
    debug!("remote receive loop stopped");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
