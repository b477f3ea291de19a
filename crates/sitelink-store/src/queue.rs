//! The offline durable queue.
//!
//! Undeliverable updates are persisted here keyed by id, priority, and
//! creation time, and replayed when connectivity returns. Enqueue is
//! idempotent — re-enqueuing an id overwrites the existing row, never
//! duplicates it — which keeps replay safe under at-least-once delivery.

use chrono::SecondsFormat;
use rusqlite::params;
use tracing::{debug, info, warn};

use sitelink_core::{DashboardUpdate, Priority, TransportAdapter};

use crate::connection::{self, ConnectionConfig, ConnectionPool};
use crate::errors::Result;
use crate::migrations;
use crate::row_types::QueueRow;

const SELECT_COLUMNS: &str = "id, update_type, update_data, priority, created_at";

/// Drain order: priority rank descending, then oldest first.
const DRAIN_ORDER: &str = "CASE priority \
     WHEN 'critical' THEN 3 WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END DESC, \
     created_at ASC";

/// Outcome of a single drain pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Entries delivered and deleted.
    pub delivered: usize,
    /// Entries that failed delivery and remain queued.
    pub failed: usize,
}

/// Durable queue of updates awaiting delivery.
pub struct OfflineQueue {
    pool: ConnectionPool,
}

impl OfflineQueue {
    /// Open (or create) a file-backed queue and run pending migrations.
    pub fn open(path: &std::path::Path, config: &ConnectionConfig) -> Result<Self> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pool = connection::new_file(path, config)?;
        Self::from_pool(pool)
    }

    /// Open an in-memory queue (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = connection::new_in_memory(&ConnectionConfig::default())?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: ConnectionPool) -> Result<Self> {
        {
            let conn = pool.get()?;
            let _ = migrations::run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Persist an update for later delivery.
    ///
    /// Idempotent: re-enqueuing the same id overwrites the existing row.
    pub fn enqueue(&self, update: &DashboardUpdate, priority: Priority) -> Result<()> {
        let conn = self.pool.get()?;
        let created_at = update
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let _ = conn.execute(
            "INSERT OR REPLACE INTO offline_queue (id, update_type, update_data, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                update.id,
                update.update_type.as_str(),
                update.to_json()?,
                priority.as_str(),
                created_at,
            ],
        )?;
        debug!(id = %update.id, priority = %priority, "update queued offline");
        Ok(())
    }

    /// Number of entries awaiting delivery.
    pub fn pending_count(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM offline_queue", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of critical entries awaiting delivery.
    pub fn pending_critical_count(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM offline_queue WHERE priority = 'critical'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Read up to `max` entries in drain order without delivering them.
    pub fn peek_batch(&self, max: usize) -> Result<Vec<QueueRow>> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM offline_queue ORDER BY {DRAIN_ORDER} LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        #[allow(clippy::cast_possible_wrap)]
        let rows = stmt
            .query_map(params![max as i64], |row| {
                Ok(QueueRow {
                    id: row.get(0)?,
                    update_type: row.get(1)?,
                    update_data: row.get(2)?,
                    priority: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Attempt delivery of up to `max_batch` entries through the transport.
    ///
    /// Entries are processed in drain order. A delivered entry is deleted;
    /// a failed entry is left in place and the pass continues with the next
    /// one — there is no blocking retry within a single pass, the entry is
    /// retried on the next scheduled drain.
    pub async fn drain(
        &self,
        max_batch: usize,
        transport: &dyn TransportAdapter,
    ) -> Result<DrainOutcome> {
        let batch = self.peek_batch(max_batch)?;
        if batch.is_empty() {
            return Ok(DrainOutcome::default());
        }

        let mut outcome = DrainOutcome::default();
        for row in batch {
            let update = match row.parse_update() {
                Ok(update) => update,
                Err(e) => {
                    // Tampered or truncated row: it can never deliver, so it
                    // stays put and is surfaced through logs only.
                    warn!(id = %row.id, error = %e, "corrupt offline queue entry, skipping");
                    outcome.failed += 1;
                    continue;
                }
            };
            match transport.send(&update).await {
                Ok(()) => {
                    self.delete(&row.id)?;
                    outcome.delivered += 1;
                }
                Err(e) => {
                    debug!(id = %row.id, error = %e, "delivery failed, entry retained");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            delivered = outcome.delivered,
            failed = outcome.failed,
            "offline queue drain pass complete"
        );
        Ok(outcome)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let _ = conn.execute("DELETE FROM offline_queue WHERE id = ?1", params![id])?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use sitelink_core::errors::TransportError;
    use sitelink_core::payload::{ClockInPayload, EmergencyPayload, TaskCompletedPayload};
    use sitelink_core::{DomainEvent, EventPayload, Role};

    /// Transport double: records sends, optionally fails everything or a
    /// chosen set of update ids.
    #[derive(Default)]
    struct StubTransport {
        fail_all: AtomicBool,
        fail_ids: Mutex<HashSet<String>>,
        sent: Mutex<Vec<DashboardUpdate>>,
    }

    impl StubTransport {
        fn failing() -> Self {
            let t = Self::default();
            t.fail_all.store(true, Ordering::Relaxed);
            t
        }

        fn fail_id(&self, id: &str) {
            self.fail_ids.lock().insert(id.to_owned());
        }

        fn sent_ids(&self) -> Vec<String> {
            self.sent.lock().iter().map(|u| u.id.clone()).collect()
        }
    }

    #[async_trait]
    impl TransportAdapter for StubTransport {
        async fn connect(&self, _auth_token: &str) -> std::result::Result<(), TransportError> {
            Ok(())
        }

        async fn send(
            &self,
            update: &DashboardUpdate,
        ) -> std::result::Result<(), TransportError> {
            if self.fail_all.load(Ordering::Relaxed) {
                return Err(TransportError::Send("stub offline".into()));
            }
            if self.fail_ids.lock().contains(&update.id) {
                return Err(TransportError::Send("stub rejected".into()));
            }
            self.sent.lock().push(update.clone());
            Ok(())
        }

        fn is_connected(&self) -> bool {
            !self.fail_all.load(Ordering::Relaxed)
        }

        async fn disconnect(&self) {}

        fn take_incoming(&self) -> Option<mpsc::UnboundedReceiver<DashboardUpdate>> {
            None
        }
    }

    fn update_with_priority(worker: &str) -> DashboardUpdate {
        let event = DomainEvent::stamp(
            Role::Worker,
            vec![Role::Admin],
            Priority::Medium,
            EventPayload::ClockIn(ClockInPayload {
                worker_id: worker.into(),
                building_id: "b1".into(),
            }),
        );
        DashboardUpdate::from_event(&event).unwrap()
    }

    fn emergency_update() -> DashboardUpdate {
        let event = DomainEvent::stamp(
            Role::Worker,
            vec![Role::Admin],
            Priority::Critical,
            EventPayload::Emergency(EmergencyPayload {
                worker_id: "w9".into(),
                building_id: "b9".into(),
                description: "Gas smell in basement".into(),
            }),
        );
        DashboardUpdate::from_event(&event).unwrap()
    }

    #[test]
    fn enqueue_increments_pending() {
        let queue = OfflineQueue::in_memory().unwrap();
        assert_eq!(queue.pending_count().unwrap(), 0);
        queue
            .enqueue(&update_with_priority("w1"), Priority::Medium)
            .unwrap();
        assert_eq!(queue.pending_count().unwrap(), 1);
    }

    #[test]
    fn enqueue_same_id_is_idempotent() {
        let queue = OfflineQueue::in_memory().unwrap();
        let update = update_with_priority("w1");
        queue.enqueue(&update, Priority::Medium).unwrap();
        queue.enqueue(&update, Priority::Medium).unwrap();
        queue.enqueue(&update, Priority::High).unwrap();
        assert_eq!(queue.pending_count().unwrap(), 1);
        // Last write wins on the row itself
        let rows = queue.peek_batch(10).unwrap();
        assert_eq!(rows[0].priority, "high");
    }

    #[test]
    fn pending_critical_count_filters() {
        let queue = OfflineQueue::in_memory().unwrap();
        queue
            .enqueue(&update_with_priority("w1"), Priority::Medium)
            .unwrap();
        queue
            .enqueue(&emergency_update(), Priority::Critical)
            .unwrap();
        assert_eq!(queue.pending_count().unwrap(), 2);
        assert_eq!(queue.pending_critical_count().unwrap(), 1);
    }

    #[test]
    fn peek_orders_by_priority_then_age() {
        let queue = OfflineQueue::in_memory().unwrap();
        let older_medium = update_with_priority("w1");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer_medium = update_with_priority("w2");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let critical = emergency_update();

        queue.enqueue(&older_medium, Priority::Medium).unwrap();
        queue.enqueue(&newer_medium, Priority::Medium).unwrap();
        queue.enqueue(&critical, Priority::Critical).unwrap();

        let rows = queue.peek_batch(10).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, critical.id, "critical drains first");
        assert_eq!(rows[1].id, older_medium.id, "older medium before newer");
        assert_eq!(rows[2].id, newer_medium.id);
    }

    #[test]
    fn peek_respects_limit() {
        let queue = OfflineQueue::in_memory().unwrap();
        for i in 0..5 {
            queue
                .enqueue(&update_with_priority(&format!("w{i}")), Priority::Medium)
                .unwrap();
        }
        assert_eq!(queue.peek_batch(3).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn drain_delivers_and_deletes() {
        let queue = OfflineQueue::in_memory().unwrap();
        for i in 0..10 {
            queue
                .enqueue(&update_with_priority(&format!("w{i}")), Priority::Medium)
                .unwrap();
        }
        assert_eq!(queue.pending_count().unwrap(), 10);

        let transport = StubTransport::default();
        let outcome = queue.drain(50, &transport).await.unwrap();
        assert_eq!(outcome, DrainOutcome { delivered: 10, failed: 0 });
        assert_eq!(queue.pending_count().unwrap(), 0);
        assert_eq!(transport.sent_ids().len(), 10);
    }

    #[tokio::test]
    async fn drain_keeps_failed_entries() {
        let queue = OfflineQueue::in_memory().unwrap();
        let good = update_with_priority("w1");
        let bad = update_with_priority("w2");
        queue.enqueue(&good, Priority::Medium).unwrap();
        queue.enqueue(&bad, Priority::Medium).unwrap();

        let transport = StubTransport::default();
        transport.fail_id(&bad.id);

        let outcome = queue.drain(50, &transport).await.unwrap();
        assert_eq!(outcome, DrainOutcome { delivered: 1, failed: 1 });
        assert_eq!(queue.pending_count().unwrap(), 1);
        let rows = queue.peek_batch(10).unwrap();
        assert_eq!(rows[0].id, bad.id);
    }

    #[tokio::test]
    async fn drain_against_dead_transport_delivers_nothing() {
        let queue = OfflineQueue::in_memory().unwrap();
        for i in 0..3 {
            queue
                .enqueue(&update_with_priority(&format!("w{i}")), Priority::Medium)
                .unwrap();
        }
        let transport = StubTransport::failing();
        let outcome = queue.drain(50, &transport).await.unwrap();
        assert_eq!(outcome, DrainOutcome { delivered: 0, failed: 3 });
        assert_eq!(queue.pending_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn drain_empty_queue_is_noop() {
        let queue = OfflineQueue::in_memory().unwrap();
        let transport = StubTransport::default();
        let outcome = queue.drain(50, &transport).await.unwrap();
        assert_eq!(outcome, DrainOutcome::default());
    }

    #[tokio::test]
    async fn drain_respects_batch_limit() {
        let queue = OfflineQueue::in_memory().unwrap();
        for i in 0..5 {
            queue
                .enqueue(&update_with_priority(&format!("w{i}")), Priority::Medium)
                .unwrap();
        }
        let transport = StubTransport::default();
        let outcome = queue.drain(2, &transport).await.unwrap();
        assert_eq!(outcome.delivered, 2);
        assert_eq!(queue.pending_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn drain_twice_is_idempotent() {
        // Replaying a drain after everything delivered must be a no-op —
        // the delivered entries are gone, not re-sent.
        let queue = OfflineQueue::in_memory().unwrap();
        queue
            .enqueue(&update_with_priority("w1"), Priority::Medium)
            .unwrap();
        let transport = StubTransport::default();
        queue.drain(50, &transport).await.unwrap();
        let second = queue.drain(50, &transport).await.unwrap();
        assert_eq!(second, DrainOutcome::default());
        assert_eq!(transport.sent_ids().len(), 1);
    }

    #[test]
    fn queue_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");
        let update = update_with_priority("w1");

        {
            let queue = OfflineQueue::open(&path, &ConnectionConfig::default()).unwrap();
            queue.enqueue(&update, Priority::High).unwrap();
        }

        let reopened = OfflineQueue::open(&path, &ConnectionConfig::default()).unwrap();
        assert_eq!(reopened.pending_count().unwrap(), 1);
        let rows = reopened.peek_batch(10).unwrap();
        assert_eq!(rows[0].id, update.id);
        assert_eq!(rows[0].parse_priority().unwrap(), Priority::High);
    }
}
