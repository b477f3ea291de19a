//! # sitelink-sync
//!
//! Cross-role real-time synchronization engine for the Sitelink dashboards.
//!
//! Distributes domain events (clock-ins, task completions, compliance
//! alerts, client-facing metrics) to the worker, admin, and client
//! dashboard audiences; keeps working while the device is offline;
//! reconciles conflicting remote updates on reconnect; and preserves
//! per-source ordering and priority under concurrent publishing.
//!
//! - **[`SyncEngine`]**: publish/subscribe API and the single-consumer
//!   processing loop
//! - **Subscription registry**: per-role, per-event-type callbacks
//! - **Live feeds**: three bounded, role-specific display feeds
//! - **Conflict resolver**: last-write-wins with version tie-break
//! - **Monitors**: connectivity and session probes driving offline→online
//!   transitions
//!
//! Delivery is at-least-once with idempotent replay — not exactly-once.

#![deny(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod feeds;
pub mod monitor;
pub mod registry;
pub mod resolve;

mod publish;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::{EngineConfig, PublishHandle, SyncEngine};
pub use errors::{Result, SyncError};
pub use feeds::{AdminAlertEntry, ClientMetricEntry, LiveFeeds, WorkerActivityEntry};
pub use registry::{SubscriberCallback, SubscriberError, SubscriptionRegistry};
pub use resolve::{Resolution, StateVersion, resolve};
pub use sitelink_store::DrainOutcome;
