//! # sitelink-store
//!
//! Offline durable queue for undeliverable dashboard updates.
//!
//! Updates that cannot be delivered while disconnected are persisted here
//! and drained on reconnect in `priority DESC, created_at ASC` order.
//! Entries outlive process restarts and are deleted only after confirmed
//! delivery.
//!
//! - **Connection pool**: `r2d2` + `rusqlite` with WAL mode pragmas
//! - **Migrations**: version-tracked SQL schema evolution
//! - **Queue**: idempotent enqueue, ordered drain, pending counts

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod queue;
pub mod row_types;

pub use errors::{Result, StoreError};
pub use queue::{DrainOutcome, OfflineQueue};
pub use row_types::QueueRow;
