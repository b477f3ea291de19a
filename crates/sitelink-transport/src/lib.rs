//! # sitelink-transport
//!
//! WebSocket transport adapter for the Sitelink sync engine.
//!
//! [`WsTransport`] implements
//! [`TransportAdapter`](sitelink_core::TransportAdapter) over a persistent
//! `tokio-tungstenite` connection to the remote sync service. Send failures
//! are surfaced as errors and never retried here — retry policy is
//! centralized in the offline queue.

#![deny(unsafe_code)]

pub mod ws;

pub use ws::WsTransport;
