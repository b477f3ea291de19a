//! # sitelink-core
//!
//! Shared event model for the Sitelink real-time sync engine.
//!
//! This crate defines everything the other sync crates agree on:
//!
//! - **Event envelope**: [`DomainEvent`] with typed [`EventPayload`] variants
//! - **Priority model**: [`Priority`] ranking used for queue drain order
//! - **Roles**: the three dashboard audiences ([`Role`])
//! - **Wire projection**: [`DashboardUpdate`], the transport/storage shape
//! - **Collaborator traits**: [`TransportAdapter`], [`SessionProvider`],
//!   [`NameDirectory`] — the seams to everything outside the sync engine

#![deny(unsafe_code)]

pub mod errors;
pub mod event;
pub mod event_type;
pub mod ids;
pub mod payload;
pub mod priority;
pub mod role;
pub mod transport;
pub mod update;

pub use errors::{CoreError, Result, TransportError};
pub use event::DomainEvent;
pub use event_type::{ALL_EVENT_TYPES, EventType};
pub use ids::{EventId, SubscriptionId};
pub use payload::EventPayload;
pub use priority::Priority;
pub use role::{ALL_ROLES, Role};
pub use transport::{
    NameDirectory, NullDirectory, Session, SessionProvider, StaticSessionProvider,
    TransportAdapter,
};
pub use update::DashboardUpdate;
