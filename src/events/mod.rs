//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the supervisor, the worker
//! pools, and the store managers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` (bootstrap, triage, operator mailbox),
//!   `RoundRobinPool` (worker panics).
//! - **Consumers**: the supervisor's subscriber listener (fans out to
//!   [`SubscriberSet`](crate::subscribers::SubscriberSet)) and any receiver
//!   obtained from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
