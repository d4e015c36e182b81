//! # Runtime events emitted by the supervisor, pools, and services.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Bootstrap events**: per-node construction progress and failure
//! - **Supervision events**: runtime fault triage (failed, resumed, escalated)
//! - **Protocol events**: operator messages delivered to the supervisor
//!
//! The [`Event`] struct carries optional metadata such as the service name
//! and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Bootstrap events ===
    /// A service node's construction is starting.
    ///
    /// Sets:
    /// - `service`: node name
    ServiceInitializing,

    /// A service node was constructed and is running.
    ///
    /// Sets:
    /// - `service`: node name
    ServiceInitialized,

    /// A service node's factory failed; bootstrap is aborting.
    ///
    /// Sets:
    /// - `service`: node name
    /// - `reason`: underlying cause
    InitFailed,

    /// All nodes were built in order; the supervisor entered `Running`.
    SupervisorRunning,

    // === Supervision events ===
    /// A running child reported a failure (before triage).
    ///
    /// Sets:
    /// - `service`: node name
    /// - `reason`: failure message
    ServiceFailed,

    /// The decision procedure resumed the failing child in place.
    ///
    /// Sets:
    /// - `service`: node name
    /// - `detail`: the child's declared resume behavior label
    ServiceResumed,

    /// The decision procedure escalated the failure; teardown follows.
    ///
    /// Sets:
    /// - `service`: node name
    /// - `reason`: failure message
    ServiceEscalated,

    /// The supervisor transitioned to `Failed` and cancelled its children.
    ///
    /// Sets:
    /// - `service`: node that caused the transition
    /// - `reason`: failure message
    SupervisorFailed,

    /// A pool worker panicked while processing a task; the worker loop
    /// continues with the next task.
    ///
    /// Sets:
    /// - `service`: pool node name
    /// - `reason`: panic payload
    WorkerPanicked,

    // === Protocol events ===
    /// A message was delivered directly to the supervisor's mailbox. The
    /// supervisor is structural only, so the message is logged and dropped.
    ///
    /// Sets:
    /// - `reason`: the message body
    OperatorMessageIgnored,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the service node, if applicable.
    pub service: Option<Arc<str>>,
    /// Human-readable reason (errors, message bodies, panic payloads).
    pub reason: Option<Arc<str>>,
    /// Short machine-oriented detail (policy labels and the like).
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
            detail: None,
        }
    }

    /// Attaches a service node name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a short detail label.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic() {
        let a = Event::new(EventKind::SupervisorRunning);
        let b = Event::new(EventKind::SupervisorRunning);
        let c = Event::new(EventKind::SupervisorRunning);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::new(EventKind::ServiceFailed)
            .with_service("job-store")
            .with_reason("backend write refused")
            .with_detail("preserve_state");
        assert_eq!(ev.kind, EventKind::ServiceFailed);
        assert_eq!(ev.service.as_deref(), Some("job-store"));
        assert_eq!(ev.reason.as_deref(), Some("backend write refused"));
        assert_eq!(ev.detail.as_deref(), Some("preserve_state"));
    }
}
