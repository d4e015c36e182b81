//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] renders events as structured log lines. Primarily useful
//! for development and examples; implement a custom
//! [`Subscribe`](crate::subscribers::Subscribe) for metrics or audit trails.

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Structured-log subscriber.
///
/// Enabled via the `logging` feature.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let service = e.service.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::ServiceInitializing => {
                tracing::info!(seq = e.seq, service, "initializing");
            }
            EventKind::ServiceInitialized => {
                tracing::info!(seq = e.seq, service, "initialized");
            }
            EventKind::InitFailed => {
                tracing::error!(seq = e.seq, service, reason = ?e.reason, "initialization failed");
            }
            EventKind::SupervisorRunning => {
                tracing::info!(seq = e.seq, "supervisor running");
            }
            EventKind::ServiceFailed => {
                tracing::warn!(seq = e.seq, service, reason = ?e.reason, "service failed");
            }
            EventKind::ServiceResumed => {
                tracing::info!(seq = e.seq, service, behavior = ?e.detail, "service resumed");
            }
            EventKind::ServiceEscalated => {
                tracing::error!(seq = e.seq, service, reason = ?e.reason, "failure escalated");
            }
            EventKind::SupervisorFailed => {
                tracing::error!(seq = e.seq, service, reason = ?e.reason, "supervisor failed");
            }
            EventKind::WorkerPanicked => {
                tracing::warn!(seq = e.seq, service, reason = ?e.reason, "pool worker panicked");
            }
            EventKind::OperatorMessageIgnored => {
                tracing::warn!(seq = e.seq, body = ?e.reason, "operator message ignored");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
