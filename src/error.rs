//! Error types used by the supervision runtime and its services.
//!
//! This module defines two main error enums:
//!
//! - [`SupervisorError`] — terminal errors raised by the root supervisor itself.
//! - [`ServiceError`] — failures raised by (or on behalf of) individual services.
//!
//! The split mirrors the fault model: a [`ServiceError`] is classified by the
//! supervision policy (initialization failures are always fatal, runtime
//! failures go through the default decision procedure), while a
//! [`SupervisorError`] is what the host binary observes when the whole system
//! must come down. Its `Display` output is the fail-fast diagnostic: it names
//! the failing node and carries the underlying cause as a `source` chain.

use thiserror::Error;

/// # Terminal errors produced by the root supervisor.
///
/// Either bootstrap aborted mid-way, or a running child reported a failure
/// the decision procedure refused to absorb. In both cases the hosting
/// process is expected to exit with a non-zero status after printing this
/// error.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// A service node could not be constructed. All construction steps after
    /// the named node were skipped and already-built children were torn down.
    #[error("initialization of '{node}' failed: {source}")]
    InitFailed {
        /// Name of the node whose factory failed.
        node: &'static str,
        /// The underlying failure.
        #[source]
        source: ServiceError,
    },

    /// A running child reported a failure classified as unrecoverable.
    #[error("'{node}' escalated an unrecoverable failure: {source}")]
    Escalated {
        /// Name of the node that escalated.
        node: &'static str,
        /// The underlying failure.
        #[source]
        source: ServiceError,
    },
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::InitFailed { .. } => "supervisor_init_failed",
            SupervisorError::Escalated { .. } => "supervisor_escalated",
        }
    }

    /// Name of the node this error originated from.
    pub fn node(&self) -> &'static str {
        match self {
            SupervisorError::InitFailed { node, .. } => node,
            SupervisorError::Escalated { node, .. } => node,
        }
    }
}

/// # Failures raised by individual services.
///
/// The variant is the failure *class* the supervision policy dispatches on:
///
/// - [`ServiceError::Init`] — a factory could not produce a running worker.
///   Always fatal, never retried, regardless of where in the tree it occurs.
/// - [`ServiceError::Fail`] — a recoverable runtime failure; the default
///   decision procedure resumes the failing child in place.
/// - [`ServiceError::Unrecoverable`] — a runtime failure the default
///   procedure must escalate (ultimately also fatal).
/// - [`ServiceError::Canceled`] — the component's mailbox or lane was torn
///   down while a request was in flight.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A service factory could not produce a running worker.
    #[error("construction failed: {error}")]
    Init {
        /// The underlying error message.
        error: String,
    },

    /// Runtime failure that is safe to absorb; the child keeps running.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Runtime failure the default decision procedure must escalate.
    #[error("unrecoverable failure: {error}")]
    Unrecoverable {
        /// The underlying error message.
        error: String,
    },

    /// The target component was already torn down.
    #[error("component unavailable (teardown in progress)")]
    Canceled,
}

impl ServiceError {
    /// Shorthand for an initialization-class failure.
    pub fn init(error: impl Into<String>) -> Self {
        ServiceError::Init { error: error.into() }
    }

    /// Shorthand for a recoverable runtime failure.
    pub fn fail(error: impl Into<String>) -> Self {
        ServiceError::Fail { error: error.into() }
    }

    /// Shorthand for an unrecoverable runtime failure.
    pub fn unrecoverable(error: impl Into<String>) -> Self {
        ServiceError::Unrecoverable { error: error.into() }
    }

    /// True for initialization-class failures, which are fatal at any depth.
    pub fn is_init_class(&self) -> bool {
        matches!(self, ServiceError::Init { .. })
    }

    /// True if the default decision procedure may resume the failing child.
    ///
    /// Returns `true` for [`ServiceError::Fail`] and [`ServiceError::Canceled`],
    /// `false` otherwise.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ServiceError::Fail { .. } | ServiceError::Canceled)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Init { .. } => "service_init_failed",
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Unrecoverable { .. } => "service_unrecoverable",
            ServiceError::Canceled => "service_canceled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn init_failures_are_init_class_and_not_recoverable() {
        let err = ServiceError::init("factory refused");
        assert!(err.is_init_class());
        assert!(!err.is_recoverable());
        assert_eq!(err.as_label(), "service_init_failed");
    }

    #[test]
    fn fail_is_recoverable_unrecoverable_is_not() {
        assert!(ServiceError::fail("boom").is_recoverable());
        assert!(!ServiceError::unrecoverable("broken invariant").is_recoverable());
        assert!(ServiceError::Canceled.is_recoverable());
    }

    #[test]
    fn supervisor_error_names_the_failing_node() {
        let err = SupervisorError::InitFailed {
            node: "job-store",
            source: ServiceError::init("no database interface"),
        };
        assert_eq!(err.node(), "job-store");
        let rendered = err.to_string();
        assert!(rendered.contains("job-store"), "diagnostic was: {rendered}");
        let cause = err.source().expect("source chain").to_string();
        assert!(cause.contains("no database interface"));
    }
}
