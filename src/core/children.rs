//! # Service nodes and failure signaling.
//!
//! The supervisor owns a table of [`ChildEntry`] rows, one per service node,
//! in declared construction order. Every child (and anything running beneath
//! one) holds a [`FailureSink`] clone and reports failures by explicit
//! signaling rather than by exception bubbling; the supervisor's triage loop
//! consumes the matching receiver.

use tokio::sync::mpsc;

use crate::error::ServiceError;
use crate::policies::{FaultPolicy, ResumeBehavior};

/// Node names, one per supervised service.
pub mod node {
    /// The service discovery/metadata directory.
    pub const REGISTRY: &str = "service-registry";
    /// Pool of workflow-log relocation workers.
    pub const LOG_COPY_POOL: &str = "log-copy-pool";
    /// Serialized access to the workflow store.
    pub const WORKFLOW_STORE: &str = "workflow-store";
    /// Serialized access to the job store.
    pub const JOB_STORE: &str = "job-store";
    /// Pool of external metadata-lookup workers.
    pub const LOOKUP_POOL: &str = "metadata-lookup-pool";
    /// Top-level consumer of everything above.
    pub const COORDINATOR: &str = "workflow-coordinator";

    /// Construction order, declared once. The dependency graph is acyclic
    /// and realized by this order; there is no runtime graph solver.
    pub const CONSTRUCTION_ORDER: [&str; 6] = [
        REGISTRY,
        LOG_COPY_POOL,
        WORKFLOW_STORE,
        JOB_STORE,
        LOOKUP_POOL,
        COORDINATOR,
    ];
}

/// One row of the parent-owns-children table.
///
/// Records, per child, the fault-escalation policy and the named resume
/// behavior. Row order is construction order.
#[derive(Clone, Debug)]
pub struct ChildEntry {
    /// Node name, unique within the supervisor.
    pub name: &'static str,
    /// Nodes this one requires; construction order satisfies them.
    pub depends_on: &'static [&'static str],
    /// How this child's runtime failures are triaged.
    pub policy: FaultPolicy,
    /// What the child keeps when resumed after a recoverable failure.
    pub resume: ResumeBehavior,
}

impl ChildEntry {
    /// Creates a table row with the default policy pair.
    pub fn new(name: &'static str, depends_on: &'static [&'static str]) -> Self {
        Self {
            name,
            depends_on,
            policy: FaultPolicy::default(),
            resume: ResumeBehavior::default(),
        }
    }
}

/// A failure reported from somewhere beneath the root supervisor.
#[derive(Debug)]
pub struct FailureSignal {
    /// Name of the node the failure is attributed to.
    pub node: &'static str,
    /// The failure itself; its class drives triage.
    pub error: ServiceError,
}

/// Clone-able reporting endpoint handed to every child.
///
/// Reporting is fire-and-forget: a dead supervisor (teardown already in
/// progress) silently swallows late signals.
#[derive(Clone)]
pub struct FailureSink {
    tx: mpsc::UnboundedSender<FailureSignal>,
}

impl FailureSink {
    /// Creates a sink/receiver pair. The supervisor keeps the receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FailureSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Reports a failure on behalf of `node`.
    pub fn report(&self, node: &'static str, error: ServiceError) {
        let _ = self.tx.send(FailureSignal { node, error });
    }
}
