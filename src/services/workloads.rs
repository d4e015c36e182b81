//! # Task payloads for the two pooled workloads.
//!
//! These are the messages dispatched into the worker pools. Both workloads
//! are side effects from the runtime's point of view: no return value is
//! observed, and the worker implementations live outside this crate.

use std::path::PathBuf;

/// Request to relocate one workflow's log files.
///
/// I/O-bound; concurrency for these tracks the operator-tunable log-copy
/// pool size.
#[derive(Clone, Debug)]
pub struct LogCopyRequest {
    /// Workflow the logs belong to.
    pub workflow_id: String,
    /// Directory the logs currently live in.
    pub source: PathBuf,
    /// Directory the logs are relocated to.
    pub destination: PathBuf,
}

/// Request to fetch one piece of metadata from an external service.
///
/// Cheap and idempotent; concurrency is bounded purely by external-API
/// etiquette, hence the fixed pool size.
#[derive(Clone, Debug)]
pub struct MetadataQuery {
    /// External service to query.
    pub service: String,
    /// Metadata key requested from it.
    pub key: String,
}
