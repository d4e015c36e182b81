//! # Pool worker contract.
//!
//! A pool worker exposes a single operation: accept one task, produce a side
//! effect. No return value is observed by the runtime; a worker that needs
//! to surface outcomes does so through its own channels.
//!
//! Workers are produced by a zero-argument, fallible factory: one fresh
//! worker per pool slot. A factory error is an initialization failure and
//! aborts bootstrap.
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use flowvisor::{LogCopyRequest, PoolWorker};
//!
//! struct Copier;
//!
//! #[async_trait]
//! impl PoolWorker<LogCopyRequest> for Copier {
//!     async fn process(&self, task: LogCopyRequest) {
//!         // relocate the log files...
//!         let _ = task;
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::ServiceError;

/// Contract for a homogeneous pool worker handling tasks of type `T`.
///
/// Called from the worker's dedicated loop; tasks arrive one at a time in
/// queue order, so implementations never observe intra-worker concurrency.
#[async_trait]
pub trait PoolWorker<T: Send + 'static>: Send + Sync + 'static {
    /// Processes a single task to completion (side effect only).
    async fn process(&self, task: T);
}

/// Zero-argument fallible constructor producing one running worker.
///
/// Invoked `size` times when a pool is created, never afterwards.
pub type WorkerFactory<T> =
    std::sync::Arc<dyn Fn() -> Result<Box<dyn PoolWorker<T>>, ServiceError> + Send + Sync>;
