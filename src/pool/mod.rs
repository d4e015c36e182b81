//! Bounded-concurrency worker pools.
//!
//! A pool is the unit of controlled parallelism in this runtime: `size`
//! interchangeable workers for one workload class, dispatched round-robin,
//! with no shared mutable state between workers.
//!
//! ## Contents
//! - [`PoolWorker`] the worker contract (one task in, side effect out)
//! - [`WorkerFactory`] zero-argument fallible worker constructor
//! - [`RoundRobinPool`] the pool itself
//! - [`PoolHandle`] clone-able dispatch endpoint sharing the pool's cursor
//!
//! Two pools exist in the assembled system: log copying (size from
//! configuration, default 10) and metadata lookup (fixed 25).

mod round_robin;
mod worker;

pub use round_robin::{PoolHandle, RoundRobinPool};
pub use worker::{PoolWorker, WorkerFactory};
