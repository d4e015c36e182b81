//! # flowvisor
//!
//! **Flowvisor** is the fail-fast bootstrap and root-supervision runtime for
//! a workflow-execution system.
//!
//! It builds a fixed topology of long-lived service actors in a declared
//! dependency order, encodes the system's fault model (initialization
//! failures abort the whole process; runtime failures are triaged by an
//! explicit per-child policy), and bounds concurrency for two side-effecting
//! background workloads via fixed-size round-robin worker pools.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                  ┌─────────────────────────────────────────────────┐
//!                  │  Supervisor (structural only)                   │
//!                  │  - builds children in declared order            │
//!                  │  - ChildEntry table: fault policy per child     │
//!                  │  - operator mailbox: log one record, drop       │
//!                  │  - supervise(): failure triage loop             │
//!                  └──┬──────┬─────────┬─────────┬─────────┬────────┘
//!                     ▼      ▼         ▼         ▼         ▼
//!               ┌────────┐ ┌──────┐ ┌────────┐ ┌──────┐ ┌─────────┐
//!               │registry│ │log-  │ │workflow│ │job-  │ │metadata-│
//!               │        │ │copy  │ │-store  │ │store │ │lookup   │
//!               │        │ │pool  │ │manager │ │mgr   │ │pool (25)│
//!               └───▲────┘ └──▲───┘ └───▲────┘ └──▲───┘ └────▲────┘
//!                   │         │         │         │          │
//!                   └─────────┴────┬────┴─────────┴──────────┘
//!                                  │ (handles, by construction)
//!                          ┌───────┴────────┐
//!                          │  coordinator   │  built last
//!                          └────────────────┘
//! ```
//!
//! ### Bootstrap lifecycle
//! ```text
//! Uninitialized ─► Initializing ─► Running            (forward-only)
//!                       │              │
//!                       └──────────────┴─► Failed     (terminal)
//!
//! initialize(cfg, deps, subscribers):
//!   registry → log-copy pool → workflow store chain → job store chain
//!            → lookup pool → coordinator
//!
//!   any step Err ─► remaining steps skipped, built children cancelled,
//!                   Err names the node and cause → caller exits non-zero
//! ```
//!
//! ### Fault model
//! ```text
//! child ── FailureSink::report(node, error) ──► supervise()
//!   ├─ ServiceError::Init (any depth)  ─► Fatal, always
//!   ├─ recoverable (Fail/Canceled)     ─► Resume, child state preserved
//!   └─ Unrecoverable                   ─► Escalate ─► Fatal
//! ```
//!
//! ## Features
//! | Area            | Description                                          | Key types / traits                      |
//! |-----------------|------------------------------------------------------|-----------------------------------------|
//! | **Supervision** | Fail-fast bootstrap and fault triage.                | [`Supervisor`], [`SystemDeps`]          |
//! | **Pools**       | Fixed-size round-robin workers per workload class.   | [`RoundRobinPool`], [`PoolWorker`]      |
//! | **Stores**      | Serialized per-key access to the backing store.      | [`StoreManager`], [`StoreBackend`]      |
//! | **Registry**    | Opaque service discovery directory.                  | [`ServiceRegistry`], [`RegistryClient`] |
//! | **Policies**    | Per-child fault and resume choices.                  | [`FaultPolicy`], [`ResumeBehavior`]     |
//! | **Errors**      | Typed failure classes driving triage.                | [`ServiceError`], [`SupervisorError`]   |
//! | **Events**      | Broadcast bus + subscriber fan-out.                  | [`Bus`], [`Event`], [`Subscribe`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use flowvisor::{
//!     LogCopyRequest, MetadataQuery, PoolWorker, ServiceError, StoreBackend,
//!     StoreProvider, Supervisor, SystemConfig, SystemDeps,
//! };
//!
//! struct Copier;
//! #[async_trait]
//! impl PoolWorker<LogCopyRequest> for Copier {
//!     async fn process(&self, task: LogCopyRequest) {
//!         // relocate task.source → task.destination ...
//!         let _ = task;
//!     }
//! }
//!
//! struct Prober;
//! #[async_trait]
//! impl PoolWorker<MetadataQuery> for Prober {
//!     async fn process(&self, query: MetadataQuery) {
//!         // ask query.service for query.key ...
//!         let _ = query;
//!     }
//! }
//!
//! struct NullStore;
//! #[async_trait]
//! impl StoreBackend for NullStore {
//!     async fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, ServiceError> { Ok(None) }
//!     async fn write(&self, _key: &str, _value: Vec<u8>) -> Result<(), ServiceError> { Ok(()) }
//! }
//!
//! struct NullProvider;
//! impl StoreProvider for NullProvider {
//!     fn database_interface(&self) -> Result<Arc<dyn StoreBackend>, ServiceError> {
//!         Ok(Arc::new(NullStore))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = SystemConfig::from_properties(&HashMap::new())?;
//!     let deps = SystemDeps {
//!         store: Arc::new(NullProvider),
//!         log_copy_workers: Arc::new(|| {
//!             Ok(Box::new(Copier) as Box<dyn PoolWorker<LogCopyRequest>>)
//!         }),
//!         lookup_workers: Arc::new(|| {
//!             Ok(Box::new(Prober) as Box<dyn PoolWorker<MetadataQuery>>)
//!         }),
//!     };
//!
//!     // Fail-fast: a construction error here is printed and the process
//!     // exits non-zero.
//!     let supervisor = Supervisor::initialize(cfg, deps, Vec::new())?;
//!
//!     // Triage runtime failures until one is fatal.
//!     supervisor.supervise().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod policies;
mod pool;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use config::{
    ConfigError, SystemConfig, DEFAULT_LOG_COPY_WORKERS, LOG_COPY_WORKERS_KEY,
    METADATA_LOOKUP_WORKERS,
};
pub use crate::core::{
    node, ChildEntry, FailureSignal, FailureSink, OperatorMessage, Supervisor,
    SupervisorHandle, SupervisorState, SystemDeps,
};
pub use error::{ServiceError, SupervisorError};
pub use events::{Bus, Event, EventKind};
pub use policies::{FaultAction, FaultPolicy, ResumeBehavior};
pub use pool::{PoolHandle, PoolWorker, RoundRobinPool, WorkerFactory};
pub use services::{
    Coordinator, CoordinatorClient, CoordinatorRequest, LogCopyRequest, MetadataQuery,
    RegistryClient, ServiceHandle, ServiceRegistry, StoreBackend, StoreClient, StoreManager,
    StoreProvider,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose the built-in structured-log subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
