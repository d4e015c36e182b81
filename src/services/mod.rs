//! Long-lived service workers the supervisor assembles.
//!
//! ## Contents
//! - [`ServiceRegistry`], [`RegistryClient`] discovery/metadata directory
//! - [`StoreManager`], [`StoreClient`], [`StoreBackend`], [`StoreProvider`]
//!   serialized per-key store access (workflow store and job store)
//! - [`Coordinator`], [`CoordinatorClient`] top-level consumer
//! - [`LogCopyRequest`], [`MetadataQuery`] pooled workload payloads
//!
//! Every service here is an actor: a tokio task owning a private mailbox,
//! FIFO per sender, interacting with the rest of the system only through
//! message passing.

mod coordinator;
mod registry;
mod store;
mod workloads;

pub use coordinator::{Coordinator, CoordinatorClient, CoordinatorRequest};
pub use registry::{RegistryClient, ServiceHandle, ServiceRegistry};
pub use store::{StoreBackend, StoreClient, StoreManager, StoreProvider};
pub use workloads::{LogCopyRequest, MetadataQuery};
