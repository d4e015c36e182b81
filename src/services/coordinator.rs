//! # Workflow coordinator: top-level consumer of the assembled system.
//!
//! The coordinator is built last because it references everything built
//! before it: the registry client, both pool handles, and both store
//! clients. Its construction dependencies are the point of this module;
//! the actual workflow-execution logic layers on top and is not part of
//! this runtime. The loop here only routes plumbing requests to the
//! component that owns them.
//!
//! ## Rules
//! - Pool dispatches are non-blocking; store writes are awaited inside the
//!   coordinator's own loop, never by the requester.
//! - A failed store write is a runtime failure of this node and goes to the
//!   supervisor for triage; requesters never observe it.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::FailureSink;
use crate::pool::PoolHandle;

use super::registry::RegistryClient;
use super::store::StoreClient;
use super::workloads::{LogCopyRequest, MetadataQuery};

/// Plumbing requests the coordinator routes.
#[derive(Debug)]
pub enum CoordinatorRequest {
    /// Relocate a finished workflow's logs (round-robin over the log pool).
    ArchiveLogs(LogCopyRequest),
    /// Fetch external metadata (round-robin over the lookup pool).
    FetchMetadata(MetadataQuery),
    /// Persist a workflow state snapshot.
    RecordWorkflow {
        /// Workflow key.
        key: String,
        /// Opaque serialized state.
        state: Vec<u8>,
    },
    /// Persist a job state snapshot.
    RecordJob {
        /// Job key.
        key: String,
        /// Opaque serialized state.
        state: Vec<u8>,
    },
}

/// Clone-able client for the coordinator actor.
#[derive(Clone)]
pub struct CoordinatorClient {
    tx: mpsc::UnboundedSender<CoordinatorRequest>,
}

impl CoordinatorClient {
    /// Enqueues a request on the coordinator's mailbox (non-blocking).
    pub fn send(&self, request: CoordinatorRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("coordinator request dropped: mailbox closed");
        }
    }
}

/// The coordinator actor. Construction spawns the routing loop, registers
/// the client in the registry, and hands the client back.
pub struct Coordinator;

impl Coordinator {
    /// Spawns the coordinator for `node`. Must be called within a tokio
    /// runtime.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        node: &'static str,
        registry: RegistryClient,
        log_copy: PoolHandle<LogCopyRequest>,
        lookup: PoolHandle<MetadataQuery>,
        workflows: StoreClient,
        jobs: StoreClient,
        token: CancellationToken,
        sink: FailureSink,
    ) -> CoordinatorClient {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = CoordinatorClient { tx };
        registry.register(node, std::sync::Arc::new(client.clone()));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => {
                        let Some(req) = msg else { break };
                        match req {
                            CoordinatorRequest::ArchiveLogs(task) => log_copy.dispatch(task),
                            CoordinatorRequest::FetchMetadata(query) => lookup.dispatch(query),
                            CoordinatorRequest::RecordWorkflow { key, state } => {
                                if let Err(err) = workflows.write(key, state).await {
                                    sink.report(node, err);
                                }
                            }
                            CoordinatorRequest::RecordJob { key, state } => {
                                if let Err(err) = jobs.write(key, state).await {
                                    sink.report(node, err);
                                }
                            }
                        }
                    }
                }
            }
        });

        client
    }
}
