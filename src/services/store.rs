//! # Store managers: serialized, single-writer-per-key store access.
//!
//! Two identically structured managers exist in the assembled system, one
//! for the workflow store and one for the job store. Each wraps the shared
//! persistent backing store behind an actor interface and is the **sole**
//! writer path to it; the backend handle never leaves the manager.
//!
//! ## Architecture
//! ```text
//! StoreClient ──► manager mailbox ──► per-key lane (get-or-spawn)
//!                                       [lane "wf-17"] ─► apply ops in order
//!                                       [lane "wf-42"] ─► apply ops in order
//! ```
//!
//! ## Rules
//! - Operations on the **same key** are applied in request order (a single
//!   lane consumes them FIFO).
//! - Operations on **different keys** proceed concurrently (independent
//!   lanes).
//! - Lanes are spawned on first use and live until manager teardown.
//! - A backend error travels back to the requester when one is listening;
//!   unobserved failures are reported to the supervisor instead.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::core::FailureSink;
use crate::error::ServiceError;

use super::registry::RegistryClient;

/// Contract of the persistent backing store.
///
/// Implementations live outside this crate; query semantics, schema, and
/// persistence format are theirs. The manager only requires that single
/// operations complete independently.
#[async_trait]
pub trait StoreBackend: Send + Sync + 'static {
    /// Reads the value stored under `key`, if any.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError>;
}

/// Bootstrap-time provider of the shared backing store handle.
///
/// Called once per store chain during initialization; both calls are
/// expected to hand back the same underlying store. A provider error is an
/// initialization failure and aborts bootstrap.
pub trait StoreProvider: Send + Sync {
    /// Returns a handle to the backing store.
    fn database_interface(&self) -> Result<Arc<dyn StoreBackend>, ServiceError>;
}

enum StoreRequest {
    Read {
        key: String,
        reply: oneshot::Sender<Result<Option<Vec<u8>>, ServiceError>>,
    },
    Write {
        key: String,
        value: Vec<u8>,
        /// `None` for fire-and-forget submissions.
        reply: Option<oneshot::Sender<Result<(), ServiceError>>>,
    },
}

impl StoreRequest {
    fn key(&self) -> &str {
        match self {
            StoreRequest::Read { key, .. } => key,
            StoreRequest::Write { key, .. } => key,
        }
    }

    /// Answers the requester (if any) that the manager is gone.
    fn reject(self) {
        match self {
            StoreRequest::Read { reply, .. } => {
                let _ = reply.send(Err(ServiceError::Canceled));
            }
            StoreRequest::Write { reply: Some(reply), .. } => {
                let _ = reply.send(Err(ServiceError::Canceled));
            }
            StoreRequest::Write { reply: None, .. } => {}
        }
    }
}

/// Clone-able client for one store manager.
#[derive(Clone)]
pub struct StoreClient {
    tx: mpsc::UnboundedSender<StoreRequest>,
}

impl StoreClient {
    /// Reads the value under `key`.
    pub async fn read(&self, key: impl Into<String>) -> Result<Option<Vec<u8>>, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreRequest::Read { key: key.into(), reply })
            .map_err(|_| ServiceError::Canceled)?;
        rx.await.map_err(|_| ServiceError::Canceled)?
    }

    /// Writes `value` under `key` and awaits the acknowledgement.
    pub async fn write(
        &self,
        key: impl Into<String>,
        value: Vec<u8>,
    ) -> Result<(), ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreRequest::Write { key: key.into(), value, reply: Some(reply) })
            .map_err(|_| ServiceError::Canceled)?;
        rx.await.map_err(|_| ServiceError::Canceled)?
    }

    /// Submits a write without awaiting the acknowledgement.
    ///
    /// Ordering relative to other operations on the same key from this
    /// client is still preserved; a failure is reported to the supervisor
    /// instead of the caller.
    pub fn submit(&self, key: impl Into<String>, value: Vec<u8>) {
        let _ = self
            .tx
            .send(StoreRequest::Write { key: key.into(), value, reply: None });
    }
}

/// The store-manager actor. Construction spawns the routing loop and hands
/// back the client.
pub struct StoreManager;

impl StoreManager {
    /// Spawns the manager for `node`, taking exclusive ownership of
    /// `backend`, and advertises the client in the registry under the node
    /// name. Must be called within a tokio runtime.
    pub fn spawn(
        node: &'static str,
        backend: Arc<dyn StoreBackend>,
        registry: &RegistryClient,
        token: CancellationToken,
        sink: FailureSink,
    ) -> StoreClient {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoreRequest>();
        let client = StoreClient { tx };
        registry.register(node, Arc::new(client.clone()));

        tokio::spawn(async move {
            let mut lanes: HashMap<String, mpsc::UnboundedSender<StoreRequest>> =
                HashMap::new();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => {
                        let Some(req) = msg else { break };
                        let lane = lanes.entry(req.key().to_string()).or_insert_with(|| {
                            spawn_lane(node, Arc::clone(&backend), token.child_token(), sink.clone())
                        });
                        if let Err(back) = lane.send(req) {
                            back.0.reject();
                        }
                    }
                }
            }
            // Dropping the lane senders lets every lane drain and exit.
        });

        client
    }
}

/// One per-key lane: applies operations strictly in arrival order.
fn spawn_lane(
    node: &'static str,
    backend: Arc<dyn StoreBackend>,
    token: CancellationToken,
    sink: FailureSink,
) -> mpsc::UnboundedSender<StoreRequest> {
    let (tx, mut rx) = mpsc::unbounded_channel::<StoreRequest>();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => {
                    let Some(req) = msg else { break };
                    match req {
                        StoreRequest::Read { key, reply } => {
                            let _ = reply.send(backend.read(&key).await);
                        }
                        StoreRequest::Write { key, value, reply } => {
                            let res = backend.write(&key, value).await;
                            match reply {
                                Some(reply) => {
                                    let _ = reply.send(res);
                                }
                                None => {
                                    if let Err(err) = res {
                                        tracing::warn!(store = node, key = %key, error = %err, "unacknowledged write failed");
                                        sink.report(node, err);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    });

    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceRegistry;
    use tokio::sync::Mutex;

    /// In-memory backend recording the order writes were applied in.
    #[derive(Default)]
    struct MemoryBackend {
        data: Mutex<HashMap<String, Vec<u8>>>,
        write_log: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl StoreBackend for MemoryBackend {
        async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
            Ok(self.data.lock().await.get(key).cloned())
        }

        async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError> {
            self.data.lock().await.insert(key.to_string(), value.clone());
            self.write_log.lock().await.push((key.to_string(), value));
            Ok(())
        }
    }

    fn manager(backend: Arc<MemoryBackend>) -> StoreClient {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        let (sink, _rx) = FailureSink::channel();
        StoreManager::spawn(
            "workflow-store",
            backend,
            &registry,
            CancellationToken::new(),
            sink,
        )
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let client = manager(Arc::new(MemoryBackend::default()));
        client.write("wf-1", b"running".to_vec()).await.unwrap();
        let value = client.read("wf-1").await.unwrap();
        assert_eq!(value.as_deref(), Some(b"running".as_ref()));
    }

    #[tokio::test]
    async fn same_key_operations_apply_in_submission_order() {
        let backend = Arc::new(MemoryBackend::default());
        let client = manager(Arc::clone(&backend));

        for i in 0..50u8 {
            client.submit("wf-7", vec![i]);
        }
        // The read rides the same mailbox and lane, so it observes them all.
        let last = client.read("wf-7").await.unwrap();
        assert_eq!(last, Some(vec![49]));

        let log = backend.write_log.lock().await;
        let applied: Vec<u8> = log.iter().map(|(_, v)| v[0]).collect();
        assert_eq!(applied, (0..50).collect::<Vec<u8>>());
    }

    #[tokio::test]
    async fn distinct_keys_have_independent_lanes() {
        let client = manager(Arc::new(MemoryBackend::default()));
        client.write("wf-a", b"1".to_vec()).await.unwrap();
        client.write("wf-b", b"2".to_vec()).await.unwrap();
        assert_eq!(client.read("wf-a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(client.read("wf-b").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn torn_down_manager_answers_canceled() {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        let (sink, _rx) = FailureSink::channel();
        let token = CancellationToken::new();
        let client = StoreManager::spawn(
            "job-store",
            Arc::new(MemoryBackend::default()),
            &registry,
            token.clone(),
            sink,
        );

        token.cancel();
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
        loop {
            if client.read("any").await.is_err() {
                break;
            }
            assert!(tokio::time::Instant::now() < deadline, "manager never tore down");
            tokio::task::yield_now().await;
        }
    }

    /// Backend whose writes always fail, for the unobserved-failure path.
    struct RefusingBackend;

    #[async_trait]
    impl StoreBackend for RefusingBackend {
        async fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
            Ok(None)
        }

        async fn write(&self, _key: &str, _value: Vec<u8>) -> Result<(), ServiceError> {
            Err(ServiceError::fail("disk full"))
        }
    }

    #[tokio::test]
    async fn unacknowledged_write_failures_reach_the_supervisor() {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        let (sink, mut failures) = FailureSink::channel();
        let client = StoreManager::spawn(
            "job-store",
            Arc::new(RefusingBackend),
            &registry,
            CancellationToken::new(),
            sink,
        );

        client.submit("job-3", b"queued".to_vec());
        let signal = failures.recv().await.unwrap();
        assert_eq!(signal.node, "job-store");
        assert!(signal.error.is_recoverable());
    }
}
