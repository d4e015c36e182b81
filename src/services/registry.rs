//! # Service registry: discovery/metadata directory.
//!
//! The registry is an actor owning a name → handle map. Other components
//! publish themselves with `register` (fire-and-forget) and find each other
//! with `lookup` (async reply). Handles are opaque; typed access is the
//! caller's downcast concern.
//!
//! ## Rules
//! - The map is owned by the registry loop; there is no shared lock.
//! - `register` with an existing name replaces the entry (warn).
//! - `lookup` of an unknown name answers `None` (absence is not an error).
//! - All operations are mailbox messages, FIFO per sender.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Opaque handle other services advertise through the registry.
pub type ServiceHandle = Arc<dyn Any + Send + Sync>;

enum RegistryMsg {
    Register {
        name: String,
        handle: ServiceHandle,
    },
    Lookup {
        name: String,
        reply: oneshot::Sender<Option<ServiceHandle>>,
    },
}

/// Clone-able client for the registry actor.
#[derive(Clone)]
pub struct RegistryClient {
    tx: mpsc::UnboundedSender<RegistryMsg>,
}

impl RegistryClient {
    /// Publishes `handle` under `name`, replacing any previous entry.
    ///
    /// Fire-and-forget; a registry mid-teardown silently drops the request.
    pub fn register(&self, name: impl Into<String>, handle: ServiceHandle) {
        let _ = self.tx.send(RegistryMsg::Register { name: name.into(), handle });
    }

    /// Resolves `name` to the currently advertised handle, if any.
    ///
    /// Answers `None` both for unknown names and when the registry is gone.
    pub async fn lookup(&self, name: impl Into<String>) -> Option<ServiceHandle> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RegistryMsg::Lookup { name: name.into(), reply })
            .ok()?;
        rx.await.ok().flatten()
    }
}

/// The registry actor itself. Construction spawns the loop and hands back
/// the client; the loop runs until `token` is cancelled.
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// Spawns the registry loop. Must be called within a tokio runtime.
    pub fn spawn(token: CancellationToken) -> RegistryClient {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut entries: HashMap<String, ServiceHandle> = HashMap::new();
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => {
                        let Some(msg) = msg else { break };
                        match msg {
                            RegistryMsg::Register { name, handle } => {
                                if entries.insert(name.clone(), handle).is_some() {
                                    tracing::warn!(service = %name, "registry entry replaced");
                                }
                            }
                            RegistryMsg::Lookup { name, reply } => {
                                let _ = reply.send(entries.get(&name).cloned());
                            }
                        }
                    }
                }
            }
        });

        RegistryClient { tx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_lookup_round_trips() {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        registry.register("job-store", Arc::new(42u32));

        let handle = registry.lookup("job-store").await.expect("registered");
        let value = handle.downcast_ref::<u32>().expect("stored type");
        assert_eq!(*value, 42);
    }

    #[tokio::test]
    async fn unknown_name_answers_none() {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        assert!(registry.lookup("nope").await.is_none());
    }

    #[tokio::test]
    async fn re_registration_replaces_the_entry() {
        let registry = ServiceRegistry::spawn(CancellationToken::new());
        registry.register("coordinator", Arc::new("old"));
        registry.register("coordinator", Arc::new(7u64));

        let handle = registry.lookup("coordinator").await.unwrap();
        assert_eq!(*handle.downcast_ref::<u64>().unwrap(), 7);
    }

    #[tokio::test]
    async fn cancelled_registry_answers_none() {
        let token = CancellationToken::new();
        let registry = ServiceRegistry::spawn(token.clone());
        token.cancel();
        // The loop may take a scheduling tick to observe cancellation.
        tokio::task::yield_now().await;
        assert!(registry.lookup("anything").await.is_none());
    }
}
