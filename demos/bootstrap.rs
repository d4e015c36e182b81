//! # Demo: bootstrap
//!
//! Boots the full service topology with stub collaborators and shows the
//! fail-fast contract from the host binary's point of view.
//!
//! Demonstrates how to:
//! - Provide the collaborator implementations via [`SystemDeps`].
//! - Initialize the supervisor and inspect the assembled topology.
//! - Deliver an operator message (logged and dropped).
//! - Drive the triage loop with `supervise()`.
//!
//! ## Flow
//! ```text
//! SystemConfig::from_properties()
//!     └─► Supervisor::initialize(cfg, deps, subscribers)
//!           ├─► registry → log-copy pool → workflow store → job store
//!           │            → lookup pool → coordinator
//!           ├─► handle().deliver(...)        (one log record, no effect)
//!           └─► supervise()                  (runs until a fatal failure)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example bootstrap
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use flowvisor::{
    CoordinatorRequest, LogCopyRequest, MetadataQuery, OperatorMessage, PoolWorker,
    ServiceError, StoreBackend, StoreProvider, Supervisor, SystemConfig, SystemDeps,
    LOG_COPY_WORKERS_KEY,
};
use tokio::sync::Mutex;

/// Log-copy worker that only narrates what it would relocate.
struct PrintingCopier;

#[async_trait]
impl PoolWorker<LogCopyRequest> for PrintingCopier {
    async fn process(&self, task: LogCopyRequest) {
        println!(
            "[log-copy] workflow={} {} -> {}",
            task.workflow_id,
            task.source.display(),
            task.destination.display()
        );
    }
}

/// Lookup worker that pretends every query resolves instantly.
struct PrintingProber;

#[async_trait]
impl PoolWorker<MetadataQuery> for PrintingProber {
    async fn process(&self, query: MetadataQuery) {
        println!("[lookup] {}:{} -> ok", query.service, query.key);
    }
}

/// In-memory stand-in for the persistent backing store.
#[derive(Default)]
struct MemoryStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError> {
        self.data.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

struct MemoryStoreProvider {
    store: Arc<MemoryStore>,
}

impl StoreProvider for MemoryStoreProvider {
    fn database_interface(&self) -> Result<Arc<dyn StoreBackend>, ServiceError> {
        Ok(Arc::clone(&self.store) as Arc<dyn StoreBackend>)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration, the way a deployment would supply it
    let mut props = HashMap::new();
    props.insert(LOG_COPY_WORKERS_KEY.to_string(), "3".to_string());
    let cfg = SystemConfig::from_properties(&props)?;

    // 2. Collaborator implementations
    let deps = SystemDeps {
        store: Arc::new(MemoryStoreProvider { store: Arc::new(MemoryStore::default()) }),
        log_copy_workers: Arc::new(|| {
            Ok(Box::new(PrintingCopier) as Box<dyn PoolWorker<LogCopyRequest>>)
        }),
        lookup_workers: Arc::new(|| {
            Ok(Box::new(PrintingProber) as Box<dyn PoolWorker<MetadataQuery>>)
        }),
    };

    // 3. Fail-fast bootstrap: an Err here means print-and-exit-non-zero
    let supervisor = Supervisor::initialize(cfg, deps, Vec::new())?;
    println!(
        "running: log-copy={} lookup={}",
        supervisor.log_copy_pool().size(),
        supervisor.lookup_pool().size()
    );
    for child in supervisor.children() {
        println!("  built {}", child.name);
    }

    // 4. Some plumbing traffic through the coordinator
    supervisor.coordinator().send(CoordinatorRequest::RecordWorkflow {
        key: "wf-17".into(),
        state: b"running".to_vec(),
    });
    supervisor.coordinator().send(CoordinatorRequest::FetchMetadata(MetadataQuery {
        service: "billing".into(),
        key: "endpoint".into(),
    }));

    // 5. The supervisor itself ignores operator traffic by contract
    supervisor.handle().deliver(OperatorMessage::new("status please?"));

    // 6. Triage failures until one is fatal (none will occur here; stop the
    //    demo after a moment instead of supervising forever)
    tokio::select! {
        res = supervisor.supervise() => res?,
        _ = tokio::time::sleep(std::time::Duration::from_millis(500)) => {}
    }
    Ok(())
}
