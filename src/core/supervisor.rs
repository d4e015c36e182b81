//! # Root supervisor: fail-fast bootstrap and fault triage.
//!
//! The [`Supervisor`] owns the whole service topology. It is structural
//! only: it constructs children in a fixed dependency order, records a fault
//! policy per child, and triages runtime failure signals. It never carries
//! application data and exposes no functional API.
//!
//! ## Bootstrap
//! ```text
//! initialize(cfg, deps, subscribers)
//!   ├─► service-registry
//!   ├─► log-copy-pool          (size from cfg, default 10)
//!   ├─► workflow-store chain   (provider → manager)
//!   ├─► job-store chain        (provider → manager)
//!   ├─► metadata-lookup-pool   (fixed 25)
//!   ├─► workflow-coordinator   (references everything above)
//!   └─► state = Running
//!
//! any step fails:
//!   └─► state = Failed, cancel root token (tear down built children),
//!       return Err naming the node and cause; caller exits non-zero
//! ```
//!
//! Each constructor may reference already-created components but never
//! forward ones; the order is declared once, here, and matches
//! [`node::CONSTRUCTION_ORDER`].
//!
//! ## Fault triage (after bootstrap)
//! ```text
//! child ── FailureSink::report ──► supervise()
//!            ├─ init-class, any depth ─► Fatal (teardown, Err)
//!            ├─ recoverable           ─► Resume (child untouched)
//!            └─ unrecoverable         ─► Escalate ─► Fatal
//! ```
//!
//! ## Operator mailbox
//! The supervisor accepts no meaningful input. Any [`OperatorMessage`]
//! delivered to its handle is logged as an operator error (exactly one
//! event record per message) and dropped. It never mutates state and is
//! never forwarded; accepting and acting on arbitrary messages would blur
//! supervision into business logic.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::{SystemConfig, METADATA_LOOKUP_WORKERS};
use crate::error::{ServiceError, SupervisorError};
use crate::events::{Bus, Event, EventKind};
use crate::policies::FaultAction;
use crate::pool::{RoundRobinPool, WorkerFactory};
use crate::services::{
    Coordinator, CoordinatorClient, LogCopyRequest, MetadataQuery, RegistryClient,
    ServiceRegistry, StoreClient, StoreManager, StoreProvider,
};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::children::{node, ChildEntry, FailureSignal, FailureSink};
use super::state::{StateCell, SupervisorState};

/// Collaborator implementations the supervisor assembles but does not own
/// the semantics of: the backing-store provider and the two pools' worker
/// behaviors.
pub struct SystemDeps {
    /// Provider of the shared persistent backing store. Called once per
    /// store chain; assumed available before either manager is built.
    pub store: Arc<dyn StoreProvider>,
    /// Factory for log-copy workers.
    pub log_copy_workers: WorkerFactory<LogCopyRequest>,
    /// Factory for metadata-lookup workers.
    pub lookup_workers: WorkerFactory<MetadataQuery>,
}

/// An arbitrary message an operator (or a confused component) delivered
/// directly to the supervisor.
#[derive(Clone, Debug)]
pub struct OperatorMessage {
    /// Raw message body, reproduced in the log record.
    pub body: String,
}

impl OperatorMessage {
    /// Wraps a message body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// Inbound handle to the supervisor's mailbox.
///
/// Deliberately useless: everything sent here is logged and dropped.
#[derive(Clone)]
pub struct SupervisorHandle {
    tx: mpsc::UnboundedSender<OperatorMessage>,
}

impl SupervisorHandle {
    /// Delivers a message to the supervisor (non-blocking).
    pub fn deliver(&self, message: OperatorMessage) {
        let _ = self.tx.send(message);
    }
}

/// Root of the service topology. See the module docs for the lifecycle.
pub struct Supervisor {
    cfg: SystemConfig,
    bus: Bus,
    state: StateCell,
    children: Vec<ChildEntry>,
    root_token: CancellationToken,
    operator_tx: mpsc::UnboundedSender<OperatorMessage>,
    failures: Mutex<Option<mpsc::UnboundedReceiver<FailureSignal>>>,
    sink: FailureSink,

    registry: RegistryClient,
    log_copy: RoundRobinPool<LogCopyRequest>,
    lookup: RoundRobinPool<MetadataQuery>,
    workflows: StoreClient,
    jobs: StoreClient,
    coordinator: CoordinatorClient,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor").finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Builds the full topology in declared order.
    ///
    /// Each step must succeed before the next begins. On the first failure
    /// the remaining steps are skipped, already-built children are torn
    /// down, the state becomes `Failed`, and the returned error names the
    /// failing node with its cause chain. The caller is expected to print
    /// it and exit non-zero.
    ///
    /// `subscribers` are wired to the event bus before the first step, so
    /// they observe bootstrap events too. Must be called within a tokio
    /// runtime.
    pub fn initialize(
        cfg: SystemConfig,
        deps: SystemDeps,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, SupervisorError> {
        let state = StateCell::new();
        state.advance(SupervisorState::Initializing);

        let bus = Bus::new(cfg.bus_capacity_clamped());
        let root_token = CancellationToken::new();
        spawn_subscriber_listener(&bus, subscribers, root_token.child_token());

        let (sink, failure_rx) = FailureSink::channel();
        let mut children = Vec::with_capacity(node::CONSTRUCTION_ORDER.len());

        // service-registry
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::REGISTRY));
        let registry = ServiceRegistry::spawn(root_token.child_token());
        children.push(ChildEntry::new(node::REGISTRY, &[]));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::REGISTRY));

        // log-copy-pool
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::LOG_COPY_POOL));
        let log_copy = RoundRobinPool::new(
            node::LOG_COPY_POOL,
            cfg.log_copy_workers,
            deps.log_copy_workers.as_ref(),
            bus.clone(),
            root_token.child_token(),
            sink.clone(),
        )
        .map_err(|e| abort(&bus, &state, &root_token, node::LOG_COPY_POOL, e))?;
        registry.register(node::LOG_COPY_POOL, Arc::new(log_copy.handle()));
        children.push(ChildEntry::new(node::LOG_COPY_POOL, &[node::REGISTRY]));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::LOG_COPY_POOL));

        // workflow-store chain
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::WORKFLOW_STORE));
        let backend = deps
            .store
            .database_interface()
            .map_err(|e| abort(&bus, &state, &root_token, node::WORKFLOW_STORE, e))?;
        let workflows = StoreManager::spawn(
            node::WORKFLOW_STORE,
            backend,
            &registry,
            root_token.child_token(),
            sink.clone(),
        );
        children.push(ChildEntry::new(node::WORKFLOW_STORE, &[node::REGISTRY]));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::WORKFLOW_STORE));

        // job-store chain
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::JOB_STORE));
        let backend = deps
            .store
            .database_interface()
            .map_err(|e| abort(&bus, &state, &root_token, node::JOB_STORE, e))?;
        let jobs = StoreManager::spawn(
            node::JOB_STORE,
            backend,
            &registry,
            root_token.child_token(),
            sink.clone(),
        );
        children.push(ChildEntry::new(node::JOB_STORE, &[node::REGISTRY]));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::JOB_STORE));

        // metadata-lookup-pool (fixed size, deliberately not configurable)
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::LOOKUP_POOL));
        let lookup = RoundRobinPool::new(
            node::LOOKUP_POOL,
            METADATA_LOOKUP_WORKERS,
            deps.lookup_workers.as_ref(),
            bus.clone(),
            root_token.child_token(),
            sink.clone(),
        )
        .map_err(|e| abort(&bus, &state, &root_token, node::LOOKUP_POOL, e))?;
        registry.register(node::LOOKUP_POOL, Arc::new(lookup.handle()));
        children.push(ChildEntry::new(node::LOOKUP_POOL, &[node::REGISTRY]));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::LOOKUP_POOL));

        // workflow-coordinator
        bus.publish(Event::new(EventKind::ServiceInitializing).with_service(node::COORDINATOR));
        let coordinator = Coordinator::spawn(
            node::COORDINATOR,
            registry.clone(),
            log_copy.handle(),
            lookup.handle(),
            workflows.clone(),
            jobs.clone(),
            root_token.child_token(),
            sink.clone(),
        );
        children.push(ChildEntry::new(
            node::COORDINATOR,
            &[
                node::REGISTRY,
                node::LOG_COPY_POOL,
                node::WORKFLOW_STORE,
                node::JOB_STORE,
                node::LOOKUP_POOL,
            ],
        ));
        bus.publish(Event::new(EventKind::ServiceInitialized).with_service(node::COORDINATOR));

        let operator_tx = spawn_operator_mailbox(&bus, root_token.child_token());

        state.advance(SupervisorState::Running);
        bus.publish(Event::new(EventKind::SupervisorRunning));
        tracing::info!(
            log_copy_workers = cfg.log_copy_workers,
            lookup_workers = METADATA_LOOKUP_WORKERS,
            "all services initialized"
        );

        Ok(Self {
            cfg,
            bus,
            state,
            children,
            root_token,
            operator_tx,
            failures: Mutex::new(Some(failure_rx)),
            sink,
            registry,
            log_copy,
            lookup,
            workflows,
            jobs,
            coordinator,
        })
    }

    /// Consumes failure signals until one is fatal.
    ///
    /// Recoverable failures resume the child in place (its declared
    /// [`ResumeBehavior`](crate::policies::ResumeBehavior) label is
    /// published with the `ServiceResumed` event). Initialization-class
    /// failures (at any depth) and escalated failures tear the system
    /// down and return the diagnostic error.
    ///
    /// Returns `Ok(())` only if every failure sender is gone, which cannot
    /// happen while the supervisor itself is alive and holds one.
    pub async fn supervise(&self) -> Result<(), SupervisorError> {
        let mut rx = match self.failures.lock().await.take() {
            Some(rx) => rx,
            None => {
                tracing::warn!("supervise() called twice; ignoring");
                return Ok(());
            }
        };

        while let Some(FailureSignal { node, error }) = rx.recv().await {
            self.bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_service(node)
                    .with_reason(error.to_string()),
            );

            let entry = self.children.iter().find(|c| c.name == node);
            let policy = entry.map(|c| c.policy).unwrap_or_default();
            match policy.action_for(&error) {
                FaultAction::Resume => {
                    let behavior = entry.map(|c| c.resume).unwrap_or_default();
                    tracing::warn!(
                        node,
                        error = %error,
                        behavior = behavior.as_label(),
                        "resuming child after runtime failure"
                    );
                    self.bus.publish(
                        Event::new(EventKind::ServiceResumed)
                            .with_service(node)
                            .with_detail(behavior.as_label()),
                    );
                }
                FaultAction::Escalate | FaultAction::Fatal => {
                    return Err(self.fail_fatally(node, error));
                }
            }
        }
        Ok(())
    }

    /// Terminal path: record, tear down, and build the diagnostic.
    fn fail_fatally(&self, node: &'static str, error: ServiceError) -> SupervisorError {
        self.bus.publish(
            Event::new(EventKind::ServiceEscalated)
                .with_service(node)
                .with_reason(error.to_string()),
        );
        self.state.advance(SupervisorState::Failed);
        self.root_token.cancel();
        self.bus.publish(
            Event::new(EventKind::SupervisorFailed)
                .with_service(node)
                .with_reason(error.to_string()),
        );
        tracing::error!(node, error = %error, "fatal failure; tearing the system down");

        if error.is_init_class() {
            SupervisorError::InitFailed { node, source: error }
        } else {
            SupervisorError::Escalated { node, source: error }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        self.state.load()
    }

    /// The child table, in construction order.
    pub fn children(&self) -> &[ChildEntry] {
        &self.children
    }

    /// The event bus (subscribe for observability).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The supervisor's inbound mailbox handle (log-and-drop).
    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle { tx: self.operator_tx.clone() }
    }

    /// Reporting endpoint for failures raised beneath the supervisor, e.g.
    /// by collaborator-provided worker behaviors.
    pub fn failure_sink(&self) -> FailureSink {
        self.sink.clone()
    }

    /// Effective configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.cfg
    }

    /// The discovery directory client.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// The log-copy pool.
    pub fn log_copy_pool(&self) -> &RoundRobinPool<LogCopyRequest> {
        &self.log_copy
    }

    /// The metadata-lookup pool.
    pub fn lookup_pool(&self) -> &RoundRobinPool<MetadataQuery> {
        &self.lookup
    }

    /// The workflow-store client.
    pub fn workflow_store(&self) -> &StoreClient {
        &self.workflows
    }

    /// The job-store client.
    pub fn job_store(&self) -> &StoreClient {
        &self.jobs
    }

    /// The coordinator client.
    pub fn coordinator(&self) -> &CoordinatorClient {
        &self.coordinator
    }
}

/// Records an aborted build step and produces the diagnostic error.
fn abort(
    bus: &Bus,
    state: &StateCell,
    root_token: &CancellationToken,
    node: &'static str,
    source: ServiceError,
) -> SupervisorError {
    bus.publish(
        Event::new(EventKind::InitFailed)
            .with_service(node)
            .with_reason(source.to_string()),
    );
    state.advance(SupervisorState::Failed);
    root_token.cancel();
    tracing::error!(node, error = %source, "initialization failed; aborting bootstrap");
    SupervisorError::InitFailed { node, source }
}

/// Forwards bus events to the subscriber set, tolerating lag.
fn spawn_subscriber_listener(
    bus: &Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    token: CancellationToken,
) {
    if subscribers.is_empty() {
        return;
    }
    let set = SubscriberSet::new(subscribers);
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged; events skipped");
                        continue;
                    }
                }
            }
        }
    });
}

/// Spawns the log-and-drop operator mailbox.
fn spawn_operator_mailbox(
    bus: &Bus,
    token: CancellationToken,
) -> mpsc::UnboundedSender<OperatorMessage> {
    let (tx, mut rx) = mpsc::unbounded_channel::<OperatorMessage>();
    let bus = bus.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    tracing::warn!(body = %msg.body, "message delivered to the supervisor; it is structural only, dropping");
                    bus.publish(
                        Event::new(EventKind::OperatorMessageIgnored).with_reason(msg.body),
                    );
                }
            }
        }
    });
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOG_COPY_WORKERS;
    use crate::pool::PoolWorker;
    use crate::services::StoreBackend;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct NoopWorker;

    #[async_trait]
    impl<T: Send + 'static> PoolWorker<T> for NoopWorker {
        async fn process(&self, _task: T) {}
    }

    #[derive(Default)]
    struct MemoryBackend {
        data: tokio::sync::Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl StoreBackend for MemoryBackend {
        async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
            Ok(self.data.lock().await.get(key).cloned())
        }

        async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError> {
            self.data.lock().await.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Store provider that records calls and can fail on the n-th one.
    struct RecordingProvider {
        backend: Arc<MemoryBackend>,
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
        order: Arc<StdMutex<Vec<&'static str>>>,
    }

    impl RecordingProvider {
        fn new(fail_on_call: Option<usize>, order: Arc<StdMutex<Vec<&'static str>>>) -> Self {
            Self {
                backend: Arc::new(MemoryBackend::default()),
                calls: AtomicUsize::new(0),
                fail_on_call,
                order,
            }
        }
    }

    impl StoreProvider for RecordingProvider {
        fn database_interface(&self) -> Result<Arc<dyn StoreBackend>, ServiceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.order.lock().unwrap().push("store-provider");
            if self.fail_on_call == Some(call) {
                return Err(ServiceError::init("database interface unavailable"));
            }
            Ok(Arc::clone(&self.backend) as Arc<dyn StoreBackend>)
        }
    }

    fn counting_factory<T: Send + 'static>(
        label: &'static str,
        order: Arc<StdMutex<Vec<&'static str>>>,
        counter: Arc<AtomicUsize>,
    ) -> WorkerFactory<T> {
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            order.lock().unwrap().push(label);
            Ok(Box::new(NoopWorker) as Box<dyn PoolWorker<T>>)
        })
    }

    struct Fixture {
        deps: SystemDeps,
        order: Arc<StdMutex<Vec<&'static str>>>,
        provider_calls: Arc<RecordingProviderCalls>,
        log_factory_calls: Arc<AtomicUsize>,
        lookup_factory_calls: Arc<AtomicUsize>,
    }

    struct RecordingProviderCalls(Arc<RecordingProvider>);

    impl RecordingProviderCalls {
        fn count(&self) -> usize {
            self.0.calls.load(Ordering::SeqCst)
        }
    }

    fn fixture(fail_store_on_call: Option<usize>) -> Fixture {
        let order = Arc::new(StdMutex::new(Vec::new()));
        let provider = Arc::new(RecordingProvider::new(fail_store_on_call, Arc::clone(&order)));
        let log_factory_calls = Arc::new(AtomicUsize::new(0));
        let lookup_factory_calls = Arc::new(AtomicUsize::new(0));

        let deps = SystemDeps {
            store: Arc::clone(&provider) as Arc<dyn StoreProvider>,
            log_copy_workers: counting_factory(
                "log-copy-worker",
                Arc::clone(&order),
                Arc::clone(&log_factory_calls),
            ),
            lookup_workers: counting_factory(
                "lookup-worker",
                Arc::clone(&order),
                Arc::clone(&lookup_factory_calls),
            ),
        };

        Fixture {
            deps,
            order,
            provider_calls: Arc::new(RecordingProviderCalls(provider)),
            log_factory_calls,
            lookup_factory_calls,
        }
    }

    #[tokio::test]
    async fn builds_all_six_nodes_in_declared_order() {
        let fx = fixture(None);
        let cfg = SystemConfig { log_copy_workers: 3, ..SystemConfig::default() };
        let sup = Supervisor::initialize(cfg, fx.deps, Vec::new()).unwrap();

        assert_eq!(sup.state(), SupervisorState::Running);

        let names: Vec<&str> = sup.children().iter().map(|c| c.name).collect();
        assert_eq!(names, node::CONSTRUCTION_ORDER);

        assert_eq!(sup.log_copy_pool().size(), 3);
        assert_eq!(sup.lookup_pool().size(), 25);

        // One construction each: 3 log workers, 2 provider calls, 25 lookup
        // workers, strictly in phase order.
        assert_eq!(fx.log_factory_calls.load(Ordering::SeqCst), 3);
        assert_eq!(fx.provider_calls.count(), 2);
        assert_eq!(fx.lookup_factory_calls.load(Ordering::SeqCst), 25);

        let order = fx.order.lock().unwrap();
        assert!(order[..3].iter().all(|l| *l == "log-copy-worker"));
        assert_eq!(order[3], "store-provider");
        assert_eq!(order[4], "store-provider");
        assert!(order[5..].iter().all(|l| *l == "lookup-worker"));
    }

    #[tokio::test]
    async fn omitted_worker_count_defaults_to_ten() {
        let fx = fixture(None);
        let sup =
            Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new()).unwrap();
        assert_eq!(sup.log_copy_pool().size(), DEFAULT_LOG_COPY_WORKERS);
        assert_eq!(sup.lookup_pool().size(), METADATA_LOOKUP_WORKERS);
    }

    #[tokio::test]
    async fn job_store_failure_aborts_before_later_nodes() {
        let fx = fixture(Some(2));
        let err = Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new())
            .expect_err("bootstrap must abort");

        assert_eq!(err.node(), node::JOB_STORE);
        assert!(err.to_string().contains("job-store"), "diagnostic: {err}");

        // Nothing after the failing chain was ever constructed.
        assert_eq!(fx.lookup_factory_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.provider_calls.count(), 2);
    }

    #[tokio::test]
    async fn workflow_store_failure_aborts_first_chain() {
        let fx = fixture(Some(1));
        let err = Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new())
            .expect_err("bootstrap must abort");
        assert_eq!(err.node(), node::WORKFLOW_STORE);
        assert_eq!(fx.provider_calls.count(), 1);
        assert_eq!(fx.lookup_factory_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn operator_message_produces_one_record_and_no_state_change() {
        let fx = fixture(None);
        let sup =
            Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new()).unwrap();

        let mut events = sup.bus().subscribe();
        sup.handle().deliver(OperatorMessage::new("please reroute workflow 17"));

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::OperatorMessageIgnored);
        assert!(ev.reason.as_deref().unwrap().contains("workflow 17"));

        // No further records for a single delivery.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(events.try_recv().is_err());

        // Children are untouched: still running, still registered.
        assert_eq!(sup.state(), SupervisorState::Running);
        assert_eq!(sup.log_copy_pool().size(), DEFAULT_LOG_COPY_WORKERS);
        assert!(sup.registry().lookup(node::COORDINATOR).await.is_some());
    }

    #[tokio::test]
    async fn recoverable_failures_resume_then_unrecoverable_escalates() {
        let fx = fixture(None);
        let sup = Arc::new(
            Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new()).unwrap(),
        );

        let mut events = sup.bus().subscribe();
        let supervising = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.supervise().await })
        };

        let sink = sup.failure_sink();
        sink.report(node::JOB_STORE, ServiceError::fail("transient backend hiccup"));

        // Failure is recorded, then the child is resumed with its declared
        // behavior label.
        assert_eq!(events.recv().await.unwrap().kind, EventKind::ServiceFailed);
        let resumed = events.recv().await.unwrap();
        assert_eq!(resumed.kind, EventKind::ServiceResumed);
        assert_eq!(resumed.detail.as_deref(), Some("preserve_state"));
        assert_eq!(sup.state(), SupervisorState::Running);

        sink.report(node::JOB_STORE, ServiceError::unrecoverable("lane corrupted"));
        let err = supervising.await.unwrap().expect_err("escalation is fatal");
        assert!(matches!(err, SupervisorError::Escalated { node, .. } if node == node::JOB_STORE));
        assert_eq!(sup.state(), SupervisorState::Failed);
    }

    #[tokio::test]
    async fn deep_init_failure_is_fatal_regardless_of_depth() {
        let fx = fixture(None);
        let sup = Arc::new(
            Supervisor::initialize(SystemConfig::default(), fx.deps, Vec::new()).unwrap(),
        );

        let supervising = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.supervise().await })
        };

        sup.failure_sink()
            .report(node::LOOKUP_POOL, ServiceError::init("replacement worker refused"));

        let err = supervising.await.unwrap().expect_err("init failures never resume");
        assert!(matches!(err, SupervisorError::InitFailed { node, .. } if node == node::LOOKUP_POOL));
        assert_eq!(sup.state(), SupervisorState::Failed);
    }
}
