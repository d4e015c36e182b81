//! # Fixed-size round-robin worker pool.
//!
//! [`RoundRobinPool`] bounds concurrency for one side-effecting workload
//! class: `size` identical workers, each with a private unbounded inbound
//! queue, behind a cursor-based dispatcher.
//!
//! ## Architecture
//! ```text
//!    dispatch(task)
//!        │   idx = cursor.fetch_add(1) % size
//!        ├────────────────► [queue 0] ─► worker loop 0 ─► process(task)
//!        ├────────────────► [queue 1] ─► worker loop 1 ─► process(task)
//!        └────────────────► [queue N] ─► worker loop N ─► process(task)
//! ```
//!
//! ## Rules
//! - `dispatch` is **non-blocking**: the task is queued on the selected
//!   worker's queue and the call returns immediately.
//! - At most `size` tasks are *being processed* concurrently; pending tasks
//!   queue per worker without limit. Backpressure, if desired, is the
//!   caller's concern; there is no pool-level admission control.
//! - Dispatch is strict round-robin: call `k` lands on worker `k mod size`.
//! - A worker panic is caught and reported as a runtime failure; the worker
//!   loop continues with the next queued task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::FailureSink;
use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};

use super::worker::PoolWorker;

/// Clone-able dispatch endpoint for a pool.
///
/// All clones share one cursor, so round-robin order is global across them.
pub struct PoolHandle<T: Send + 'static> {
    node: &'static str,
    queues: Arc<Vec<mpsc::UnboundedSender<T>>>,
    cursor: Arc<AtomicUsize>,
}

impl<T: Send + 'static> Clone for PoolHandle<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            queues: Arc::clone(&self.queues),
            cursor: Arc::clone(&self.cursor),
        }
    }
}

impl<T: Send + 'static> PoolHandle<T> {
    /// Queues `task` on the next worker in round-robin order.
    ///
    /// Never blocks. If the selected worker's loop is gone (pool teardown in
    /// progress), the task is dropped with a warning.
    pub fn dispatch(&self, task: T) {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.queues.len();
        if self.queues[idx].send(task).is_err() {
            tracing::warn!(pool = self.node, worker = idx, "task dropped: worker loop closed");
        }
    }

    /// Number of workers behind this handle.
    #[must_use]
    pub fn size(&self) -> usize {
        self.queues.len()
    }
}

/// Fixed-size set of homogeneous workers behind a round-robin dispatcher.
///
/// The size is fixed at creation; workers are never added, removed, or
/// replaced afterwards.
pub struct RoundRobinPool<T: Send + 'static> {
    handle: PoolHandle<T>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> RoundRobinPool<T> {
    /// Creates the pool and spawns one worker loop per slot.
    ///
    /// `factory` is invoked once per slot; its first error aborts creation
    /// (an initialization failure; already-built slots are torn down by the
    /// caller cancelling `token`). A `size` of zero is clamped to 1.
    pub fn new(
        node: &'static str,
        size: usize,
        factory: &(dyn Fn() -> Result<Box<dyn PoolWorker<T>>, ServiceError> + Send + Sync),
        bus: Bus,
        token: CancellationToken,
        sink: FailureSink,
    ) -> Result<Self, ServiceError> {
        let size = size.max(1);
        let mut queues = Vec::with_capacity(size);
        let mut workers = Vec::with_capacity(size);

        for slot in 0..size {
            let worker = factory()?;
            let (tx, rx) = mpsc::unbounded_channel::<T>();
            queues.push(tx);
            workers.push(spawn_worker_loop(
                node,
                slot,
                worker,
                rx,
                bus.clone(),
                token.child_token(),
                sink.clone(),
            ));
        }

        Ok(Self {
            handle: PoolHandle {
                node,
                queues: Arc::new(queues),
                cursor: Arc::new(AtomicUsize::new(0)),
            },
            workers,
        })
    }

    /// Queues `task` on the next worker in round-robin order (non-blocking).
    pub fn dispatch(&self, task: T) {
        self.handle.dispatch(task);
    }

    /// Returns a clone-able dispatch endpoint sharing this pool's cursor.
    #[must_use]
    pub fn handle(&self) -> PoolHandle<T> {
        self.handle.clone()
    }

    /// Number of workers in the pool.
    #[must_use]
    pub fn size(&self) -> usize {
        self.handle.size()
    }

    /// True once every worker loop has exited (teardown complete).
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }
}

/// One worker loop: drain the slot's queue until cancellation, isolating
/// panics so a poisoned task cannot take the slot down.
fn spawn_worker_loop<T: Send + 'static>(
    node: &'static str,
    slot: usize,
    worker: Box<dyn PoolWorker<T>>,
    mut rx: mpsc::UnboundedReceiver<T>,
    bus: Bus,
    token: CancellationToken,
    sink: FailureSink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                task = rx.recv() => {
                    let Some(task) = task else { break };
                    let fut = worker.process(task);
                    if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(payload.as_ref());
                        tracing::warn!(pool = node, worker = slot, panic = %info, "worker panicked; continuing");
                        bus.publish(
                            Event::new(EventKind::WorkerPanicked)
                                .with_service(node)
                                .with_reason(info.clone()),
                        );
                        sink.report(node, ServiceError::fail(info));
                    }
                }
            }
        }
    })
}

/// Best-effort rendering of a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Worker that tags every task with its slot id and echoes it back.
    struct EchoWorker {
        slot: usize,
        out: mpsc::UnboundedSender<(usize, u64)>,
    }

    #[async_trait]
    impl PoolWorker<u64> for EchoWorker {
        async fn process(&self, task: u64) {
            let _ = self.out.send((self.slot, task));
        }
    }

    fn echo_pool(
        size: usize,
    ) -> (RoundRobinPool<u64>, mpsc::UnboundedReceiver<(usize, u64)>) {
        let (out, results) = mpsc::unbounded_channel();
        let slots = AtomicUsize::new(0);
        let (sink, _rx) = FailureSink::channel();
        let pool = RoundRobinPool::new(
            "echo-pool",
            size,
            &move || {
                let slot = slots.fetch_add(1, Ordering::Relaxed);
                Ok(Box::new(EchoWorker { slot, out: out.clone() }) as Box<dyn PoolWorker<u64>>)
            },
            Bus::new(16),
            CancellationToken::new(),
            sink,
        )
        .unwrap();
        (pool, results)
    }

    #[tokio::test]
    async fn dispatch_cycles_through_workers_in_round_robin_order() {
        let (pool, mut results) = echo_pool(3);
        assert_eq!(pool.size(), 3);

        for task in 0..9u64 {
            pool.dispatch(task);
        }

        let mut seen = Vec::new();
        for _ in 0..9 {
            seen.push(results.recv().await.unwrap());
        }
        for (slot, task) in seen {
            assert_eq!(task as usize % 3, slot, "task {task} landed on worker {slot}");
        }
    }

    #[tokio::test]
    async fn single_worker_pool_receives_everything() {
        let (pool, mut results) = echo_pool(1);
        for task in 0..4u64 {
            pool.dispatch(task);
        }
        for expected in 0..4u64 {
            let (slot, task) = results.recv().await.unwrap();
            assert_eq!(slot, 0);
            assert_eq!(task, expected);
        }
    }

    #[tokio::test]
    async fn handle_shares_the_cursor_with_the_pool() {
        let (pool, mut results) = echo_pool(2);
        let handle = pool.handle();

        pool.dispatch(0);
        handle.dispatch(1);
        pool.dispatch(2);
        handle.dispatch(3);

        let mut by_slot = [0usize; 2];
        for _ in 0..4 {
            let (slot, _) = results.recv().await.unwrap();
            by_slot[slot] += 1;
        }
        assert_eq!(by_slot, [2, 2]);
    }

    #[tokio::test]
    async fn factory_error_aborts_pool_creation() {
        let (sink, _rx) = FailureSink::channel();
        let res = RoundRobinPool::<u64>::new(
            "broken-pool",
            4,
            &|| Err(ServiceError::init("worker refused to start")),
            Bus::new(16),
            CancellationToken::new(),
            sink,
        );
        assert!(matches!(res, Err(ServiceError::Init { .. })));
    }

    struct PanicOnOdd {
        out: mpsc::UnboundedSender<u64>,
    }

    #[async_trait]
    impl PoolWorker<u64> for PanicOnOdd {
        async fn process(&self, task: u64) {
            if task % 2 == 1 {
                panic!("odd task {task}");
            }
            let _ = self.out.send(task);
        }
    }

    #[tokio::test]
    async fn worker_panic_is_reported_and_the_loop_continues() {
        let (out, mut results) = mpsc::unbounded_channel();
        let (sink, mut failures) = FailureSink::channel();
        let pool = RoundRobinPool::new(
            "panicky-pool",
            1,
            &move || Ok(Box::new(PanicOnOdd { out: out.clone() }) as Box<dyn PoolWorker<u64>>),
            Bus::new(16),
            CancellationToken::new(),
            sink,
        )
        .unwrap();

        pool.dispatch(1); // panics
        pool.dispatch(2); // still processed by the same worker

        assert_eq!(results.recv().await, Some(2));
        let signal = failures.recv().await.unwrap();
        assert_eq!(signal.node, "panicky-pool");
        assert!(signal.error.is_recoverable());
    }

    #[tokio::test]
    async fn zero_size_is_clamped_to_one() {
        let (pool, _results) = echo_pool(0);
        assert_eq!(pool.size(), 1);
    }

    #[tokio::test]
    async fn cancellation_stops_worker_loops() {
        let (out, _results) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let (sink, _rx) = FailureSink::channel();
        let slots = AtomicUsize::new(0);
        let pool = RoundRobinPool::new(
            "stoppable-pool",
            2,
            &move || {
                let slot = slots.fetch_add(1, Ordering::Relaxed);
                Ok(Box::new(EchoWorker { slot, out: out.clone() }) as Box<dyn PoolWorker<u64>>)
            },
            Bus::new(16),
            token.clone(),
            sink,
        )
        .unwrap();

        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while !pool.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("worker loops should exit after cancellation");
    }
}
