// worker thread stuff
use super::cpu_pool::PoolId;
use super::task::Task;
use crossbeam_deque::{Injector, Stealer, Worker as WorkerQueue};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;
#[cfg(feature = "telemetry")]
use std::time::Instant;

pub type WorkerId = usize;

thread_local! {
    // (owning pool, worker index); None on threads that are not workers
    static CURRENT_WORKER: Cell<Option<(PoolId, WorkerId)>> = const { Cell::new(None) };
}

/// Worker index of the calling thread, if it belongs to `pool`.
pub(crate) fn current_worker_in(pool: PoolId) -> Option<WorkerId> {
    CURRENT_WORKER.with(|slot| match slot.get() {
        Some((owner, id)) if owner == pool => Some(id),
        _ => None,
    })
}

pub(crate) struct Worker {
    pub id: WorkerId,
    pub local_queue: WorkerQueue<Task>,
    #[cfg(feature = "telemetry")]
    pub metrics: Option<Arc<Metrics>>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            local_queue: WorkerQueue::new_fifo(),
            #[cfg(feature = "telemetry")]
            metrics: None,
        }
    }

    #[cfg(feature = "telemetry")]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    // main loop
    pub fn run(
        &self,
        pool: PoolId,
        stealers: Vec<Stealer<Task>>,
        injector: Arc<Injector<Task>>,
        shutdown: Arc<AtomicBool>,
        pending_tasks: Arc<AtomicUsize>,
    ) {
        CURRENT_WORKER.with(|slot| slot.set(Some((pool, self.id))));
        tracing::trace!(worker = self.id, "worker started");

        let mut backoff_cnt = 0;

        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            // Priority: local -> global -> steal
            if let Some(task) = self.find_task(&stealers, &injector) {
                backoff_cnt = 0;
                self.execute_task(task);
                pending_tasks.fetch_sub(1, Ordering::Relaxed);
            } else {
                // nothing to do, backoff
                self.backoff(&mut backoff_cnt);
            }
        }

        tracing::trace!(worker = self.id, "worker stopped");
    }

    fn find_task(&self, stealers: &[Stealer<Task>], injector: &Injector<Task>) -> Option<Task> {
        // 1. Check local queue first (best cache locality)
        if let Some(task) = self.local_queue.pop() {
            return Some(task);
        }

        // 2. Check global injector queue
        loop {
            match injector.steal_batch_and_pop(&self.local_queue) {
                crossbeam_deque::Steal::Success(task) => {
                    #[cfg(feature = "telemetry")]
                    if let Some(ref metrics) = self.metrics {
                        metrics.record_task_stolen();
                    }
                    return Some(task);
                }
                crossbeam_deque::Steal::Empty => break,
                crossbeam_deque::Steal::Retry => continue,
            }
        }

        // 3. Steal from other workers
        self.try_steal_from_workers(stealers)
    }

    fn try_steal_from_workers(&self, stealers: &[Stealer<Task>]) -> Option<Task> {
        use rand::seq::SliceRandom;
        use rand::thread_rng;

        if stealers.is_empty() {
            return None;
        }

        let mut indices: Vec<usize> = (0..stealers.len()).collect();
        indices.shuffle(&mut thread_rng());

        for &idx in &indices {
            if idx == self.id {
                continue;
            }

            loop {
                match stealers[idx].steal_batch_and_pop(&self.local_queue) {
                    crossbeam_deque::Steal::Success(task) => {
                        #[cfg(feature = "telemetry")]
                        if let Some(ref metrics) = self.metrics {
                            metrics.record_task_stolen();
                        }
                        return Some(task);
                    }
                    crossbeam_deque::Steal::Empty => break,
                    crossbeam_deque::Steal::Retry => continue,
                }
            }
        }

        None
    }

    fn execute_task(&self, task: Task) {
        let tid = task.id;
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            task.execute();
        }));

        match result {
            Ok(_) =>
            {
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_execution(start.elapsed().as_nanos() as u64);
                }
            }
            Err(_) => {
                tracing::error!(task = ?tid, worker = self.id, "task panicked");
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_panic();
                }
            }
        }
    }

    fn backoff(&self, count: &mut u32) {
        const MAX_SPINS: u32 = 10;
        const MAX_YIELDS: u32 = 20;

        *count += 1;

        if *count <= MAX_SPINS {
            let spins = (*count).min(6);
            for _ in 0..(1 << spins) {
                std::hint::spin_loop();
            }
        } else if *count <= MAX_YIELDS {
            thread::yield_now();
        } else {
            thread::park_timeout(Duration::from_micros(100));
        }
    }
}
