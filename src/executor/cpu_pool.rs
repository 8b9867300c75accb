use super::task::Task;
use super::worker::{self, Worker, WorkerId};
use super::Executor;
use crate::config::Config;
use crate::error::{Error, Result};
use crossbeam_deque::{Injector, Stealer};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;

/// Global pool ID counter
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a `CpuPool`, used by workers to answer "am I yours?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolId(u64);

impl PoolId {
    fn next() -> Self {
        PoolId(POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(target_os = "linux")]
fn pin_thread_to_core(core_id: usize) {
    unsafe {
        let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_id, &mut cpuset);
        let result = libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &cpuset,
        );
        if result != 0 {
            tracing::warn!(core = core_id, "failed to pin worker to core");
        }
    }
}

/// The default multi-threaded executor.
///
/// A fixed set of worker threads fed through a global injector queue and
/// per-worker deques with randomized stealing. Panicking tasks are
/// isolated; the worker survives. Dropping the pool signals shutdown and
/// joins all workers; tasks still queued at that point are discarded.
pub struct CpuPool {
    id: PoolId,
    workers: Vec<WorkerHandle>,
    injector: Arc<Injector<Task>>,
    shutdown: Arc<AtomicBool>,
    num_threads: usize,
    pending_tasks: Arc<AtomicUsize>,
    submit_seq: AtomicUsize,
    #[cfg(feature = "telemetry")]
    pub(crate) metrics: Arc<Metrics>,
}

struct WorkerHandle {
    thread: Option<JoinHandle<()>>,
    unparker: thread::Thread,
}

impl CpuPool {
    /// Spawn a pool as described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();
        if num_threads == 0 {
            return Err(Error::config("need at least 1 thread"));
        }

        let id = PoolId::next();
        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let pending_tasks = Arc::new(AtomicUsize::new(0));

        #[cfg(feature = "telemetry")]
        let metrics = Arc::new(Metrics::new());

        tracing::debug!(threads = num_threads, "spawning worker pool");

        let mut workers = Vec::with_capacity(num_threads);
        let mut stealers = Vec::with_capacity(num_threads);

        for worker_id in 0..num_threads {
            let worker = Worker::new(worker_id);
            stealers.push(worker.local_queue.stealer());
            workers.push(worker);
        }

        let mut handles = Vec::with_capacity(num_threads);

        for worker in workers {
            let worker_id = worker.id;
            let stealers_clone = stealers.clone();
            let injector_clone = injector.clone();
            let shutdown_clone = shutdown.clone();
            let pending_clone = pending_tasks.clone();
            let name = format!("{}-{}", config.thread_name_prefix, worker_id);

            #[cfg(feature = "telemetry")]
            let worker = worker.with_metrics(metrics.clone());

            let mut builder = thread::Builder::new().name(name);

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let pin_workers = config.pin_workers;
            let thread = builder
                .spawn(move || {
                    // Pin worker to core if requested
                    #[cfg(target_os = "linux")]
                    if pin_workers {
                        pin_thread_to_core(worker_id);
                    }
                    #[cfg(not(target_os = "linux"))]
                    let _ = pin_workers;

                    worker.run(
                        id,
                        stealers_clone,
                        injector_clone,
                        shutdown_clone,
                        pending_clone,
                    );
                })
                .map_err(|e| Error::executor(format!("spawn failed: {}", e)))?;

            let unparker = thread.thread().clone();

            handles.push(WorkerHandle {
                thread: Some(thread),
                unparker,
            });
        }

        Ok(Self {
            id,
            workers: handles,
            injector,
            shutdown,
            num_threads,
            pending_tasks,
            submit_seq: AtomicUsize::new(0),
            #[cfg(feature = "telemetry")]
            metrics,
        })
    }

    /// Enqueue a task for execution on some worker.
    pub fn submit(&self, task: Task) {
        self.pending_tasks.fetch_add(1, Ordering::Relaxed);
        self.injector.push(task);

        // Round-robin wake-up; parked workers also time out on their own,
        // so a missed unpark only delays pickup.
        let seq = self.submit_seq.fetch_add(1, Ordering::Relaxed);
        if let Some(worker) = self.workers.get(seq % self.num_threads) {
            worker.unparker.unpark();
        }
    }

    /// Convenience wrapper building a [`Task`] from a closure.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::new(f));
    }

    /// Tasks submitted but not yet finished.
    pub fn pending_tasks(&self) -> usize {
        self.pending_tasks.load(Ordering::Relaxed)
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Metrics recorded by this pool's workers.
    #[cfg(feature = "telemetry")]
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        // wake everyone up to check shutdown flag
        for worker in &self.workers {
            worker.unparker.unpark();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

impl Executor for CpuPool {
    fn worker_count(&self) -> usize {
        self.num_threads
    }

    fn current_worker(&self) -> Option<WorkerId> {
        worker::current_worker_in(self.id)
    }

    fn schedule(&self, task: Task) {
        self.submit(task);
    }
}

impl Drop for CpuPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CpuPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPool")
            .field("id", &self.id)
            .field("num_threads", &self.num_threads)
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn small_pool(threads: usize) -> CpuPool {
        let config = Config::builder().num_threads(threads).build().unwrap();
        CpuPool::new(&config).unwrap()
    }

    #[test]
    fn test_executes_submitted_task() {
        let pool = small_pool(2);
        let (tx, rx) = bounded(1);

        pool.execute(move || {
            tx.send(42).unwrap();
        });

        assert_eq!(rx.recv().unwrap(), 42);
    }

    #[test]
    fn test_worker_identity() {
        let pool = small_pool(2);
        let (tx, rx) = bounded(1);

        // Not a worker of the pool from out here.
        assert!(pool.current_worker().is_none());

        let pool = Arc::new(pool);
        let inner = pool.clone();
        pool.execute(move || {
            tx.send(inner.current_worker()).unwrap();
        });

        let seen = rx.recv().unwrap();
        assert!(seen.is_some());
        assert!(seen.unwrap() < 2);
    }

    #[test]
    fn test_identity_is_per_pool() {
        let a = Arc::new(small_pool(1));
        let b = Arc::new(small_pool(1));
        let (tx, rx) = bounded(1);

        // A worker of pool `a` is a foreign thread to pool `b`.
        let b_seen_from_a = b.clone();
        a.execute(move || {
            tx.send(b_seen_from_a.current_worker()).unwrap();
        });

        assert!(rx.recv().unwrap().is_none());
    }

    #[test]
    fn test_drop_joins_workers() {
        let pool = small_pool(4);
        let (tx, rx) = bounded(16);

        for i in 0..16 {
            let tx = tx.clone();
            pool.execute(move || {
                tx.send(i).unwrap();
            });
        }

        for _ in 0..16 {
            rx.recv().unwrap();
        }

        drop(pool);
    }
}
