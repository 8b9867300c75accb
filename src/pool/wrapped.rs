//! Pool adapter over an external executor.

use super::ThreadPool;
use crate::executor::{Executor, Task};
use std::sync::Arc;

/// Exposes a shared [`Executor`] through the [`ThreadPool`] capability.
///
/// The executor is held by `Arc`, so it outlives the pool by
/// construction. Scheduling order and worker assignment are the
/// executor's business; this adapter only promises "eventually executed,
/// exactly once".
pub struct WrappedPool {
    executor: Arc<dyn Executor>,
}

impl WrappedPool {
    /// Wrap an executor.
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }
}

impl ThreadPool for WrappedPool {
    fn thread_count(&self) -> usize {
        self.executor.worker_count()
    }

    fn negotiate(&self, requested: usize) -> usize {
        // If called by a thread in the pool, return 1
        if self.executor.current_worker().is_some() {
            return 1;
        }
        let workers = self.executor.worker_count();
        if requested == 0 {
            workers
        } else {
            requested.min(workers)
        }
    }

    fn submit(&self, task: Task) {
        self.executor.schedule(task);
    }
}

impl std::fmt::Debug for WrappedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedPool")
            .field("worker_count", &self.executor.worker_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::WorkerId;

    // Executor double that pretends the calling thread is or is not one
    // of its workers.
    struct FakeExecutor {
        workers: usize,
        on_worker: bool,
    }

    impl Executor for FakeExecutor {
        fn worker_count(&self) -> usize {
            self.workers
        }

        fn current_worker(&self) -> Option<WorkerId> {
            self.on_worker.then_some(0)
        }

        fn schedule(&self, task: Task) {
            task.execute();
        }
    }

    fn pool(workers: usize, on_worker: bool) -> WrappedPool {
        WrappedPool::new(Arc::new(FakeExecutor { workers, on_worker }))
    }

    #[test]
    fn test_negotiate_from_foreign_thread() {
        let pool = pool(4, false);
        assert_eq!(pool.thread_count(), 4);
        assert_eq!(pool.negotiate(0), 4);
        assert_eq!(pool.negotiate(1), 1);
        assert_eq!(pool.negotiate(3), 3);
        assert_eq!(pool.negotiate(4), 4);
        assert_eq!(pool.negotiate(100), 4);
    }

    #[test]
    fn test_negotiate_from_own_worker() {
        let pool = pool(4, true);
        assert_eq!(pool.negotiate(0), 1);
        assert_eq!(pool.negotiate(4), 1);
        assert_eq!(pool.negotiate(100), 1);
    }
}
