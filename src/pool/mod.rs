//! Pool selection and activation.
//!
//! Numeric kernels ask for "the pool to use now" through
//! [`get_active_pool`] and submit work to it without knowing whether it
//! runs inline ([`NullPool`]) or on a shared executor ([`WrappedPool`]).
//! The per-thread active binding defaults to the process-wide
//! [`global_pool`] on first use and can be scoped to a different pool
//! with [`set_active_pool`] or [`with_pool`].

pub mod active;
pub mod global;
pub mod null;
pub mod wrapped;

pub use active::{get_active_pool, set_active_pool, with_pool};
pub use global::{configure_global, global_pool};
pub use null::NullPool;
pub use wrapped::WrappedPool;

use crate::executor::Task;

/// Capability contract for an execution backend.
///
/// Implementations must be callable concurrently from multiple threads
/// without external locking.
pub trait ThreadPool: Send + Sync {
    /// Parallelism the pool can currently offer. Always at least 1.
    fn thread_count(&self) -> usize;

    /// Thread count a caller should plan for, given its request
    /// (`0` means "as many as available").
    ///
    /// Returns 1 when the calling thread is itself a worker of this
    /// pool: a task already running inside the pool must not fan out on
    /// the same bounded worker set again. Otherwise returns
    /// `min(requested, thread_count())`, or `thread_count()` for a
    /// request of 0.
    fn negotiate(&self, requested: usize) -> usize;

    /// Schedule `task` for execution, fire-and-forget. The task runs
    /// exactly once; `submit` never blocks on its completion.
    fn submit(&self, task: Task);
}

/// Closure sugar over [`ThreadPool::submit`], usable through
/// `dyn ThreadPool`.
pub trait ThreadPoolExt {
    /// Submit a closure as a task.
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static;
}

impl<P: ThreadPool + ?Sized> ThreadPoolExt for P {
    fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::new(f));
    }
}
