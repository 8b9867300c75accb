//! Executor abstraction and the default multi-threaded executor.
//!
//! A pool variant that runs work off-thread delegates to an [`Executor`]:
//! something that owns worker threads, can schedule a task onto them, and
//! can answer whether the calling thread is one of its own workers. The
//! crate ships [`CpuPool`] as the default implementation; callers with
//! their own executor implement the trait instead.

pub mod cpu_pool;
pub mod task;
pub mod worker;

pub use cpu_pool::CpuPool;
pub use task::{Task, TaskId};
pub use worker::WorkerId;

/// An externally owned multi-threaded executor.
///
/// `current_worker` is the identity query behind the reentrancy guard in
/// [`crate::pool::ThreadPool::negotiate`]: only the executor knows which
/// threads are its workers. It must return `Some` exactly when called
/// from one of this executor's own worker threads.
pub trait Executor: Send + Sync {
    /// Number of worker threads.
    fn worker_count(&self) -> usize;

    /// The calling thread's worker id, if it is one of this executor's
    /// workers.
    fn current_worker(&self) -> Option<WorkerId>;

    /// Hand a task to the executor. Each scheduled task runs exactly
    /// once, eventually; no ordering across tasks is promised.
    fn schedule(&self, task: Task);
}
