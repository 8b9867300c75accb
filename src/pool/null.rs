//! Pseudo pool for single-threaded execution.

use super::ThreadPool;
use crate::executor::Task;

/// Strictly sequential, zero-threading pool.
///
/// `submit` runs the task on the calling thread before returning. Used
/// for deterministic single-threaded execution modes and recursive
/// contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPool;

impl ThreadPool for NullPool {
    fn thread_count(&self) -> usize {
        1
    }

    fn negotiate(&self, _requested: usize) -> usize {
        1
    }

    fn submit(&self, task: Task) {
        task.execute();
    }
}
