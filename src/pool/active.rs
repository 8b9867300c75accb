//! Thread-local active pool for current execution.

use super::global::global_pool;
use super::ThreadPool;
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static ACTIVE_POOL: RefCell<Option<Arc<dyn ThreadPool>>> = const { RefCell::new(None) };
}

/// The pool this thread currently resolves to.
///
/// An unset binding resolves to [`global_pool`] (which may trigger the
/// one-time executor construction) and is cached for the thread's
/// lifetime, so repeated calls return the identical pool until someone
/// overrides it. Since the binding is thread-local this needs no
/// cross-thread synchronization.
pub fn get_active_pool() -> Arc<dyn ThreadPool> {
    ACTIVE_POOL.with(|slot| slot.borrow_mut().get_or_insert_with(global_pool).clone())
}

/// Exchange this thread's active-pool binding.
///
/// Returns whatever was bound before; `None` installs the unset state,
/// so `set_active_pool(previous)` restores an earlier exchange exactly.
/// Only the calling thread's binding is affected.
pub fn set_active_pool(pool: Option<Arc<dyn ThreadPool>>) -> Option<Arc<dyn ThreadPool>> {
    ACTIVE_POOL.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), pool))
}

/// Run `f` with `pool` installed as this thread's active pool.
///
/// The previous binding is restored when `f` returns, and also when it
/// unwinds.
pub fn with_pool<R>(pool: Arc<dyn ThreadPool>, f: impl FnOnce() -> R) -> R {
    let _restore = Restore(set_active_pool(Some(pool)));
    f()
}

struct Restore(Option<Arc<dyn ThreadPool>>);

impl Drop for Restore {
    fn drop(&mut self) {
        set_active_pool(self.0.take());
    }
}
