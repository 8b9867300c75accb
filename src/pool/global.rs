//! Process-wide default pool.
//!
//! One [`WrappedPool`] over one [`CpuPool`], built on first demand and
//! never torn down: the registry lives in a `static`, and Rust does not
//! drop statics at process exit, so the default pool stays valid through
//! late-running destructors and detached threads.

use super::wrapped::WrappedPool;
use super::ThreadPool;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::CpuPool;
use parking_lot::Mutex;
use std::sync::Arc;

struct Registry {
    pool: Option<Arc<WrappedPool>>,
    staged: Option<Config>,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    pool: None,
    staged: None,
});

/// The process-wide default pool, built on first call.
///
/// Safe under concurrent first use: however many threads race here,
/// exactly one executor is constructed and all callers observe it. The
/// executor is sized by the staged [`configure_global`] config, or by
/// the hardware concurrency detected at construction time. Callers go
/// through [`super::get_active_pool`] in the common case, which caches
/// the resolution per thread.
pub fn global_pool() -> Arc<dyn ThreadPool> {
    let mut registry = REGISTRY.lock();
    if let Some(pool) = &registry.pool {
        return pool.clone();
    }

    let config = registry.staged.take().unwrap_or_default();
    let executor = CpuPool::new(&config).expect("failed to spawn the process-wide worker pool");
    let pool = Arc::new(WrappedPool::new(Arc::new(executor)));
    registry.pool = Some(pool.clone());
    pool
}

/// Stage the configuration the global pool will be built with.
///
/// Must run before anything triggers [`global_pool`]; once the pool
/// exists its executor is fixed for the process lifetime and this
/// returns [`Error::AlreadyInitialized`].
pub fn configure_global(config: Config) -> Result<()> {
    config.validate()?;

    let mut registry = REGISTRY.lock();
    if registry.pool.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    registry.staged = Some(config);
    Ok(())
}
