//! Convenience re-exports.

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{CpuPool, Executor, Task};
pub use crate::pool::{
    configure_global, get_active_pool, global_pool, set_active_pool, with_pool, NullPool,
    ThreadPool, ThreadPoolExt, WrappedPool,
};

#[cfg(feature = "telemetry")]
pub use crate::telemetry::{Metrics, MetricsSnapshot};
