//! KERNEX - Kernel Execution Backend
//!
//! A pluggable execution backend for numeric-kernel libraries: kernels
//! submit fire-and-forget tasks to "the pool to use now" without knowing
//! whether they run inline on the calling thread or on a shared
//! multi-threaded executor.
//!
//! # Quick Start
//!
//! ```no_run
//! use kernex::prelude::*;
//!
//! // Resolve this thread's pool (first use builds the process-wide
//! // default executor, sized to the hardware)
//! let pool = kernex::get_active_pool();
//!
//! // Plan a fan-out, then submit the tiles
//! let lanes = pool.negotiate(0);
//! for lane in 0..lanes {
//!     pool.execute(move || {
//!         // numeric kernel tile for `lane`
//!         let _ = lane;
//!     });
//! }
//! ```
//!
//! # Features
//!
//! - **Capability trait**: one contract ([`ThreadPool`]) over inline and
//!   multi-threaded execution
//! - **Reentrancy guard**: `negotiate` returns 1 from inside a worker,
//!   so pooled tasks never fan out on their own bounded worker set
//! - **Lazy global pool**: built once under races, never torn down
//! - **Per-thread activation**: override the active pool for a scope
//!   with [`with_pool`], no cross-thread locking involved
//! - **Telemetry**: executor counters and latency percentiles (optional)

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod pool;
pub mod prelude;

#[cfg(feature = "telemetry")]
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{CpuPool, Executor, Task, TaskId, WorkerId};
pub use pool::{
    configure_global, get_active_pool, global_pool, set_active_pool, with_pool, NullPool,
    ThreadPool, ThreadPoolExt, WrappedPool,
};
