//! Telemetry for the default executor.
//!
//! Counters and a latency histogram recorded by the worker loop. Only
//! compiled with the `telemetry` feature.

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
