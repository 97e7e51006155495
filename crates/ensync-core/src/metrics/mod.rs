//! Metrics reporting abstraction.
//!
//! Sinks implement [`MetricsSink`] and are injected by the binary. When no
//! sink is configured the job runs with [`NoOpMetrics`], so reporting never
//! affects allocation logic.
mod noop;
pub use noop::NoOpMetrics;

mod sink;
pub use sink::{MetricsHandle, MetricsSink};

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
