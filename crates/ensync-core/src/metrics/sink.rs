use std::sync::Arc;

use crate::error::MetricsError;

/// Reporting interface for one reconciliation run.
///
/// All record methods are infallible; only [`MetricsSink::push`] can fail,
/// and the caller treats that as a soft failure. The allocation work is
/// already committed to the directory before any of these are called.
pub trait MetricsSink: Send + Sync + 'static {
    /// Record the next available employee number after the run.
    fn record_next_number(&self, next: i64);

    /// Record how many entries received a number this run.
    fn record_assigned(&self, count: u64);

    /// Record the wall-clock duration of the run in seconds.
    fn record_run_duration(&self, seconds: f64);

    /// Record the unix timestamp of the last successful run.
    fn record_last_success(&self, unix_seconds: i64);

    /// Deliver the recorded values to the external collector.
    ///
    /// Blocking; callers on an async runtime should move this to a blocking
    /// thread.
    fn push(&self) -> Result<(), MetricsError>;
}

/// Shared handle to a metrics sink.
pub type MetricsHandle = Arc<dyn MetricsSink>;
