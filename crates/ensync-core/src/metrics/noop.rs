use crate::error::MetricsError;
use crate::metrics::sink::MetricsSink;

/// No-op metrics sink that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsSink for NoOpMetrics {
    #[inline(always)]
    fn record_next_number(&self, _: i64) {}

    #[inline(always)]
    fn record_assigned(&self, _: u64) {}

    #[inline(always)]
    fn record_run_duration(&self, _: f64) {}

    #[inline(always)]
    fn record_last_success(&self, _: i64) {}

    #[inline(always)]
    fn push(&self) -> Result<(), MetricsError> {
        Ok(())
    }
}
