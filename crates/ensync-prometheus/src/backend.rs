use std::collections::HashMap;
use std::sync::Arc;

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, proto::MetricFamily,
};

use ensync_core::{MetricsError, MetricsSink};

/// Prometheus pushgateway sink.
///
/// Metric names match what the job has always exported, so existing
/// dashboards and alerts keep working.
#[derive(Clone)]
pub struct PushgatewayMetrics {
    gateway: String,
    job: String,
    next_number: IntGauge,
    assigned_total: IntCounter,
    last_success: IntGauge,
    run_duration: Histogram,
    registry: Arc<Registry>,
}

impl PushgatewayMetrics {
    /// Create a pushgateway sink registered on a custom registry.
    pub fn new_with_registry(
        gateway: impl Into<String>,
        job: impl Into<String>,
        registry: Arc<Registry>,
    ) -> Result<Self, prometheus::Error> {
        let next_number = IntGauge::with_opts(Opts::new(
            "next_employeeNumber",
            "Next available value for the employeeNumber LDAP attribute",
        ))?;
        registry.register(Box::new(next_number.clone()))?;

        let assigned_total = IntCounter::with_opts(Opts::new(
            "configured_employeeNumber_total",
            "Number of users that have had the employeeNumber LDAP attribute configured",
        ))?;
        registry.register(Box::new(assigned_total.clone()))?;

        let last_success = IntGauge::with_opts(Opts::new(
            "job_last_success_unixtime",
            "Last time the job completed successfully",
        ))?;
        registry.register(Box::new(last_success.clone()))?;

        let run_duration = Histogram::with_opts(HistogramOpts::new(
            "process_duration_seconds",
            "Duration in seconds of the job process",
        ))?;
        registry.register(Box::new(run_duration.clone()))?;

        Ok(Self {
            gateway: gateway.into(),
            job: job.into(),
            next_number,
            assigned_total,
            last_success,
            run_duration,
            registry,
        })
    }

    /// Create a pushgateway sink with its own registry.
    pub fn new(
        gateway: impl Into<String>,
        job: impl Into<String>,
    ) -> Result<Self, prometheus::Error> {
        Self::new_with_registry(gateway, job, Arc::new(Registry::new()))
    }

    /// Gather all registered metric families.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

impl MetricsSink for PushgatewayMetrics {
    fn record_next_number(&self, next: i64) {
        self.next_number.set(next);
    }

    fn record_assigned(&self, count: u64) {
        self.assigned_total.inc_by(count);
    }

    fn record_run_duration(&self, seconds: f64) {
        self.run_duration.observe(seconds);
    }

    fn record_last_success(&self, unix_seconds: i64) {
        self.last_success.set(unix_seconds);
    }

    fn push(&self) -> Result<(), MetricsError> {
        prometheus::push_metrics(
            &self.job,
            HashMap::new(),
            &self.gateway,
            self.registry.gather(),
            None,
        )
        .map_err(|e| MetricsError::Push(e.to_string()))
    }
}
