//! Prometheus pushgateway sink for the ensync job.
//!
//! This crate provides a [`PushgatewayMetrics`] implementation of
//! [`ensync_core::MetricsSink`]. The job is short-lived, so metrics are
//! pushed to a gateway once per run instead of being scraped.
//!
//! ## Metrics
//! - `next_employeeNumber` - Gauge, next available attribute value
//! - `configured_employeeNumber_total` - Counter, entries assigned so far
//! - `job_last_success_unixtime` - Gauge, last successful run
//! - `process_duration_seconds` - Histogram, run duration

mod backend;
pub use backend::PushgatewayMetrics;

pub use prometheus::Registry;
