//! Periodic reconciliation job: assign employeeNumber values to role members
//! that lack one, then push run metrics to a Prometheus pushgateway when one
//! is configured.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tracing::{debug, info, warn};

use ensync_core::{MetricsHandle, noop_metrics, run_allocation};
use ensync_ldap::LdapDirectory;
use ensync_prometheus::PushgatewayMetrics;

mod env;
mod logger;

use logger::LogFormat;

/// Job label reported to the pushgateway.
const PUSH_JOB: &str = "ensync-sidecar";

// The run is strictly sequential: one query or update in flight at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let format = match std::env::var("LOG_FORMAT") {
        Ok(v) => v.parse()?,
        Err(_) => LogFormat::default(),
    };
    logger::init(&level, format)?;

    let cfg = env::load_config().context("loading configuration")?;
    debug!(config = ?cfg, "configuration loaded");

    let metrics: MetricsHandle = match cfg.pushgateway.as_deref() {
        Some(gateway) => Arc::new(
            PushgatewayMetrics::new(gateway, PUSH_JOB)
                .context("setting up pushgateway metrics")?,
        ),
        None => noop_metrics(),
    };

    let started = Instant::now();
    let mut dir = LdapDirectory::connect(&cfg)
        .await
        .context("connecting to LDAP")?;

    let outcome = run_allocation(&mut dir, &cfg).await;

    // Release the connection whether or not allocation succeeded.
    if let Err(e) = dir.unbind().await {
        warn!(error = %e, "unbind failed");
    }
    let report = outcome.context("employee number allocation failed")?;

    info!(
        next = report.next_after,
        assigned = report.assigned,
        "employee numbers up to date"
    );

    metrics.record_next_number(report.next_after);
    metrics.record_assigned(report.assigned);
    metrics.record_run_duration(started.elapsed().as_secs_f64());
    metrics.record_last_success(unix_now());

    // The allocation work is committed; a push failure must not fail the run.
    let sink = Arc::clone(&metrics);
    match tokio::task::spawn_blocking(move || sink.push()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "metrics push failed"),
        Err(e) => warn!(error = %e, "metrics push task panicked"),
    }

    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
