//! Metrics collection and exposition.
//!
//! # Metrics
//! - `probe_dispatch_probes_started_total` (counter): probe tasks spawned, by dispatcher
//! - `probe_dispatch_results_total` (counter): results collected, by dispatcher
//! - `probe_dispatch_checks_total` (counter): finished checks, by dispatcher and status
//!   (`complete`, `cancelled`, `abandoned`)
//! - `probe_dispatch_check_duration_seconds` (histogram): wall time of a check
//! - `probe_dispatch_outcomes_total` (counter): observed outcomes, by dispatcher and
//!   outcome label; recorded by callers that know how to label their outcomes
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter, serving scrapes on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe_started(dispatcher: &str) {
    ::metrics::counter!("probe_dispatch_probes_started_total", "dispatcher" => dispatcher.to_string())
        .increment(1);
}

pub fn record_check(dispatcher: &str, status: &'static str, received: usize, started_at: Instant) {
    ::metrics::counter!("probe_dispatch_results_total", "dispatcher" => dispatcher.to_string())
        .increment(received as u64);
    ::metrics::counter!(
        "probe_dispatch_checks_total",
        "dispatcher" => dispatcher.to_string(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!("probe_dispatch_check_duration_seconds", "dispatcher" => dispatcher.to_string())
        .record(started_at.elapsed().as_secs_f64());
}

/// Tally outcome labels, e.g. `{"up": 3, "down": 1}`.
pub fn count_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> BTreeMap<&'a str, u64> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Record per-outcome totals for a finished check.
pub fn record_outcomes<'a>(dispatcher: &str, labels: impl IntoIterator<Item = &'a str>) {
    for (outcome, n) in count_labels(labels) {
        ::metrics::counter!(
            "probe_dispatch_outcomes_total",
            "dispatcher" => dispatcher.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(n);
    }
}
