//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every field has a default so a minimal (even empty) file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Targets to probe. Merged with targets given on the command line.
    pub targets: Vec<String>,

    /// How a check run is bounded and cancelled.
    pub run: RunConfig,

    /// HTTP probe settings.
    pub probe: ProbeConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Run-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Label attached to dispatcher log events and metrics.
    pub label: String,

    /// Overall deadline after which the cancel signal fires. `None` waits for all probes.
    pub deadline_ms: Option<u64>,

    /// Fire the cancel signal on Ctrl-C.
    pub cancel_on_ctrl_c: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            label: "probe-dispatch".to_string(),
            deadline_ms: None,
            cancel_on_ctrl_c: true,
        }
    }
}

/// HTTP probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// User-Agent header sent with each probe.
    pub user_agent: String,

    /// Count 3xx responses as up instead of following them.
    pub redirects_are_up: bool,

    /// Make in-flight probes observe the run's cancel signal and report `cancelled`.
    pub cancel_in_flight: bool,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("probe-dispatch/", env!("CARGO_PKG_VERSION")).to_string(),
            redirects_are_up: false,
            cancel_in_flight: true,
            system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus scrape address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "probe_dispatch=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
