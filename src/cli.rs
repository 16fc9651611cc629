//! Command-line surface of the `probe-dispatch` binary.
//!
//! # Responsibilities
//! - Parse arguments and merge them over the config file
//! - Render a report as text or JSON
//! - Map a report to the process exit status

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use url::Url;

use crate::config::{load_config, validate_config, ConfigError, DispatchConfig};
use crate::dispatch::CheckReport;
use crate::http::{parse_target, HttpOutcome, TargetError};

/// Every target reported and every target is up.
pub const EXIT_ALL_UP: u8 = 0;
/// Every target reported, at least one is not up.
pub const EXIT_SOME_DOWN: u8 = 1;
/// Cancelled before every target reported.
pub const EXIT_CANCELLED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "probe-dispatch", version)]
#[command(about = "Probe HTTP targets concurrently, stopping on deadline or Ctrl-C", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop waiting after this many milliseconds
    #[arg(short, long)]
    pub deadline_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Let in-flight probes run on after cancellation instead of reporting them cancelled
    #[arg(long)]
    pub detach_in_flight: bool,

    /// Target URLs (added to those in the config file)
    pub targets: Vec<String>,
}

/// Load the config file (if any), apply command-line overrides, validate.
pub fn resolve_config(cli: &Cli) -> Result<DispatchConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DispatchConfig::default(),
    };

    config.targets.extend(cli.targets.iter().cloned());
    if cli.deadline_ms.is_some() {
        config.run.deadline_ms = cli.deadline_ms;
    }
    if cli.detach_in_flight {
        config.probe.cancel_in_flight = false;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse targets, keeping the first occurrence of each URL.
pub fn distinct_targets(raw: &[String]) -> Result<Vec<Url>, TargetError> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(raw.len());
    for t in raw {
        let url = parse_target(t)?;
        if seen.insert(url.clone()) {
            targets.push(url);
        }
    }
    Ok(targets)
}

/// Targets without an outcome in `report`, sorted.
pub fn pending<'a>(targets: &'a [Url], report: &CheckReport<Url, HttpOutcome>) -> Vec<&'a Url> {
    let mut pending: Vec<&Url> = targets.iter().filter(|t| !report.contains(t)).collect();
    pending.sort();
    pending.dedup();
    pending
}

/// Process exit status for a finished check.
pub fn exit_code(report: &CheckReport<Url, HttpOutcome>) -> u8 {
    if !report.is_complete() {
        EXIT_CANCELLED
    } else if report.count_where(|o| !o.is_up()) > 0 {
        EXIT_SOME_DOWN
    } else {
        EXIT_ALL_UP
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    complete: bool,
    outcomes: &'a HashMap<Url, HttpOutcome>,
    pending: Vec<&'a Url>,
}

/// Render `report` for stdout. `targets` must be distinct.
pub fn render_report(
    targets: &[Url],
    report: &CheckReport<Url, HttpOutcome>,
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        let out = JsonReport {
            complete: report.is_complete(),
            outcomes: report.outcomes(),
            pending: pending(targets, report),
        };
        return serde_json::to_string_pretty(&out);
    }

    let mut out = String::new();
    let mut rows: Vec<(&Url, &HttpOutcome)> = report.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for (url, outcome) in rows {
        let _ = writeln!(out, "{:<12} {}  {}", outcome.label(), url, outcome);
    }
    for url in pending(targets, report) {
        let _ = writeln!(out, "{:<12} {}", "pending", url);
    }
    if !report.is_complete() {
        let _ = writeln!(
            out,
            "(cancelled: {} of {} targets reported)",
            report.len(),
            targets.len()
        );
    }
    Ok(out)
}
