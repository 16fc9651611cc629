//! probe-dispatch: check many HTTP targets concurrently.
//!
//! ```text
//!   targets ──▶ Dispatcher ──spawn──▶ HttpProbe (one task per URL)
//!                   ▲                     │
//!                   └──── mpsc ◀──────────┘
//!                   ▲
//!   deadline / Ctrl-C ──▶ CancelSignal
//! ```
//!
//! Exit status: 0 all targets up, 1 some target not up, 2 cancelled before
//! every target reported.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use probe_dispatch::cli::{self, Cli};
use probe_dispatch::http::HttpProbe;
use probe_dispatch::lifecycle::signals;
use probe_dispatch::observability::{logging, metrics};
use probe_dispatch::{CancelSignal, Dispatcher};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let config = cli::resolve_config(&args)?;

    logging::init_tracing(&config.observability);
    tracing::info!(
        targets = config.targets.len(),
        deadline_ms = ?config.run.deadline_ms,
        cancel_in_flight = config.probe.cancel_in_flight,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated above.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let targets = cli::distinct_targets(&config.targets)?;

    let cancel = CancelSignal::new();
    if let Some(ms) = config.run.deadline_ms {
        signals::fire_after(cancel.clone(), Duration::from_millis(ms));
    }
    if config.run.cancel_on_ctrl_c {
        signals::fire_on_ctrl_c(cancel.clone());
    }

    let mut probe = HttpProbe::new(&config.probe)?;
    if config.probe.cancel_in_flight {
        probe = probe.with_cancel(cancel.clone());
    }

    let dispatcher = Dispatcher::new(config.run.label.clone());
    let report = dispatcher
        .check(targets.iter().cloned(), Arc::new(probe), &cancel)
        .await;
    metrics::record_outcomes(dispatcher.label(), report.iter().map(|(_, o)| o.label()));

    print!("{}", cli::render_report(&targets, &report, args.json)?);
    Ok(ExitCode::from(cli::exit_code(&report)))
}
