//! Concurrent fan-out/fan-in of probes.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::dispatch::probe::Probe;
use crate::dispatch::report::{CheckId, CheckReport, ProbeResult};
use crate::lifecycle::CancelSignal;
use crate::observability::metrics;

/// Runs one probe task per target and collects the outcomes.
///
/// Holds no state across calls; each `check` owns its channel and report.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    label: String,
}

impl Dispatcher {
    /// Create a dispatcher. `label` tags its log events and metrics.
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Probe every target concurrently and collect the outcomes.
    ///
    /// Returns when every probe has reported (`complete`) or when `cancel`
    /// fires (partial report). Probes still running at that point are not
    /// aborted; they finish in the background and their results are dropped.
    ///
    /// Duplicate targets are probed once; completeness counts distinct targets.
    ///
    /// Only results received before the signal was observed are kept, so a
    /// cancelled check is never reported complete.
    pub async fn check<T, P>(
        &self,
        targets: impl IntoIterator<Item = T>,
        probe: Arc<P>,
        cancel: &CancelSignal,
    ) -> CheckReport<T, P::Outcome>
    where
        T: Eq + Hash + Clone + Debug + Send + 'static,
        P: Probe<T>,
    {
        let id = CheckId::new();
        let started_at = Instant::now();
        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult<T, P::Outcome>>();

        let mut seen = HashSet::new();
        for target in targets {
            if !seen.insert(target.clone()) {
                tracing::trace!(check_id = %id, target = ?target, "Skipping duplicate target");
                continue;
            }
            let tx = tx.clone();
            let probe = probe.clone();
            metrics::record_probe_started(&self.label);

            tokio::spawn(async move {
                let outcome = probe.probe(target.clone()).await;
                // Exactly one post per task. The collector may have stopped
                // waiting, in which case the result is discarded.
                let _ = tx.send(ProbeResult { target, outcome });
            });
        }
        // Only workers hold senders now; the channel closes when they are all gone.
        drop(tx);
        let expected = seen.len();

        tracing::debug!(check_id = %id, dispatcher = %self.label, targets = expected, "Check started");

        let mut outcomes = HashMap::with_capacity(expected);
        let mut status = "complete";

        let cancelled = cancel.fired();
        tokio::pin!(cancelled);

        while outcomes.len() < expected {
            tokio::select! {
                biased;

                _ = &mut cancelled => {
                    status = "cancelled";
                    break;
                }
                msg = rx.recv() => match msg {
                    // A result that arrives once the signal has fired was not
                    // observed before cancellation; probes sharing the signal
                    // may be answering to the firing itself.
                    Some(_) if cancel.is_fired() => {
                        status = "cancelled";
                        break;
                    }
                    Some(ProbeResult { target, outcome }) => {
                        tracing::trace!(check_id = %id, target = ?target, "Probe reported");
                        outcomes.insert(target, outcome);
                    }
                    None => {
                        tracing::error!(
                            check_id = %id,
                            dispatcher = %self.label,
                            missing = expected - outcomes.len(),
                            "Probe tasks exited without reporting (probe panicked?)"
                        );
                        status = "abandoned";
                        break;
                    }
                },
            }
        }

        let received = outcomes.len();
        let complete = received == expected;
        if complete {
            status = "complete";
        }
        metrics::record_check(&self.label, status, received, started_at);
        let report = CheckReport::new(outcomes, complete);

        if complete {
            tracing::info!(
                check_id = %id,
                dispatcher = %self.label,
                summary = %report.summary(),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Check complete"
            );
        } else {
            tracing::warn!(
                check_id = %id,
                dispatcher = %self.label,
                status,
                summary = %report.summary(),
                pending = expected - received,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Check ended before all probes reported"
            );
        }

        report
    }

    /// Blocking wrapper around [`check`](Self::check) for callers outside any runtime.
    ///
    /// Builds a private multi-threaded runtime. On return the runtime is shut
    /// down in the background, so probes still hanging do not block the caller.
    ///
    /// Fails with `ErrorKind::Other` when called from within a Tokio runtime,
    /// where blocking on a nested runtime would panic.
    pub fn check_blocking<T, P>(
        &self,
        targets: impl IntoIterator<Item = T>,
        probe: Arc<P>,
        cancel: &CancelSignal,
    ) -> std::io::Result<CheckReport<T, P::Outcome>>
    where
        T: Eq + Hash + Clone + Debug + Send + 'static,
        P: Probe<T>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "check_blocking called from within a Tokio runtime; await check() instead",
            ));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let report = runtime.block_on(self.check(targets, probe, cancel));
        runtime.shutdown_background();
        Ok(report)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new("default")
    }
}
