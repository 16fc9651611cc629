//! Probe dispatching subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher::check(targets, probe, cancel)
//!     → one tokio task per target
//!         → probe.rs (Probe::probe, exactly once)
//!         → ProbeResult posted on an unbounded mpsc channel
//!     → single collector loop (select! over channel and CancelSignal)
//!         → report.rs (CheckReport, single writer)
//!     → CheckReport { outcomes, complete }
//!
//! fetch.rs:
//!     work future  ─┐
//!                   ├─ select! → Done(value) | Cancelled (+ on_cancel)
//!     CancelSignal ─┘
//! ```
//!
//! # Design Decisions
//! - No lock on the report: only the collector writes to it
//! - Unbounded fan-out, one task per target (no worker pool)
//! - Cancellation bounds the wait, not the probes' lifetime
//! - Completeness is decided by result count, not by which event came last
//! - Results arriving after the signal fired are not counted
//! - Duplicate targets are probed once

pub mod dispatcher;
pub mod fetch;
pub mod probe;
pub mod report;

pub use dispatcher::Dispatcher;
pub use fetch::{fetch, fetch_blocking, read_text, Accumulated, Fetched};
pub use probe::{blocking_probe_fn, probe_fn, BlockingProbeFn, Probe, ProbeFn};
pub use report::{CheckId, CheckReport, ProbeResult, ReportSummary};
