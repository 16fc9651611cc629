//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, probes, signals produce:
//!     → logging.rs (structured log events, tagged with check_id)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
