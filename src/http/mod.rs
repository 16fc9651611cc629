//! HTTP probing.
//!
//! # Data Flow
//! ```text
//! target string → target.rs (parse_target → Url)
//!     → probe.rs (HttpProbe: GET → classify status → HttpOutcome)
//! ```
//!
//! # Design Decisions
//! - Transport failures are outcomes (`Unreachable`), never errors
//! - No per-request timeout; the run's cancel signal bounds waiting

pub mod probe;
pub mod target;

pub use probe::{HttpOutcome, HttpProbe};
pub use target::{parse_target, TargetError};
