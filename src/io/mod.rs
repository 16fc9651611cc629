//! Blocking I/O helpers.
//!
//! # Design Decisions
//! - Adapters refuse to start new reads after cancellation
//! - They never interrupt a read already running in the wrapped source

pub mod cancellable;

pub use cancellable::{is_cancelled, CancellableReader, Cancelled};
