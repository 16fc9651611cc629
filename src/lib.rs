//! Concurrent probe dispatcher with cooperative cancellation.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod io;
pub mod lifecycle;
pub mod observability;

pub use config::DispatchConfig;
pub use dispatch::{CheckReport, Dispatcher, Probe};
pub use lifecycle::CancelSignal;
