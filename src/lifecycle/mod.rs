//! Cancellation lifecycle.
//!
//! # Data Flow
//! ```text
//! Trigger (signals.rs):
//!     deadline timer / Ctrl-C
//!     → CancelSignal::fire()
//!
//! Observers (cancel.rs):
//!     Dispatcher collection loop  ─┐
//!     Context-scoped fetch        ─┼─ CancelSignal::fired() / is_fired()
//!     CancellableReader           ─┘
//! ```
//!
//! # Design Decisions
//! - Fires at most once, never resets
//! - Broadcast, not a message: every observer sees the same firing
//! - Cancelling stops waiting; stopping the work itself is up to the work

pub mod cancel;
pub mod signals;

pub use cancel::CancelSignal;
