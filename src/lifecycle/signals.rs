//! External triggers for a [`CancelSignal`].
//!
//! # Responsibilities
//! - Fire the signal when a deadline elapses
//! - Fire the signal on Ctrl-C / SIGINT
//!
//! # Design Decisions
//! - Triggers are detached tasks; they exit as soon as the signal fires from any source
//! - A trigger never fires a signal twice (firing is idempotent anyway)

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::lifecycle::CancelSignal;

/// Fire `signal` once `after` has elapsed.
pub fn fire_after(signal: CancelSignal, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(after) => {
                if signal.fire() {
                    tracing::info!(deadline_ms = after.as_millis() as u64, "Deadline reached, cancelling");
                }
            }
            _ = signal.fired() => {}
        }
    })
}

/// Fire `signal` when the process receives Ctrl-C.
pub fn fire_on_ctrl_c(signal: CancelSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                match res {
                    Ok(()) => {
                        if signal.fire() {
                            tracing::info!("Interrupt received, cancelling");
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
                }
            }
            _ = signal.fired() => {}
        }
    })
}
