//! One-shot broadcast cancellation.

use std::sync::Arc;
use tokio::sync::watch;

/// A one-shot, broadcastable "stop waiting" notification.
///
/// Built on a watch channel so that the fired state is retained: waiters that
/// subscribe after the signal fired observe it immediately, and any number of
/// waiters (async or blocking) can observe the same firing.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    /// Shared sender. Holding it in every clone keeps the channel open, so
    /// `fired()` can never observe a closed channel.
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Create a signal that has not fired.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal.
    ///
    /// Returns `true` only for the call that actually fired it; later calls are no-ops.
    pub fn fire(&self) -> bool {
        let fired = self.tx.send_if_modified(|state| {
            if *state {
                false
            } else {
                *state = true;
                true
            }
        });
        if fired {
            tracing::debug!("Cancel signal fired");
        }
        fired
    }

    /// Non-blocking check, usable from any thread.
    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal fires. Resolves immediately if it already has.
    ///
    /// Safe to use as a branch of `tokio::select!`.
    pub async fn fired(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Number of waiters currently parked in `fired()`.
    pub fn waiter_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
