//! Context-scoped fetch: race a computation against a [`CancelSignal`].
//!
//! The computation is detached, not aborted, when the signal wins. Work that
//! must actually stop early should observe the same signal itself, e.g. via
//! [`read_text`] which checks between single-byte reads.

use std::future::Future;
use std::io::{self, Read};

use crate::io::{is_cancelled, CancellableReader};
use crate::lifecycle::CancelSignal;

/// Outcome of a cancellable fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Done(T),
    Cancelled,
}

impl<T> Fetched<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Fetched::Cancelled)
    }

    pub fn done(self) -> Option<T> {
        match self {
            Fetched::Done(v) => Some(v),
            Fetched::Cancelled => None,
        }
    }
}

/// Run `work` in the background and return whichever finishes first: the
/// work or the signal.
///
/// `on_cancel` runs exactly once, only when the signal wins, so the caller can
/// release resources tied to the abandoned work.
pub async fn fetch<T, W, C>(cancel: &CancelSignal, work: W, on_cancel: C) -> Fetched<T>
where
    W: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    C: FnOnce(),
{
    if cancel.is_fired() {
        on_cancel();
        return Fetched::Cancelled;
    }

    let handle = tokio::spawn(work);
    race(cancel, handle, on_cancel).await
}

/// Like [`fetch`], with the work on the blocking thread pool.
pub async fn fetch_blocking<T, F, C>(cancel: &CancelSignal, work: F, on_cancel: C) -> Fetched<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
    C: FnOnce(),
{
    if cancel.is_fired() {
        on_cancel();
        return Fetched::Cancelled;
    }

    let handle = tokio::task::spawn_blocking(work);
    race(cancel, handle, on_cancel).await
}

async fn race<T, C>(
    cancel: &CancelSignal,
    handle: tokio::task::JoinHandle<T>,
    on_cancel: C,
) -> Fetched<T>
where
    C: FnOnce(),
{
    tokio::select! {
        res = handle => match res {
            Ok(value) => Fetched::Done(value),
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                // Aborted by runtime shutdown.
                Err(_) => {
                    on_cancel();
                    Fetched::Cancelled
                }
            },
        },
        _ = cancel.fired() => {
            on_cancel();
            Fetched::Cancelled
        }
    }
}

/// Text accumulated by [`read_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulated {
    pub text: String,
    /// True when the signal stopped the loop before end of input.
    pub interrupted: bool,
}

/// Accumulate `source` one byte at a time, checking `cancel` before each read.
///
/// Blocking; run it through [`fetch_blocking`] to race it against the signal.
/// Invalid UTF-8 is replaced lossily.
pub fn read_text<R: Read>(source: R, cancel: &CancelSignal) -> io::Result<Accumulated> {
    let mut reader = CancellableReader::new(source, cancel.clone());
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    let interrupted = loop {
        match reader.read(&mut byte) {
            Ok(0) => break false,
            Ok(_) => bytes.push(byte[0]),
            Err(e) if is_cancelled(&e) => break true,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };

    Ok(Accumulated {
        text: String::from_utf8_lossy(&bytes).into_owned(),
        interrupted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_work_finishes_first() {
        let cancel = CancelSignal::new();
        let hits = AtomicUsize::new(0);

        let res = fetch(&cancel, async { 7 }, || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert_eq!(res, Fetched::Done(7));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_signal_wins_and_notifies() {
        let cancel = CancelSignal::new();
        let hits = AtomicUsize::new(0);
        crate::lifecycle::signals::fire_after(cancel.clone(), Duration::from_millis(20));

        let res = fetch(&cancel, std::future::pending::<u8>(), || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert!(res.is_cancelled());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_fired_skips_work() {
        let cancel = CancelSignal::new();
        cancel.fire();
        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();

        let res = fetch(
            &cancel,
            async move {
                s.fetch_add(1, Ordering::SeqCst);
            },
            || {},
        )
        .await;

        assert!(res.is_cancelled());
        tokio::task::yield_now().await;
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_abandoned_work_keeps_running() {
        let cancel = CancelSignal::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let f = finished.clone();
        crate::lifecycle::signals::fire_after(cancel.clone(), Duration::from_millis(10));

        let res = fetch(
            &cancel,
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                f.fetch_add(1, Ordering::SeqCst);
            },
            || {},
        )
        .await;
        assert!(res.is_cancelled());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_blocking_done() {
        let cancel = CancelSignal::new();
        let res = fetch_blocking(&cancel, || "slow".len(), || {}).await;
        assert_eq!(res.done(), Some(4));
    }

    #[test]
    fn test_read_text_to_end() {
        let acc = read_text(Cursor::new("héllo"), &CancelSignal::new()).unwrap();
        assert_eq!(acc.text, "héllo");
        assert!(!acc.interrupted);
    }

    /// Fires the signal after handing out `after` bytes.
    struct FiringSource {
        data: Vec<u8>,
        pos: usize,
        after: usize,
        cancel: CancelSignal,
    }

    impl Read for FiringSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.after {
                self.cancel.fire();
            }
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_read_text_stops_between_bytes() {
        let cancel = CancelSignal::new();
        let source = FiringSource {
            data: b"abcdef".to_vec(),
            pos: 0,
            after: 3,
            cancel: cancel.clone(),
        };

        let acc = read_text(source, &cancel).unwrap();
        // The read that fired still completes; the next one is refused.
        assert_eq!(acc.text, "abcd");
        assert!(acc.interrupted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_read_text_through_fetch_blocking() {
        let cancel = CancelSignal::new();
        let inner = cancel.clone();
        let res = fetch_blocking(
            &cancel,
            move || read_text(Cursor::new(b"payload".to_vec()), &inner),
            || {},
        )
        .await;

        let acc = res.done().unwrap().unwrap();
        assert_eq!(acc.text, "payload");
    }
}
