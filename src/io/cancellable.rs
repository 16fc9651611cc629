//! Cancellation-aware reader adapter.

use std::io::{self, Read};

use crate::lifecycle::CancelSignal;

/// Marker error carried inside the `io::Error` returned by a cancelled read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("read cancelled")]
pub struct Cancelled;

impl From<Cancelled> for io::Error {
    fn from(c: Cancelled) -> Self {
        io::Error::new(io::ErrorKind::Other, c)
    }
}

/// Return true if `err` was produced by a [`CancellableReader`] after cancellation.
pub fn is_cancelled(err: &io::Error) -> bool {
    err.get_ref()
        .is_some_and(|inner| inner.downcast_ref::<Cancelled>().is_some())
}

/// Wraps a blocking reader so that no new read starts after the signal fires.
///
/// A read already in progress inside the wrapped source is not interrupted;
/// that requires the source itself to observe the signal.
///
/// The cancelled status uses `ErrorKind::Other`, not `Interrupted`: the
/// `std` helpers (`read_to_end`, `read_exact`) silently retry `Interrupted`.
#[derive(Debug)]
pub struct CancellableReader<R> {
    inner: R,
    cancel: CancelSignal,
}

impl<R: Read> CancellableReader<R> {
    pub fn new(inner: R, cancel: CancelSignal) -> Self {
        Self { inner, cancel }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CancellableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.is_fired() {
            return Err(Cancelled.into());
        }
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A source that fails the test if it is ever read.
    struct UntouchableSource;

    impl Read for UntouchableSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("wrapped source must not be read after cancellation");
        }
    }

    #[test]
    fn test_fired_signal_skips_source() {
        let signal = CancelSignal::new();
        signal.fire();
        let mut reader = CancellableReader::new(UntouchableSource, signal);

        let mut buf = [0u8; 16];
        let err = reader.read(&mut buf).unwrap_err();
        assert!(is_cancelled(&err));
        assert_eq!(buf, [0u8; 16]);

        // Stays cancelled.
        let err = reader.read(&mut buf).unwrap_err();
        assert!(is_cancelled(&err));
    }

    #[test]
    fn test_delegates_until_fired() {
        let signal = CancelSignal::new();
        let mut reader = CancellableReader::new(Cursor::new(b"hello world".to_vec()), signal.clone());

        let mut buf = [0u8; 5];
        assert_eq!(reader.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");

        signal.fire();
        assert!(is_cancelled(&reader.read(&mut buf).unwrap_err()));
        assert_eq!(reader.get_ref().position(), 5);
    }

    #[test]
    fn test_eof_passes_through() {
        let mut reader = CancellableReader::new(Cursor::new(Vec::new()), CancelSignal::new());
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_to_end_stops_on_cancel() {
        let signal = CancelSignal::new();
        signal.fire();
        let mut reader = CancellableReader::new(Cursor::new(b"data".to_vec()), signal);

        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert!(is_cancelled(&err));
        assert!(out.is_empty());
    }

    #[test]
    fn test_other_errors_are_not_cancellation() {
        let err = io::Error::new(io::ErrorKind::Other, "boom");
        assert!(!is_cancelled(&err));
        assert!(!is_cancelled(&io::Error::from(io::ErrorKind::UnexpectedEof)));
    }
}
