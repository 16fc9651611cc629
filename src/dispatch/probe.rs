//! The probe capability consumed by the dispatcher.
//!
//! # Contract
//! - Called concurrently from many tasks, each with a different target
//! - Failures are reported through `Outcome`, never by returning an error
//! - A probe that panics loses its result (the dispatcher reports incomplete)

use std::future::Future;
use std::marker::PhantomData;

/// Produces an outcome for a target.
pub trait Probe<T>: Send + Sync + 'static {
    /// Verdict for one target. A plain `bool` is enough for most probes.
    type Outcome: Send + 'static;

    fn probe(&self, target: T) -> impl Future<Output = Self::Outcome> + Send;
}

/// Probe backed by an async closure. See [`probe_fn`].
pub struct ProbeFn<F, T> {
    f: F,
    _target: PhantomData<fn(T)>,
}

/// Wrap an async closure `Fn(T) -> impl Future<Output = O>` as a [`Probe`].
pub fn probe_fn<F, T, Fut>(f: F) -> ProbeFn<F, T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: Send + 'static,
{
    ProbeFn { f, _target: PhantomData }
}

impl<F, T, Fut> Probe<T> for ProbeFn<F, T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: Send + 'static,
    T: 'static,
{
    type Outcome = Fut::Output;

    fn probe(&self, target: T) -> impl Future<Output = Self::Outcome> + Send {
        (self.f)(target)
    }
}

/// Probe backed by a blocking closure. See [`blocking_probe_fn`].
pub struct BlockingProbeFn<F, T> {
    f: std::sync::Arc<F>,
    _target: PhantomData<fn(T)>,
}

/// Wrap a blocking closure `Fn(T) -> O` as a [`Probe`].
///
/// Each call runs on the blocking thread pool so a slow synchronous probe
/// never occupies an async worker thread.
pub fn blocking_probe_fn<F, T, O>(f: F) -> BlockingProbeFn<F, T>
where
    F: Fn(T) -> O + Send + Sync + 'static,
    T: Send + 'static,
    O: Send + 'static,
{
    BlockingProbeFn { f: std::sync::Arc::new(f), _target: PhantomData }
}

impl<F, T, O> Probe<T> for BlockingProbeFn<F, T>
where
    F: Fn(T) -> O + Send + Sync + 'static,
    T: Send + 'static,
    O: Send + 'static,
{
    type Outcome = O;

    fn probe(&self, target: T) -> impl Future<Output = O> + Send {
        let f = self.f.clone();
        async move {
            match tokio::task::spawn_blocking(move || f(target)).await {
                Ok(outcome) => outcome,
                // Re-raise so the dispatcher's task sees the same panic.
                Err(e) => match e.try_into_panic() {
                    Ok(payload) => std::panic::resume_unwind(payload),
                    Err(e) => panic!("blocking probe aborted: {}", e),
                },
            }
        }
    }
}
