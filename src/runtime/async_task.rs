//! Async task and stream abstractions for fetch orchestration.
//!
//! Channel-based design: every dispatched fetch reports through its own
//! oneshot, and ordered output is replayed through an unbounded mpsc.

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

/// Type alias for a pinned, sendable future that returns a Result with a Vec.
type BoxedVecFuture<T, E> = Pin<Box<dyn Future<Output = Result<Vec<T>, E>> + Send>>;

/// Type alias for a factory function that produces a `BoxedVecFuture`.
type FutureFactory<T, E> = Box<dyn FnOnce() -> BoxedVecFuture<T, E> + Send>;

// ============================================================================
// AsyncTask - Single-result async operation
// ============================================================================

/// A handle to a spawned task that produces a single result.
///
/// The task starts running as soon as it is spawned; awaiting the handle only
/// observes its settlement. If the task panics the sender is dropped and the
/// handle resolves to `Err(RecvError)`.
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    /// Wrap the receiving half of a settlement channel.
    #[inline]
    #[must_use]
    pub fn new(rx: oneshot::Receiver<T>) -> Self {
        Self { rx }
    }

    /// Put `future` in flight on the current tokio runtime.
    ///
    /// Dispatch loops call this once per entry before awaiting any handle,
    /// so all entries run concurrently.
    #[inline]
    pub fn spawn_async<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn(async move {
            let _ = tx.send(future.await);
        });
        Self::new(rx)
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}

// ============================================================================
// AsyncStream - Multi-result streaming operation
// ============================================================================

/// Receiving end of an ordered result stream.
///
/// Items arrive in the order the producer sent them; the stream ends once
/// the producer finishes and drops its sender. Fed by [`OrderedEmitter`],
/// which sends nothing until the whole batch has settled.
pub struct AsyncStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> AsyncStream<T> {
    /// Wrap the receiver a producer task sends results into.
    #[inline]
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self { rx }
    }
}

impl<T> Stream for AsyncStream<T> {
    type Item = T;

    #[inline]
    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

// ============================================================================
// OrderedEmitter - Batch-to-stream conversion behind a barrier
// ============================================================================

/// Converts a future producing a whole batch into a stream of its items.
///
/// Nothing is sent until the batch future resolves, so consumers never see a
/// partial batch: either every item in order, or a single error.
pub struct OrderedEmitter<T, E> {
    future_factory: FutureFactory<T, E>,
}

impl<T, E> OrderedEmitter<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a new emitter from a factory producing the batch future.
    #[must_use]
    pub fn new(future_factory: FutureFactory<T, E>) -> Self {
        Self { future_factory }
    }

    /// Emit the batch through a stream.
    pub fn emit(self) -> AsyncStream<Result<T, E>> {
        self.emit_with(|_| {})
    }

    /// Emit the batch through a stream, calling `on_error` before the error
    /// is forwarded.
    pub fn emit_with<G>(self, on_error: G) -> AsyncStream<Result<T, E>>
    where
        G: Fn(&E) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let future = (self.future_factory)();
            match future.await {
                Ok(items) => {
                    for item in items {
                        if tx.send(Ok(item)).is_err() {
                            break; // Receiver dropped
                        }
                    }
                }
                Err(e) => {
                    on_error(&e);
                    let _ = tx.send(Err(e));
                }
            }
        });

        AsyncStream::new(rx)
    }
}
