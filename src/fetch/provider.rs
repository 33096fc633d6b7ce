//! Resource provider capability and adapters.

use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::oneshot;

use crate::fetch::error::ProviderError;
use crate::fetch::types::ResourceId;

/// Outcome of a single fetch.
pub type ProviderResult = Result<String, ProviderError>;

/// Injected capability resolving a [`ResourceId`] to an eventual result.
///
/// `fetch` must start the request without waiting on anything else; the
/// returned future only observes completion.
pub trait ResourceProvider: Send + Sync + 'static {
    fn fetch(&self, id: ResourceId) -> BoxFuture<'static, ProviderResult>;
}

/// Provider backed by an async closure.
pub struct FnProvider<F> {
    f: F,
}

impl<F, Fut> FnProvider<F>
where
    F: Fn(ResourceId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProviderResult> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> ResourceProvider for FnProvider<F>
where
    F: Fn(ResourceId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProviderResult> + Send + 'static,
{
    fn fetch(&self, id: ResourceId) -> BoxFuture<'static, ProviderResult> {
        Box::pin((self.f)(id))
    }
}

/// One-shot completion handed to callback-style providers.
///
/// `complete` consumes the handle, so a provider can fire it at most once.
/// Dropping it unfired settles the fetch as [`ProviderError::Aborted`].
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<ProviderResult>,
}

impl Completion {
    /// Create a completion and the future that observes it.
    pub fn channel() -> (Self, BoxFuture<'static, ProviderResult>) {
        let (tx, rx) = oneshot::channel();
        let settled = async move { rx.await.unwrap_or(Err(ProviderError::Aborted)) };
        (Self { tx }, Box::pin(settled))
    }

    pub fn complete(self, result: ProviderResult) {
        // Receiver gone means nobody is waiting any more
        let _ = self.tx.send(result);
    }
}

/// Provider backed by a callback that receives a [`Completion`].
pub struct CallbackProvider<F> {
    request: F,
}

impl<F> CallbackProvider<F>
where
    F: Fn(ResourceId, Completion) + Send + Sync + 'static,
{
    pub fn new(request: F) -> Self {
        Self { request }
    }
}

impl<F> ResourceProvider for CallbackProvider<F>
where
    F: Fn(ResourceId, Completion) + Send + Sync + 'static,
{
    fn fetch(&self, id: ResourceId) -> BoxFuture<'static, ProviderResult> {
        let (done, settled) = Completion::channel();
        (self.request)(id, done);
        settled
    }
}
