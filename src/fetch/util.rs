//! Fetch dispatch utilities

use crate::runtime::AsyncTask;
use std::future::Future;
use std::time::Duration;

use crate::fetch::error::ProviderError;
use crate::fetch::provider::ProviderResult;

/// Dispatch one fetch as its own task.
///
/// The fetch is in flight as soon as this returns; awaiting the handle only
/// observes settlement, and a panicking fetch settles as a receive error.
#[inline]
pub fn spawn_task<T, F>(work: F) -> AsyncTask<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    AsyncTask::spawn_async(work)
}

/// Bound a fetch by `limit`, settling as [`ProviderError::TimedOut`] past it.
pub async fn with_timeout<F>(limit: Option<Duration>, fetch: F) -> ProviderResult
where
    F: Future<Output = ProviderResult>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .unwrap_or(Err(ProviderError::TimedOut(limit))),
        None => fetch.await,
    }
}
