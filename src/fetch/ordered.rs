//! Ordered concurrent fetch orchestration.
//!
//! Every entry of a [`RequestBatch`] is dispatched as its own task before
//! anything is awaited. The orchestrator then waits on a single barrier for
//! all tasks to settle, and only afterwards hands the results to the sink in
//! request order. A failed fetch never short-circuits its siblings: failures
//! are collected and reported once the whole batch has settled, and nothing
//! is written to the sink.

use futures::future::{BoxFuture, join_all};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::fetch::config::FetchConfig;
use crate::fetch::error::{FetchError, FetchFailure, FetchResult, ProviderError};
use crate::fetch::provider::{ProviderResult, ResourceProvider};
use crate::fetch::sink::OutputSink;
use crate::fetch::types::{RequestBatch, ResourceId, ResultSequence};
use crate::fetch::util::{spawn_task, with_timeout};
use crate::runtime::{AsyncStream, AsyncTask, OrderedEmitter};

/// Lifecycle of one ordered fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    /// Nothing dispatched yet
    Idle,
    /// Every fetch is in flight
    AllDispatched,
    /// Every fetch has settled, successfully or not
    AllSettled,
    /// Results were delivered in order
    Drained,
    /// At least one fetch failed; nothing was delivered
    Failed,
}

impl FetchState {
    /// Whether `next` directly follows `self`.
    #[must_use]
    pub fn can_advance_to(self, next: FetchState) -> bool {
        matches!(
            (self, next),
            (FetchState::Idle, FetchState::AllDispatched)
                | (FetchState::AllDispatched, FetchState::AllSettled)
                | (FetchState::AllSettled, FetchState::Drained | FetchState::Failed)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, FetchState::Drained | FetchState::Failed)
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchState::Idle => "idle",
            FetchState::AllDispatched => "all_dispatched",
            FetchState::AllSettled => "all_settled",
            FetchState::Drained => "drained",
            FetchState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Completion report of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    /// Results written to the sink
    pub emitted: usize,
    /// Time from first dispatch to delivery
    pub elapsed: Duration,
    pub state: FetchState,
}

/// Tracks and logs state transitions of a single run.
struct Progress {
    state: FetchState,
    batch_len: usize,
}

impl Progress {
    fn new(batch_len: usize) -> Self {
        Self {
            state: FetchState::Idle,
            batch_len,
        }
    }

    fn advance(&mut self, next: FetchState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!("batch of {}: {} -> {}", self.batch_len, self.state, next);
        self.state = next;
    }
}

/// A fetch in flight, tagged with the batch index that owns its slot.
struct Dispatched {
    index: usize,
    id: ResourceId,
    task: AsyncTask<ProviderResult>,
}

impl Dispatched {
    async fn settle(self) -> (usize, ResourceId, ProviderResult) {
        let result = self.task.await.unwrap_or(Err(ProviderError::Aborted));
        match &result {
            Ok(_) => debug!("#{} ({}) settled", self.index, self.id),
            Err(e) => warn!("#{} ({}) failed: {e}", self.index, self.id),
        }
        (self.index, self.id, result)
    }
}

/// Reusable orchestrator binding a provider to a configuration.
pub struct OrderedFetch<P> {
    provider: Arc<P>,
    config: FetchConfig,
}

impl<P> Clone for OrderedFetch<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P: ResourceProvider> OrderedFetch<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, FetchConfig::default())
    }

    pub fn with_config(provider: P, config: FetchConfig) -> Self {
        Self::from_shared(Arc::new(provider), config)
    }

    /// Use a provider already shared elsewhere.
    pub fn from_shared(provider: Arc<P>, config: FetchConfig) -> Self {
        Self { provider, config }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch every entry concurrently and deliver the results to `sink` in
    /// request order.
    pub async fn run<S>(&self, batch: &RequestBatch, sink: &mut S) -> FetchResult<FetchSummary>
    where
        S: OutputSink + ?Sized,
    {
        let started = Instant::now();
        let mut progress = Progress::new(batch.len());

        let outcome = self.fan_out_fan_in(batch, &mut progress).await;
        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                progress.advance(FetchState::Failed);
                return Err(e);
            }
        };

        sink.deliver(&results)?;
        progress.advance(FetchState::Drained);

        Ok(FetchSummary {
            emitted: results.len(),
            elapsed: started.elapsed(),
            state: progress.state,
        })
    }

    /// Fetch every entry concurrently and return the results in request
    /// order.
    pub async fn collect(&self, batch: &RequestBatch) -> FetchResult<Vec<String>> {
        let mut progress = Progress::new(batch.len());
        let outcome = self.fan_out_fan_in(batch, &mut progress).await;
        if outcome.is_err() {
            progress.advance(FetchState::Failed);
        }
        outcome
    }

    /// Ordered stream over the batch results.
    ///
    /// Yields nothing until every fetch has settled; then either every result
    /// in request order or a single error.
    pub fn stream(&self, batch: RequestBatch) -> AsyncStream<FetchResult<String>> {
        let this = self.clone();
        OrderedEmitter::new(Box::new(move || -> BoxFuture<'static, FetchResult<Vec<String>>> {
            Box::pin(async move { this.collect(&batch).await })
        }))
        .emit_with(|e| warn!("ordered stream failed: {e}"))
    }

    async fn fan_out_fan_in(
        &self,
        batch: &RequestBatch,
        progress: &mut Progress,
    ) -> FetchResult<Vec<String>> {
        // Dispatch without awaiting so every fetch is in flight before the barrier.
        let dispatched: Vec<Dispatched> = batch
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let fetch = self.provider.fetch(id.clone());
                let limit = self.config.fetch_timeout;
                Dispatched {
                    index,
                    id: id.clone(),
                    task: spawn_task(with_timeout(limit, fetch)),
                }
            })
            .collect();
        progress.advance(FetchState::AllDispatched);

        let settled = join_all(dispatched.into_iter().map(Dispatched::settle)).await;
        progress.advance(FetchState::AllSettled);

        let mut results = ResultSequence::with_len(batch.len());
        let mut failures = Vec::new();
        for (index, resource, result) in settled {
            match result {
                Ok(value) => results.fill(index, value)?,
                Err(cause) => failures.push(FetchFailure {
                    index,
                    resource,
                    cause,
                }),
            }
        }

        if !failures.is_empty() {
            return Err(FetchError::ProviderFailure {
                total: batch.len(),
                failures,
            });
        }

        Ok(results.into_ordered()?)
    }
}
