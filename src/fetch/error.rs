//! Fetch error types

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::types::{ResourceId, SlotError};

/// Why a single fetch did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider has nothing under this id
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    /// Provider-reported failure
    #[error("provider failed: {0}")]
    Failed(String),

    /// The fetch did not settle within the configured timeout
    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),

    /// The fetch task panicked or its completion was dropped unfired
    #[error("fetch aborted before completing")]
    Aborted,
}

/// One failed entry of a request batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Position of the entry in the request batch
    pub index: usize,
    /// Requested resource
    pub resource: ResourceId,
    /// Reason the fetch failed
    pub cause: ProviderError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}): {}", self.index, self.resource, self.cause)
    }
}

/// Error types for ordered fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// One or more fetches failed; reported once every fetch has settled.
    #[error("{} of {total} fetches failed, first {}", .failures.len(), FirstFailure(.failures))]
    ProviderFailure {
        /// Size of the request batch
        total: usize,
        /// Every failure, in request order
        failures: Vec<FetchFailure>,
    },

    /// The output sink rejected the ordered results
    #[error("output sink failed: {0}")]
    Sink(#[from] std::io::Error),

    /// Result slot bookkeeping was violated
    #[error("result sequence invariant violated: {0}")]
    Slot(#[from] SlotError),
}

impl FetchError {
    /// Individual failures, in request order. Empty for non-provider errors.
    #[must_use]
    pub fn failures(&self) -> &[FetchFailure] {
        match self {
            FetchError::ProviderFailure { failures, .. } => failures,
            _ => &[],
        }
    }
}

struct FirstFailure<'a>(&'a [FetchFailure]);

impl fmt::Display for FirstFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(failure) => failure.fmt(f),
            None => f.write_str("<none>"),
        }
    }
}

/// Convenience result alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
