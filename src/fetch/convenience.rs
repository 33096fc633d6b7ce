//! Convenience wrapper functions for ordered fetches

use super::{FetchConfig, FetchResult, FetchSummary, OrderedFetch, OutputSink, RequestBatch, ResourceProvider};

/// Fetch a batch concurrently and deliver results to `sink` in request order.
///
/// Wraps [`OrderedFetch`] for one-off use with the default configuration.
///
/// # Arguments
///
/// * `batch` - Resources to fetch; may be empty or repeat ids
/// * `provider` - Capability resolving each id
/// * `sink` - Receives all results at once, only if every fetch succeeded
///
/// # Example
///
/// ```rust,no_run
/// use ordered_fetch::{LineSink, RequestBatch, SimulatedProvider, SimulationConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let batch = RequestBatch::from(["file1", "file2", "file3"]);
///     let provider = SimulatedProvider::reference(SimulationConfig::default())?;
///     let mut sink = LineSink::stdout();
///
///     let summary = ordered_fetch::fetch_all_ordered(&batch, provider, &mut sink).await?;
///     assert_eq!(summary.emitted, 3);
///     Ok(())
/// }
/// ```
pub async fn fetch_all_ordered<P, S>(
    batch: &RequestBatch,
    provider: P,
    sink: &mut S,
) -> FetchResult<FetchSummary>
where
    P: ResourceProvider,
    S: OutputSink + ?Sized,
{
    fetch_all_ordered_with_config(batch, provider, sink, FetchConfig::default()).await
}

/// Same as [`fetch_all_ordered`] with an explicit configuration.
pub async fn fetch_all_ordered_with_config<P, S>(
    batch: &RequestBatch,
    provider: P,
    sink: &mut S,
    config: FetchConfig,
) -> FetchResult<FetchSummary>
where
    P: ResourceProvider,
    S: OutputSink + ?Sized,
{
    OrderedFetch::with_config(provider, config)
        .run(batch, sink)
        .await
}
