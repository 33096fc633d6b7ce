use std::io;
use std::time::Duration;

use ordered_fetch::{
    FetchConfig, FetchError, FnProvider, OutputSink, ProviderError, RequestBatch, ResourceId,
    fetch_all_ordered, fetch_all_ordered_with_config,
};
use tokio::time::Instant;

use super::support::{Scripted, settled};

#[tokio::test(start_paused = true)]
async fn middle_failure_waits_for_siblings_and_emits_nothing() {
    let provider = Scripted::new()
        .ok("a", 300, "A")
        .fail("b", 10, ProviderError::Failed("connection reset".into()))
        .ok("c", 200, "C");
    let log = provider.log();
    let mut out: Vec<String> = Vec::new();

    let start = Instant::now();
    let err = fetch_all_ordered(&RequestBatch::from(["a", "b", "c"]), provider, &mut out)
        .await
        .unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(out.is_empty());
    assert_eq!(settled(&log), vec!["b", "c", "a"]);

    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].resource, ResourceId::from("b"));
    assert_eq!(
        failures[0].cause,
        ProviderError::Failed("connection reset".into())
    );
    assert!(matches!(err, FetchError::ProviderFailure { total: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn failures_are_reported_in_request_order() {
    let provider = Scripted::new()
        .fail("a", 100, ProviderError::Failed("late".into()))
        .ok("b", 50, "B")
        .fail("c", 10, ProviderError::Failed("early".into()));
    let mut out: Vec<String> = Vec::new();

    let err = fetch_all_ordered(&RequestBatch::from(["a", "b", "c"]), provider, &mut out)
        .await
        .unwrap_err();

    let indices: Vec<usize> = err.failures().iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert!(out.is_empty());
    assert!(err.to_string().starts_with("2 of 3 fetches failed"));
}

#[tokio::test(start_paused = true)]
async fn unknown_resource_is_not_found() {
    let provider = Scripted::new().ok("a", 10, "A");
    let mut out: Vec<String> = Vec::new();

    let err = fetch_all_ordered(&RequestBatch::from(["a", "missing"]), provider, &mut out)
        .await
        .unwrap_err();

    assert_eq!(
        err.failures()[0].cause,
        ProviderError::NotFound("missing".into())
    );
    assert!(out.is_empty());
}

#[tokio::test(start_paused = true)]
async fn timeout_settles_as_failure_after_siblings() {
    let provider = Scripted::new().ok("slow", 5_000, "S").ok("fast", 10, "F");
    let config = FetchConfig::default().with_fetch_timeout(Duration::from_secs(1));
    let mut out: Vec<String> = Vec::new();

    let start = Instant::now();
    let err = fetch_all_ordered_with_config(
        &RequestBatch::from(["slow", "fast"]),
        provider,
        &mut out,
        config,
    )
    .await
    .unwrap_err();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
    assert_eq!(err.failures()[0].index, 0);
    assert_eq!(
        err.failures()[0].cause,
        ProviderError::TimedOut(Duration::from_secs(1))
    );
    assert!(out.is_empty());
}

#[tokio::test(start_paused = true)]
async fn panicking_fetch_is_aborted() {
    let provider = FnProvider::new(|id: ResourceId| async move {
        if id.as_str() == "boom" {
            panic!("provider exploded");
        }
        Ok::<_, ProviderError>(id.to_string())
    });
    let mut out: Vec<String> = Vec::new();

    let err = fetch_all_ordered(&RequestBatch::from(["ok", "boom"]), provider, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.failures()[0].index, 1);
    assert_eq!(err.failures()[0].cause, ProviderError::Aborted);
    assert!(out.is_empty());
}

struct BrokenPipe;

impl OutputSink for BrokenPipe {
    fn deliver(&mut self, _results: &[String]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

#[tokio::test(start_paused = true)]
async fn sink_error_is_surfaced() {
    let provider = Scripted::new().ok("a", 10, "A");

    let err = fetch_all_ordered(&RequestBatch::from(["a"]), provider, &mut BrokenPipe)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Sink(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(err.failures().is_empty());
}
