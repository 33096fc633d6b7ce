//! Tests for async task runtime primitives.

use futures::StreamExt;
use ordered_fetch::runtime::{AsyncTask, OrderedEmitter};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test]
async fn test_async_task_spawn_async() {
    let task = AsyncTask::spawn_async(async { 42 });
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_runs_without_being_awaited() {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _task = AsyncTask::spawn_async(async move {
        let _ = tx.send("ran");
    });
    assert_eq!(rx.await.unwrap(), "ran");
}

#[tokio::test]
async fn test_async_task_panic_is_recv_error() {
    let task: AsyncTask<u8> = AsyncTask::spawn_async(async { panic!("task failed") });
    assert!(task.await.is_err());
}

#[tokio::test]
async fn test_emitter_streams_batch_in_order() {
    let emitter: OrderedEmitter<u32, String> =
        OrderedEmitter::new(Box::new(|| Box::pin(async { Ok(vec![1, 2, 3]) })));
    let mut stream = emitter.emit();

    assert_eq!(stream.next().await, Some(Ok(1)));
    assert_eq!(stream.next().await, Some(Ok(2)));
    assert_eq!(stream.next().await, Some(Ok(3)));
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn test_emitter_forwards_single_error() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let emitter: OrderedEmitter<u32, String> =
        OrderedEmitter::new(Box::new(|| Box::pin(async { Err("boom".to_string()) })));
    let mut stream = emitter.emit_with(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(stream.next().await, Some(Err("boom".to_string())));
    assert_eq!(stream.next().await, None);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}
