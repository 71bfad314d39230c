use std::time::Duration;

use futures_util::StreamExt;
use hotqueue::{GetOptions, Json, MemoryStore, Queue, QueueError};

fn queue(name: &str, store: &MemoryStore) -> Queue<String, MemoryStore> {
    Queue::new(name, store.clone())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_consume_non_blocking_stops_when_empty() {
    let store = MemoryStore::new();
    let q = queue("consume", &store);
    q.put_many(strings(&["A", "B"])).await.unwrap();

    let messages: Vec<String> = q
        .consume(GetOptions::non_blocking())
        .map(|m| m.unwrap())
        .collect()
        .await;

    assert_eq!(messages, strings(&["A", "B"]));
}

#[tokio::test]
async fn test_consume_blocking_stops_after_timeout() {
    let store = MemoryStore::new();
    let q = queue("consume", &store);
    q.put_many(strings(&["A", "B"])).await.unwrap();

    let start = std::time::Instant::now();
    let messages: Vec<String> = q
        .consume(GetOptions::new().timeout(Duration::from_millis(100)))
        .map(|m| m.unwrap())
        .collect()
        .await;

    assert_eq!(messages, strings(&["A", "B"]));
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_consume_blocks_by_default() {
    let store = MemoryStore::new();
    let q = queue("consume", &store);
    let producer = queue("consume", &store);

    let handle = tokio::spawn(async move {
        let messages = q.consume(GetOptions::new().timeout(Duration::from_millis(300)));
        messages.map(|m| m.unwrap()).collect::<Vec<String>>().await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    producer.put(&"late".to_string()).await.unwrap();

    assert_eq!(handle.await.unwrap(), strings(&["late"]));
}

#[tokio::test]
async fn test_consume_until_ends_quietly_on_shutdown() {
    let store = MemoryStore::new();
    let q = queue("shutdown", &store);
    q.put(&"first".to_string()).await.unwrap();

    let shutdown = tokio::time::sleep(Duration::from_millis(100));
    let start = std::time::Instant::now();

    // Without a timeout this would block forever once "first" is consumed.
    let messages: Vec<_> = q.consume_until(GetOptions::blocking(), shutdown).collect().await;

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].as_deref().unwrap(), "first");
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_consume_yields_decode_error_then_stops() {
    let store = MemoryStore::new();
    let producer = Queue::<String, _>::new("mixed", store.clone()).with_serializer(Json);
    let consumer = queue("mixed", &store);

    producer.put_many(strings(&["a", "b"])).await.unwrap();

    let results: Vec<_> = consumer.consume(GetOptions::non_blocking()).collect().await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(QueueError::Deserialization(_))));
    assert_eq!(consumer.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_worker_handles_every_message() {
    let store = MemoryStore::new();
    let q = queue("worker", &store);
    q.put_many(strings(&["one", "two", "three"])).await.unwrap();

    let mut seen = Vec::new();
    let handled = q
        .worker_with(GetOptions::new().timeout(Duration::from_millis(50)), |message| {
            seen.push(message)
        })
        .run()
        .await
        .unwrap();

    assert_eq!(handled, 3);
    assert_eq!(seen, strings(&["one", "two", "three"]));
    assert_eq!(q.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_worker_with_default_options_blocks() {
    let store = MemoryStore::new();
    let q = queue("worker", &store);
    q.put(&"only".to_string()).await.unwrap();

    let mut seen = Vec::new();
    let mut worker = q.worker(|message| seen.push(message));
    assert_eq!(worker.options(), GetOptions::default());

    let handled = worker
        .run_until(tokio::time::sleep(Duration::from_millis(100)))
        .await
        .unwrap();
    drop(worker);

    assert_eq!(handled, 1);
    assert_eq!(seen, strings(&["only"]));
}

#[tokio::test]
async fn test_worker_stops_on_first_error() {
    let store = MemoryStore::new();
    let producer = Queue::<String, _>::new("broken", store.clone()).with_serializer(Json);
    let q = queue("broken", &store);
    producer.put(&"not bincode".to_string()).await.unwrap();

    let mut calls = 0;
    let result = q
        .worker_with(GetOptions::non_blocking(), |_| calls += 1)
        .run()
        .await;

    assert!(matches!(result, Err(QueueError::Deserialization(_))));
    assert_eq!(calls, 0);
}
