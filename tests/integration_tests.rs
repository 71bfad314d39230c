use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hotqueue::{GetOptions, Json, MemoryStore, Queue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct Task {
    producer: u32,
    item: u32,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_end_to_end_single_message() {
    init_tracing();
    let store = MemoryStore::new();
    let producer = Queue::<serde_json::Value, _>::new("emails", store.clone()).with_serializer(Json);
    let consumer = Queue::<serde_json::Value, _>::new("emails", store).with_serializer(Json);

    let payload = serde_json::json!({
        "email": "user@example.com",
        "subject": "Welcome",
        "body": "Thanks for signing up!"
    });

    producer.put(&payload).await.unwrap();
    let message = consumer.get(GetOptions::default()).await.unwrap().unwrap();

    assert_eq!(message, payload);
}

#[tokio::test]
async fn test_producer_consumer_pattern() {
    init_tracing();
    let store = MemoryStore::new();
    let producer_queue: Queue<u32, _> = Queue::new("tasks", store.clone());
    let consumer_queue: Queue<u32, _> = Queue::new("tasks", store);

    let producer = tokio::spawn(async move {
        for i in 0..100u32 {
            producer_queue.put(&i).await.unwrap();
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    });

    let consumer = tokio::spawn(async move {
        let mut received = Vec::new();
        for _ in 0..100 {
            let message = consumer_queue
                .get(GetOptions::blocking().timeout(Duration::from_secs(2)))
                .await
                .unwrap();
            if let Some(message) = message {
                received.push(message);
            }
        }
        received
    });

    producer.await.unwrap();
    let received = consumer.await.unwrap();

    assert_eq!(received, (0..100).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_multiple_producers_single_consumer() {
    init_tracing();
    let store = MemoryStore::new();
    let mut producers = vec![];

    for producer in 0..5u32 {
        let queue: Queue<Task, _> = Queue::new("shared", store.clone());
        producers.push(tokio::spawn(async move {
            for item in 0..20 {
                queue.put(&Task { producer, item }).await.unwrap();
            }
        }));
    }

    for producer in producers {
        producer.await.unwrap();
    }

    let queue: Queue<Task, _> = Queue::new("shared", store);
    assert_eq!(queue.len().await.unwrap(), 100);

    let mut received = HashSet::new();
    while let Some(task) = queue.get(GetOptions::default()).await.unwrap() {
        assert!(received.insert(task), "duplicate task delivered");
    }

    assert_eq!(received.len(), 100);
    assert_eq!(queue.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_producers_and_consumers_deliver_exactly_once() {
    init_tracing();
    let store = MemoryStore::new();
    let mut producers = vec![];
    let mut consumers = vec![];

    for _ in 0..4 {
        let queue: Queue<Task, _> = Queue::new("work", store.clone());
        consumers.push(tokio::spawn(async move {
            let mut received = Vec::new();
            while let Some(task) = queue
                .get(GetOptions::blocking().timeout(Duration::from_millis(300)))
                .await
                .unwrap()
            {
                received.push(task);
            }
            received
        }));
    }

    for producer in 0..4u32 {
        let queue: Queue<Task, _> = Queue::new("work", store.clone());
        producers.push(tokio::spawn(async move {
            let tasks: Vec<Task> = (0..50).map(|item| Task { producer, item }).collect();
            for chunk in tasks.chunks(10) {
                queue.put_many(chunk).await.unwrap();
            }
        }));
    }

    for producer in producers {
        producer.await.unwrap();
    }

    let mut all = Vec::new();
    for consumer in consumers {
        all.extend(consumer.await.unwrap());
    }

    let unique: HashSet<Task> = all.iter().cloned().collect();
    assert_eq!(all.len(), 200);
    assert_eq!(unique.len(), 200);
}

#[tokio::test]
async fn test_single_producer_multiple_consumers() {
    init_tracing();
    let store = MemoryStore::new();
    let producer: Queue<u32, _> = Queue::new("work", store.clone());
    producer.put_many(0..100u32).await.unwrap();

    let consumers = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let mut handles = vec![];
    for _ in 0..5 {
        let queue: Queue<u32, _> = Queue::new("work", store.clone());
        let consumers = consumers.clone();
        handles.push(tokio::spawn(async move {
            let mut count = 0;
            while let Some(message) = queue
                .get(GetOptions::blocking().timeout(Duration::from_millis(100)))
                .await
                .unwrap()
            {
                consumers.lock().await.push(message);
                count += 1;
            }
            count
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }

    let mut received = consumers.lock().await.clone();
    received.sort_unstable();
    assert_eq!(total, 100);
    assert_eq!(received, (0..100).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_multiple_queues_isolated_operations() {
    init_tracing();
    let store = MemoryStore::new();
    let emails: Queue<u32, _> = Queue::new("emails", store.clone());
    let webhooks: Queue<u32, _> = Queue::new("webhooks", store.clone());

    emails.put_many(0..50u32).await.unwrap();
    webhooks.put_many(0..30u32).await.unwrap();

    assert_eq!(emails.len().await.unwrap(), 50);
    assert_eq!(webhooks.len().await.unwrap(), 30);

    emails.clear().await.unwrap();
    assert_eq!(emails.len().await.unwrap(), 0);
    assert_eq!(webhooks.len().await.unwrap(), 30);
    assert_eq!(store.keys(), vec!["hotqueue:webhooks".to_string()]);
}

#[tokio::test]
async fn test_consumer_blocks_until_message_arrives() {
    init_tracing();
    let store = MemoryStore::new();
    let producer: Queue<String, _> = Queue::new("delayed", store.clone());
    let consumer: Queue<String, _> = Queue::new("delayed", store);

    let handle = tokio::spawn(async move {
        let start = std::time::Instant::now();
        let message = consumer
            .get(GetOptions::blocking().timeout(Duration::from_secs(2)))
            .await
            .unwrap();
        (message, start.elapsed())
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    producer.put(&"arrived".to_string()).await.unwrap();

    let (message, elapsed) = handle.await.unwrap();

    assert_eq!(message.as_deref(), Some("arrived"));
    assert!(elapsed < Duration::from_secs(1));
}

#[tokio::test]
async fn test_fifo_order_under_load() {
    init_tracing();
    let queue: Queue<u32, _> = Queue::new("ordered", MemoryStore::new());

    for i in 0..500u32 {
        queue.put(&i).await.unwrap();
    }

    for i in 0..500u32 {
        let message = queue.get(GetOptions::default()).await.unwrap().unwrap();
        assert_eq!(message, i);
    }
}

#[tokio::test]
async fn test_lifo_order_under_load() {
    init_tracing();
    let stack: Queue<u32, _> = Queue::stack("ordered", MemoryStore::new());

    stack.put_many(0..500u32).await.unwrap();

    for i in (0..500u32).rev() {
        let message = stack.get(GetOptions::default()).await.unwrap().unwrap();
        assert_eq!(message, i);
    }
}
