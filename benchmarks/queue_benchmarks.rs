use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hotqueue::{GetOptions, Json, MemoryStore, Queue};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

#[derive(Clone, Serialize, Deserialize)]
struct Payload {
    id: u64,
    data: String,
}

fn payload(size: usize) -> Payload {
    Payload {
        id: 123,
        data: "x".repeat(size),
    }
}

/// Benchmark: put one message at a time
fn bench_put_single(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("put_single");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("memory", |b| {
        let queue: Queue<Payload, _> = Queue::new("bench", MemoryStore::new());
        let message = payload(16);

        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    queue.put(black_box(&message)).await.unwrap();
                }
                queue.clear().await.unwrap();
            });
        });
    });
    group.finish();
}

/// Benchmark: put a batch in one push versus one push per message
fn bench_put_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("put_batch");

    for batch in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), batch, |b, &batch| {
            let queue: Queue<Payload, _> = Queue::new("bench", MemoryStore::new());
            let messages = vec![payload(16); batch];

            b.iter(|| {
                rt.block_on(async {
                    queue.put_many(black_box(&messages)).await.unwrap();
                    queue.clear().await.unwrap();
                });
            });
        });
    }
    group.finish();
}

/// Benchmark: put then non-blocking get
fn bench_roundtrip_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("roundtrip_latency");

    group.bench_function("fifo", |b| {
        let queue: Queue<Payload, _> = Queue::new("bench", MemoryStore::new());
        let message = payload(16);

        b.iter(|| {
            rt.block_on(async {
                queue.put(&message).await.unwrap();
                black_box(queue.get(GetOptions::default()).await.unwrap());
            });
        });
    });

    group.bench_function("lifo_blocking", |b| {
        let stack: Queue<Payload, _> = Queue::stack("bench", MemoryStore::new());
        let message = payload(16);

        b.iter(|| {
            rt.block_on(async {
                stack.put(&message).await.unwrap();
                black_box(stack.get(GetOptions::blocking()).await.unwrap());
            });
        });
    });
    group.finish();
}

/// Benchmark: concurrent producers against one key
fn bench_concurrent_producers(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("concurrent_producers");

    for num_producers in [2u64, 4, 8].iter() {
        group.throughput(Throughput::Elements(num_producers * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_producers),
            num_producers,
            |b, &num_producers| {
                b.iter(|| {
                    rt.block_on(async {
                        let store = MemoryStore::new();
                        let mut handles = vec![];
                        for _ in 0..num_producers {
                            let queue: Queue<Payload, _> = Queue::new("bench", store.clone());
                            handles.push(tokio::spawn(async move {
                                let message = payload(16);
                                for _ in 0..1000 {
                                    queue.put(&message).await.unwrap();
                                }
                            }));
                        }

                        for handle in handles {
                            handle.await.unwrap();
                        }
                    });
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: serializer cost by message size
fn bench_message_sizes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("message_sizes");

    for size in [100usize, 1000, 10000, 100000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("bincode", size), size, |b, &size| {
            let queue: Queue<Payload, _> = Queue::new("bench", MemoryStore::new());
            let message = payload(size);

            b.iter(|| {
                rt.block_on(async {
                    queue.put(&message).await.unwrap();
                    black_box(queue.get(GetOptions::default()).await.unwrap());
                });
            });
        });
        group.bench_with_input(BenchmarkId::new("json", size), size, |b, &size| {
            let queue = Queue::<Payload, _>::new("bench", MemoryStore::new()).with_serializer(Json);
            let message = payload(size);

            b.iter(|| {
                rt.block_on(async {
                    queue.put(&message).await.unwrap();
                    black_box(queue.get(GetOptions::default()).await.unwrap());
                });
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_put_single,
    bench_put_batch,
    bench_roundtrip_latency,
    bench_concurrent_producers,
    bench_message_sizes,
);

criterion_main!(benches);
