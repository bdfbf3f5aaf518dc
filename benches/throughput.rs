//! Throughput Benchmark for LineKV
//!
//! This benchmark measures the storage engine and the line parser
//! under various workloads.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use linekv::protocol::{parse_command, LineBuffer};
use linekv::storage::StorageEngine;
use linekv::CommandHandler;
use std::sync::Arc;
use std::time::Duration;

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let engine = Arc::new(StorageEngine::new());

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            let value = Bytes::from("small_value");
            engine.set(key, value);
            i += 1;
        });
    });

    group.bench_function("set_medium", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(1024)); // 1KB value
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            engine.set(key, value.clone());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let engine = Arc::new(StorageEngine::new());

    for i in 0..100_000 {
        let key = Bytes::from(format!("key:{}", i));
        let value = Bytes::from(format!("value:{}", i));
        engine.set(key, value);
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(engine.get(key.as_bytes()));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(engine.get(key.as_bytes()));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark concurrent access through the single store lock
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    for &(name, write_every) in &[("4_threads_read_heavy", 10u64), ("4_threads_write_heavy", 2)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let engine = Arc::new(StorageEngine::new());
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let engine = Arc::clone(&engine);
                        thread::spawn(move || {
                            for i in 0..10_000u64 {
                                let key = format!("key:{}:{}", t, i % 100);
                                if i % write_every == 0 {
                                    engine.set(Bytes::from(key), Bytes::from("value"));
                                } else {
                                    black_box(engine.get(key.as_bytes()));
                                }
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(engine.len());
            });
        });
    }

    group.finish();
}

/// Benchmark line framing and command parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let batch: Vec<u8> = (0..100)
        .flat_map(|i| format!("SET key:{} some value {}\nGET key:{}\n", i, i, i).into_bytes())
        .collect();
    group.throughput(Throughput::Bytes(batch.len() as u64));

    group.bench_function("feed_and_parse_batch", |b| {
        b.iter(|| {
            let mut buffer = LineBuffer::new();
            for line in buffer.feed(&batch) {
                black_box(parse_command(&line).ok());
            }
        });
    });

    group.bench_function("feed_fragmented", |b| {
        b.iter(|| {
            let mut buffer = LineBuffer::new();
            let mut count = 0;
            for chunk in batch.chunks(7) {
                count += buffer.feed(chunk).len();
            }
            black_box(count);
        });
    });

    group.finish();
}

/// Benchmark the full line -> response path without sockets
fn bench_handle_line(c: &mut Criterion) {
    let handler = CommandHandler::new(Arc::new(StorageEngine::new()));
    handler.handle_line(&Bytes::from("SET name Ariz"));

    let mut group = c.benchmark_group("handle_line");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let line = Bytes::from("GET name");
        b.iter(|| black_box(handler.handle_line(&line)));
    });

    group.bench_function("set", |b| {
        let line = Bytes::from("SET name some longer value");
        b.iter(|| black_box(handler.handle_line(&line)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_concurrent,
    bench_parse,
    bench_handle_line,
);

criterion_main!(benches);
