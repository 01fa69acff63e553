//! Connection pool benchmarks.
//!
//! Measures `next_connection` selection cost and `on_failure`/`on_success`
//! bookkeeping across pool sizes, the two operations on the dispatcher's
//! hot path for every attempt.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use resilient_rest_client::{ConnectionPool, Host};

fn hosts(n: usize) -> Vec<Host> {
    (0..n).map(|i| Host::new("http", format!("node-{i}"), 9200)).collect()
}

fn bench_next_connection(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/next_connection");
    for size in [1, 8, 64, 512] {
        let pool = ConnectionPool::new(hosts(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(pool.next_connection()));
        });
    }
    group.finish();
}

fn bench_on_failure_then_success(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/failure_success_cycle");
    for size in [1, 8, 64, 512] {
        let pool = ConnectionPool::new(hosts(size)).unwrap();
        let target = hosts(size).remove(0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                pool.on_failure(black_box(&target));
                pool.on_success(black_box(&target));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_next_connection, bench_on_failure_then_success);
criterion_main!(benches);
