//! End-to-end dispatcher benchmarks against an in-process scripted
//! transport, isolating `perform_request`'s own overhead from real network
//! I/O.

use async_trait::async_trait;
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use resilient_rest_client::error::DispatcherError;
use resilient_rest_client::request::Request;
use resilient_rest_client::transport::{Response, Transport};
use resilient_rest_client::{ConnectionPool, Host, RestClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

struct AlwaysOk;

#[async_trait]
impl Transport for AlwaysOk {
    async fn execute(&self, _host: &Host, _request: &Request) -> Result<Response, DispatcherError> {
        Ok(Response {
            status: 200,
            headers: vec![],
            entity: Bytes::from_static(b"ok"),
        })
    }
}

fn bench_happy_path(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let pool = Arc::new(
        ConnectionPool::new(vec![
            Host::new("http", "node-a", 9200),
            Host::new("http", "node-b", 9200),
            Host::new("http", "node-c", 9200),
        ])
        .unwrap(),
    );
    let client = RestClient::new(Arc::new(AlwaysOk), pool, Duration::from_secs(30)).unwrap();

    c.bench_function("dispatcher/happy_path", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(client.perform_request("GET", "/_search", vec![], None).await.unwrap());
        });
    });
}

criterion_group!(benches, bench_happy_path);
criterion_main!(benches);
