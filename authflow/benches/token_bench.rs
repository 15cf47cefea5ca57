//! Benchmarks for token signing and tabular rendering.

use authflow::respond::{Column, Formatter, TabularFormatter};
use authflow::token::{issue, verify, Session};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

const NOW: i64 = 1_700_000_000_000;

fn session() -> Session {
    json!({"account_id": 1, "user_name": "bench@example.com"})
        .as_object()
        .cloned()
        .unwrap_or_default()
}

fn token_benchmark(c: &mut Criterion) {
    let session = session();
    let token = issue(&session, b"bench secret", 3600, NOW).unwrap_or_default();

    c.bench_function("token_issue", |b| {
        b.iter(|| issue(black_box(&session), b"bench secret", 3600, NOW))
    });

    c.bench_function("token_verify", |b| {
        b.iter(|| verify(black_box(&token), b"bench secret", NOW + 1_000))
    });
}

fn tabular_benchmark(c: &mut Criterion) {
    let rows: Vec<Value> = (0..100)
        .map(|i| json!({"id": i, "name": format!("user-{i}"), "active": i % 2 == 0}))
        .collect();
    let data = Value::Array(rows);
    let columns = [
        Column::named("id", "ID"),
        Column::named("name", "Name"),
        Column::named("active", "Active"),
    ];

    c.bench_function("tabular_100_rows", |b| {
        b.iter(|| TabularFormatter.format(black_box(&data), Some(&columns)))
    });
}

criterion_group!(benches, token_benchmark, tabular_benchmark);
criterion_main!(benches);
