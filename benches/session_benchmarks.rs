//! Criterion benchmarks for rust_db_session

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_db_session::core::cooldown::NoCooldown;
use rust_db_session::prelude::*;

fn seeded_session(rows: usize) -> SessionManager {
    let mut session = SessionManager::new().with_cooldown(NoCooldown);
    session
        .configure(&DatabaseInfo::new().url("sqlite::memory:"))
        .expect("Failed to configure");
    assert!(session.open());
    session
        .execute("create table t (id integer, name text, score real)")
        .expect("Failed to create table");
    for i in 0..rows {
        session
            .execute(&format!("insert into t values ({}, 'name{}', {}.5)", i, i, i))
            .expect("Failed to insert");
    }
    session
}

// ============================================================================
// Query Materialization Benchmarks
// ============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for rows in [10usize, 100, 1000] {
        let mut session = seeded_session(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("tabular", rows), &rows, |b, _| {
            b.iter(|| black_box(session.query("select * from t").unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("typed", rows), &rows, |b, _| {
            b.iter(|| black_box(session.query_typed("select * from t").unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("count", rows), &rows, |b, _| {
            b.iter(|| black_box(session.query_count("select * from t").unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Write Path Benchmarks
// ============================================================================

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    group.throughput(Throughput::Elements(1));

    let mut session = seeded_session(0);
    group.bench_function("insert", |b| {
        b.iter(|| {
            black_box(
                session
                    .execute("insert into t values (1, 'bench', 0.5)")
                    .unwrap(),
            )
        });
    });

    group.bench_function("insert_then_rollback", |b| {
        b.iter(|| {
            session
                .execute("insert into t values (2, 'bench', 0.5)")
                .unwrap();
            session.rollback().unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Result Conversion Benchmarks
// ============================================================================

fn bench_stringify(c: &mut Criterion) {
    let mut group = c.benchmark_group("stringify");

    let mut session = seeded_session(1000);
    let typed = session.query_typed("select * from t").unwrap();
    group.throughput(Throughput::Elements(typed.len() as u64));

    group.bench_function("typed_to_tabular", |b| {
        b.iter(|| black_box(TabularResult::from(typed.clone())));
    });

    let table = TabularResult::from(typed);
    group.bench_function("json", |b| {
        b.iter(|| black_box(serde_json::to_string(&table).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_query, bench_execute, bench_stringify);
criterion_main!(benches);
