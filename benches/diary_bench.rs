//! Benchmarks for the diary record store and derived views
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pawdiary::index::{weight_series, CalendarIndex, TypeFilter, YearMonth};
use pawdiary::storage::*;
use pawdiary::walk::distance_km;
use std::sync::Arc;

fn create_test_store(count: usize) -> RecordStore {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let mut store = RecordStore::with_clock(StoreConfig::default(), clock.clone());

    for i in 0..count {
        let draft = match i % 4 {
            0 => NewRecord::toilet(ToiletKind::Pee, Some(Condition::Good)),
            1 => NewRecord::food("ドライフード"),
            2 => NewRecord::weight(5.0 + (i % 10) as f64 / 10.0),
            _ => NewRecord::trimming(),
        };
        store.append(draft).unwrap();
        clock.advance(Duration::hours(3));
    }
    store
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("append_1000", |b| {
        b.iter(|| create_test_store(black_box(1000)))
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for size in [1000, 10000] {
        let store = create_test_store(size);
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let filter = TypeFilter::default();

        group.bench_function(format!("by_type_{}", size), |b| {
            b.iter(|| store.by_type(black_box(RecordType::Weight)).len())
        });

        group.bench_function(format!("by_date_and_types_{}", size), |b| {
            b.iter(|| store.by_date_and_types(black_box(day), &filter).len())
        });

        group.bench_function(format!("weight_series_{}", size), |b| {
            b.iter(|| weight_series(black_box(&store)).len())
        });

        let index = CalendarIndex::default();
        let month = YearMonth::new(2024, 2).unwrap();
        group.bench_function(format!("calendar_month_{}", size), |b| {
            b.iter(|| index.month(black_box(&store), month, day).cells.len())
        });
    }

    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    c.bench_function("haversine", |b| {
        b.iter(|| distance_km(black_box(35.6812), black_box(139.7671), 35.4437, 139.6380))
    });
}

criterion_group!(benches, bench_append, bench_queries, bench_distance);
criterion_main!(benches);
