//! Performance benchmarks for the domain store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use domain_store::{
    operations, state_from_seed, AppState, Asset, Assets, CollectionReader, CollectionSetter,
    Providers, Store,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn store_with_assets(count: usize) -> Store {
    let assets: Vec<Asset> = (0..count)
        .map(|i| Asset::new(format!("a{i}"), "Tool", 10.0))
        .collect();
    Store::from_seed(AppState::default().with::<Assets>(Arc::new(assets)))
}

/// Benchmark one transition against collections of varying size
fn bench_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");

    for size in [10, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("edit", size), &size, |b, &size| {
            let store = store_with_assets(size);
            let setter = CollectionSetter::<Assets>::new(store);
            let target = format!("a{}", size / 2).into();
            let mut price = 0.0;

            b.iter(|| {
                price += 1.0;
                setter
                    .edit(&target, |asset: &Asset| Asset {
                        monthly_price: price,
                        ..asset.clone()
                    })
                    .unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("noop", size), &size, |b, &size| {
            let store = store_with_assets(size);
            let setter = CollectionSetter::<Assets>::new(store);

            b.iter(|| {
                black_box(setter.remove(&"missing".into()).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark notification fan-out with varying listener counts
fn bench_notify(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify");

    for listeners in [1, 10, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("listeners", listeners),
            &listeners,
            |b, &listeners| {
                let store = store_with_assets(10);
                // Half the readers watch a collection that never changes.
                let _readers: Vec<_> = (0..listeners / 2)
                    .map(|_| CollectionReader::<Assets>::attach(&store, |_| {}))
                    .collect();
                let _idle: Vec<_> = (0..listeners - listeners / 2)
                    .map(|_| CollectionReader::<Providers>::attach(&store, |_| {}))
                    .collect();

                let setter = CollectionSetter::<Assets>::new(store.clone());
                let mut price = 0.0;
                b.iter(|| {
                    price += 1.0;
                    setter
                        .edit(&"a0".into(), |asset: &Asset| Asset {
                            monthly_price: price,
                            ..asset.clone()
                        })
                        .unwrap();
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the pure reducers on their own
fn bench_reducers(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducers");
    let items: Arc<Vec<Asset>> = Arc::new(
        (0..1_000)
            .map(|i| Asset::new(format!("a{i}"), "Tool", 10.0))
            .collect(),
    );

    group.bench_function("prepend_1000", |b| {
        b.iter(|| black_box(operations::prepend(&items, Asset::new("fresh", "New", 1.0))));
    });

    group.bench_function("remove_1000", |b| {
        let id = "a500".into();
        b.iter(|| black_box(operations::remove_by_id(&items, &id)));
    });

    group.finish();
}

/// Benchmark seed validation
fn bench_seed(c: &mut Criterion) {
    let mut group = c.benchmark_group("seed");

    for size in [100, 5_000] {
        let assets: Vec<Value> = (0..size)
            .map(|i| json!({ "id": format!("a{i}"), "name": "Tool", "monthlyPrice": 10 }))
            .collect();
        let mut seed = serde_json::Map::new();
        seed.insert("assets".to_string(), Value::Array(assets));

        group.bench_with_input(BenchmarkId::new("assets", size), &seed, |b, seed| {
            b.iter(|| black_box(state_from_seed(seed.clone()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transition, bench_notify, bench_reducers, bench_seed);
criterion_main!(benches);
