use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use reccache::RecCache;
use recstore::{MemStore, Record};
use tokio::runtime::Runtime;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_1kb_cached", |b| {
        let rt = Runtime::new().unwrap();
        let store = Arc::new(MemStore::new());
        let value = "x".repeat(1024);

        for i in 0..100 {
            store.insert(Record::new(i.to_string(), format!("Item{}", i), value.clone()));
        }

        let cache = RecCache::new(store);
        rt.block_on(cache.load()).unwrap();

        let keys: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let mut counter = 0;
        b.iter(|| {
            black_box(rt.block_on(cache.get(&keys[counter % 100])).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_1kb", |b| {
        let store = Arc::new(MemStore::new());
        let cache = RecCache::new(store);
        let value = "x".repeat(1024);

        let records: Vec<Record> = (0..100)
            .map(|i| Record::new(i.to_string(), format!("Item{}", i), value.clone()))
            .collect();

        let mut counter = 0;
        b.iter(|| {
            cache.set(records[counter % 100].clone());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_set);
criterion_main!(benches);
