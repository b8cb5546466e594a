//! Criterion benchmarks for classprop-cache: hit path, miss path, reset.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use classprop_cache::{CacheConfig, ClassValueCache};

struct Model;
struct Subclass;

fn bench_hit(c: &mut Criterion) {
    let cache = ClassValueCache::new(|class| class.short_name().to_string());
    cache.value::<Model>();

    let mut g = c.benchmark_group("hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("value", |b| {
        b.iter(|| black_box(cache.value::<Model>()));
    });
    g.finish();
}

fn bench_miss(c: &mut Criterion) {
    let cache = ClassValueCache::with_config(
        CacheConfig::default().with_timeout(std::time::Duration::ZERO),
        |class| class.short_name().to_string(),
    );

    let mut g = c.benchmark_group("miss");
    g.throughput(Throughput::Elements(1));
    g.bench_function("value_expired", |b| {
        b.iter(|| black_box(cache.value::<Subclass>()));
    });
    g.finish();
}

fn bench_reset(c: &mut Criterion) {
    let cache = ClassValueCache::new(|class| class.short_name().to_string());

    let mut g = c.benchmark_group("reset");
    g.throughput(Throughput::Elements(1));
    g.bench_function("value_then_reset", |b| {
        b.iter(|| {
            black_box(cache.value::<Model>());
            black_box(cache.reset::<Model>())
        });
    });
    g.finish();
}

criterion_group!(benches, bench_hit, bench_miss, bench_reset);
criterion_main!(benches);
