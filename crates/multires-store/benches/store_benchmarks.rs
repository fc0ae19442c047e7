//! Benchmarks for multires-store lookups, sweeps and copies.
//!
//! Run with: cargo bench --package multires-store
//! Or: cargo bench --package multires-store -- shared_copy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fusion_common::{Image, PixelType};
use multires_store::{ImageStore, KeyedStore};

const TAGS: [&str; 4] = ["L8", "MODIS", "S2", "VIIRS"];

/// A store with `dates_per_tag` consecutive dates under each of [`TAGS`].
fn populated_store(dates_per_tag: i32) -> KeyedStore<u64> {
    let mut store = KeyedStore::new();
    for (t, tag) in TAGS.iter().enumerate() {
        for date in 0..dates_per_tag {
            store.set(*tag, 20200000 + date, (t as u64) << 32 | date as u64);
        }
    }
    store
}

fn image_store(dates_per_tag: i32, size: usize) -> ImageStore {
    let mut store = ImageStore::new();
    for tag in TAGS {
        for date in 0..dates_per_tag {
            store.set(tag, 20200000 + date, Image::new(size, size, 1, PixelType::U16));
        }
    }
    store
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for dates in [16, 256, 4096] {
        let store = populated_store(dates);
        let probe = 20200000 + dates / 2;

        group.bench_with_input(BenchmarkId::new("get", dates), &store, |b, store| {
            b.iter(|| store.get(black_box("S2"), black_box(probe)))
        });

        group.bench_with_input(
            BenchmarkId::new("get_any_at_date", dates),
            &store,
            |b, store| b.iter(|| store.get_any_at_date(black_box(probe))),
        );

        group.bench_with_input(BenchmarkId::new("count_date", dates), &store, |b, store| {
            b.iter(|| store.count_date(black_box(probe)))
        });

        group.bench_with_input(BenchmarkId::new("all_dates", dates), &store, |b, store| {
            b.iter(|| store.all_dates())
        });
    }

    group.finish();
}

fn bench_remove_date(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_date");

    for dates in [16, 256] {
        let store = populated_store(dates);
        group.bench_with_input(BenchmarkId::from_parameter(dates), &store, |b, store| {
            b.iter_batched(
                || store.clone(),
                |mut store| store.remove_date(black_box(20200000)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_copies(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_store_copy");

    for size in [64, 512] {
        let store = image_store(8, size);
        let bytes = (TAGS.len() * 8 * size * size * PixelType::U16.size_bytes()) as u64;
        group.throughput(Throughput::Bytes(bytes));

        group.bench_with_input(BenchmarkId::new("cloned_images", size), &store, |b, store| {
            b.iter(|| store.clone_with_cloned_images())
        });

        group.bench_with_input(BenchmarkId::new("shared_copy", size), &store, |b, store| {
            b.iter(|| store.clone_with_shared_image_copies())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_remove_date, bench_copies);
criterion_main!(benches);
