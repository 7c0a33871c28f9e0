use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use opsmap::DynamicArray;
use std::time::Duration;

fn filled(n: u64) -> DynamicArray<u64> {
    let mut a = DynamicArray::native().unwrap();
    for i in 0..n {
        a.push_back(&i).unwrap();
    }
    a
}

fn bench_push_back_100k(c: &mut Criterion) {
    c.bench_function("array::push_back_100k", |b| {
        b.iter_batched(
            || DynamicArray::<u64>::native().unwrap(),
            |mut a| {
                for i in 0..100_000u64 {
                    a.push_back(&i).unwrap();
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_erase_back_10k(c: &mut Criterion) {
    c.bench_function("array::erase_back_10k", |b| {
        b.iter_batched(
            || filled(10_000),
            |mut a| {
                while !a.is_empty() {
                    a.erase(a.len() - 1).unwrap();
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_clear_10k(c: &mut Criterion) {
    c.bench_function("array::clear_10k", |b| {
        b.iter_batched(
            || filled(10_000),
            |mut a| {
                a.clear();
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_miss_1k(c: &mut Criterion) {
    c.bench_function("array::find_miss_1k", |b| {
        let a = filled(1_000);
        b.iter(|| black_box(a.find(&u64::MAX)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_push_back_100k, bench_erase_back_10k, bench_clear_10k, bench_find_miss_1k
}
criterion_main!(benches);
