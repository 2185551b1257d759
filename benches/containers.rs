//! Benchmarks for case-insensitive lookup, set algebra and freezing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schemadict::{CaseInsensitiveDict, CaseInsensitiveFrozenSet, Lockable, LockableList};

fn attribute_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("attribName{}", i)).collect()
}

fn bench_dict_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_dict_lookup");

    for size in [16, 256, 4096].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let names = attribute_names(*size);
        let mut dict = CaseInsensitiveDict::new();
        for (i, name) in names.iter().enumerate() {
            dict.set(name, i).unwrap();
        }
        dict.freeze();
        let queries: Vec<String> = names.iter().map(|name| name.to_uppercase()).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for query in &queries {
                    black_box(dict.get(black_box(query)).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("frozen_set_algebra");

    let names = attribute_names(1024);
    let left: CaseInsensitiveFrozenSet = names.iter().step_by(2).collect();
    let right: CaseInsensitiveFrozenSet =
        names.iter().step_by(3).map(|name| name.to_uppercase()).collect();
    group.throughput(Throughput::Elements((left.len() + right.len()) as u64));

    group.bench_function("union", |b| {
        b.iter(|| black_box(&left | black_box(&right)));
    });

    group.bench_function("intersection", |b| {
        b.iter(|| black_box(&left & black_box(&right)));
    });

    group.bench_function("symmetric_difference", |b| {
        b.iter(|| black_box(&left ^ black_box(&right)));
    });

    group.finish();
}

fn bench_freeze_and_unlock(c: &mut Criterion) {
    let mut group = c.benchmark_group("freeze");

    let names = attribute_names(512);
    let dict: CaseInsensitiveDict<LockableList<String>> = names
        .iter()
        .map(|name| (name.as_str(), LockableList::from(vec![name.clone(), "string".to_string()])))
        .collect();

    group.bench_function("freeze_nested", |b| {
        b.iter(|| {
            let mut copy = dict.clone();
            copy.freeze();
            black_box(copy)
        });
    });

    let mut frozen = dict.clone();
    frozen.freeze();
    group.bench_function("get_unlocked_nested", |b| {
        b.iter(|| black_box(frozen.get_unlocked()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_dict_lookup,
    bench_set_algebra,
    bench_freeze_and_unlock
);
criterion_main!(benches);
