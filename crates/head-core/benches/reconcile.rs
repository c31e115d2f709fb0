use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use head_core::{normalize, reconcile, HeadObject, HeadScope, MetaOptions, MetaRecord, Registry};

const META_COUNT_SAMPLES: &[usize] = &[4, 16, 64, 256];

fn metas(count: usize, revision: usize) -> Vec<MetaOptions> {
    (0..count)
        .map(|i| {
            // Every fourth entry changes content between revisions.
            let content = if i % 4 == 0 {
                format!("value {i} r{revision}")
            } else {
                format!("value {i}")
            };
            MetaOptions::named(format!("meta-{i}"), content)
        })
        .collect()
}

fn records(count: usize, revision: usize) -> Vec<MetaRecord> {
    normalize(&metas(count, revision))
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for &count in META_COUNT_SAMPLES {
        let previous = records(count, 0);
        let unchanged = previous.clone();
        let changed = records(count, 1);
        group.bench_with_input(BenchmarkId::new("unchanged", count), &count, |b, _| {
            b.iter(|| reconcile(black_box(&previous), black_box(&unchanged)))
        });
        group.bench_with_input(BenchmarkId::new("quarter_changed", count), &count, |b, _| {
            b.iter(|| reconcile(black_box(&previous), black_box(&changed)))
        });
    }
    group.finish();
}

fn bench_scope_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_commit");
    for &count in META_COUNT_SAMPLES {
        let heads = [
            HeadObject::new().title("r0").metas(metas(count, 0)),
            HeadObject::new().title("r1").metas(metas(count, 1)),
        ];
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let registry = Registry::new();
            let mut scope = HeadScope::new(registry);
            let mut revision = 0;
            b.iter(|| {
                revision ^= 1;
                scope.evaluate(&heads[revision]);
                scope.commit();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_scope_commit);
criterion_main!(benches);
