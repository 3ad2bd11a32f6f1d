// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use octree_forest::array::split;

fn bucketed_input(n: usize, buckets: usize) -> Vec<usize> {
    (0..n).map(|i| i * buckets / n).collect()
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    for &(n, buckets) in &[(1_000usize, 16usize), (100_000, 64), (1_000_000, 256)] {
        let data = bucketed_input(n, buckets);
        group.bench_function(format!("n={n},buckets={buckets}"), |b| {
            b.iter(|| split(black_box(&data), buckets, |&v| v))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
