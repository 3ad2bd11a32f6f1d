// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use octree_forest::array::DynArray;
use octree_forest::coarsen::coarsen;
use octree_forest::dim::Dim3;
use octree_forest::octant::Octant;

/// Builds a fully uniform level-`level` tree as a Morton-sorted array, the worst case
/// for the sweep (every family is coarsenable, cascading all the way to the root).
fn uniform_tree(level: u8) -> DynArray<Octant<Dim3>> {
    let mut arr: DynArray<Octant<Dim3>> = DynArray::new();
    let mut leaves = vec![Octant::<Dim3>::root()];
    for _ in 0..level {
        leaves = leaves
            .iter()
            .flat_map(|p| {
                let c0 = Octant::new_raw(p.x, p.y, p.z, p.level + 1);
                (0..Dim3::CHILDREN).map(move |sid| c0.sibling(sid))
            })
            .collect();
    }
    leaves.sort();
    for q in leaves {
        arr.push(q);
    }
    arr
}

fn bench_coarsen(c: &mut Criterion) {
    let mut group = c.benchmark_group("coarsen");
    for &level in &[2u8, 3, 4] {
        group.bench_function(format!("uniform_level={level}"), |b| {
            b.iter_batched(
                || uniform_tree(level),
                |mut arr| {
                    coarsen(black_box(&mut arr), true, |_| true, |_| {});
                    arr
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_coarsen);
criterion_main!(benches);
