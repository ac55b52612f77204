use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use grid_halo::prelude::*;
use grid_halo::topology::mask::{classify, compute_masks};

fn random_extents(n: usize, seed: u64) -> Vec<(Extent, Extent)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let base = |rng: &mut SmallRng| {
                let x0 = rng.gen_range(-8..8);
                let y0 = rng.gen_range(-8..8);
                let z0 = rng.gen_range(-8..8);
                Extent::new(
                    x0,
                    x0 + rng.gen_range(1..6),
                    y0,
                    y0 + rng.gen_range(1..6),
                    z0,
                    z0 + rng.gen_range(1..6),
                )
            };
            (base(&mut rng), base(&mut rng))
        })
        .collect()
}

fn bench_mask_classification(c: &mut Criterion) {
    let pairs = random_extents(1024, 0x5eed);
    c.bench_function("mask_classify_1024_pairs", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for (a, e) in &pairs {
                let (adj, ovl) = compute_masks(a, e);
                if classify(a.data_dimension(), adj, ovl).is_some() {
                    hits += 1;
                }
            }
            hits
        })
    });
}

fn bench_uniform_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniform_ghost_pipeline");
    for &blocks in &[4usize, 16] {
        // A row of unit-spaced cubes sharing faces.
        let inputs: Vec<UniformGrid> = (0..blocks as i32)
            .map(|i| {
                UniformGrid::new(
                    Extent::new(4 * i, 4 * (i + 1), 0, 4, 0, 4),
                    [0.0; 3],
                    [1.0; 3],
                )
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &inputs, |b, inputs| {
            b.iter(|| {
                let mut outputs = vec![UniformGrid::default(); inputs.len()];
                compute_uniform_ghosts(inputs, &mut outputs, 0, 2, &NoComm).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mask_classification, bench_uniform_pipeline);
criterion_main!(benches);
