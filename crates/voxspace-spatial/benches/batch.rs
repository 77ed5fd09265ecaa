//! Scalar vs batch throughput for collision checks and conversions.
//!
//! Run with: `cargo bench -p voxspace-spatial`

#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use voxspace_core::coords::increment_to_world;
use voxspace_core::{IncrementPos, Resolution};
use voxspace_spatial::batch::{check_collisions_batch, increment_to_world_batch};
use voxspace_spatial::{check_collision_with_grid, StoredVoxel, VoxelMap};

/// A floor of 16 cm voxels covering a 4 m square.
fn floor_scene() -> VoxelMap {
    (-12..12)
        .flat_map(|x| (-12..12).map(move |z| (x, z)))
        .map(|(x, z)| StoredVoxel::new(IncrementPos::new(x * 16, 0, z * 16), Resolution::Size16cm))
        .collect()
}

fn candidates(count: usize) -> Vec<StoredVoxel> {
    (0..count)
        .map(|i| {
            let i = i as i32;
            StoredVoxel::new(
                IncrementPos::new(i % 400 - 200, (i / 400) % 40, (i * 7) % 400 - 200),
                Resolution::Size8cm,
            )
        })
        .collect()
}

fn bench_collisions(c: &mut Criterion) {
    let storage = floor_scene();
    let mut group = c.benchmark_group("collisions");

    for &count in &[256, 4096] {
        let input = candidates(count);

        group.bench_with_input(BenchmarkId::new("scalar", count), &input, |b, input| {
            b.iter(|| {
                input
                    .iter()
                    .map(|v| check_collision_with_grid(v.position, v.resolution, &storage))
                    .collect::<Vec<_>>()
            });
        });

        group.bench_with_input(BenchmarkId::new("batch", count), &input, |b, input| {
            b.iter(|| check_collisions_batch(black_box(input), &storage));
        });
    }

    group.finish();
}

fn bench_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("increment_to_world");

    for &count in &[1024, 65_536] {
        let input: Vec<_> = candidates(count).into_iter().map(|v| v.position).collect();

        group.bench_with_input(BenchmarkId::new("scalar", count), &input, |b, input| {
            b.iter(|| input.iter().map(|&p| increment_to_world(p)).collect::<Vec<_>>());
        });

        group.bench_with_input(BenchmarkId::new("batch", count), &input, |b, input| {
            b.iter(|| increment_to_world_batch(black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_collisions, bench_conversions);
criterion_main!(benches);
