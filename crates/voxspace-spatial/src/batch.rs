//! Bulk versions of the scalar spatial primitives.
//!
//! Every function here maps a scalar function over its input and returns
//! results in input order. Inputs shorter than [`PARALLEL_THRESHOLD`] run on
//! the calling thread; longer ones are split across the rayon pool.

use glam::Vec3;
use rayon::prelude::*;
use voxspace_core::coords::{increment_to_world, world_to_increment};
use voxspace_core::{Error, IncrementPos, Result, WorldPos};

use crate::bounds::SpatialBounds;
use crate::collision::collides_with_any;
use crate::storage::{StoredVoxel, VoxelOccupancy};

/// Inputs at least this long are processed in parallel.
pub const PARALLEL_THRESHOLD: usize = 1024;

/// Smallest slice handed to one rayon task.
const MIN_SPLIT_LEN: usize = 256;

fn map_slice<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    if items.len() < PARALLEL_THRESHOLD {
        items.iter().map(f).collect()
    } else {
        items.par_iter().with_min_len(MIN_SPLIT_LEN).map(f).collect()
    }
}

fn zip_slices<A, B, U, F>(left: &[A], right: &[B], f: F) -> Result<Vec<U>>
where
    A: Sync,
    B: Sync,
    U: Send,
    F: Fn(&A, &B) -> U + Sync + Send,
{
    if left.len() != right.len() {
        return Err(Error::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    if left.len() < PARALLEL_THRESHOLD {
        Ok(left.iter().zip(right).map(|(a, b)| f(a, b)).collect())
    } else {
        Ok(left
            .par_iter()
            .zip(right.par_iter())
            .with_min_len(MIN_SPLIT_LEN)
            .map(|(a, b)| f(a, b))
            .collect())
    }
}

/// Convert world positions to increments.
pub fn world_to_increment_batch(positions: &[WorldPos]) -> Vec<IncrementPos> {
    map_slice(positions, |&p| world_to_increment(p))
}

/// Convert increments to world positions.
pub fn increment_to_world_batch(positions: &[IncrementPos]) -> Vec<WorldPos> {
    map_slice(positions, |&p| increment_to_world(p))
}

/// World-space bounds of each voxel.
pub fn voxel_bounds_batch(voxels: &[StoredVoxel]) -> Vec<SpatialBounds> {
    map_slice(voxels, StoredVoxel::spatial_bounds)
}

/// For each candidate, whether it would overlap anything in storage.
///
/// All candidates are checked against the same storage snapshot.
#[tracing::instrument(level = "trace", skip_all, fields(candidates = candidates.len()))]
pub fn check_collisions_batch<S>(candidates: &[StoredVoxel], storage: &S) -> Vec<bool>
where
    S: VoxelOccupancy + ?Sized,
{
    let snapshot = storage.voxels();
    map_slice(candidates, |candidate| {
        collides_with_any(&candidate.bounds(), &snapshot)
    })
}

/// Pairwise Euclidean distances.
pub fn distances_batch(from: &[Vec3], to: &[Vec3]) -> Result<Vec<f32>> {
    zip_slices(from, to, |a, b| a.distance(*b))
}

/// Pairwise positive-volume intersection tests.
pub fn intersects_batch(left: &[SpatialBounds], right: &[SpatialBounds]) -> Result<Vec<bool>> {
    zip_slices(left, right, SpatialBounds::intersects)
}

/// Pairwise inclusive point-in-bounds tests.
pub fn contains_points_batch(bounds: &[SpatialBounds], points: &[Vec3]) -> Result<Vec<bool>> {
    zip_slices(bounds, points, |b, p| b.contains(*p))
}

/// Normalize vectors in place; zero vectors stay zero.
pub fn normalize_batch(vectors: &mut [Vec3]) {
    if vectors.len() < PARALLEL_THRESHOLD {
        vectors.iter_mut().for_each(|v| *v = v.normalize_or_zero());
    } else {
        vectors
            .par_iter_mut()
            .with_min_len(MIN_SPLIT_LEN)
            .for_each(|v| *v = v.normalize_or_zero());
    }
}

/// Pairwise dot products.
pub fn dot_batch(left: &[Vec3], right: &[Vec3]) -> Result<Vec<f32>> {
    zip_slices(left, right, |a, b| a.dot(*b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::check_collision_with_grid;
    use crate::storage::VoxelMap;
    use approx::assert_abs_diff_eq;
    use voxspace_core::Resolution;

    /// Deterministic pseudo-random sequence for test inputs.
    fn lcg(seed: u32, count: usize) -> Vec<i32> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 8) % 501) as i32 - 250
            })
            .collect()
    }

    fn increments(count: usize) -> Vec<IncrementPos> {
        let xs = lcg(1, count);
        let ys = lcg(2, count);
        let zs = lcg(3, count);
        (0..count)
            .map(|i| IncrementPos::new(xs[i], ys[i].abs(), zs[i]))
            .collect()
    }

    #[test]
    fn conversions_match_scalar_on_both_paths() {
        for count in [10, PARALLEL_THRESHOLD * 3] {
            let incs = increments(count);
            let worlds = increment_to_world_batch(&incs);
            assert_eq!(worlds.len(), count);
            for (inc, world) in incs.iter().zip(&worlds) {
                assert_eq!(*world, increment_to_world(*inc));
            }
            assert_eq!(world_to_increment_batch(&worlds), incs);
        }
    }

    #[test]
    fn bounds_match_scalar() {
        let voxels: Vec<_> = increments(2000)
            .into_iter()
            .enumerate()
            .map(|(i, p)| StoredVoxel::new(p, Resolution::ALL[i % Resolution::ALL.len()]))
            .collect();
        let bounds = voxel_bounds_batch(&voxels);
        for (voxel, b) in voxels.iter().zip(&bounds) {
            assert_eq!(*b, voxel.spatial_bounds());
        }
    }

    #[test]
    fn collisions_match_scalar() {
        let storage: VoxelMap = increments(50)
            .into_iter()
            .map(|p| StoredVoxel::new(p, Resolution::Size16cm))
            .collect();

        for count in [100, PARALLEL_THRESHOLD + 7] {
            let candidates: Vec<_> = increments(count)
                .into_iter()
                .rev()
                .map(|p| StoredVoxel::new(p, Resolution::Size32cm))
                .collect();
            let results = check_collisions_batch(&candidates, &storage);
            for (candidate, &hit) in candidates.iter().zip(&results) {
                assert_eq!(
                    hit,
                    check_collision_with_grid(candidate.position, candidate.resolution, &storage)
                );
            }
        }
    }

    #[test]
    fn pairwise_results_match_scalar() {
        let count = PARALLEL_THRESHOLD * 2;
        let a: Vec<Vec3> = increment_to_world_batch(&increments(count))
            .into_iter()
            .map(Vec3::from)
            .collect();
        let mut b = a.clone();
        b.rotate_left(1);

        let distances = distances_batch(&a, &b).unwrap();
        let dots = dot_batch(&a, &b).unwrap();
        for i in 0..count {
            assert_eq!(distances[i], a[i].distance(b[i]));
            assert_eq!(dots[i], a[i].dot(b[i]));
        }

        let boxes: Vec<_> = a
            .iter()
            .map(|&p| SpatialBounds::from_world(WorldPos::from(p), 0.5))
            .collect();
        let mut shifted = boxes.clone();
        shifted.rotate_left(1);
        let overlaps = intersects_batch(&boxes, &shifted).unwrap();
        let inside = contains_points_batch(&boxes, &b).unwrap();
        for i in 0..count {
            assert_eq!(overlaps[i], boxes[i].intersects(&shifted[i]));
            assert_eq!(inside[i], boxes[i].contains(b[i]));
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = [Vec3::X, Vec3::Y];
        let b = [Vec3::Z];
        assert_eq!(
            distances_batch(&a, &b),
            Err(Error::LengthMismatch { left: 2, right: 1 })
        );
        assert!(dot_batch(&b, &a).is_err());
    }

    #[test]
    fn normalize_in_place() {
        let mut small = vec![Vec3::new(3.0, 0.0, 4.0), Vec3::ZERO];
        normalize_batch(&mut small);
        assert_abs_diff_eq!(small[0].x, 0.6, epsilon = 1e-6);
        assert_eq!(small[1], Vec3::ZERO);

        let mut large: Vec<Vec3> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| Vec3::new(i as f32 + 1.0, 2.0, -1.0))
            .collect();
        let expected: Vec<Vec3> = large.iter().map(|v| v.normalize_or_zero()).collect();
        normalize_batch(&mut large);
        assert_eq!(large, expected);
    }
}
