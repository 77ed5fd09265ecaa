//! Multi-resolution collision queries.
//!
//! All overlap tests run on [`IncrementBounds`], so any pair of the ten voxel
//! sizes is compared exactly. Voxels that only touch along a face do not
//! collide, which is what makes face-adjacent placement legal.
//!
//! Grid queries take one [`VoxelOccupancy::voxels`] snapshot per call and scan
//! it linearly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use tracing::debug;
use voxspace_core::{IncrementPos, Resolution};

use crate::bounds::{IncrementBounds, SpatialBounds};
use crate::face::{calculate_placement_position, FaceDirection};
use crate::storage::{StoredVoxel, VoxelOccupancy};

/// Default tolerance between a supporting top face and a bottom face, in meters.
pub const DEFAULT_STABILITY_EPSILON: f32 = 0.001;

/// Check whether two voxels overlap with positive volume.
#[inline]
pub fn check_collision(
    pos_a: IncrementPos,
    res_a: Resolution,
    pos_b: IncrementPos,
    res_b: Resolution,
) -> bool {
    IncrementBounds::from_voxel(pos_a, res_a)
        .intersects(&IncrementBounds::from_voxel(pos_b, res_b))
}

/// Check a candidate's bounds against a storage snapshot.
#[inline]
pub(crate) fn collides_with_any(bounds: &IncrementBounds, snapshot: &[StoredVoxel]) -> bool {
    snapshot.iter().any(|voxel| bounds.intersects(&voxel.bounds()))
}

/// Check whether a voxel would overlap anything in storage.
#[tracing::instrument(level = "trace", skip_all)]
pub fn check_collision_with_grid<S>(pos: IncrementPos, resolution: Resolution, storage: &S) -> bool
where
    S: VoxelOccupancy + ?Sized,
{
    let bounds = IncrementBounds::from_voxel(pos, resolution);
    collides_with_any(&bounds, &storage.voxels())
}

/// Every stored voxel a candidate would overlap.
pub fn colliding_voxels<S>(
    pos: IncrementPos,
    resolution: Resolution,
    storage: &S,
) -> Vec<StoredVoxel>
where
    S: VoxelOccupancy + ?Sized,
{
    let bounds = IncrementBounds::from_voxel(pos, resolution);
    storage
        .voxels()
        .into_iter()
        .filter(|voxel| bounds.intersects(&voxel.bounds()))
        .collect()
}

/// Every stored voxel overlapping a world-space region.
pub fn voxels_in_region<S>(region: &SpatialBounds, storage: &S) -> Vec<StoredVoxel>
where
    S: VoxelOccupancy + ?Sized,
{
    storage
        .voxels()
        .into_iter()
        .filter(|voxel| region.intersects(&voxel.spatial_bounds()))
        .collect()
}

/// Search node ordered by Manhattan distance from the desired position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchNode {
    pos: IncrementPos,
    distance: i32,
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (closer positions have higher priority)
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

/// Nearest collision-free position for a voxel, searching outward from
/// `desired` in steps of the voxel's own size.
///
/// Candidates are the six face-adjacent cells of each expanded node, expanded
/// closest first by Manhattan distance. The first free candidate is returned.
/// Candidates below the ground plane or more than `max_search_distance` cm away
/// are never returned; `None` means the search space was exhausted.
pub fn find_nearest_free_position<S>(
    desired: IncrementPos,
    resolution: Resolution,
    storage: &S,
    max_search_distance: i32,
) -> Option<IncrementPos>
where
    S: VoxelOccupancy + ?Sized,
{
    let snapshot = storage.voxels();
    let is_free = |pos: IncrementPos| {
        pos.y >= 0 && !collides_with_any(&IncrementBounds::from_voxel(pos, resolution), &snapshot)
    };

    if is_free(desired) {
        return Some(desired);
    }

    let step = resolution.size_cm();
    let mut queue = BinaryHeap::new();
    let mut visited = HashSet::new();

    queue.push(SearchNode {
        pos: desired,
        distance: 0,
    });
    visited.insert(desired);

    while let Some(node) = queue.pop() {
        if node.distance > max_search_distance {
            break;
        }

        for candidate in node.pos.neighbors(step) {
            if !visited.insert(candidate) {
                continue;
            }

            let distance = candidate.manhattan_distance(desired);
            if distance > max_search_distance {
                continue;
            }

            if is_free(candidate) {
                return Some(candidate);
            }

            queue.push(SearchNode {
                pos: candidate,
                distance,
            });
        }
    }

    debug!(
        ?desired,
        %resolution,
        max_search_distance,
        visited = visited.len(),
        "No free position found"
    );
    None
}

/// Check whether all six face-adjacent cells of a voxel are occupied.
pub fn is_completely_surrounded<S>(pos: IncrementPos, resolution: Resolution, storage: &S) -> bool
where
    S: VoxelOccupancy + ?Sized,
{
    FaceDirection::ALL
        .iter()
        .all(|&face| storage.is_occupied(calculate_placement_position(pos, face, resolution)))
}

/// Check whether a voxel would rest on the ground or on another voxel.
///
/// A voxel is supported when some voxel below it has its top face within
/// `epsilon` meters of the candidate's bottom face and their X/Z footprints
/// overlap with positive area.
pub fn check_stability<S>(
    pos: IncrementPos,
    resolution: Resolution,
    storage: &S,
    epsilon: f32,
) -> bool
where
    S: VoxelOccupancy + ?Sized,
{
    if pos.y == 0 {
        return true;
    }

    let ours = IncrementBounds::from_voxel(pos, resolution);
    storage.voxels().iter().any(|voxel| {
        if voxel.position.y >= pos.y {
            return false;
        }
        let theirs = voxel.bounds();
        #[allow(clippy::cast_precision_loss)]
        let gap_m = (theirs.top_cm() - ours.bottom_cm()).abs() as f32 * 0.01;
        gap_m < epsilon && theirs.overlaps_xz(&ours)
    })
}

/// Overlap volume of two voxels in cubic meters; zero if disjoint or touching.
#[inline]
pub fn calculate_intersection_volume(
    pos_a: IncrementPos,
    res_a: Resolution,
    pos_b: IncrementPos,
    res_b: Resolution,
) -> f32 {
    IncrementBounds::from_voxel(pos_a, res_a)
        .intersection_volume(&IncrementBounds::from_voxel(pos_b, res_b))
}

/// Stored voxels in face contact with a voxel, of any size.
pub fn connected_voxels<S>(
    pos: IncrementPos,
    resolution: Resolution,
    storage: &S,
) -> Vec<StoredVoxel>
where
    S: VoxelOccupancy + ?Sized,
{
    let ours = IncrementBounds::from_voxel(pos, resolution);
    storage
        .voxels()
        .into_iter()
        .filter(|voxel| ours.shares_face(&voxel.bounds()))
        .collect()
}
