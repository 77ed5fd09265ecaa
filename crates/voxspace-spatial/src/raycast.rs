//! Ray queries against single voxels, voxel storage and the workspace box.
//!
//! Grid queries scan one storage snapshot and test every voxel of the
//! requested resolution with the slab method. [`GridTraversal`] walks the
//! cells of a resolution's grid along a ray with a 3D DDA.

use std::cmp::Ordering;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};
use voxspace_core::constants::RAY_EPSILON;
use voxspace_core::coords::{is_valid_world_coordinate, world_to_increment};
use voxspace_core::{IncrementPos, Ray, Resolution, WorldPos};

use crate::bounds::SpatialBounds;
use crate::face::{determine_face_from_hit, FaceDirection, DEFAULT_FACE_EPSILON};
use crate::storage::{StoredVoxel, VoxelOccupancy};

/// Hard cap on cells visited by one traversal.
pub const MAX_TRAVERSAL_STEPS: usize = 10_000;

/// A ray hit on a voxel or on the workspace box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaycastHit {
    /// Distance along the ray, in meters
    pub distance: f32,
    /// Hit voxel position (for workspace hits, the hit point in increments)
    pub voxel: IncrementPos,
    /// Face the ray entered (or exited, when starting inside)
    pub face: FaceDirection,
    /// World-space hit point
    pub point: Vec3,
    /// Outward normal of `face`
    pub normal: Vec3,
}

impl RaycastHit {
    fn new(distance: f32, voxel: IncrementPos, face: FaceDirection, point: Vec3) -> Self {
        Self {
            distance,
            voxel,
            face,
            point,
            normal: face.normal(),
        }
    }
}

/// Parametric hit on a box: the entry distance, or the exit distance when the
/// ray starts inside. `None` when the box is missed or behind the origin.
#[inline]
fn hit_distance(ray: &Ray, bounds: &SpatialBounds) -> Option<f32> {
    let (t_min, t_max) = bounds.intersect_ray(ray)?;
    let t = if t_min > 0.0 { t_min } else { t_max };
    (t >= 0.0).then_some(t)
}

/// Intersect a ray with a single voxel.
pub fn raycast_voxel(ray: &Ray, pos: IncrementPos, resolution: Resolution) -> Option<RaycastHit> {
    let bounds = SpatialBounds::from_increment(pos, resolution);
    let t = hit_distance(ray, &bounds)?;
    let point = ray.at(t);
    let face = determine_face_from_hit(point, &bounds, DEFAULT_FACE_EPSILON);
    Some(RaycastHit::new(t, pos, face, point))
}

/// Hits on every stored voxel of `resolution` within `max_distance`, unordered.
fn grid_hits(
    ray: &Ray,
    snapshot: Vec<StoredVoxel>,
    resolution: Resolution,
    max_distance: f32,
) -> impl Iterator<Item = RaycastHit> + '_ {
    snapshot
        .into_iter()
        .filter(move |voxel| voxel.resolution == resolution)
        .filter_map(move |voxel| raycast_voxel(ray, voxel.position, resolution))
        .filter(move |hit| hit.distance <= max_distance)
}

fn by_distance(a: &RaycastHit, b: &RaycastHit) -> Ordering {
    a.distance.total_cmp(&b.distance)
}

/// Closest hit among stored voxels of `resolution` within `max_distance`.
#[tracing::instrument(level = "trace", skip_all)]
pub fn raycast_grid<S>(
    ray: &Ray,
    storage: &S,
    resolution: Resolution,
    max_distance: f32,
) -> Option<RaycastHit>
where
    S: VoxelOccupancy + ?Sized,
{
    grid_hits(ray, storage.voxels(), resolution, max_distance).min_by(by_distance)
}

/// Check whether the ray hits any stored voxel of `resolution` within
/// `max_distance`.
pub fn ray_intersects_grid<S>(
    ray: &Ray,
    storage: &S,
    resolution: Resolution,
    max_distance: f32,
) -> bool
where
    S: VoxelOccupancy + ?Sized,
{
    grid_hits(ray, storage.voxels(), resolution, max_distance)
        .next()
        .is_some()
}

/// Every hit among stored voxels of `resolution` within `max_distance`,
/// nearest first. With `max_hits`, only the nearest that many are returned.
#[tracing::instrument(level = "trace", skip_all)]
pub fn raycast_all_hits<S>(
    ray: &Ray,
    storage: &S,
    resolution: Resolution,
    max_distance: f32,
    max_hits: Option<usize>,
) -> Vec<RaycastHit>
where
    S: VoxelOccupancy + ?Sized,
{
    let mut hits: Vec<_> = grid_hits(ray, storage.voxels(), resolution, max_distance).collect();
    hits.sort_by(by_distance);
    if let Some(cap) = max_hits {
        hits.truncate(cap);
    }
    hits
}

/// World-space box of a workspace centered on the origin in X and Z.
fn workspace_box(workspace_size: Vec3) -> SpatialBounds {
    let half = workspace_size * 0.5;
    SpatialBounds::from_min_max(
        Vec3::new(-half.x, 0.0, -half.z),
        Vec3::new(half.x, workspace_size.y, half.z),
    )
}

/// Intersect a ray with the workspace box.
///
/// The returned `voxel` is the hit point rounded to increments.
pub fn raycast_workspace(ray: &Ray, workspace_size: Vec3) -> Option<RaycastHit> {
    let bounds = workspace_box(workspace_size);
    let t = hit_distance(ray, &bounds)?;
    let point = ray.at(t);
    let face = determine_face_from_hit(point, &bounds, DEFAULT_FACE_EPSILON);
    Some(RaycastHit::new(
        t,
        world_to_increment(WorldPos::from(point)),
        face,
        point,
    ))
}

/// Entry and exit points of a ray through `bounds`.
///
/// The entry point is the ray origin when it starts inside.
pub fn ray_voxel_intersection(ray: &Ray, bounds: &SpatialBounds) -> Option<(Vec3, Vec3)> {
    let (t_min, t_max) = bounds.intersect_ray(ray)?;
    Some((ray.at(t_min), ray.at(t_max)))
}

/// Check whether a world point lies inside a workspace of `workspace_size`.
#[inline]
pub fn is_in_workspace(point: Vec3, workspace_size: Vec3) -> bool {
    is_valid_world_coordinate(WorldPos::from(point), workspace_size)
}

/// Iterator over the cells of a resolution's grid pierced by a ray.
///
/// Cells are yielded as voxel positions of that resolution, together with the
/// distance at which the ray enters them (zero for the starting cell). X and Z
/// cells are centered on multiples of the voxel size; Y cells start at them.
/// Traversal ends past `max_distance` or after [`MAX_TRAVERSAL_STEPS`].
#[derive(Clone, Debug)]
pub struct GridTraversal {
    /// Current cell index
    cell: IVec3,
    /// Step direction per axis (-1, 0 or 1)
    step: IVec3,
    /// Distance at which the ray crosses the next boundary, per axis
    t_max: Vec3,
    /// Distance between boundaries, per axis
    t_delta: Vec3,
    size_cm: i32,
    max_distance: f32,
    steps: usize,
    first: bool,
    done: bool,
}

impl GridTraversal {
    /// Create a traversal along `ray` over the grid of `resolution`.
    pub fn new(ray: &Ray, resolution: Resolution, max_distance: f32) -> Self {
        let size = resolution.size_meters();
        let half = size * 0.5;
        // Shift X/Z so cell boundaries fall on voxel faces
        let relative = ray.origin + Vec3::new(half, 0.0, half);
        let cell = (relative / size).floor().as_ivec3();

        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::MAX);
        let mut t_delta = Vec3::splat(f32::MAX);

        for axis in 0..3 {
            let dir = ray.direction[axis];
            if dir.abs() <= RAY_EPSILON {
                continue;
            }
            step[axis] = if dir > 0.0 { 1 } else { -1 };
            t_delta[axis] = size / dir.abs();

            #[allow(clippy::cast_precision_loss)]
            let boundary = if dir > 0.0 {
                (cell[axis] + 1) as f32 * size
            } else {
                cell[axis] as f32 * size
            };
            t_max[axis] = (boundary - relative[axis]) / dir;
        }

        Self {
            cell,
            step,
            t_max,
            t_delta,
            size_cm: resolution.size_cm(),
            max_distance,
            steps: 0,
            first: true,
            done: false,
        }
    }

    #[inline]
    fn cell_position(&self) -> IncrementPos {
        IncrementPos::from(self.cell * self.size_cm)
    }

    /// Axis whose next boundary is closest.
    #[inline]
    fn next_axis(&self) -> usize {
        let t = self.t_max;
        if t.x < t.y && t.x < t.z {
            0
        } else if t.y < t.z {
            1
        } else {
            2
        }
    }
}

impl Iterator for GridTraversal {
    type Item = (IncrementPos, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.first {
            self.first = false;
            if self.max_distance < 0.0 {
                self.done = true;
                return None;
            }
            return Some((self.cell_position(), 0.0));
        }

        if self.steps >= MAX_TRAVERSAL_STEPS {
            warn!(
                steps = self.steps,
                max_distance = self.max_distance,
                "Grid traversal hit step cap"
            );
            self.done = true;
            return None;
        }

        let axis = self.next_axis();
        let t_entry = self.t_max[axis];

        // Every axis parallel: only the starting cell is pierced
        if t_entry == f32::MAX {
            trace!("Degenerate ray direction, traversal finished");
            self.done = true;
            return None;
        }

        if t_entry > self.max_distance {
            trace!(steps = self.steps, "Traversal reached max distance");
            self.done = true;
            return None;
        }

        self.cell[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];
        self.steps += 1;

        Some((self.cell_position(), t_entry))
    }
}

/// Positions of the grid cells of `resolution` pierced by the ray within
/// `max_distance`, in traversal order.
pub fn voxels_along_ray(ray: &Ray, resolution: Resolution, max_distance: f32) -> Vec<IncrementPos> {
    GridTraversal::new(ray, resolution, max_distance)
        .map(|(pos, _)| pos)
        .collect()
}
