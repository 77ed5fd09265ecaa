//! Placement validation, grid snapping and face-adjacent placement.
//!
//! Validation answers whether a voxel may be written; it never writes. Checks
//! run in a fixed order and the first failure is reported.

use thiserror::Error;
use tracing::debug;
use voxspace_core::coords::world_to_increment;
use voxspace_core::{IncrementPos, Resolution, WorldPos};

use crate::collision::check_collision_with_grid;
use crate::face::{calculate_placement_position, FaceDirection};
use crate::raycast::RaycastHit;
use crate::storage::VoxelOccupancy;
use crate::workspace::{is_above_ground_plane, WorkspaceBounds};

/// Reason a voxel may not be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Bottom face below Y = 0
    #[error("below ground plane")]
    BelowGround,

    /// Position itself lies outside the workspace
    #[error("outside workspace bounds")]
    OutsideWorkspace,

    /// Position is inside but part of the voxel is not
    #[error("voxel extends outside workspace bounds")]
    ExtendsOutsideWorkspace,

    /// Positive-volume overlap with a stored voxel
    #[error("would overlap with existing voxel")]
    Overlap,
}

/// Check that a voxel may be placed at `pos`.
///
/// Checks, in order: ground plane, position inside the workspace, whole voxel
/// inside the workspace, no overlap with stored voxels.
pub fn validate_placement<S>(
    pos: IncrementPos,
    resolution: Resolution,
    workspace: &WorkspaceBounds,
    storage: &S,
) -> Result<(), PlacementError>
where
    S: VoxelOccupancy + ?Sized,
{
    let outcome = if !is_above_ground_plane(pos) {
        Err(PlacementError::BelowGround)
    } else if !workspace.contains_increment(pos) {
        Err(PlacementError::OutsideWorkspace)
    } else if !workspace.voxel_fits(pos, resolution) {
        Err(PlacementError::ExtendsOutsideWorkspace)
    } else if check_collision_with_grid(pos, resolution, storage) {
        Err(PlacementError::Overlap)
    } else {
        Ok(())
    };

    if let Err(reason) = outcome {
        debug!(?pos, %resolution, %reason, "Placement rejected");
    }
    outcome
}

/// Convert a world position and validate it. Returns the increment position
/// that was checked.
pub fn validate_world_placement<S>(
    world: WorldPos,
    resolution: Resolution,
    workspace: &WorkspaceBounds,
    storage: &S,
) -> Result<IncrementPos, PlacementError>
where
    S: VoxelOccupancy + ?Sized,
{
    let pos = world_to_increment(world);
    validate_placement(pos, resolution, workspace, storage)?;
    Ok(pos)
}

/// Integer division rounding half away from zero.
#[inline]
const fn round_div(value: i32, divisor: i32) -> i32 {
    let half = divisor / 2;
    if value >= 0 {
        (value + half) / divisor
    } else {
        -((-value + half) / divisor)
    }
}

/// Snap a world position to a placement position.
///
/// With `fine` (or at 1 cm) the result is the nearest centimeter. Otherwise X
/// and Z snap to the nearest multiple of the voxel size and Y snaps down to
/// one, so voxels of one size tile without gaps.
pub fn snap_to_grid_aligned(world: WorldPos, resolution: Resolution, fine: bool) -> IncrementPos {
    let pos = world_to_increment(world);
    let size = resolution.size_cm();
    if fine || size == 1 {
        return pos;
    }

    IncrementPos::new(
        round_div(pos.x, size) * size,
        pos.y.div_euclid(size) * size,
        round_div(pos.z, size) * size,
    )
}

/// Position for a new voxel placed against the face of a hit voxel.
///
/// Equal sizes land exactly in the adjacent cell. Otherwise the new voxel
/// touches the hit face with its footprint centered on the hit point, snapped
/// to 1 cm, and side placements are kept on or above the ground plane. A 1 cm
/// voxel cannot sit flush against an X or Z face, so it lands half a
/// centimeter off it.
pub fn placement_on_face(
    hit: &RaycastHit,
    hit_resolution: Resolution,
    placement_resolution: Resolution,
) -> IncrementPos {
    if hit_resolution == placement_resolution {
        return calculate_placement_position(hit.voxel, hit.face, placement_resolution);
    }

    let base = hit.voxel;
    let point = world_to_increment(WorldPos::from(hit.point));
    let hit_size = hit_resolution.size_cm();
    let size = placement_resolution.size_cm();
    let side_y = (point.y - size / 2).max(0);

    // Extents are compared doubled so odd sizes stay exact.
    let beyond_pos = |center: i32| (2 * center + hit_size + size + 1).div_euclid(2);
    let beyond_neg = |center: i32| (2 * center - hit_size - size).div_euclid(2);

    match hit.face {
        FaceDirection::PosY => IncrementPos::new(point.x, base.y + hit_size, point.z),
        FaceDirection::NegY => IncrementPos::new(point.x, base.y - size, point.z),
        FaceDirection::PosX => IncrementPos::new(beyond_pos(base.x), side_y, point.z),
        FaceDirection::NegX => IncrementPos::new(beyond_neg(base.x), side_y, point.z),
        FaceDirection::PosZ => IncrementPos::new(point.x, side_y, beyond_pos(base.z)),
        FaceDirection::NegZ => IncrementPos::new(point.x, side_y, beyond_neg(base.z)),
    }
}
