//! Coordinate spaces for the editable volume.
//!
//! Two spaces share one origin and orientation (Y up, ground at Y = 0):
//! - world space, continuous meters, used by rendering and selection
//! - increment space, integer centimeters, the only space voxels are stored in
//!
//! Stored voxel positions use the bottom-center convention: the position is the
//! center of the voxel's bottom face. [`voxel_world_center`] is the single
//! definition of a voxel's geometric center.

use std::ops::{Add, Sub};

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{CM_PER_METER, METERS_PER_CM};
use crate::types::Resolution;

/// Position in increment space (1 cm units).
///
/// Ordering is lexicographic on `(x, y, z)`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Pod,
    Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct IncrementPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl IncrementPos {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a new increment position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Convert to glam IVec3
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Convert to world space
    #[inline]
    pub fn to_world(self) -> WorldPos {
        increment_to_world(self)
    }

    /// Sum of absolute per-axis differences, in centimeters.
    #[inline]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// The six positions one `step` away along each axis, in face order
    /// (+X, -X, +Y, -Y, +Z, -Z).
    pub fn neighbors(self, step: i32) -> [Self; 6] {
        [
            Self::new(self.x + step, self.y, self.z),
            Self::new(self.x - step, self.y, self.z),
            Self::new(self.x, self.y + step, self.z),
            Self::new(self.x, self.y - step, self.z),
            Self::new(self.x, self.y, self.z + step),
            Self::new(self.x, self.y, self.z - step),
        ]
    }
}

impl From<IVec3> for IncrementPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Add<IVec3> for IncrementPos {
    type Output = Self;

    fn add(self, rhs: IVec3) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for IncrementPos {
    type Output = IVec3;

    fn sub(self, rhs: Self) -> IVec3 {
        self.to_ivec3() - rhs.to_ivec3()
    }
}

/// Position in world space (meters).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    /// Create a new world position
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to glam Vec3
    #[inline]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Convert to increment space
    #[inline]
    pub fn to_increment(self) -> IncrementPos {
        world_to_increment(self)
    }
}

impl From<Vec3> for WorldPos {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<WorldPos> for Vec3 {
    fn from(p: WorldPos) -> Self {
        p.to_vec3()
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn meters_to_cm(meters: f32) -> i32 {
    // f32::round rounds half away from zero
    (meters * CM_PER_METER).round() as i32
}

#[inline]
#[allow(clippy::cast_precision_loss)]
fn cm_to_meters(cm: i32) -> f32 {
    cm as f32 * METERS_PER_CM
}

/// Convert world meters to increment centimeters, rounding each axis to the
/// nearest centimeter.
#[inline]
pub fn world_to_increment(world: WorldPos) -> IncrementPos {
    IncrementPos::new(
        meters_to_cm(world.x),
        meters_to_cm(world.y),
        meters_to_cm(world.z),
    )
}

/// Convert increment centimeters to world meters.
#[inline]
pub fn increment_to_world(increment: IncrementPos) -> WorldPos {
    WorldPos::new(
        cm_to_meters(increment.x),
        cm_to_meters(increment.y),
        cm_to_meters(increment.z),
    )
}

/// Snap a world position onto the 1 cm grid.
#[inline]
pub fn snap_to_increment_grid(world: WorldPos) -> WorldPos {
    increment_to_world(world_to_increment(world))
}

/// Workspace extents in increment space for a workspace size in meters.
///
/// X and Z are centered on the origin (half extent truncated to whole
/// centimeters); Y runs from the ground plane to the workspace height.
#[allow(clippy::cast_possible_truncation)]
pub fn workspace_bounds_increment(workspace_size: Vec3) -> (IncrementPos, IncrementPos) {
    let half_x = (workspace_size.x * CM_PER_METER * 0.5) as i32;
    let half_z = (workspace_size.z * CM_PER_METER * 0.5) as i32;
    let height = (workspace_size.y * CM_PER_METER) as i32;

    (
        IncrementPos::new(-half_x, 0, -half_z),
        IncrementPos::new(half_x, height, half_z),
    )
}

/// Check whether an increment position lies inside the workspace (inclusive).
pub fn is_valid_increment_coordinate(pos: IncrementPos, workspace_size: Vec3) -> bool {
    let (min, max) = workspace_bounds_increment(workspace_size);
    (min.x..=max.x).contains(&pos.x)
        && (min.y..=max.y).contains(&pos.y)
        && (min.z..=max.z).contains(&pos.z)
}

/// Check whether a world position lies inside the workspace (inclusive).
pub fn is_valid_world_coordinate(pos: WorldPos, workspace_size: Vec3) -> bool {
    let half_x = workspace_size.x * 0.5;
    let half_z = workspace_size.z * 0.5;

    pos.x >= -half_x
        && pos.x <= half_x
        && pos.y >= 0.0
        && pos.y <= workspace_size.y
        && pos.z >= -half_z
        && pos.z <= half_z
}

/// Geometric center of a voxel stored at `bottom_center`.
///
/// X and Z are already centered; only Y moves up by half the edge length.
pub fn voxel_world_center(bottom_center: IncrementPos, resolution: Resolution) -> WorldPos {
    let base = increment_to_world(bottom_center);
    WorldPos::new(base.x, base.y + resolution.half_size_meters(), base.z)
}
