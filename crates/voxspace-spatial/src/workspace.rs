//! Workspace bounds and ground-plane validation.
//!
//! The workspace is centered on the origin in X and Z and runs from the ground
//! plane (Y = 0) up to its height. Each axis is between
//! [`MIN_WORKSPACE_SIZE`] and [`MAX_WORKSPACE_SIZE`] meters.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxspace_core::constants::{MAX_WORKSPACE_SIZE, MIN_WORKSPACE_SIZE};
use voxspace_core::coords::workspace_bounds_increment;
use voxspace_core::{Error, IncrementPos, Resolution, Result, WorldPos};

/// Check that every axis of a workspace size lies within the supported range.
pub fn is_valid_workspace_size(size: Vec3) -> bool {
    size.cmpge(Vec3::splat(MIN_WORKSPACE_SIZE)).all()
        && size.cmple(Vec3::splat(MAX_WORKSPACE_SIZE)).all()
}

/// Check that a position is on or above the ground plane.
#[inline]
pub const fn is_above_ground_plane(pos: IncrementPos) -> bool {
    pos.y >= 0
}

/// Lift a position below the ground plane onto it.
#[inline]
pub const fn clamp_to_ground_plane(pos: IncrementPos) -> IncrementPos {
    if pos.y < 0 {
        IncrementPos::new(pos.x, 0, pos.z)
    } else {
        pos
    }
}

/// Per-bound amounts by which a voxel's extent exceeds the workspace, in cm.
///
/// All six values are non-negative; a voxel fits when every value is zero.
/// Extents of 1 cm voxels fall on half centimeters; those overhangs are
/// rounded up to a whole centimeter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overhang {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Overhang {
    /// True if the voxel does not exceed any bound.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.min_x == 0
            && self.max_x == 0
            && self.min_y == 0
            && self.max_y == 0
            && self.min_z == 0
            && self.max_z == 0
    }
}

/// Bounds of the editable workspace in both coordinate spaces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    size: Vec3,
    min_world: Vec3,
    max_world: Vec3,
    min_increment: IncrementPos,
    max_increment: IncrementPos,
}

impl WorkspaceBounds {
    /// Derive bounds for a workspace size in meters. Never fails; check the
    /// size with [`is_valid_workspace_size`] or use [`WorkspaceBounds::try_new`].
    pub fn new(size: Vec3) -> Self {
        let half_x = size.x * 0.5;
        let half_z = size.z * 0.5;
        let (min_increment, max_increment) = workspace_bounds_increment(size);

        Self {
            size,
            min_world: Vec3::new(-half_x, 0.0, -half_z),
            max_world: Vec3::new(half_x, size.y, half_z),
            min_increment,
            max_increment,
        }
    }

    /// Derive bounds, rejecting sizes outside the supported range.
    pub fn try_new(size: Vec3) -> Result<Self> {
        if is_valid_workspace_size(size) {
            Ok(Self::new(size))
        } else {
            Err(Error::InvalidWorkspaceSize(format!(
                "{}x{}x{} m, each axis must be within [{MIN_WORKSPACE_SIZE}, {MAX_WORKSPACE_SIZE}] m",
                size.x, size.y, size.z
            )))
        }
    }

    /// Workspace size in meters
    #[inline]
    pub const fn size(&self) -> Vec3 {
        self.size
    }

    /// Minimum corner in world space
    #[inline]
    pub const fn min_world(&self) -> Vec3 {
        self.min_world
    }

    /// Maximum corner in world space
    #[inline]
    pub const fn max_world(&self) -> Vec3 {
        self.max_world
    }

    /// Minimum corner in increment space
    #[inline]
    pub const fn min_increment(&self) -> IncrementPos {
        self.min_increment
    }

    /// Maximum corner in increment space
    #[inline]
    pub const fn max_increment(&self) -> IncrementPos {
        self.max_increment
    }

    /// Check if a position lies inside the workspace (inclusive).
    pub fn contains_increment(&self, pos: IncrementPos) -> bool {
        let (min, max) = (self.min_increment, self.max_increment);
        (min.x..=max.x).contains(&pos.x)
            && (min.y..=max.y).contains(&pos.y)
            && (min.z..=max.z).contains(&pos.z)
    }

    /// Check if a world position lies inside the workspace (inclusive).
    pub fn contains_world(&self, pos: WorldPos) -> bool {
        let p = pos.to_vec3();
        p.cmpge(self.min_world).all() && p.cmple(self.max_world).all()
    }

    /// Clamp a position into the workspace.
    pub fn clamp(&self, pos: IncrementPos) -> IncrementPos {
        let (min, max) = (self.min_increment, self.max_increment);
        IncrementPos::new(
            pos.x.clamp(min.x, max.x),
            pos.y.clamp(min.y, max.y),
            pos.z.clamp(min.z, max.z),
        )
    }

    /// Check whether a whole voxel fits inside the workspace.
    pub fn voxel_fits(&self, pos: IncrementPos, resolution: Resolution) -> bool {
        self.overhang(pos, resolution).is_zero()
    }

    /// Amounts by which a voxel exceeds each of the six bounds.
    pub fn overhang(&self, pos: IncrementPos, resolution: Resolution) -> Overhang {
        let size = resolution.size_cm();
        let (min, max) = (self.min_increment, self.max_increment);

        // X/Z extents are compared doubled so 1 cm voxels stay exact.
        let below = |voxel_min2: i32, bound: i32| half_cm_excess(2 * bound - voxel_min2);
        let above = |voxel_max2: i32, bound: i32| half_cm_excess(voxel_max2 - 2 * bound);

        Overhang {
            min_x: below(2 * pos.x - size, min.x),
            max_x: above(2 * pos.x + size, max.x),
            min_y: (min.y - pos.y).max(0),
            max_y: (pos.y + size - max.y).max(0),
            min_z: below(2 * pos.z - size, min.z),
            max_z: above(2 * pos.z + size, max.z),
        }
    }

    /// Nearest position at which the voxel fits, moving only inward.
    ///
    /// The position is first lifted onto the ground plane, then each axis is
    /// shifted by its overhang. A voxel larger than the workspace on some axis
    /// is aligned to that axis' minimum bound, so the result never sits below
    /// the ground plane.
    pub fn find_nearest_valid_position(
        &self,
        pos: IncrementPos,
        resolution: Resolution,
    ) -> IncrementPos {
        let grounded = clamp_to_ground_plane(pos);
        let overhang = self.overhang(grounded, resolution);
        if overhang.is_zero() {
            return grounded;
        }

        let size = resolution.size_cm();
        let min = self.min_increment;
        // Lowest position per axis with the voxel's minimum extent inside the bound
        let lowest_xz = |bound: i32| bound + (size + 1) / 2;

        let shift = |value: i32, below: i32, above: i32, lowest: i32| {
            if below > 0 {
                value + below
            } else {
                (value - above).max(lowest)
            }
        };

        IncrementPos::new(
            shift(grounded.x, overhang.min_x, overhang.max_x, lowest_xz(min.x)),
            shift(grounded.y, overhang.min_y, overhang.max_y, min.y),
            shift(grounded.z, overhang.min_z, overhang.max_z, lowest_xz(min.z)),
        )
    }

    /// Largest resolution that fits at `pos`, if any.
    pub fn max_fitting_resolution(&self, pos: IncrementPos) -> Option<Resolution> {
        Resolution::ALL
            .iter()
            .rev()
            .copied()
            .find(|&res| self.voxel_fits(pos, res))
    }
}

/// Round a positive half-centimeter excess up to whole centimeters.
#[inline]
const fn half_cm_excess(excess_half_cm: i32) -> i32 {
    if excess_half_cm > 0 {
        (excess_half_cm + 1) / 2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_meter() -> WorkspaceBounds {
        WorkspaceBounds::new(Vec3::splat(5.0))
    }

    #[test]
    fn size_range() {
        assert!(is_valid_workspace_size(Vec3::splat(2.0)));
        assert!(is_valid_workspace_size(Vec3::new(8.0, 2.0, 5.0)));
        assert!(!is_valid_workspace_size(Vec3::new(1.99, 5.0, 5.0)));
        assert!(!is_valid_workspace_size(Vec3::new(5.0, 8.01, 5.0)));

        assert!(WorkspaceBounds::try_new(Vec3::splat(5.0)).is_ok());
        assert!(matches!(
            WorkspaceBounds::try_new(Vec3::splat(9.0)),
            Err(Error::InvalidWorkspaceSize(_))
        ));
    }

    #[test]
    fn derived_bounds() {
        let bounds = WorkspaceBounds::new(Vec3::new(4.0, 3.0, 6.0));
        assert_eq!(bounds.min_increment(), IncrementPos::new(-200, 0, -300));
        assert_eq!(bounds.max_increment(), IncrementPos::new(200, 300, 300));
        assert_eq!(bounds.min_world(), Vec3::new(-2.0, 0.0, -3.0));
        assert_eq!(bounds.max_world(), Vec3::new(2.0, 3.0, 3.0));
    }

    #[test]
    fn voxel_fits_at_edge() {
        let bounds = five_meter();
        assert!(bounds.voxel_fits(IncrementPos::new(234, 0, 0), Resolution::Size32cm));
        assert!(!bounds.voxel_fits(IncrementPos::new(235, 0, 0), Resolution::Size32cm));
        assert!(!bounds.voxel_fits(IncrementPos::new(0, -1, 0), Resolution::Size1cm));
        assert!(bounds.voxel_fits(IncrementPos::new(0, 468, 0), Resolution::Size32cm));
        assert!(!bounds.voxel_fits(IncrementPos::new(0, 469, 0), Resolution::Size32cm));
    }

    #[test]
    fn one_cm_voxel_extent_is_exact() {
        let bounds = five_meter();
        // Extent 249.5..250.5 crosses the 250 bound by half a centimeter.
        assert!(!bounds.voxel_fits(IncrementPos::new(250, 0, 0), Resolution::Size1cm));
        assert_eq!(
            bounds.overhang(IncrementPos::new(250, 0, 0), Resolution::Size1cm).max_x,
            1
        );
        assert!(bounds.voxel_fits(IncrementPos::new(249, 0, 0), Resolution::Size1cm));
    }

    #[test]
    fn overhang_per_bound() {
        let bounds = five_meter();
        let overhang = bounds.overhang(IncrementPos::new(-240, -5, 245), Resolution::Size32cm);
        assert_eq!(overhang.min_x, 6);
        assert_eq!(overhang.max_x, 0);
        assert_eq!(overhang.min_y, 5);
        assert_eq!(overhang.max_y, 0);
        assert_eq!(overhang.min_z, 0);
        assert_eq!(overhang.max_z, 11);
        assert!(!overhang.is_zero());
    }

    #[test]
    fn nearest_valid_moves_inward() {
        let bounds = five_meter();
        let pos = bounds
            .find_nearest_valid_position(IncrementPos::new(-240, -5, 245), Resolution::Size32cm);
        assert_eq!(pos, IncrementPos::new(-234, 0, 234));
        assert!(bounds.voxel_fits(pos, Resolution::Size32cm));

        let already = IncrementPos::new(10, 10, 10);
        assert_eq!(bounds.find_nearest_valid_position(already, Resolution::Size8cm), already);

        let top = bounds
            .find_nearest_valid_position(IncrementPos::new(0, 490, 0), Resolution::Size64cm);
        assert_eq!(top, IncrementPos::new(0, 436, 0));
    }

    #[test]
    fn nearest_valid_for_oversized_voxel_stays_grounded() {
        let low = WorkspaceBounds::new(Vec3::new(5.0, 2.0, 5.0));
        let pos = low.find_nearest_valid_position(IncrementPos::ZERO, Resolution::Size256cm);
        assert_eq!(pos, IncrementPos::ZERO);
        assert!(is_above_ground_plane(pos));

        let lifted =
            low.find_nearest_valid_position(IncrementPos::new(0, 150, 0), Resolution::Size256cm);
        assert_eq!(lifted.y, 0);

        // Wider and taller than a 2 m workspace: aligned to the minimum bounds
        let small = WorkspaceBounds::new(Vec3::splat(2.0));
        let pos =
            small.find_nearest_valid_position(IncrementPos::new(50, 30, 0), Resolution::Size256cm);
        assert_eq!(pos, IncrementPos::new(28, 0, 28));
        let overhang = small.overhang(pos, Resolution::Size256cm);
        assert_eq!((overhang.min_x, overhang.min_y, overhang.min_z), (0, 0, 0));
    }

    #[test]
    fn max_fitting_resolution_prefers_largest() {
        let bounds = five_meter();
        assert_eq!(
            bounds.max_fitting_resolution(IncrementPos::ZERO),
            Some(Resolution::Size256cm)
        );
        assert_eq!(
            bounds.max_fitting_resolution(IncrementPos::new(240, 0, 0)),
            Some(Resolution::Size16cm)
        );
        assert_eq!(bounds.max_fitting_resolution(IncrementPos::new(0, -1, 0)), None);
    }

    #[test]
    fn containment_and_clamp() {
        let bounds = five_meter();
        assert!(bounds.contains_increment(IncrementPos::new(250, 500, -250)));
        assert!(!bounds.contains_increment(IncrementPos::new(0, -1, 0)));
        assert!(bounds.contains_world(WorldPos::new(-2.5, 0.0, 2.5)));
        assert!(!bounds.contains_world(WorldPos::new(2.6, 1.0, 0.0)));
        assert_eq!(
            bounds.clamp(IncrementPos::new(400, -3, -900)),
            IncrementPos::new(250, 0, -250)
        );
    }

    #[test]
    fn ground_plane() {
        assert!(is_above_ground_plane(IncrementPos::ZERO));
        assert!(!is_above_ground_plane(IncrementPos::new(0, -1, 0)));
        assert_eq!(
            clamp_to_ground_plane(IncrementPos::new(4, -20, 5)),
            IncrementPos::new(4, 0, 5)
        );
    }
}
