//! Axis-aligned voxel bounds.
//!
//! A voxel's stored position is the center of its bottom face, so its box runs
//! `size / 2` either side of the position on X and Z and `size` upward on Y.
//!
//! Two representations are provided:
//! - [`SpatialBounds`], world-space `f32` bounds for rendering and ray queries
//! - [`IncrementBounds`], exact integer bounds for collision arithmetic

use glam::{IVec3, Vec3};
use voxspace_core::coords::increment_to_world;
use voxspace_core::math::ray_box_intersection;
use voxspace_core::{IncrementPos, Ray, Resolution, WorldPos};

use crate::face::FaceDirection;

/// World-space axis-aligned bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialBounds {
    min: Vec3,
    max: Vec3,
}

impl SpatialBounds {
    /// Bounds of a cube with its bottom-face center at `bottom_center`.
    pub fn from_world(bottom_center: WorldPos, size: f32) -> Self {
        let base = bottom_center.to_vec3();
        let half = size * 0.5;
        Self {
            min: Vec3::new(base.x - half, base.y, base.z - half),
            max: Vec3::new(base.x + half, base.y + size, base.z + half),
        }
    }

    /// Bounds of a voxel stored at `pos`.
    pub fn from_increment(pos: IncrementPos, resolution: Resolution) -> Self {
        Self::from_world(increment_to_world(pos), resolution.size_meters())
    }

    /// Bounds from explicit corners. Corners are reordered per axis if needed.
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Minimum corner
    #[inline]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    #[inline]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Geometric center
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Center of the bottom face; equals the stored voxel position.
    #[inline]
    pub fn bottom_center(&self) -> Vec3 {
        let c = self.center();
        Vec3::new(c.x, self.min.y, c.z)
    }

    /// Extent along each axis
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds, faces included.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check for positive-volume overlap.
    ///
    /// Bounds that only share a face plane do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y
            || self.max.z <= other.min.z
            || self.min.z >= other.max.z)
    }

    /// Ray intersection, returns `(t_min, t_max)` or `None` if no intersection.
    ///
    /// `t_min` is zero when the ray starts inside the bounds.
    #[inline]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        ray_box_intersection(ray, self.min, self.max)
    }

    /// Center of the given face.
    pub fn face_center(&self, face: FaceDirection) -> Vec3 {
        self.center() + face.normal() * (self.size() * 0.5)
    }

    /// Outward normal of the given face.
    #[inline]
    pub fn face_normal(&self, face: FaceDirection) -> Vec3 {
        face.normal()
    }

    /// Volume of the overlap box in cubic meters, zero if disjoint or touching.
    pub fn intersection_volume(&self, other: &Self) -> f32 {
        let extent = (self.max.min(other.max) - self.min.max(other.min)).max(Vec3::ZERO);
        extent.x * extent.y * extent.z
    }
}

/// Exact voxel bounds in half-centimeter units.
///
/// A 1 cm voxel has half-centimeter extents on X and Z, so coordinates are
/// stored doubled. Every comparison and volume computed from these bounds is
/// exact for all resolution pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IncrementBounds {
    min: IVec3,
    max: IVec3,
}

impl IncrementBounds {
    /// Bounds of a voxel stored at `pos`.
    pub const fn from_voxel(pos: IncrementPos, resolution: Resolution) -> Self {
        let size = resolution.size_cm();
        Self {
            min: IVec3::new(2 * pos.x - size, 2 * pos.y, 2 * pos.z - size),
            max: IVec3::new(2 * pos.x + size, 2 * pos.y + 2 * size, 2 * pos.z + size),
        }
    }

    /// Minimum corner, half-centimeter units
    #[inline]
    pub const fn min_half_cm(&self) -> IVec3 {
        self.min
    }

    /// Maximum corner, half-centimeter units
    #[inline]
    pub const fn max_half_cm(&self) -> IVec3 {
        self.max
    }

    /// Bottom face height in centimeters.
    #[inline]
    pub const fn bottom_cm(&self) -> i32 {
        self.min.y / 2
    }

    /// Top face height in centimeters.
    #[inline]
    pub const fn top_cm(&self) -> i32 {
        self.max.y / 2
    }

    /// Check for positive-volume overlap; touching faces do not count.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y
            || self.max.z <= other.min.z
            || self.min.z >= other.max.z)
    }

    /// Check for positive-area overlap of the X/Z footprints.
    #[inline]
    pub const fn overlaps_xz(&self, other: &Self) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// Check whether the two boxes touch along a face with a positive-area
    /// contact patch and do not overlap.
    pub fn shares_face(&self, other: &Self) -> bool {
        let overlap = self.max.min(other.max) - self.min.max(other.min);
        let touching = overlap.cmpeq(IVec3::ZERO);
        let positive = overlap.cmpgt(IVec3::ZERO);
        // Exactly one axis touches, the other two overlap.
        touching.bitmask().count_ones() == 1 && positive.bitmask().count_ones() == 2
    }

    /// Overlap volume in cubic meters, zero if disjoint or touching.
    #[allow(clippy::cast_precision_loss)]
    pub fn intersection_volume(&self, other: &Self) -> f32 {
        let extent = (self.max.min(other.max) - self.min.max(other.min)).max(IVec3::ZERO);
        let half_cm3 = i64::from(extent.x) * i64::from(extent.y) * i64::from(extent.z);
        // (0.5 cm)^3 = 0.125 cm^3 = 1.25e-7 m^3
        half_cm3 as f32 * 1.25e-7
    }

    /// Convert to world-space bounds.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_spatial(&self) -> SpatialBounds {
        let scale = |v: IVec3| v.as_vec3() * 0.005;
        SpatialBounds::from_min_max(scale(self.min), scale(self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn voxel(x: i32, y: i32, z: i32, res: Resolution) -> IncrementBounds {
        IncrementBounds::from_voxel(IncrementPos::new(x, y, z), res)
    }

    #[test]
    fn bottom_center_convention() {
        let bounds =
            SpatialBounds::from_increment(IncrementPos::new(100, 50, -100), Resolution::Size32cm);
        assert_abs_diff_eq!(bounds.min().x, 0.84, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.max().x, 1.16, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.min().y, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.max().y, 0.82, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.center().y, 0.66, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.bottom_center().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn min_y_equals_stored_y() {
        for res in Resolution::ALL {
            let pos = IncrementPos::new(3, 17, -9);
            let bounds = IncrementBounds::from_voxel(pos, res);
            assert_eq!(bounds.bottom_cm(), pos.y);
            assert_eq!(bounds.top_cm(), pos.y + res.size_cm());
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let bounds = SpatialBounds::from_world(WorldPos::new(0.0, 0.0, 0.0), 1.0);
        assert!(bounds.contains(Vec3::new(0.5, 1.0, -0.5)));
        assert!(bounds.contains(Vec3::new(0.0, 0.5, 0.0)));
        assert!(!bounds.contains(Vec3::new(0.51, 0.5, 0.0)));
        assert!(!bounds.contains(Vec3::new(0.0, -0.01, 0.0)));
    }

    #[test]
    fn touching_is_not_intersecting() {
        let a = SpatialBounds::from_world(WorldPos::new(0.0, 0.0, 0.0), 1.0);
        let b = SpatialBounds::from_world(WorldPos::new(1.0, 0.0, 0.0), 1.0);
        let c = SpatialBounds::from_world(WorldPos::new(0.9, 0.0, 0.0), 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(a.intersects(&c), c.intersects(&a));
    }

    #[test]
    fn exact_bounds_for_one_cm() {
        let a = voxel(0, 0, 0, Resolution::Size1cm);
        let b = voxel(1, 0, 0, Resolution::Size1cm);
        assert!(!a.intersects(&b));
        assert!(a.shares_face(&b));

        let big = voxel(16, 0, 16, Resolution::Size32cm);
        assert!(a.intersects(&big));
    }

    #[test]
    fn exact_intersection_symmetry() {
        let positions = [-48, -17, -16, 0, 5, 16, 31, 32, 48];
        for &x in &positions {
            for &z in &positions {
                for res_a in [Resolution::Size1cm, Resolution::Size16cm, Resolution::Size32cm] {
                    let a = voxel(0, 0, 0, res_a);
                    let b = voxel(x, 0, z, Resolution::Size32cm);
                    assert_eq!(a.intersects(&b), b.intersects(&a));
                }
            }
        }
    }

    #[test]
    fn ray_intersection_slab() {
        let bounds = SpatialBounds::from_increment(IncrementPos::ZERO, Resolution::Size32cm);

        let ray = Ray::new(Vec3::new(0.0, 0.16, -1.0), Vec3::Z);
        let (t_min, t_max) = bounds.intersect_ray(&ray).unwrap();
        assert_abs_diff_eq!(t_min, 0.84, epsilon = 1e-5);
        assert_abs_diff_eq!(t_max, 1.16, epsilon = 1e-5);

        let miss = Ray::new(Vec3::new(1.0, 0.16, -1.0), Vec3::Z);
        assert!(bounds.intersect_ray(&miss).is_none());

        let inside = Ray::new(Vec3::new(0.0, 0.16, 0.0), Vec3::X);
        let (t_min, t_max) = bounds.intersect_ray(&inside).unwrap();
        assert_eq!(t_min, 0.0);
        assert_abs_diff_eq!(t_max, 0.16, epsilon = 1e-5);
    }

    #[test]
    fn face_centers() {
        let bounds = SpatialBounds::from_world(WorldPos::new(1.0, 0.0, 2.0), 0.32);
        let expect = [
            (FaceDirection::PosX, Vec3::new(1.16, 0.16, 2.0)),
            (FaceDirection::NegX, Vec3::new(0.84, 0.16, 2.0)),
            (FaceDirection::PosY, Vec3::new(1.0, 0.32, 2.0)),
            (FaceDirection::NegY, Vec3::new(1.0, 0.0, 2.0)),
            (FaceDirection::PosZ, Vec3::new(1.0, 0.16, 2.16)),
            (FaceDirection::NegZ, Vec3::new(1.0, 0.16, 1.84)),
        ];
        for (face, center) in expect {
            let got = bounds.face_center(face);
            assert_abs_diff_eq!(got.x, center.x, epsilon = 1e-5);
            assert_abs_diff_eq!(got.y, center.y, epsilon = 1e-5);
            assert_abs_diff_eq!(got.z, center.z, epsilon = 1e-5);
            assert_eq!(bounds.face_normal(face), face.normal());
        }
    }

    #[test]
    fn intersection_volumes_agree() {
        let a = voxel(0, 0, 0, Resolution::Size32cm);
        let b = voxel(16, 0, 0, Resolution::Size32cm);
        // 16 x 32 x 32 cm overlap
        assert_abs_diff_eq!(a.intersection_volume(&b), 0.16 * 0.32 * 0.32, epsilon = 1e-7);
        assert_abs_diff_eq!(
            a.to_spatial().intersection_volume(&b.to_spatial()),
            a.intersection_volume(&b),
            epsilon = 1e-6
        );

        let touching = voxel(32, 0, 0, Resolution::Size32cm);
        assert_eq!(a.intersection_volume(&touching), 0.0);
    }

    #[test]
    fn footprint_overlap() {
        let below = voxel(0, 0, 0, Resolution::Size32cm);
        let above = voxel(10, 32, -10, Resolution::Size16cm);
        let beside = voxel(40, 32, 0, Resolution::Size16cm);
        assert!(below.overlaps_xz(&above));
        assert!(!below.overlaps_xz(&beside));
    }
}
