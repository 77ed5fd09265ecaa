//! Math utilities and helpers.

use glam::Vec3;

use crate::constants::RAY_EPSILON;
use crate::coords::WorldPos;

/// Ray for selection and raycasting operations, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing the direction.
    ///
    /// A zero direction stays zero; traversal treats every axis as parallel.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray starting at a world position
    #[inline]
    pub fn from_world(origin: WorldPos, direction: Vec3) -> Self {
        Self::new(origin.to_vec3(), direction)
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Per-axis reciprocal of the direction.
    ///
    /// Components with magnitude at or below [`RAY_EPSILON`] map to
    /// `1 / RAY_EPSILON` instead of infinity.
    #[inline]
    pub fn inverse_direction(&self) -> Vec3 {
        let inv = |d: f32| {
            if d.abs() > RAY_EPSILON {
                1.0 / d
            } else {
                1.0 / RAY_EPSILON
            }
        };
        Vec3::new(
            inv(self.direction.x),
            inv(self.direction.y),
            inv(self.direction.z),
        )
    }
}

/// Slab test of a ray against an axis-aligned box.
///
/// Returns `(t_near, t_far)` with `t_near` clamped to zero, or `None` when the
/// ray misses or the box lies entirely behind the origin.
pub fn ray_box_intersection(ray: &Ray, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let inv_dir = ray.inverse_direction();

    let t1 = (min - ray.origin) * inv_dir;
    let t2 = (max - ray.origin) * inv_dir;

    let t_min = t1.min(t2);
    let t_max = t1.max(t2);

    let t_near = t_min.max_element().max(0.0);
    let t_far = t_max.min_element();

    if t_near <= t_far && t_far >= 0.0 {
        Some((t_near, t_far))
    } else {
        None
    }
}
