//! Face directions and face-based placement.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use voxspace_core::{IncrementPos, Resolution};

use crate::bounds::SpatialBounds;

/// Default tolerance for classifying a hit point onto a face, in meters.
pub const DEFAULT_FACE_EPSILON: f32 = 0.01;

/// One of the six axis-aligned voxel faces.
///
/// Canonical index order is +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X (right)
    PosX = 0,
    /// -X (left)
    NegX = 1,
    /// +Y (top)
    PosY = 2,
    /// -Y (bottom)
    NegY = 3,
    /// +Z (back)
    PosZ = 4,
    /// -Z (front)
    NegZ = 5,
}

const FACE_NORMALS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

const FACE_UNIT_OFFSETS: [IVec3; 6] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

const OPPOSITE_FACES: [FaceDirection; 6] = [
    FaceDirection::NegX,
    FaceDirection::PosX,
    FaceDirection::NegY,
    FaceDirection::PosY,
    FaceDirection::NegZ,
    FaceDirection::PosZ,
];

const FACE_NAMES: [&str; 6] = ["PosX", "NegX", "PosY", "NegY", "PosZ", "NegZ"];

impl FaceDirection {
    /// All faces in canonical order.
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Canonical index (0..6)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face at a canonical index, if any.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 6 {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Outward unit normal.
    #[inline]
    pub const fn normal(self) -> Vec3 {
        FACE_NORMALS[self as usize]
    }

    /// Offset to the face-adjacent cell of a voxel of `size_cm`.
    #[inline]
    pub fn offset(self, size_cm: i32) -> IVec3 {
        FACE_UNIT_OFFSETS[self as usize] * size_cm
    }

    /// The face pointing the other way.
    #[inline]
    pub const fn opposite(self) -> Self {
        OPPOSITE_FACES[self as usize]
    }

    /// Axis index (0 = X, 1 = Y, 2 = Z).
    #[inline]
    pub const fn axis(self) -> usize {
        self as usize / 2
    }

    /// True for +X, +Y and +Z.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self as usize % 2 == 0
    }

    /// Short name, e.g. `"NegZ"`.
    #[inline]
    pub const fn name(self) -> &'static str {
        FACE_NAMES[self as usize]
    }
}

/// All six face normals in canonical order.
#[inline]
pub const fn all_normals() -> [Vec3; 6] {
    FACE_NORMALS
}

/// All six face-adjacent offsets for a voxel of `size_cm`, in canonical order.
pub fn all_offsets(size_cm: i32) -> [IVec3; 6] {
    FACE_UNIT_OFFSETS.map(|unit| unit * size_cm)
}

/// Classify a point onto the nearest of the six bounding planes.
///
/// Returns the face and whether its plane lies within `epsilon` of the point.
/// When no plane is within `epsilon` the nearest one is still returned.
pub fn classify_hit_face(
    point: Vec3,
    bounds: &SpatialBounds,
    epsilon: f32,
) -> (FaceDirection, bool) {
    let min = bounds.min();
    let max = bounds.max();

    // Tie order: -X, +X, -Y, +Y, -Z, +Z
    let candidates = [
        ((point.x - min.x).abs(), FaceDirection::NegX),
        ((point.x - max.x).abs(), FaceDirection::PosX),
        ((point.y - min.y).abs(), FaceDirection::NegY),
        ((point.y - max.y).abs(), FaceDirection::PosY),
        ((point.z - min.z).abs(), FaceDirection::NegZ),
        ((point.z - max.z).abs(), FaceDirection::PosZ),
    ];

    let (distance, face) = candidates
        .iter()
        .copied()
        .fold(candidates[0], |best, c| if c.0 < best.0 { c } else { best });

    (face, distance < epsilon)
}

/// Face of `bounds` a hit point lies on, falling back to the nearest plane.
#[inline]
pub fn determine_face_from_hit(point: Vec3, bounds: &SpatialBounds, epsilon: f32) -> FaceDirection {
    classify_hit_face(point, bounds, epsilon).0
}

/// Face matching the dominant axis of a direction.
pub fn determine_face_from_ray_direction(direction: Vec3) -> FaceDirection {
    let abs = direction.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        if direction.x > 0.0 {
            FaceDirection::PosX
        } else {
            FaceDirection::NegX
        }
    } else if abs.y >= abs.z {
        if direction.y > 0.0 {
            FaceDirection::PosY
        } else {
            FaceDirection::NegY
        }
    } else if direction.z > 0.0 {
        FaceDirection::PosZ
    } else {
        FaceDirection::NegZ
    }
}

/// Position of the same-size voxel adjacent to `pos` across `face`.
#[inline]
pub fn calculate_placement_position(
    pos: IncrementPos,
    face: FaceDirection,
    resolution: Resolution,
) -> IncrementPos {
    pos + face.offset(resolution.size_cm())
}
