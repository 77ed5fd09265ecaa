//! Spatial reasoning for the voxspace editing core.
//!
//! This crate decides whether voxels of the ten supported sizes may be placed,
//! and what a selection ray hits:
//! - Voxel bounds in world space and in exact half-centimeter units
//! - Face directions and face-adjacent placement
//! - Workspace bounds and the ground plane
//! - Multi-resolution collision, stability and free-position search
//! - Ray hits on voxels, stored voxels and the workspace, plus grid traversal
//! - Parallel bulk variants of the scalar primitives
//!
//! Storage is only read, through [`VoxelOccupancy`].

pub mod batch;
pub mod bounds;
pub mod collision;
pub mod config;
pub mod face;
pub mod placement;
pub mod raycast;
pub mod storage;
pub mod workspace;

pub use bounds::{IncrementBounds, SpatialBounds};
pub use collision::{
    check_collision, check_collision_with_grid, check_stability, find_nearest_free_position,
};
pub use config::SpatialConfig;
pub use face::FaceDirection;
pub use placement::{validate_placement, PlacementError};
pub use raycast::{GridTraversal, RaycastHit};
pub use storage::{StoredVoxel, VoxelMap, VoxelOccupancy};
pub use workspace::{Overhang, WorkspaceBounds};
