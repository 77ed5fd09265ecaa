//! Read-only occupancy interface and an in-memory voxel map.
//!
//! Collision and traversal only ever read voxel storage through
//! [`VoxelOccupancy`]. The editor's storage implements it; [`VoxelMap`] is a
//! small thread-safe implementation for tools and tests.

use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use voxspace_core::{IncrementPos, Resolution};

use crate::bounds::{IncrementBounds, SpatialBounds};

/// A voxel as reported by storage: where it sits and how big it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredVoxel {
    /// Bottom-center position
    pub position: IncrementPos,
    /// Edge length
    pub resolution: Resolution,
}

impl StoredVoxel {
    /// Create a new stored voxel
    #[inline]
    pub const fn new(position: IncrementPos, resolution: Resolution) -> Self {
        Self {
            position,
            resolution,
        }
    }

    /// Exact bounds of this voxel
    #[inline]
    pub const fn bounds(&self) -> IncrementBounds {
        IncrementBounds::from_voxel(self.position, self.resolution)
    }

    /// World-space bounds of this voxel
    #[inline]
    pub fn spatial_bounds(&self) -> SpatialBounds {
        SpatialBounds::from_increment(self.position, self.resolution)
    }
}

/// Read access to the set of existing voxels.
pub trait VoxelOccupancy {
    /// Snapshot of every stored voxel.
    fn voxels(&self) -> Vec<StoredVoxel>;

    /// Whether a voxel of any size is stored at exactly `pos`.
    fn is_occupied(&self, pos: IncrementPos) -> bool;
}

impl VoxelOccupancy for [StoredVoxel] {
    fn voxels(&self) -> Vec<StoredVoxel> {
        self.to_vec()
    }

    fn is_occupied(&self, pos: IncrementPos) -> bool {
        self.iter().any(|v| v.position == pos)
    }
}

impl<S: std::hash::BuildHasher> VoxelOccupancy for HashMap<IncrementPos, Resolution, S> {
    fn voxels(&self) -> Vec<StoredVoxel> {
        self.iter()
            .map(|(&position, &resolution)| StoredVoxel::new(position, resolution))
            .collect()
    }

    fn is_occupied(&self, pos: IncrementPos) -> bool {
        self.contains_key(&pos)
    }
}

/// Thread-safe voxel map keyed by increment position.
///
/// One lock guards the map and is held only for a single operation.
#[derive(Debug, Default)]
pub struct VoxelMap {
    voxels: RwLock<HashMap<IncrementPos, Resolution>>,
}

impl VoxelMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` voxels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voxels: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Insert or replace a voxel. Returns the previous resolution at that position.
    ///
    /// No validation is performed; callers validate before writing.
    pub fn insert(&self, voxel: StoredVoxel) -> Option<Resolution> {
        self.voxels.write().insert(voxel.position, voxel.resolution)
    }

    /// Remove the voxel at `pos`.
    pub fn remove(&self, pos: IncrementPos) -> Option<StoredVoxel> {
        self.voxels
            .write()
            .remove(&pos)
            .map(|resolution| StoredVoxel::new(pos, resolution))
    }

    /// Resolution of the voxel at `pos`, if any.
    pub fn get(&self, pos: IncrementPos) -> Option<Resolution> {
        self.voxels.read().get(&pos).copied()
    }

    /// Get the number of stored voxels.
    pub fn len(&self) -> usize {
        self.voxels.read().len()
    }

    /// Check if no voxels are stored.
    pub fn is_empty(&self) -> bool {
        self.voxels.read().is_empty()
    }

    /// Remove every voxel.
    pub fn clear(&self) {
        self.voxels.write().clear();
    }
}

impl FromIterator<StoredVoxel> for VoxelMap {
    fn from_iter<I: IntoIterator<Item = StoredVoxel>>(iter: I) -> Self {
        let voxels = iter
            .into_iter()
            .map(|v| (v.position, v.resolution))
            .collect();
        Self {
            voxels: RwLock::new(voxels),
        }
    }
}

impl VoxelOccupancy for VoxelMap {
    fn voxels(&self) -> Vec<StoredVoxel> {
        self.voxels.read().voxels()
    }

    fn is_occupied(&self, pos: IncrementPos) -> bool {
        self.voxels.read().contains_key(&pos)
    }
}
