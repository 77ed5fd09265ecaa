//! Tunable parameters for spatial queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxspace_core::constants::DEFAULT_WORKSPACE_SIZE;
use voxspace_core::Result;

use crate::collision::DEFAULT_STABILITY_EPSILON;
use crate::face::DEFAULT_FACE_EPSILON;
use crate::workspace::WorkspaceBounds;

/// Parameters shared by placement, collision and raycast queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Workspace size in meters (2 to 8 per axis)
    pub workspace_size: Vec3,
    /// Tolerance for classifying ray hits onto faces, in meters
    pub face_epsilon: f32,
    /// Tolerance between a supporting top face and a bottom face, in meters
    pub stability_epsilon: f32,
    /// Maximum Manhattan distance for free-position search, in centimeters
    pub max_search_distance: i32,
    /// Maximum ray length for grid raycasts, in meters
    pub max_ray_distance: f32,
    /// Cap on the number of hits returned by multi-hit raycasts
    pub max_hits: Option<usize>,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            workspace_size: Vec3::splat(DEFAULT_WORKSPACE_SIZE),
            face_epsilon: DEFAULT_FACE_EPSILON,
            stability_epsilon: DEFAULT_STABILITY_EPSILON,
            max_search_distance: 512,
            max_ray_distance: 100.0,
            max_hits: None,
        }
    }
}

impl SpatialConfig {
    /// Create a config for a workspace of the given size.
    pub fn with_workspace_size(workspace_size: Vec3) -> Self {
        Self {
            workspace_size,
            ..Default::default()
        }
    }

    /// Workspace bounds, rejecting sizes outside the supported range.
    pub fn workspace(&self) -> Result<WorkspaceBounds> {
        WorkspaceBounds::try_new(self.workspace_size)
    }
}
