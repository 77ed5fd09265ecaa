//! Core types and coordinate math for voxspace.
//!
//! This crate provides the foundational types used by the spatial core:
//! - World (meters) and increment (1 cm) coordinate spaces
//! - The ten fixed voxel resolutions
//! - Rays for selection queries
//! - Common error types

pub mod coords;
pub mod error;
pub mod math;
pub mod types;

pub use coords::{IncrementPos, WorldPos};
pub use error::{Error, Result};
pub use math::Ray;
pub use types::Resolution;

/// Engine-wide constants
pub mod constants {
    /// Centimeters per meter (increment units per world unit)
    pub const CM_PER_METER: f32 = 100.0;
    /// Meters per centimeter
    pub const METERS_PER_CM: f32 = 0.01;
    /// Smallest allowed workspace extent on any axis, in meters
    pub const MIN_WORKSPACE_SIZE: f32 = 2.0;
    /// Largest allowed workspace extent on any axis, in meters
    pub const MAX_WORKSPACE_SIZE: f32 = 8.0;
    /// Workspace extent used when the editor session does not supply one
    pub const DEFAULT_WORKSPACE_SIZE: f32 = 5.0;
    /// Number of supported voxel resolutions
    pub const RESOLUTION_COUNT: usize = 10;
    /// Ray direction components below this magnitude are treated as parallel
    pub const RAY_EPSILON: f32 = 1e-6;
}
