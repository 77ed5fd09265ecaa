//! Error types for the core.

use thiserror::Error;

/// Core error type.
///
/// Only fallible constructors and batch helpers produce these; conversions and
/// bounds derivation are total.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Workspace size outside the supported range
    #[error("Invalid workspace size: {0}")]
    InvalidWorkspaceSize(String),

    /// Edge length that is not one of the ten voxel sizes
    #[error("Invalid resolution: {0} cm is not a supported voxel size")]
    InvalidResolution(i32),

    /// Paired inputs of different lengths
    #[error("Length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
