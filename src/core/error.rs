//! Error types for the voxel compiler

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Voxel error: {0}")]
    Voxel(String),

    /// A merged coordinate does not fit the signed 16-bit vertex range
    #[error("coordinate {value} on the {axis} axis is outside the 16-bit vertex range")]
    CoordinateOverflow { axis: char, value: i32 },
}
