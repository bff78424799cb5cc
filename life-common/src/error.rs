//! Boundary validation errors.

use thiserror::Error;

/// A configuration rejected before any work is scheduled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("density must lie in [0, 1], got {0}")]
    DensityOutOfRange(f64),

    #[error("steps per trial must be greater than 0")]
    ZeroSteps,

    #[error("trial count must be greater than 0")]
    ZeroTrials,

    #[error("size range is empty: min_size {min} > max_size {max}")]
    InvalidSizeRange { min: usize, max: usize },

    #[error("density step must lie in (0, 1] and be at least 1/10000, got {0}")]
    InvalidDensityStep(f64),

    #[error("malformed pattern: {0}")]
    MalformedPattern(String),
}
