//! Error type for sketch generation.
//!
//! Geometric degeneracies (zero-length sides, zero radii, coincident
//! points) are never errors. These variants only cover arguments that would
//! otherwise make a generator loop forever or emit NaN coordinates.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    #[error("step size must be positive, finite and not too small for the stroke, got {0}")]
    InvalidStepSize(f64),

    #[error("arc step must be a positive, finite number of degrees, not too small for the sweep, got {0}")]
    InvalidArcStep(f64),

    #[error("hachure gap must be at least {min} and finite, got {gap}")]
    InvalidGap { gap: f64, min: f64 },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },
}

pub type Result<T> = std::result::Result<T, SketchError>;
