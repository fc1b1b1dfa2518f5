//! Sketch tunables.
//!
//! Defaults are expressed in density-independent units (dp) and converted
//! to pixels once, at the boundary, with [`SketchConfig::to_pixels`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};

/// Default maximum lateral offset of a sketched sample, in dp.
pub const MAXIMUM_LATERAL_OFFSET: f64 = 1.5;

/// Default distance between samples along a sketched line, in dp.
pub const STEP_SIZE: f64 = 2.0;

/// Default angular distance between samples along a sketched arc, in degrees.
pub const ARC_STEP_DEGREES: f64 = 5.0;

/// Configuration for sketched outlines.
///
/// Every generator takes one of these per call, so any value can be
/// overridden for a single shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Largest perpendicular displacement of any interior sample
    pub max_lateral_offset: f64,
    /// Distance between samples along straight edges
    pub step_size: f64,
    /// Angle between samples along arcs (degrees). Unaffected by density.
    pub arc_step_degrees: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            max_lateral_offset: MAXIMUM_LATERAL_OFFSET,
            step_size: STEP_SIZE,
            arc_step_degrees: ARC_STEP_DEGREES,
        }
    }
}

impl SketchConfig {
    /// Create a new config with specified maximum lateral offset.
    pub fn with_max_lateral_offset(mut self, offset: f64) -> Self {
        self.max_lateral_offset = offset;
        self
    }

    /// Create a new config with specified step size.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Create a new config with specified arc step.
    pub fn with_arc_step_degrees(mut self, degrees: f64) -> Self {
        self.arc_step_degrees = degrees;
        self
    }

    /// Convert dp lengths to pixels for a surface with the given density
    /// (pixels per dp).
    pub fn to_pixels(self, density: f64) -> Self {
        Self {
            max_lateral_offset: self.max_lateral_offset * density,
            step_size: self.step_size * density,
            arc_step_degrees: self.arc_step_degrees,
        }
    }

    /// Same config with no perturbation at all. Produces ideal outlines.
    pub fn unperturbed(self) -> Self {
        self.with_max_lateral_offset(0.0)
    }

    /// Check that every value can drive a generator without looping or
    /// producing NaN.
    pub fn validate(&self) -> Result<()> {
        if !self.max_lateral_offset.is_finite() {
            return Err(SketchError::NonFinite { what: "maximum lateral offset" });
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(SketchError::InvalidStepSize(self.step_size));
        }
        if !(self.arc_step_degrees.is_finite() && self.arc_step_degrees > 0.0) {
            return Err(SketchError::InvalidArcStep(self.arc_step_degrees));
        }
        Ok(())
    }
}
