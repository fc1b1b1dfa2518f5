//! Hachure fills.
//!
//! A fill is one or two passes of [`HachureIterator`] over the region, each
//! raw line sketched as its own stroke. Fills cover the bounding rectangle;
//! clip them with [`crate::shapes::SketchShape::simplified_outline`] when the
//! outline is not rectangular.

use log::trace;

use crate::config::SketchConfig;
use crate::error::Result;
use crate::geometry::{Path, Point, Size};
use crate::hachure::HachureIterator;
use crate::rng::RandomSource;
use crate::sketch::sketch_line;

/// Default distance between hachure lines, in dp.
pub const DEFAULT_GAP: f64 = 8.0;

/// Default hachure angle, in degrees.
pub const DEFAULT_ANGLE_DEGREES: f64 = 45.0;

/// Single or double pass of parallel lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HachureStyle {
    /// One set of parallel lines.
    Hatch { angle_degrees: f64 },
    /// Two sets, the second rotated by 90°.
    CrossHatch { angle_degrees: f64 },
}

impl Default for HachureStyle {
    fn default() -> Self {
        HachureStyle::Hatch { angle_degrees: DEFAULT_ANGLE_DEGREES }
    }
}

impl HachureStyle {
    /// Angle of every pass, in degrees.
    pub fn pass_angles(&self) -> Vec<f64> {
        match *self {
            HachureStyle::Hatch { angle_degrees } => vec![angle_degrees],
            HachureStyle::CrossHatch { angle_degrees } => vec![angle_degrees, angle_degrees + 90.0],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HachureStyle::Hatch { .. } => "hatch",
            HachureStyle::CrossHatch { .. } => "crosshatch",
        }
    }

    /// Parse a style name, pairing it with `angle_degrees`.
    pub fn from_name(name: &str, angle_degrees: f64) -> Option<HachureStyle> {
        match name.to_lowercase().as_str() {
            "hatch" | "lines" => Some(HachureStyle::Hatch { angle_degrees }),
            "crosshatch" | "cross-hatch" | "cross" => Some(HachureStyle::CrossHatch { angle_degrees }),
            _ => None,
        }
    }
}

/// Sketched hachure fill for a region starting at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HachureFill {
    pub gap: f64,
    pub style: HachureStyle,
    pub seed: u64,
    pub config: SketchConfig,
}

impl Default for HachureFill {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            style: HachureStyle::default(),
            seed: 0,
            config: SketchConfig::default(),
        }
    }
}

impl HachureFill {
    pub fn new(gap: f64, style: HachureStyle) -> Self {
        Self { gap, style, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config(mut self, config: SketchConfig) -> Self {
        self.config = config;
        self
    }

    /// Unsketched line endpoints of every pass, in drawing order.
    pub fn raw_lines(&self, size: Size) -> Result<Vec<(Point, Point)>> {
        let mut lines = Vec::new();
        for angle in self.style.pass_angles() {
            lines.extend(HachureIterator::for_size(size.width, size.height, self.gap, angle)?);
        }
        Ok(lines)
    }

    /// Sketch every line into one path. Each line starts its own subpath.
    ///
    /// Each pass restarts the random sequence from the seed, so the two
    /// passes of a cross-hatch wobble alike.
    pub fn fill(&self, size: Size) -> Result<Path> {
        self.config.validate()?;
        let mut path = Path::new();

        for angle in self.style.pass_angles() {
            let mut random = RandomSource::new(self.seed);
            let lines = HachureIterator::for_size(size.width, size.height, self.gap, angle)?;
            let mut count = 0usize;
            for (a, b) in lines {
                sketch_line(
                    &mut path,
                    &mut random,
                    a,
                    b,
                    self.config.max_lateral_offset,
                    self.config.step_size,
                    true,
                )?;
                count += 1;
            }
            trace!("hachure pass at {}° produced {} lines", angle, count);
        }

        Ok(path)
    }
}
