//! Composite sketched outlines.
//!
//! Every generator here chains [`sketch_line`] and [`sketch_arc`] calls into
//! one continuous path: only the first piece starts with a move-to, every
//! following piece continues from where the previous one ended. Because a
//! sketched line always ends exactly on its target point, corners meet and
//! the final close lands where the outline started.
//!
//! Shapes are defined by two arbitrary corner points, normalized to
//! left/top/right/bottom before tracing.

use log::debug;

use crate::config::SketchConfig;
use crate::error::{Result, SketchError};
use crate::geometry::{Bounds, Path, Point, Size};
use crate::rng::RandomSource;
use crate::sketch::{
    Arc, Wobble, circle_sample, ensure_finite, sample_count, sanitize_radius, sketch_arc,
    sketch_line,
};

/// Per-corner radii for [`sketch_rounded_rectangle`], in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn new(top_left: f64, top_right: f64, bottom_right: f64, bottom_left: f64) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Same radius on every corner.
    pub fn uniform(radius: f64) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    /// Negative and NaN radii become 0.
    pub fn sanitized(self) -> Self {
        Self {
            top_left: sanitize_radius(self.top_left),
            top_right: sanitize_radius(self.top_right),
            bottom_right: sanitize_radius(self.bottom_right),
            bottom_left: sanitize_radius(self.bottom_left),
        }
    }
}

fn corners(a: Point, b: Point) -> Result<Bounds> {
    ensure_finite(a, "corner point")?;
    ensure_finite(b, "corner point")?;
    Ok(Bounds::from_corners(a, b))
}

/// Closed sketched rectangle.
///
/// Traced clockwise from the top-right corner, the same order as
/// [`sketch_rounded_rectangle`], so zero radii reproduce this exactly.
pub fn sketch_rectangle(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    config: &SketchConfig,
) -> Result<Path> {
    config.validate()?;
    let Bounds { left, top, right, bottom } = corners(a, b)?;
    let offset = config.max_lateral_offset;
    let step = config.step_size;

    let top_right = Point::new(right, top);
    let bottom_right = Point::new(right, bottom);
    let bottom_left = Point::new(left, bottom);
    let top_left = Point::new(left, top);

    let mut path = Path::new();
    sketch_line(&mut path, random, top_right, bottom_right, offset, step, true)?;
    sketch_line(&mut path, random, bottom_right, bottom_left, offset, step, false)?;
    sketch_line(&mut path, random, bottom_left, top_left, offset, step, false)?;
    sketch_line(&mut path, random, top_left, top_right, offset, step, false)?;
    path.close();
    Ok(path)
}

/// Closed sketched circle inscribed in the box spanned by `a` and `b`.
pub fn sketch_circle(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    config: &SketchConfig,
) -> Result<Path> {
    sketch_partial_circle(random, a, b, 0.0, 360.0, config)
}

/// Sketched arc of the circle inscribed in the box spanned by `a` and `b`.
///
/// `sweep_degrees` is clamped to `[0, 360]`; only a full sweep closes the
/// path. The first sample sits exactly on the circle. Progress indicators
/// animate `start_degrees` and `sweep_degrees` independently.
pub fn sketch_partial_circle(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    start_degrees: f64,
    sweep_degrees: f64,
    config: &SketchConfig,
) -> Result<Path> {
    let mut path = Path::new();
    trace_circle(&mut path, random, a, b, start_degrees, sweep_degrees, config)?;
    Ok(path)
}

fn trace_circle(
    path: &mut Path,
    random: &mut RandomSource,
    a: Point,
    b: Point,
    start_degrees: f64,
    sweep_degrees: f64,
    config: &SketchConfig,
) -> Result<()> {
    config.validate()?;
    let bounds = corners(a, b)?;
    if !(start_degrees.is_finite() && sweep_degrees.is_finite()) {
        return Err(SketchError::NonFinite { what: "circle angle" });
    }
    let sweep = sweep_degrees.clamp(0.0, 360.0);
    let center = bounds.center();
    let radius = bounds.width().min(bounds.height()) / 2.0;
    let offset = config.max_lateral_offset.abs();

    let samples = sample_count((sweep / config.arc_step_degrees).floor())
        .ok_or(SketchError::InvalidArcStep(config.arc_step_degrees))?;
    let step = config.arc_step_degrees.to_radians();
    let mut angle = start_degrees.to_radians();

    let mut wobble = Wobble::new();
    for index in 0..=samples {
        let (base, normal) = circle_sample(center, radius, angle);
        if index == 0 {
            path.move_to(base);
        } else {
            wobble.advance(random);
        }
        path.line_to(base + normal * wobble.lateral_offset(offset));
        angle += step;
    }

    if sweep == 360.0 {
        path.close();
    }
    Ok(())
}

/// Closed sketched capsule (stadium) in the box spanned by `a` and `b`.
///
/// A box that is not wider than it is tall degenerates to
/// [`sketch_circle`] with the same points.
pub fn sketch_capsule(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    config: &SketchConfig,
) -> Result<Path> {
    config.validate()?;
    let bounds = corners(a, b)?;
    if bounds.width() <= bounds.height() {
        return sketch_circle(random, a, b, config);
    }

    let Bounds { left, top, right, bottom } = bounds;
    let offset = config.max_lateral_offset;
    let step = config.step_size;
    let arc_step = config.arc_step_degrees;
    let radius = bounds.height() / 2.0;

    let mut path = Path::new();
    let right_cap = Arc::between(Point::new(right - radius, top + radius), radius, -90.0, 90.0);
    sketch_arc(&mut path, random, &right_cap, offset, arc_step, true)?;

    sketch_line(
        &mut path,
        random,
        Point::new(right - radius, bottom),
        Point::new(left + radius, bottom),
        offset,
        step,
        false,
    )?;

    let left_cap = Arc::between(Point::new(left + radius, top + radius), radius, 90.0, 270.0);
    sketch_arc(&mut path, random, &left_cap, offset, arc_step, false)?;

    sketch_line(
        &mut path,
        random,
        Point::new(left + radius, top),
        Point::new(right - radius, top),
        offset,
        step,
        false,
    )?;

    path.close();
    Ok(path)
}

/// Closed sketched rectangle with independently rounded corners.
///
/// A zero radius turns its corner into a plain vertex. An edge is sketched
/// only when its side is longer than the two adjacent radii together, so
/// over-rounded boxes skip the empty edge instead of drawing it backwards.
pub fn sketch_rounded_rectangle(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    config: &SketchConfig,
    radii: CornerRadii,
) -> Result<Path> {
    config.validate()?;
    let bounds = corners(a, b)?;
    let Bounds { left, top, right, bottom } = bounds;
    let width = bounds.width();
    let height = bounds.height();
    let CornerRadii { top_left, top_right, bottom_right, bottom_left } = radii.sanitized();

    let offset = config.max_lateral_offset;
    let step = config.step_size;
    let arc_step = config.arc_step_degrees;
    let mut path = Path::new();

    if top_right > 0.0 {
        let corner = Arc::between(Point::new(right - top_right, top + top_right), top_right, -90.0, 0.0);
        sketch_arc(&mut path, random, &corner, offset, arc_step, true)?;
    } else {
        path.move_to(Point::new(right, top));
    }

    if height > top_right + bottom_right {
        sketch_line(
            &mut path,
            random,
            Point::new(right, top + top_right),
            Point::new(right, bottom - bottom_right),
            offset,
            step,
            false,
        )?;
    } else {
        debug!("rounded rectangle: right edge consumed by radii");
    }

    if bottom_right > 0.0 {
        let corner = Arc::between(
            Point::new(right - bottom_right, bottom - bottom_right),
            bottom_right,
            0.0,
            90.0,
        );
        sketch_arc(&mut path, random, &corner, offset, arc_step, false)?;
    }

    if width > bottom_left + bottom_right {
        sketch_line(
            &mut path,
            random,
            Point::new(right - bottom_right, bottom),
            Point::new(left + bottom_left, bottom),
            offset,
            step,
            false,
        )?;
    } else {
        debug!("rounded rectangle: bottom edge consumed by radii");
    }

    if bottom_left > 0.0 {
        let corner = Arc::between(
            Point::new(left + bottom_left, bottom - bottom_left),
            bottom_left,
            90.0,
            180.0,
        );
        sketch_arc(&mut path, random, &corner, offset, arc_step, false)?;
    }

    if height > top_left + bottom_left {
        sketch_line(
            &mut path,
            random,
            Point::new(left, bottom - bottom_left),
            Point::new(left, top + top_left),
            offset,
            step,
            false,
        )?;
    } else {
        debug!("rounded rectangle: left edge consumed by radii");
    }

    if top_left > 0.0 {
        let corner = Arc::between(Point::new(left + top_left, top + top_left), top_left, 180.0, 270.0);
        sketch_arc(&mut path, random, &corner, offset, arc_step, false)?;
    }

    if width > top_left + top_right {
        sketch_line(
            &mut path,
            random,
            Point::new(left + top_left, top),
            Point::new(right - top_right, top),
            offset,
            step,
            false,
        )?;
    } else {
        debug!("rounded rectangle: top edge consumed by radii");
    }

    path.close();
    Ok(path)
}

/// Open sketched line between two points, as a standalone path.
///
/// Matches the [`crate::canvas::OutlineGenerator`] signature.
pub fn sketch_line_between(
    random: &mut RandomSource,
    a: Point,
    b: Point,
    config: &SketchConfig,
) -> Result<Path> {
    config.validate()?;
    let mut path = Path::new();
    sketch_line(&mut path, random, a, b, config.max_lateral_offset, config.step_size, true)?;
    Ok(path)
}

// ============================================================================
// PathSketcher
// ============================================================================

/// Seed plus tunables, with one method per primitive.
///
/// Each call builds a fresh [`RandomSource`] from the seed, so calling the
/// same method twice with the same arguments returns identical paths.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathSketcher {
    pub seed: u64,
    pub config: SketchConfig,
}

impl PathSketcher {
    pub fn new(seed: u64) -> Self {
        Self { seed, config: SketchConfig::default() }
    }

    pub fn with_config(mut self, config: SketchConfig) -> Self {
        self.config = config;
        self
    }

    fn random(&self) -> RandomSource {
        RandomSource::new(self.seed)
    }

    pub fn line(&self, a: Point, b: Point) -> Result<Path> {
        sketch_line_between(&mut self.random(), a, b, &self.config)
    }

    pub fn arc(&self, arc: &Arc) -> Result<Path> {
        self.config.validate()?;
        let mut path = Path::new();
        sketch_arc(
            &mut path,
            &mut self.random(),
            arc,
            self.config.max_lateral_offset,
            self.config.arc_step_degrees,
            true,
        )?;
        Ok(path)
    }

    pub fn rectangle(&self, a: Point, b: Point) -> Result<Path> {
        sketch_rectangle(&mut self.random(), a, b, &self.config)
    }

    pub fn circle(&self, a: Point, b: Point) -> Result<Path> {
        sketch_circle(&mut self.random(), a, b, &self.config)
    }

    pub fn partial_circle(&self, a: Point, b: Point, start_degrees: f64, sweep_degrees: f64) -> Result<Path> {
        sketch_partial_circle(&mut self.random(), a, b, start_degrees, sweep_degrees, &self.config)
    }

    pub fn capsule(&self, a: Point, b: Point) -> Result<Path> {
        sketch_capsule(&mut self.random(), a, b, &self.config)
    }

    pub fn rounded_rectangle(&self, a: Point, b: Point, radii: CornerRadii) -> Result<Path> {
        sketch_rounded_rectangle(&mut self.random(), a, b, &self.config, radii)
    }
}

// ============================================================================
// SketchShape
// ============================================================================

/// A corner radius, absolute or relative to the shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerSize {
    /// Radius in pixels.
    Pixels(f64),
    /// Percentage (0-100) of the shape's smaller dimension.
    Percent(f64),
}

impl CornerSize {
    pub const ZERO: CornerSize = CornerSize::Pixels(0.0);

    /// Resolve to pixels for a shape of the given size.
    pub fn to_pixels(&self, size: Size) -> f64 {
        match *self {
            CornerSize::Pixels(px) => px,
            CornerSize::Percent(percent) => size.min_dimension() * percent / 100.0,
        }
    }
}

/// Reading direction. Start/end corners swap under `Rtl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Sketched outlines for a rendering region of a given size.
///
/// The outline always spans `(0, 0)` to `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchShape {
    Rectangle,
    Circle,
    Capsule,
    RoundedCorners {
        top_start: CornerSize,
        top_end: CornerSize,
        bottom_end: CornerSize,
        bottom_start: CornerSize,
    },
    /// Line down the horizontal middle of the region.
    VerticalLine,
    /// Line across the vertical middle of the region.
    HorizontalLine,
}

impl SketchShape {
    /// Rounded corners with the same size everywhere.
    pub fn rounded(corner: CornerSize) -> Self {
        SketchShape::RoundedCorners {
            top_start: corner,
            top_end: corner,
            bottom_end: corner,
            bottom_start: corner,
        }
    }

    /// Keep only the top corners rounded. Other shapes are returned as is.
    pub fn top(self) -> Self {
        match self {
            SketchShape::RoundedCorners { top_start, top_end, .. } => SketchShape::RoundedCorners {
                top_start,
                top_end,
                bottom_end: CornerSize::ZERO,
                bottom_start: CornerSize::ZERO,
            },
            other => other,
        }
    }

    /// Keep only the bottom corners rounded. Other shapes are returned as is.
    pub fn bottom(self) -> Self {
        match self {
            SketchShape::RoundedCorners { bottom_end, bottom_start, .. } => SketchShape::RoundedCorners {
                top_start: CornerSize::ZERO,
                top_end: CornerSize::ZERO,
                bottom_end,
                bottom_start,
            },
            other => other,
        }
    }

    /// Sketched outline for `size`, using a fresh random source from `seed`.
    pub fn outline(
        &self,
        seed: u64,
        size: Size,
        direction: LayoutDirection,
        config: &SketchConfig,
    ) -> Result<Path> {
        let mut random = RandomSource::new(seed);
        let a = Point::ZERO;
        let b = size.corner();

        match *self {
            SketchShape::Rectangle => sketch_rectangle(&mut random, a, b, config),
            SketchShape::Circle => sketch_circle(&mut random, a, b, config),
            SketchShape::Capsule => sketch_capsule(&mut random, a, b, config),
            SketchShape::RoundedCorners { top_start, top_end, bottom_end, bottom_start } => {
                let resolve = |corner: CornerSize| corner.to_pixels(size);
                let radii = match direction {
                    LayoutDirection::Ltr => CornerRadii::new(
                        resolve(top_start),
                        resolve(top_end),
                        resolve(bottom_end),
                        resolve(bottom_start),
                    ),
                    LayoutDirection::Rtl => CornerRadii::new(
                        resolve(top_end),
                        resolve(top_start),
                        resolve(bottom_start),
                        resolve(bottom_end),
                    ),
                };
                sketch_rounded_rectangle(&mut random, a, b, config, radii)
            }
            SketchShape::VerticalLine => sketch_line_between(
                &mut random,
                Point::new(size.width / 2.0, 0.0),
                Point::new(size.width / 2.0, size.height),
                config,
            ),
            SketchShape::HorizontalLine => sketch_line_between(
                &mut random,
                Point::new(0.0, size.height / 2.0),
                Point::new(size.width, size.height / 2.0),
                config,
            ),
        }
    }

    /// Ideal outline of the same shape, without any wobble.
    ///
    /// Useful as a clip path for fills drawn inside the sketched outline.
    pub fn simplified_outline(
        &self,
        size: Size,
        direction: LayoutDirection,
        config: &SketchConfig,
    ) -> Result<Path> {
        self.outline(0, size, direction, &config.unperturbed())
    }
}

// ============================================================================
// TESTS
// ============================================================================
