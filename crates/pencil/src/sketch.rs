//! Hand-drawn line and arc perturbation.
//!
//! A sketched stroke follows the ideal geometry at a fixed sampling
//! interval and pushes each sample sideways by an amount driven by a random
//! walk. The walk has a correction mode: once the accumulated angle passes
//! the maximum deviation it is steered back toward zero at a fixed rate,
//! so long strokes wobble but never drift away from the true line.
//!
//! Terminal points of a line are never perturbed, which is what lets
//! composite outlines (see [`crate::shapes`]) chain strokes into one
//! continuous, correctly closing path.
//!
//! # Example
//! ```
//! use pencil::geometry::{Path, Point};
//! use pencil::rng::RandomSource;
//! use pencil::sketch::sketch_line;
//!
//! let mut path = Path::new();
//! let mut random = RandomSource::new(7);
//! sketch_line(&mut path, &mut random, Point::new(0.0, 0.0), Point::new(50.0, 0.0), 1.5, 2.0, true)
//!     .unwrap();
//! assert_eq!(path.points().last(), Some(&Point::new(50.0, 0.0)));
//! ```

use log::trace;

use crate::error::{Result, SketchError};
use crate::geometry::{Path, Point};
use crate::rng::RandomSource;

/// Accumulated angle beyond which the walk switches to correction.
pub const MAXIMUM_DEVIATION_DEGREES: f64 = 15.0;

/// Per-sample pull back toward zero while correcting.
pub const CORRECTION_RATE_DEGREES: f64 = 2.5;

/// Correction ends once the accumulated angle is back within this.
pub const CORRECTION_EXIT_DEGREES: f64 = 1.0;

/// Upper bound on the samples of a single line or arc.
pub const MAX_STROKE_SAMPLES: usize = 1 << 20;

/// Random walk with correction, advanced once per sample.
///
/// Holds the running lateral deviation (`accumulated_angle`, radians) of a
/// single stroke. A new stroke always starts from a fresh `Wobble`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Wobble {
    accumulated_angle: f64,
    in_correction: bool,
}

impl Wobble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated angle in radians. Always within ±15°.
    #[inline]
    pub fn accumulated_angle(&self) -> f64 {
        self.accumulated_angle
    }

    #[inline]
    pub fn in_correction(&self) -> bool {
        self.in_correction
    }

    /// Advance the walk by one sample.
    ///
    /// Outside correction this draws two integers: the jitter magnitude
    /// (1° or 2°), then its sign. Correction steps draw nothing.
    pub fn advance(&mut self, random: &mut RandomSource) {
        let maximum = MAXIMUM_DEVIATION_DEGREES.to_radians();
        let magnitude = self.accumulated_angle.abs();

        if !self.in_correction && magnitude > maximum {
            self.in_correction = true;
        } else if self.in_correction && magnitude <= CORRECTION_EXIT_DEGREES.to_radians() {
            self.in_correction = false;
        }

        self.accumulated_angle += if self.in_correction {
            let rate = CORRECTION_RATE_DEGREES.to_radians();
            if self.accumulated_angle > 0.0 { -rate } else { rate }
        } else {
            let jitter_degrees = random.next_int(1, 3);
            let direction = if random.next_int(0, 2) == 0 { -1 } else { 1 };
            f64::from(jitter_degrees * direction).to_radians()
        };

        self.accumulated_angle = self.accumulated_angle.clamp(-maximum, maximum);
    }

    /// Signed lateral displacement for the current state.
    #[inline]
    pub fn lateral_offset(&self, max_lateral_offset: f64) -> f64 {
        self.accumulated_angle / MAXIMUM_DEVIATION_DEGREES.to_radians() * max_lateral_offset
    }
}

/// A circular arc: center, radius, start angle and signed sweep (degrees).
///
/// Angles follow screen conventions: 0° points right, 90° points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_degrees: f64,
    pub sweep_degrees: f64,
}

impl Arc {
    pub fn new(center: Point, radius: f64, start_degrees: f64, sweep_degrees: f64) -> Self {
        Self { center, radius, start_degrees, sweep_degrees }
    }

    /// Arc between two absolute angles, sweeping toward `end_degrees`.
    pub fn between(center: Point, radius: f64, start_degrees: f64, end_degrees: f64) -> Self {
        Self::new(center, radius, start_degrees, end_degrees - start_degrees)
    }
}

/// Ideal point on a circle and the normal used to push it sideways.
///
/// The normal is the tangent `(-sin, cos)` rotated by +90°, which points
/// toward the center.
#[inline]
pub(crate) fn circle_sample(center: Point, radius: f64, angle: f64) -> (Point, Point) {
    let (sin, cos) = angle.sin_cos();
    let base = Point::new(center.x + radius * cos, center.y + radius * sin);
    let tangent = Point::new(-sin, cos).normalize();
    (base, tangent.normal())
}

/// Negative and NaN radii collapse to 0.
#[inline]
pub(crate) fn sanitize_radius(radius: f64) -> f64 {
    if radius.is_nan() || radius < 0.0 {
        0.0
    } else {
        radius
    }
}

pub(crate) fn ensure_finite(point: Point, what: &'static str) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(SketchError::NonFinite { what })
    }
}

/// `quotient` as a sample count, or `None` when it is not finite or
/// exceeds [`MAX_STROKE_SAMPLES`].
pub(crate) fn sample_count(quotient: f64) -> Option<usize> {
    if quotient.is_finite() && quotient <= MAX_STROKE_SAMPLES as f64 {
        Some(quotient as usize)
    } else {
        None
    }
}

pub(crate) fn ensure_offset(max_lateral_offset: f64) -> Result<f64> {
    if max_lateral_offset.is_finite() {
        Ok(max_lateral_offset.abs())
    } else {
        Err(SketchError::NonFinite { what: "maximum lateral offset" })
    }
}

/// Append a sketched line from `a` to `b`.
///
/// With `start_with_move` the stroke begins a new subpath at `a`; without
/// it the stroke continues the current subpath (the caller is expected to
/// already be at `a`). The last command is always a line-to `b` exactly.
pub fn sketch_line(
    path: &mut Path,
    random: &mut RandomSource,
    a: Point,
    b: Point,
    max_lateral_offset: f64,
    step_size: f64,
    start_with_move: bool,
) -> Result<()> {
    if !(step_size.is_finite() && step_size > 0.0) {
        return Err(SketchError::InvalidStepSize(step_size));
    }
    ensure_finite(a, "line start")?;
    ensure_finite(b, "line end")?;
    let max_lateral_offset = ensure_offset(max_lateral_offset)?;

    let delta = b - a;
    let direction = delta.normalize();
    let normal = direction.normal();
    let segments = sample_count((delta.length() / step_size).ceil())
        .ok_or(SketchError::InvalidStepSize(step_size))?;

    if start_with_move {
        path.move_to(a);
    }

    let mut wobble = Wobble::new();
    for index in 1..segments {
        let base = a + direction * (index as f64 * step_size);
        wobble.advance(random);
        path.line_to(base + normal * wobble.lateral_offset(max_lateral_offset));
    }

    path.line_to(b);
    trace!("sketched line with {} interior samples", segments.saturating_sub(1));
    Ok(())
}

/// Append a sketched arc.
///
/// Samples every `step_degrees` from the start angle toward the sign of the
/// sweep, `floor(|sweep| / step)` steps plus the start sample. The walk is
/// advanced at every sample, the first one included. With
/// `start_with_move` the ideal start point is move-to'd first.
pub fn sketch_arc(
    path: &mut Path,
    random: &mut RandomSource,
    arc: &Arc,
    max_lateral_offset: f64,
    step_degrees: f64,
    start_with_move: bool,
) -> Result<()> {
    if !(step_degrees.is_finite() && step_degrees > 0.0) {
        return Err(SketchError::InvalidArcStep(step_degrees));
    }
    ensure_finite(arc.center, "arc center")?;
    if !(arc.start_degrees.is_finite() && arc.sweep_degrees.is_finite()) {
        return Err(SketchError::NonFinite { what: "arc angle" });
    }
    let max_lateral_offset = ensure_offset(max_lateral_offset)?;
    let radius = sanitize_radius(arc.radius);

    let direction = if arc.sweep_degrees > 0.0 { 1.0 } else { -1.0 };
    let steps = sample_count((arc.sweep_degrees.abs() / step_degrees).floor())
        .ok_or(SketchError::InvalidArcStep(step_degrees))?;
    let step = step_degrees.to_radians() * direction;
    let start = arc.start_degrees.to_radians();

    let mut wobble = Wobble::new();
    for index in 0..=steps {
        let (base, normal) = circle_sample(arc.center, radius, start + step * index as f64);

        if index == 0 && start_with_move {
            path.move_to(base);
        }

        wobble.advance(random);
        path.line_to(base + normal * wobble.lateral_offset(max_lateral_offset));
    }

    trace!("sketched arc with {} samples", steps + 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PathCommand;

    fn line_path(seed: u64, a: Point, b: Point, offset: f64, step: f64) -> Path {
        let mut path = Path::new();
        let mut random = RandomSource::new(seed);
        sketch_line(&mut path, &mut random, a, b, offset, step, true).unwrap();
        path
    }

    #[test]
    fn endpoints_are_exact() {
        let a = Point::new(3.25, -7.0);
        let b = Point::new(141.0, 88.5);
        let points = line_path(11, a, b, 1.5, 2.0).points();
        assert_eq!(points.first(), Some(&a));
        assert_eq!(points.last(), Some(&b));
    }

    #[test]
    fn horizontal_line_scenario() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        let first = line_path(0, a, b, 1.5, 2.0).points();
        let again = line_path(0, a, b, 1.5, 2.0).points();
        let other = line_path(1, a, b, 1.5, 2.0).points();

        // ceil(100 / 2) = 50 segments -> 49 interior samples, plus A and B
        assert_eq!(first.len(), 51);
        assert_eq!(first, again);

        let ys = |points: &[Point]| points.iter().map(|p| p.y).collect::<Vec<_>>();
        assert_ne!(ys(&first), ys(&other));

        for (i, p) in other.iter().enumerate() {
            assert!(p.y.abs() <= 1.5 + 1e-9, "sample {} drifted to {}", i, p.y);
        }
        for (i, p) in first.iter().enumerate().skip(1).take(49) {
            assert!((p.x - i as f64 * 2.0).abs() < 1e-9);
        }
        assert_eq!(other.last(), Some(&b));
    }

    #[test]
    fn continuing_stroke_has_no_move() {
        let mut path = Path::new();
        let mut random = RandomSource::new(5);
        path.move_to(Point::ZERO);
        sketch_line(&mut path, &mut random, Point::ZERO, Point::new(10.0, 10.0), 1.0, 2.0, false)
            .unwrap();
        let moves = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn zero_length_line_is_single_point() {
        let p = Point::new(4.0, 4.0);
        let path = line_path(3, p, p, 1.5, 2.0);
        assert_eq!(path.commands(), &[PathCommand::MoveTo(p), PathCommand::LineTo(p)]);
    }

    #[test]
    fn rejects_bad_step() {
        let mut path = Path::new();
        let mut random = RandomSource::new(0);
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = sketch_line(
                &mut path, &mut random, Point::ZERO, Point::new(5.0, 0.0), 1.0, step, true,
            );
            assert!(matches!(result, Err(SketchError::InvalidStepSize(_))));
        }
        assert!(path.is_empty());
    }

    #[test]
    fn rejects_step_too_small_for_stroke() {
        let mut path = Path::new();
        let mut random = RandomSource::new(0);
        let b = Point::new(10.0, 0.0);
        for step in [1e-320, 1e-6] {
            let result = sketch_line(&mut path, &mut random, Point::ZERO, b, 1.5, step, true);
            assert_eq!(result, Err(SketchError::InvalidStepSize(step)));
        }

        let arc = Arc::new(Point::ZERO, 10.0, 0.0, 360.0);
        for step in [1e-320, 1e-4] {
            let result = sketch_arc(&mut path, &mut random, &arc, 1.5, step, true);
            assert_eq!(result, Err(SketchError::InvalidArcStep(step)));
        }
        assert!(path.is_empty());

        // A tiny step is fine while the stroke stays short: 1024 segments
        let step = 1.0 / 1024.0;
        sketch_line(&mut path, &mut random, Point::ZERO, Point::new(1.0, 0.0), 1.5, step, true)
            .unwrap();
        assert_eq!(path.len(), 1 + 1023 + 1);
    }

    #[test]
    fn rejects_nan_endpoint() {
        let mut path = Path::new();
        let mut random = RandomSource::new(0);
        let result = sketch_line(
            &mut path, &mut random, Point::new(f64::NAN, 0.0), Point::ZERO, 1.0, 2.0, true,
        );
        assert_eq!(result, Err(SketchError::NonFinite { what: "line start" }));
    }

    #[test]
    fn wobble_stays_clamped() {
        let mut wobble = Wobble::new();
        let mut random = RandomSource::new(2024);
        let maximum = MAXIMUM_DEVIATION_DEGREES.to_radians();
        for _ in 0..10_000 {
            wobble.advance(&mut random);
            assert!(wobble.accumulated_angle().abs() <= maximum);
        }
    }

    #[test]
    fn correction_walks_back_without_randomness() {
        let mut wobble = Wobble {
            accumulated_angle: 15.5_f64.to_radians(),
            in_correction: false,
        };
        let mut random = RandomSource::new(1);
        let before = random.clone().next_u64();

        wobble.advance(&mut random);
        assert!(wobble.in_correction());
        assert!((wobble.accumulated_angle() - 13.0_f64.to_radians()).abs() < 1e-12);
        // Correction consumed no random numbers
        assert_eq!(random.clone().next_u64(), before);

        // 13 -> 10.5 -> 8 -> 5.5 -> 3 -> 0.5
        for _ in 0..5 {
            wobble.advance(&mut random);
            assert!(wobble.in_correction());
        }
        assert!((wobble.accumulated_angle() - 0.5_f64.to_radians()).abs() < 1e-12);
        assert_eq!(random.clone().next_u64(), before);

        // Back within 1 degree: correction ends and jitter resumes
        wobble.advance(&mut random);
        assert!(!wobble.in_correction());
        assert_ne!(random.next_u64(), before);
    }

    #[test]
    fn sitting_on_the_cap_keeps_jittering() {
        let maximum = MAXIMUM_DEVIATION_DEGREES.to_radians();
        let mut wobble = Wobble { accumulated_angle: -maximum, in_correction: false };
        let mut random = RandomSource::new(4);
        let mut draws = random.clone();
        let magnitude = f64::from(draws.next_int(1, 3)).to_radians();
        let sign = if draws.next_int(0, 2) == 0 { -1.0 } else { 1.0 };

        wobble.advance(&mut random);
        assert!(!wobble.in_correction());
        let expected = (-maximum + sign * magnitude).clamp(-maximum, maximum);
        assert!((wobble.accumulated_angle() - expected).abs() < 1e-12);
        assert_eq!(random.next_u64(), draws.next_u64());
    }

    #[test]
    fn arc_samples_follow_circle() {
        let mut path = Path::new();
        let mut random = RandomSource::new(9);
        let arc = Arc::new(Point::new(50.0, 50.0), 20.0, 0.0, 90.0);
        sketch_arc(&mut path, &mut random, &arc, 1.5, 5.0, true).unwrap();

        // move-to + 19 samples (0..=18)
        assert_eq!(path.len(), 20);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(70.0, 50.0)));
        for p in path.points() {
            let r = p.distance(arc.center);
            assert!((r - 20.0).abs() <= 1.5 + 1e-9, "radius {} out of band", r);
        }
    }

    #[test]
    fn negative_sweep_runs_backwards() {
        let mut path = Path::new();
        let mut random = RandomSource::new(9);
        let arc = Arc::between(Point::ZERO, 10.0, 0.0, -90.0);
        sketch_arc(&mut path, &mut random, &arc, 0.0, 45.0, true).unwrap();
        let points = path.points();
        let last = points.last().unwrap();
        assert!((last.x - 0.0).abs() < 1e-9);
        assert!((last.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn arc_radius_sanitized() {
        let mut path = Path::new();
        let mut random = RandomSource::new(0);
        let arc = Arc::new(Point::new(1.0, 1.0), -4.0, 0.0, 30.0);
        sketch_arc(&mut path, &mut random, &arc, 0.0, 10.0, true).unwrap();
        assert!(path.points().iter().all(|p| *p == Point::new(1.0, 1.0)));
    }
}
