//! Hachure line generation.
//!
//! A [`HachureIterator`] walks a cursor across a rectangle and yields the
//! raw, unsketched endpoints of parallel lines at a fixed angle and
//! perpendicular spacing. Feed each pair to [`crate::sketch::sketch_line`]
//! for the hand-drawn version, or use [`crate::fill::HachureFill`] which
//! does exactly that.
//!
//! Three regimes:
//! - near-horizontal angles produce vertical lines stepped along x
//! - near-vertical angles produce horizontal lines stepped along y
//! - everything else produces diagonals clipped against the left and right
//!   edges with [`Segment::compare`]

use log::debug;

use crate::error::{Result, SketchError};
use crate::geometry::{Bounds, Point};

/// Below this `|sin θ|` (and below this intersection denominator) lines are
/// treated as parallel.
pub const EPSILON_PARALLEL: f64 = 0.0001;

/// Above this `|sin θ|` the hatch is treated as exactly vertical.
pub const EPSILON_VERTICAL: f64 = 0.9999;

/// Smallest accepted gap. Keeps every cursor advance strictly positive.
pub const MIN_HACHURE_GAP: f64 = 1e-3;

/// Outcome of [`Segment::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Intersects,
    None,
}

/// A line segment used for clipping diagonal hatch lines.
///
/// `compare` records the intersection point of the last successful test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    intersection: Point,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2, intersection: Point::ZERO }
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Intersection point recorded by the last `compare` that returned
    /// [`Relation::Intersects`].
    #[inline]
    pub fn intersection(&self) -> Point {
        self.intersection
    }

    /// Test this segment against `other`.
    ///
    /// Both segments are parameterized from their first point; the
    /// segments intersect when both parameters fall within `[0, 1]`.
    /// Near-parallel pairs (|denominator| < [`EPSILON_PARALLEL`]) never
    /// intersect.
    pub fn compare(&mut self, other: &Segment) -> Relation {
        let denominator =
            (other.y2 - other.y1) * (self.x2 - self.x1) - (other.x2 - other.x1) * (self.y2 - self.y1);
        if denominator.abs() < EPSILON_PARALLEL {
            return Relation::None;
        }

        let along_self = ((other.x2 - other.x1) * (self.y1 - other.y1)
            - (other.y2 - other.y1) * (self.x1 - other.x1))
            / denominator;
        let along_other = ((self.x2 - self.x1) * (self.y1 - other.y1)
            - (self.y2 - self.y1) * (self.x1 - other.x1))
            / denominator;

        if (0.0..=1.0).contains(&along_self) && (0.0..=1.0).contains(&along_other) {
            self.intersection = Point::new(
                self.x1 + along_self * (self.x2 - self.x1),
                self.y1 + along_self * (self.y2 - self.y1),
            );
            Relation::Intersects
        } else {
            Relation::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Regime {
    /// Hatch angle is (nearly) horizontal: lines are vertical.
    Columns,
    /// Hatch angle is (nearly) vertical: lines are horizontal.
    Rows,
    /// General case: clipped diagonals.
    Diagonal {
        line_width_x: f64,
        horizontal_gap: f64,
        left_edge: Segment,
        right_edge: Segment,
    },
}

/// Lazily yields hatch line endpoints covering a rectangle.
///
/// The cursor only ever moves forward and every call either advances it or
/// reports exhaustion, so iteration always terminates.
#[derive(Debug, Clone)]
pub struct HachureIterator {
    bounds: Bounds,
    gap: f64,
    tan_angle: f64,
    regime: Regime,
    cursor: f64,
}

impl HachureIterator {
    /// Create an iterator over `[left, right] × [top, bottom]`.
    ///
    /// Fails when `gap` is below [`MIN_HACHURE_GAP`] or anything is not
    /// finite. Reversed bounds are normalized.
    pub fn new(
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
        gap: f64,
        angle_radians: f64,
    ) -> Result<Self> {
        if !(gap.is_finite() && gap >= MIN_HACHURE_GAP) {
            return Err(SketchError::InvalidGap { gap, min: MIN_HACHURE_GAP });
        }
        if ![top, bottom, left, right].iter().all(|v| v.is_finite()) {
            return Err(SketchError::NonFinite { what: "hachure bounds" });
        }
        if !angle_radians.is_finite() {
            return Err(SketchError::NonFinite { what: "hachure angle" });
        }

        let bounds = Bounds::from_corners(Point::new(left, top), Point::new(right, bottom));
        Ok(Self::with_bounds(bounds, gap, angle_radians))
    }

    /// Create an iterator over already validated bounds.
    fn with_bounds(bounds: Bounds, gap: f64, angle_radians: f64) -> Self {
        let (sin_angle, cos_angle) = angle_radians.sin_cos();
        let tan_angle = angle_radians.tan();

        let (regime, cursor) = if sin_angle.abs() < EPSILON_PARALLEL {
            (Regime::Columns, bounds.left + gap)
        } else if sin_angle.abs() > EPSILON_VERTICAL {
            (Regime::Rows, bounds.top + gap)
        } else {
            let line_width_x = bounds.height() * tan_angle.abs();
            let regime = Regime::Diagonal {
                line_width_x,
                horizontal_gap: (gap / cos_angle).abs(),
                left_edge: Segment::new(bounds.left, bounds.bottom, bounds.left, bounds.top),
                right_edge: Segment::new(bounds.right, bounds.bottom, bounds.right, bounds.top),
            };
            (regime, bounds.left - line_width_x)
        };

        debug!("hachure over {:?}, gap {}, regime {:?}", bounds, gap, regime);
        Self { bounds, gap, tan_angle, regime, cursor }
    }

    /// Iterator over a region starting at the origin, angle in degrees.
    pub fn for_size(width: f64, height: f64, gap: f64, angle_degrees: f64) -> Result<Self> {
        Self::new(0.0, height, 0.0, width, gap, angle_degrees.to_radians())
    }

    /// Current cursor position. Strictly increases with every emitted line.
    #[inline]
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// The next line's endpoints, or `None` once the region is covered.
    pub fn next_line(&mut self) -> Option<(Point, Point)> {
        let Bounds { left, top, right, bottom } = self.bounds;

        match self.regime {
            Regime::Columns => {
                if self.cursor >= right {
                    return None;
                }
                let line = (Point::new(self.cursor, top), Point::new(self.cursor, bottom));
                self.advance_cursor(self.gap);
                Some(line)
            }
            Regime::Rows => {
                if self.cursor >= bottom {
                    return None;
                }
                let line = (Point::new(left, self.cursor), Point::new(right, self.cursor));
                self.advance_cursor(self.gap);
                Some(line)
            }
            Regime::Diagonal { line_width_x, horizontal_gap, left_edge, right_edge } => {
                let end = right + line_width_x;
                if self.cursor >= end {
                    return None;
                }

                let half = line_width_x / 2.0;
                let mut x_lower = self.cursor - half;
                let mut x_upper = self.cursor + half;

                // Skip candidates lying entirely outside the box
                while (x_lower < left && x_upper < left) || (x_lower > right && x_upper > right) {
                    if !self.advance_cursor(horizontal_gap) || self.cursor > end {
                        return None;
                    }
                    x_lower = self.cursor - half;
                    x_upper = self.cursor + half;
                }

                let mut y_lower = bottom;
                let mut y_upper = top;
                let mut candidate = Segment::new(x_lower, y_lower, x_upper, y_upper);

                if candidate.compare(&left_edge) == Relation::Intersects {
                    let hit = candidate.intersection();
                    x_lower = hit.x;
                    y_lower = hit.y;
                }
                if candidate.compare(&right_edge) == Relation::Intersects {
                    let hit = candidate.intersection();
                    x_upper = hit.x;
                    y_upper = hit.y;
                }

                if self.tan_angle > 0.0 {
                    x_lower = right - (x_lower - left);
                    x_upper = right - (x_upper - left);
                }

                self.advance_cursor(horizontal_gap);
                Some((Point::new(x_lower, y_lower), Point::new(x_upper, y_upper)))
            }
        }
    }

    /// Move the cursor forward by `step`.
    ///
    /// Far from the origin a small step can round away entirely. The
    /// iterator is then exhausted and `false` is returned.
    fn advance_cursor(&mut self, step: f64) -> bool {
        let next = self.cursor + step;
        if next > self.cursor {
            self.cursor = next;
            true
        } else {
            self.cursor = f64::INFINITY;
            false
        }
    }
}

impl Iterator for HachureIterator {
    type Item = (Point, Point);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

// ============================================================================
// TESTS
// ============================================================================
