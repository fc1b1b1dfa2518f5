//! Core geometry types for pencil.
//!
//! Everything here lives in the rendering surface's local pixel space.
//! Density conversion happens before values reach these types (see
//! [`crate::config::SketchConfig::to_pixels`]).

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Width and height of a rendering region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned bounds, always normalized so `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// A point expressed as a fraction of a canvas size.
///
/// `(0.5, 0.0)` is the middle of the top edge whatever the canvas measures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelativePoint {
    pub x: f64,
    pub y: f64,
}

/// A single drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// An ordered sequence of move/line/close commands.
///
/// Sketched curves are always approximated by straight segments, so there
/// are no curve commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Length of this point seen as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    #[inline]
    pub fn normalize(&self) -> Point {
        let length = self.length();
        if length == 0.0 {
            Point::ZERO
        } else {
            *self / length
        }
    }

    /// The vector rotated by +90° in screen space: `(-y, x)`.
    #[inline]
    pub fn normal(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The smaller of width and height.
    #[inline]
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Bottom-right corner when the region starts at the origin.
    #[inline]
    pub fn corner(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl Bounds {
    /// Normalize two arbitrary corner points into bounds.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Whether a point lies inside, allowing `tolerance` slack on every edge.
    #[inline]
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        point.x >= self.left - tolerance
            && point.x <= self.right + tolerance
            && point.y >= self.top - tolerance
            && point.y <= self.bottom + tolerance
    }
}

impl RelativePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Resolve against a concrete canvas size.
    #[inline]
    pub fn resolve(&self, size: Size) -> Point {
        Point::new(self.x * size.width, self.y * size.height)
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { commands: Vec::with_capacity(capacity) }
    }

    #[inline]
    pub fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    #[inline]
    pub fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
    }

    #[inline]
    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Clear all commands but keep the allocation for the next redraw.
    pub fn rewind(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the last command closes the current subpath.
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Every move-to and line-to point, in order.
    pub fn points(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::Close => None,
            })
            .collect()
    }

    /// Split into polylines, one per move-to.
    ///
    /// A leading line-to without a preceding move-to starts its own polyline.
    pub fn subpaths(&self) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => subpaths.push(vec![*p]),
                PathCommand::LineTo(p) => match subpaths.last_mut() {
                    Some(current) => current.push(*p),
                    None => subpaths.push(vec![*p]),
                },
                PathCommand::Close => {}
            }
        }
        subpaths
    }

    /// Bounding box of all points, or `None` for an empty path.
    pub fn bounding_box(&self) -> Option<Bounds> {
        let points = self.points();
        let first = points.first()?;
        let init = Bounds::from_corners(*first, *first);
        Some(points.iter().fold(init, |b, p| Bounds {
            left: b.left.min(p.x),
            top: b.top.min(p.y),
            right: b.right.max(p.x),
            bottom: b.bottom.max(p.y),
        }))
    }

    /// Copy of the path shifted by `offset`.
    pub fn translate(&self, offset: Point) -> Path {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(p + offset),
                PathCommand::LineTo(p) => PathCommand::LineTo(p + offset),
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Path { commands }
    }

    /// Render as SVG path data (`M x y L x y ... Z`).
    pub fn to_svg_data(&self) -> String {
        let mut data = String::with_capacity(self.commands.len() * 16);
        for command in &self.commands {
            if !data.is_empty() {
                data.push(' ');
            }
            match command {
                PathCommand::MoveTo(p) => data.push_str(&format!("M{:.2} {:.2}", p.x, p.y)),
                PathCommand::LineTo(p) => data.push_str(&format!("L{:.2} {:.2}", p.x, p.y)),
                PathCommand::Close => data.push('Z'),
            }
        }
        data
    }
}

// ============================================================================
// TESTS
// ============================================================================
