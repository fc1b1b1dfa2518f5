//! # pencil
//!
//! Seeded hand-sketched path generation.
//!
//! Straight edges and arcs are sampled at a fixed interval and each sample
//! is nudged sideways by a random walk, so outlines look drawn by hand while
//! staying repeatable: the same seed always yields the same path.
//!
//! - [`sketch`] holds the two primitives, [`sketch::sketch_line`] and
//!   [`sketch::sketch_arc`].
//! - [`shapes`] chains them into rectangles, circles, capsules and rounded
//!   rectangles.
//! - [`hachure`] and [`fill`] cover a region with sketched parallel lines.
//! - [`canvas`] and [`svg`] get the results onto a surface.

pub mod canvas;
pub mod config;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod hachure;
pub mod rng;
pub mod shapes;
pub mod sketch;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use canvas::{OutlineGenerator, PathCache, canvas_path};
pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use fill::{HachureFill, HachureStyle};
pub use geometry::{Bounds, Path, PathCommand, Point, RelativePoint, Size};
pub use hachure::{HachureIterator, MIN_HACHURE_GAP, Relation, Segment};
pub use rng::RandomSource;
pub use shapes::{
    CornerRadii, CornerSize, LayoutDirection, PathSketcher, SketchShape, sketch_capsule,
    sketch_circle, sketch_line_between, sketch_partial_circle, sketch_rectangle,
    sketch_rounded_rectangle,
};
pub use sketch::{Arc, Wobble, sketch_arc, sketch_line};
pub use svg::{SvgDocument, SvgError, SvgLayer};
