//! Drawing sketched outlines on a canvas of unknown size.
//!
//! Callers describe an outline with [`RelativePoint`]s and a generator
//! function. Once the canvas size is known the points are resolved and the
//! generator runs with a fresh random source, so the same inputs always give
//! the same path. [`PathCache`] keeps the last result around so a redraw
//! with unchanged inputs does no work.

use log::trace;

use crate::config::SketchConfig;
use crate::error::Result;
use crate::geometry::{Path, Point, RelativePoint, Size};
use crate::rng::RandomSource;

/// Signature shared by every two-point outline generator.
///
/// [`crate::shapes::sketch_line_between`], [`crate::shapes::sketch_rectangle`],
/// [`crate::shapes::sketch_circle`] and [`crate::shapes::sketch_capsule`] all fit.
pub type OutlineGenerator = fn(&mut RandomSource, Point, Point, &SketchConfig) -> Result<Path>;

/// Resolve `a` and `b` against `size` and run `generator` once.
pub fn canvas_path(
    generator: OutlineGenerator,
    seed: u64,
    a: RelativePoint,
    b: RelativePoint,
    size: Size,
    config: &SketchConfig,
) -> Result<Path> {
    let mut random = RandomSource::new(seed);
    generator(&mut random, a.resolve(size), b.resolve(size), config)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    generator: usize,
    seed: u64,
    a: RelativePoint,
    b: RelativePoint,
    size: Size,
    config: SketchConfig,
}

/// Memoizes the most recent [`canvas_path`] result.
#[derive(Debug, Default)]
pub struct PathCache {
    entry: Option<(CacheKey, Path)>,
    misses: usize,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached path for these inputs, generating it first if any input
    /// changed since the last call.
    ///
    /// A failed generation leaves the previous entry in place.
    pub fn get_or_generate(
        &mut self,
        generator: OutlineGenerator,
        seed: u64,
        a: RelativePoint,
        b: RelativePoint,
        size: Size,
        config: &SketchConfig,
    ) -> Result<&Path> {
        let key = CacheKey {
            generator: generator as usize,
            seed,
            a,
            b,
            size,
            config: *config,
        };

        let entry = match self.entry.take() {
            Some((cached, path)) if cached == key => (cached, path),
            previous => match canvas_path(generator, seed, a, b, size, config) {
                Ok(path) => {
                    trace!("path cache miss for seed {} at {:?}", seed, size);
                    self.misses += 1;
                    (key, path)
                }
                Err(err) => {
                    self.entry = previous;
                    return Err(err);
                }
            },
        };

        let (_, path) = self.entry.insert(entry);
        Ok(path)
    }

    /// Number of times a path was actually generated.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop the cached path.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SketchError;
    use crate::shapes::{sketch_capsule, sketch_line_between, sketch_rectangle};

    #[test]
    fn relative_points_follow_size() {
        let config = SketchConfig::default();
        let path = canvas_path(
            sketch_line_between,
            4,
            RelativePoint::new(0.0, 0.5),
            RelativePoint::new(1.0, 0.5),
            Size::new(200.0, 30.0),
            &config,
        )
        .unwrap();
        let points = path.points();
        assert_eq!(points.first(), Some(&Point::new(0.0, 15.0)));
        assert_eq!(points.last(), Some(&Point::new(200.0, 15.0)));
    }

    #[test]
    fn canvas_path_matches_direct_call() {
        let config = SketchConfig::default();
        let size = Size::new(64.0, 32.0);
        let via_canvas = canvas_path(
            sketch_rectangle,
            7,
            RelativePoint::new(0.0, 0.0),
            RelativePoint::new(1.0, 1.0),
            size,
            &config,
        )
        .unwrap();
        let direct = sketch_rectangle(&mut RandomSource::new(7), Point::ZERO, size.corner(), &config).unwrap();
        assert_eq!(via_canvas, direct);
    }

    #[test]
    fn cache_regenerates_only_on_change() {
        let config = SketchConfig::default();
        let mut cache = PathCache::new();
        let a = RelativePoint::new(0.0, 0.0);
        let b = RelativePoint::new(1.0, 1.0);
        let size = Size::new(120.0, 40.0);

        let first = cache.get_or_generate(sketch_capsule, 1, a, b, size, &config).unwrap().clone();
        let second = cache.get_or_generate(sketch_capsule, 1, a, b, size, &config).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(cache.misses(), 1);

        cache.get_or_generate(sketch_capsule, 1, a, b, Size::new(121.0, 40.0), &config).unwrap();
        assert_eq!(cache.misses(), 2);

        cache.get_or_generate(sketch_capsule, 2, a, b, Size::new(121.0, 40.0), &config).unwrap();
        assert_eq!(cache.misses(), 3);

        cache.get_or_generate(sketch_rectangle, 2, a, b, Size::new(121.0, 40.0), &config).unwrap();
        assert_eq!(cache.misses(), 4);

        cache.invalidate();
        cache.get_or_generate(sketch_rectangle, 2, a, b, Size::new(121.0, 40.0), &config).unwrap();
        assert_eq!(cache.misses(), 5);
    }

    #[test]
    fn failed_generation_is_reported() {
        let bad = SketchConfig::default().with_step_size(-1.0);
        let mut cache = PathCache::new();
        let result = cache.get_or_generate(
            sketch_rectangle,
            0,
            RelativePoint::new(0.0, 0.0),
            RelativePoint::new(1.0, 1.0),
            Size::new(10.0, 10.0),
            &bad,
        );
        assert_eq!(result, Err(SketchError::InvalidStepSize(-1.0)));
        assert_eq!(cache.misses(), 0);
    }
}
