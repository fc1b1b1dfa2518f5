//! Seed-quantified properties of the sketch generators and hachure clipper.

use lyon_geom::{LineSegment, point};
use pencil::{
    CornerRadii, HachureIterator, Point, RandomSource, Relation, Segment, SketchConfig, Path,
    sketch_capsule, sketch_circle, sketch_line, sketch_rectangle, sketch_rounded_rectangle,
};
use proptest::prelude::*;

fn line(seed: u64, a: Point, b: Point, offset: f64, step: f64) -> Path {
    let mut path = Path::new();
    let mut random = RandomSource::new(seed);
    sketch_line(&mut path, &mut random, a, b, offset, step, true).unwrap();
    path
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let length = d.length();
    if length == 0.0 {
        return p.distance(a);
    }
    ((p.x - a.x) * d.y - (p.y - a.y) * d.x).abs() / length
}

proptest! {
    #[test]
    fn line_endpoints_are_exact(
        seed in any::<u64>(),
        ax in -500.0f64..500.0, ay in -500.0f64..500.0,
        bx in -500.0f64..500.0, by in -500.0f64..500.0,
        offset in 0.0f64..5.0,
        step in 0.5f64..10.0,
    ) {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        let points = line(seed, a, b, offset, step).points();
        prop_assert_eq!(points.first(), Some(&a));
        prop_assert_eq!(points.last(), Some(&b));
    }

    #[test]
    fn samples_stay_within_offset(
        seed in any::<u64>(),
        bx in -300.0f64..300.0, by in -300.0f64..300.0,
        offset in 0.0f64..5.0,
    ) {
        let a = Point::new(10.0, -20.0);
        let b = Point::new(bx, by);
        for p in line(seed, a, b, offset, 2.0).points() {
            prop_assert!(distance_to_line(p, a, b) <= offset + 1e-9);
        }
    }

    #[test]
    fn same_seed_same_line(seed in any::<u64>(), bx in 1.0f64..400.0) {
        let a = Point::ZERO;
        let b = Point::new(bx, bx / 3.0);
        prop_assert_eq!(line(seed, a, b, 1.5, 2.0), line(seed, a, b, 1.5, 2.0));
    }

    #[test]
    fn zero_radius_rounded_rectangle_is_rectangle(
        seed in any::<u64>(),
        x in -100.0f64..100.0, y in -100.0f64..100.0,
        w in 1.0f64..200.0, h in 1.0f64..200.0,
    ) {
        let config = SketchConfig::default();
        let a = Point::new(x, y);
        let b = Point::new(x + w, y + h);
        let rect = sketch_rectangle(&mut RandomSource::new(seed), a, b, &config).unwrap();
        let rounded = sketch_rounded_rectangle(
            &mut RandomSource::new(seed), a, b, &config, CornerRadii::default(),
        ).unwrap();
        prop_assert_eq!(rect, rounded);
    }

    #[test]
    fn narrow_capsule_is_circle(
        seed in any::<u64>(),
        w in 0.0f64..100.0,
        extra in 0.0f64..100.0,
    ) {
        let config = SketchConfig::default();
        let a = Point::ZERO;
        let b = Point::new(w, w + extra);
        let capsule = sketch_capsule(&mut RandomSource::new(seed), a, b, &config).unwrap();
        let circle = sketch_circle(&mut RandomSource::new(seed), a, b, &config).unwrap();
        prop_assert_eq!(capsule, circle);
    }

    #[test]
    fn closed_outlines_end_where_they_start(
        seed in any::<u64>(),
        w in 1.0f64..200.0, h in 1.0f64..200.0,
        radius in 0.0f64..50.0,
    ) {
        let config = SketchConfig::default();
        let b = Point::new(w, h);
        for path in [
            sketch_rectangle(&mut RandomSource::new(seed), Point::ZERO, b, &config).unwrap(),
            sketch_rounded_rectangle(
                &mut RandomSource::new(seed), Point::ZERO, b, &config, CornerRadii::new(0.0, 0.0, radius, 0.0),
            ).unwrap(),
        ] {
            prop_assert!(path.is_closed());
            prop_assert_eq!(path.subpaths().len(), 1);
        }
    }

    #[test]
    fn hachure_lines_stay_in_box_and_terminate(
        w in 10.0f64..500.0, h in 10.0f64..500.0,
        gap in 1.0f64..50.0,
        angle in -180.0f64..180.0,
    ) {
        let iter = HachureIterator::for_size(w, h, gap, angle).unwrap();
        let bound = ((w + h) / gap) as usize + 2;
        let lines: Vec<(Point, Point)> = iter.take(bound + 1).collect();
        prop_assert!(lines.len() <= bound, "{} lines for bound {}", lines.len(), bound);

        let tolerance = 1e-6;
        for (a, b) in &lines {
            for p in [a, b] {
                prop_assert!(p.x >= -tolerance && p.x <= w + tolerance, "{:?}", p);
                prop_assert!(p.y >= -tolerance && p.y <= h + tolerance, "{:?}", p);
            }
        }
    }

    #[test]
    fn hachure_cursor_increases(
        gap in 1.0f64..20.0,
        angle in -180.0f64..180.0,
    ) {
        let mut iter = HachureIterator::for_size(120.0, 80.0, gap, angle).unwrap();
        let mut last = iter.cursor();
        while iter.next_line().is_some() {
            prop_assert!(iter.cursor() > last);
            last = iter.cursor();
        }
    }

    #[test]
    fn crossing_segments_match_lyon(
        px in -100.0f64..100.0, py in -100.0f64..100.0,
        angle1 in 0.0f64..180.0,
        spread in 10.0f64..170.0,
        len1 in 1.0f64..100.0, len2 in 1.0f64..100.0,
        t1 in 0.1f64..0.9, t2 in 0.1f64..0.9,
    ) {
        let crossing = Point::new(px, py);
        let direction = |degrees: f64| {
            let (sin, cos) = degrees.to_radians().sin_cos();
            Point::new(cos, sin)
        };
        let d1 = direction(angle1) * len1;
        let d2 = direction(angle1 + spread) * len2;
        let (a1, b1) = (crossing - d1 * t1, crossing + d1 * (1.0 - t1));
        let (a2, b2) = (crossing - d2 * t2, crossing + d2 * (1.0 - t2));

        let mut ours = Segment::from_points(a1, b1);
        prop_assert_eq!(ours.compare(&Segment::from_points(a2, b2)), Relation::Intersects);

        let reference = LineSegment { from: point(a1.x, a1.y), to: point(b1.x, b1.y) }
            .intersection(&LineSegment { from: point(a2.x, a2.y), to: point(b2.x, b2.y) });
        prop_assert!(reference.is_some());
        let reference = reference.unwrap();

        let hit = ours.intersection();
        prop_assert!((hit.x - reference.x).abs() < 1e-6, "{:?} vs {:?}", hit, reference);
        prop_assert!((hit.y - reference.y).abs() < 1e-6, "{:?} vs {:?}", hit, reference);
        prop_assert!(hit.distance(crossing) < 1e-6);
    }

    #[test]
    fn separated_parallel_segments_never_intersect(
        angle in 0.0f64..360.0,
        shift in 0.5f64..50.0,
        len in 1.0f64..100.0,
    ) {
        let (sin, cos) = angle.to_radians().sin_cos();
        let d = Point::new(cos, sin) * len;
        let n = Point::new(-sin, cos) * shift;

        let mut first = Segment::from_points(Point::ZERO, d);
        prop_assert_eq!(first.compare(&Segment::from_points(n, n + d)), Relation::None);

        let reference = LineSegment { from: point(0.0, 0.0), to: point(d.x, d.y) }
            .intersection(&LineSegment { from: point(n.x, n.y), to: point(n.x + d.x, n.y + d.y) });
        prop_assert!(reference.is_none());
    }
}
