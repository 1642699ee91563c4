//! Distance calculation routines
//!
//! Point-to-segment and segment-to-segment distances. Segment predicates go
//! through `geo` lines; `segment_distance` reports 0 for crossing segments.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, EuclideanDistance, Intersects, Line};
use serde::{Deserialize, Serialize};

use super::{Point, EPSILON};

/// Straight line segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn distance_to_point(&self, p: Point) -> f64 {
        point_segment_distance(p, self.start, self.end).0
    }

    pub fn distance(&self, other: &Segment) -> f64 {
        segment_distance(self.start, self.end, other.start, other.end).0
    }

    /// True when `p` lies strictly closer than `dist` to the segment.
    pub fn point_closer_than(&self, p: Point, dist: f64) -> bool {
        self.distance_to_point(p) < dist
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }

    /// Closest point of the segment to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        point_segment_distance(p, self.start, self.end).1
    }
}

/// Point-to-segment minimum distance and the closest point on the segment
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> (f64, Point) {
    let ab = b - a;
    let ab_len2 = ab.dot(&ab);

    if ab_len2 < EPSILON * EPSILON {
        // Degenerate segment
        return (p.distance(&a), a);
    }

    let t = ((p - a).dot(&ab) / ab_len2).clamp(0.0, 1.0);
    let closest = a + ab.scale(t);
    (p.distance(&closest), closest)
}

/// True when segments `a1a2` and `b1b2` share at least one point.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    line(a1, a2).intersects(&line(b1, b2))
}

/// Segment-to-segment minimum distance and a representative closest point
pub fn segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> (f64, Point) {
    let (a, b) = (line(a1, a2), line(b1, b2));
    if let Some(hit) = line_intersection(a, b) {
        let at = match hit {
            LineIntersection::SinglePoint { intersection, .. } => intersection,
            LineIntersection::Collinear { intersection } => intersection.start,
        };
        return (0.0, Point::from(at));
    }

    let mut min_d = f64::MAX;
    let mut closest = a1;
    for (p, s, e) in [(a1, b1, b2), (a2, b1, b2), (b1, a1, a2), (b2, a1, a2)] {
        let (d, q) = point_segment_distance(p, s, e);
        if d < min_d {
            min_d = d;
            closest = midpoint(p, q);
        }
    }

    (a.euclidean_distance(&b), closest)
}

pub(crate) fn line(start: Point, end: Point) -> Line<f64> {
    Line::new(Coord::from(start), Coord::from(end))
}

/// Midpoint of two points
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_distance() {
        let (d, _) = point_segment_distance(Point::new(0.0, 1.0), Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_segment_distance_degenerate() {
        let (d, p) = point_segment_distance(Point::new(3.0, 4.0), Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_crossing_segments_have_zero_distance() {
        let (d, p) = segment_distance(
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, 1.0),
        );
        assert_eq!(d, 0.0);
        assert!(p.length() < 1e-9);
    }

    #[test]
    fn test_parallel_segments() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(0.0, 0.5), Point::new(10.0, 0.5));
        assert!((a.distance(&b) - 0.5).abs() < 1e-9);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_collinear_touching_segments_intersect() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ));
    }

    #[test]
    fn test_point_closer_than_is_strict() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
        assert!(s.point_closer_than(Point::new(2.0, 0.99), 1.0));
        assert!(!s.point_closer_than(Point::new(2.0, 1.0), 1.0));
    }
}
