//! Copper shapes as a core inflated by a radius
//!
//! A circle is a point core with a radius, an oval or a track is a segment
//! core with a radius, a rectangle is a polygon core with a zero radius and a
//! rounded rectangle is a shrunk polygon core with the corner radius. The
//! distance between two shapes is the distance between their cores minus both
//! radii, clamped at zero.

use geo::EuclideanDistance;

use super::distance::{point_segment_distance, segment_distance, Segment};
use super::polygon::{distance_to_point, distance_to_segment, to_polygon};
use super::{Point, EPSILON};

#[derive(Debug, Clone, PartialEq)]
pub enum Core {
    Point(Point),
    Segment(Point, Point),
    /// Closed outline, vertices in order, last edge implied
    Polygon(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub core: Core,
    pub radius: f64,
}

impl Shape {
    pub fn circle(center: Point, radius: f64) -> Self {
        Self {
            core: Core::Point(center),
            radius,
        }
    }

    pub fn capsule(start: Point, end: Point, radius: f64) -> Self {
        if start.distance(&end) < EPSILON {
            return Self::circle(start, radius);
        }
        Self {
            core: Core::Segment(start, end),
            radius,
        }
    }

    pub fn polygon(points: Vec<Point>, radius: f64) -> Self {
        match points.len() {
            0 => Self::circle(Point::default(), radius),
            1 => Self::circle(points[0], radius),
            2 => Self::capsule(points[0], points[1], radius),
            _ => Self {
                core: Core::Polygon(points),
                radius,
            },
        }
    }

    pub fn translated(&self, offset: Point) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Rotate about the origin.
    pub fn rotated(&self, degrees: f64) -> Self {
        self.map_points(|p| p.rotated(degrees))
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let core = match &self.core {
            Core::Point(p) => Core::Point(f(*p)),
            Core::Segment(a, b) => Core::Segment(f(*a), f(*b)),
            Core::Polygon(pts) => Core::Polygon(pts.iter().map(|p| f(*p)).collect()),
        };
        Self {
            core,
            radius: self.radius,
        }
    }

    /// Largest distance from `center` to any point of the shape.
    pub fn bounding_radius_about(&self, center: Point) -> f64 {
        let core_extent = match &self.core {
            Core::Point(p) => p.distance(&center),
            Core::Segment(a, b) => a.distance(&center).max(b.distance(&center)),
            Core::Polygon(pts) => pts
                .iter()
                .map(|p| p.distance(&center))
                .fold(0.0, f64::max),
        };
        core_extent + self.radius
    }

    /// Edge-to-edge distance, 0 when the shapes touch or overlap.
    pub fn distance(&self, other: &Shape) -> f64 {
        (core_distance(&self.core, &other.core) - self.radius - other.radius).max(0.0)
    }

    /// True when the gap between the shapes is strictly below `clearance`.
    pub fn collides(&self, other: &Shape, clearance: f64) -> bool {
        core_distance(&self.core, &other.core) < clearance + self.radius + other.radius
    }
}

fn core_distance(a: &Core, b: &Core) -> f64 {
    match (a, b) {
        (Core::Point(p), Core::Point(q)) => p.distance(q),
        (Core::Point(p), Core::Segment(s, e)) | (Core::Segment(s, e), Core::Point(p)) => {
            point_segment_distance(*p, *s, *e).0
        }
        (Core::Point(p), Core::Polygon(poly)) | (Core::Polygon(poly), Core::Point(p)) => {
            distance_to_point(&to_polygon(poly, &[]), *p)
        }
        (Core::Segment(a1, a2), Core::Segment(b1, b2)) => segment_distance(*a1, *a2, *b1, *b2).0,
        (Core::Segment(s, e), Core::Polygon(poly)) | (Core::Polygon(poly), Core::Segment(s, e)) => {
            distance_to_segment(&to_polygon(poly, &[]), &Segment::new(*s, *e))
        }
        (Core::Polygon(pa), Core::Polygon(pb)) => to_polygon(pa, &[]).euclidean_distance(&to_polygon(pb, &[])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, half: f64) -> Shape {
        Shape::polygon(
            vec![
                Point::new(cx - half, cy - half),
                Point::new(cx + half, cy - half),
                Point::new(cx + half, cy + half),
                Point::new(cx - half, cy + half),
            ],
            0.0,
        )
    }

    #[test]
    fn test_circle_circle_gap() {
        let a = Shape::circle(Point::new(0.0, 0.0), 1.0);
        let b = Shape::circle(Point::new(3.0, 0.0), 1.0);
        assert!((a.distance(&b) - 1.0).abs() < 1e-9);
        assert!(a.collides(&b, 1.5));
        assert!(!a.collides(&b, 1.0));
    }

    #[test]
    fn test_square_contains_circle() {
        let sq = square(0.0, 0.0, 2.0);
        let c = Shape::circle(Point::new(0.5, 0.5), 0.1);
        assert_eq!(sq.distance(&c), 0.0);
    }

    #[test]
    fn test_square_square_gap() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(3.0, 0.0, 1.0);
        assert!((a.distance(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_capsule_through_square() {
        let sq = square(0.0, 0.0, 1.0);
        let track = Shape::capsule(Point::new(-5.0, 0.0), Point::new(5.0, 0.0), 0.1);
        assert_eq!(sq.distance(&track), 0.0);
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let a = square(0.0, 0.0, 1.0);
        let b = Shape::circle(Point::new(4.0, 0.0), 1.0);
        let d = a.distance(&b);
        let d_rot = a.rotated(37.0).distance(&b.rotated(37.0));
        assert!((d - d_rot).abs() < 1e-9);
    }
}
