//! Polygon helpers built on the `geo` crate
//!
//! Outlines in the board model are plain vertex lists; these helpers convert
//! them to `geo` polygons (holes included) and wrap the `geo` predicates the
//! zone, keepout and courtyard checks use.

use geo::{Area, BooleanOps, Coord, EuclideanDistance, Intersects, LineString, MultiPolygon, Polygon};

use super::distance::{line, Segment};
use super::{Point, EPSILON};

/// Intersections smaller than this (mm²) are treated as touching, not overlapping.
pub const AREA_EPSILON: f64 = 1e-9;

pub fn ring(points: &[Point]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = points.iter().map(|p| Coord::from(*p)).collect();
    if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
        if first != last {
            coords.push(first);
        }
    }
    LineString::new(coords)
}

pub fn to_polygon(outline: &[Point], holes: &[Vec<Point>]) -> Polygon<f64> {
    Polygon::new(ring(outline), holes.iter().map(|h| ring(h)).collect())
}

/// Distance from a filled polygon to a segment; 0 when they touch or the
/// segment lies inside.
pub fn distance_to_segment(poly: &Polygon<f64>, segment: &Segment) -> f64 {
    poly.euclidean_distance(&line(segment.start, segment.end))
}

/// Distance from a filled polygon to a point; 0 inside.
pub fn distance_to_point(poly: &Polygon<f64>, point: Point) -> f64 {
    poly.euclidean_distance(&geo::Point::from(Coord::from(point)))
}

/// First vertex of the common area of `a` and `b`, or `None` when they do not
/// overlap with a positive area.
pub fn overlap_location(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<Point> {
    if a.0.is_empty() || b.0.is_empty() {
        return None;
    }
    let common = a.intersection(b);
    common
        .0
        .iter()
        .filter(|poly| poly.unsigned_area() > AREA_EPSILON)
        .find_map(|poly| poly.exterior().0.first().copied())
        .map(Point::from)
}

/// True when two non-adjacent edges of a closed outline touch or cross.
pub fn is_self_intersecting(outline: &[Point]) -> bool {
    let pts: Vec<Point> = dedup_closed(outline);
    let n = pts.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (pts[i], pts[(i + 1) % n]);
        for j in (i + 2)..n {
            // first and last edges share a vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (pts[j], pts[(j + 1) % n]);
            if line(a1, a2).intersects(&line(b1, b2)) {
                return true;
            }
        }
    }
    false
}

/// Drop repeated consecutive vertices and an explicit closing vertex.
fn dedup_closed(outline: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(outline.len());
    for p in outline {
        if pts.last().map_or(true, |q: &Point| q.distance(p) > EPSILON) {
            pts.push(*p);
        }
    }
    while pts.len() > 1 && pts[0].distance(&pts[pts.len() - 1]) <= EPSILON {
        pts.pop();
    }
    pts
}

/// True when `point` lies in the filled area or on its boundary; holes are
/// outside.
pub fn contains_point(poly: &Polygon<f64>, point: Point) -> bool {
    poly.intersects(&Coord::from(point))
}

/// True when the segment touches the filled area.
pub fn intersects_segment(poly: &Polygon<f64>, segment: &Segment) -> bool {
    poly.intersects(&line(segment.start, segment.end))
}

/// True when two filled areas share a point.
pub fn areas_intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.intersects(b)
}

/// Gap between two filled areas; 0 when they touch.
pub fn area_distance(a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
    a.euclidean_distance(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_overlap_location_for_overlapping_rects() {
        let a = MultiPolygon::new(vec![to_polygon(&rect(0.0, 0.0, 2.0, 2.0), &[])]);
        let b = MultiPolygon::new(vec![to_polygon(&rect(1.0, 1.0, 3.0, 3.0), &[])]);
        let loc = overlap_location(&a, &b).expect("rects overlap");
        assert!(loc.x >= 1.0 - 1e-9 && loc.x <= 2.0 + 1e-9);
        assert!(loc.y >= 1.0 - 1e-9 && loc.y <= 2.0 + 1e-9);
    }

    #[test]
    fn test_no_overlap_for_disjoint_rects() {
        let a = MultiPolygon::new(vec![to_polygon(&rect(0.0, 0.0, 1.0, 1.0), &[])]);
        let b = MultiPolygon::new(vec![to_polygon(&rect(2.0, 0.0, 3.0, 1.0), &[])]);
        assert!(overlap_location(&a, &b).is_none());
    }

    #[test]
    fn test_bow_tie_is_self_intersecting() {
        let bow_tie = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        ];
        assert!(is_self_intersecting(&bow_tie));
        assert!(!is_self_intersecting(&rect(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_distance_to_segment_inside_is_zero() {
        let poly = to_polygon(&rect(0.0, 0.0, 10.0, 10.0), &[]);
        let seg = Segment::new(Point::new(2.0, 2.0), Point::new(3.0, 3.0));
        assert_eq!(distance_to_segment(&poly, &seg), 0.0);
        let outside = Segment::new(Point::new(12.0, 0.0), Point::new(12.0, 10.0));
        assert!((distance_to_segment(&poly, &outside) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_distance_and_intersection() {
        let a = to_polygon(&rect(0.0, 0.0, 1.0, 1.0), &[]);
        let b = to_polygon(&rect(1.5, 0.0, 2.5, 1.0), &[]);
        assert!(!areas_intersect(&a, &b));
        assert!((area_distance(&a, &b) - 0.5).abs() < 1e-9);
        let c = to_polygon(&rect(0.5, 0.5, 2.0, 2.0), &[]);
        assert!(areas_intersect(&a, &c));
        assert_eq!(area_distance(&a, &c), 0.0);
    }

    #[test]
    fn test_holes_are_outside_the_area() {
        let frame = to_polygon(&rect(0.0, 0.0, 30.0, 30.0), &[rect(10.0, 10.0, 20.0, 20.0)]);
        let island = to_polygon(&rect(12.0, 12.0, 18.0, 18.0), &[]);
        assert!(!areas_intersect(&frame, &island));
        assert!((area_distance(&frame, &island) - 2.0).abs() < 1e-9);
        assert!(contains_point(&frame, Point::new(5.0, 5.0)));
        assert!(contains_point(&frame, Point::new(10.0, 15.0)));
        assert!(!contains_point(&frame, Point::new(15.0, 15.0)));
        let inside_hole = Segment::new(Point::new(11.0, 15.0), Point::new(19.0, 15.0));
        assert!(!intersects_segment(&frame, &inside_hole));
        assert!((distance_to_segment(&frame, &inside_hole) - 1.0).abs() < 1e-9);
    }
}
