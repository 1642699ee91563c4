//! Geometry primitives used by the rule checks
//!
//! # Submodules
//! - `distance` - point/segment distance routines
//! - `shape` - "core + radius" shapes for pads, tracks, vias and strokes
//! - `polygon` - outline helpers on top of the `geo` crate
//! - `stroke_font` - built-in single-stroke font for copper text

pub mod distance;
pub mod polygon;
pub mod shape;
pub mod stroke_font;

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

pub use distance::{point_segment_distance, segment_distance, segments_intersect, Segment};
pub use shape::Shape;

/// Numerical tolerance (mm) for "touching" comparisons.
pub const EPSILON: f64 = 1e-9;

/// 2D point in millimetres
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    /// Rotate about the origin by `degrees` (counter-clockwise).
    pub fn rotated(&self, degrees: f64) -> Point {
        if degrees == 0.0 {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rotate about `center` by `degrees`.
    pub fn rotated_about(&self, center: Point, degrees: f64) -> Point {
        (*self - center).rotated(degrees) + center
    }

    /// Angle of the vector in degrees, in (-180, 180].
    pub fn angle_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        geo::coord! { x: p.x, y: p.y }
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Point::new(c.x, c.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4} mm, {:.4} mm)", self.x, self.y)
    }
}

/// Width/height pair in millimetres
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
