//! Footprint pads

use serde::{Deserialize, Serialize};

use super::layer::LayerSet;
use crate::geometry::{Point, Shape, Size};

/// Clearance given to synthetic hole probes (mm). The real clearance of the
/// pad under test always dominates it.
pub const HOLE_PROBE_CLEARANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PadShape {
    Circle,
    Oval,
    Rect,
    RoundRect {
        /// Corner radius as a fraction of the smaller side, 0..=0.5
        radius_ratio: f64,
    },
    Trapezoid {
        delta: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrillShape {
    #[default]
    Circle,
    Oblong,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub size: Size,
    #[serde(default)]
    pub shape: DrillShape,
}

impl Drill {
    pub fn round(diameter: f64) -> Self {
        Self {
            size: Size::new(diameter, diameter),
            shape: DrillShape::Circle,
        }
    }
}

/// Pad on a footprint, positions in board coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub name: String,
    pub position: Point,
    pub size: Size,
    pub shape: PadShape,
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub drill: Option<Drill>,
    /// Offset of the copper shape from the pad (hole) position, pad frame
    #[serde(default)]
    pub offset: Point,
    pub layers: LayerSet,
    #[serde(default)]
    pub net: i32,
    #[serde(default)]
    pub local_clearance: Option<f64>,
}

impl Pad {
    pub fn smd(name: &str, position: Point, size: Size, shape: PadShape, layers: LayerSet) -> Self {
        Self {
            name: name.to_string(),
            position,
            size,
            shape,
            orientation: 0.0,
            drill: None,
            offset: Point::default(),
            layers,
            net: 0,
            local_clearance: None,
        }
    }

    pub fn through_hole(name: &str, position: Point, size: Size, shape: PadShape, drill: f64) -> Self {
        Self {
            drill: Some(Drill::round(drill)),
            ..Self::smd(name, position, size, shape, LayerSet::all_copper())
        }
    }

    pub fn with_net(mut self, net: i32) -> Self {
        self.net = net;
        self
    }

    pub fn with_orientation(mut self, degrees: f64) -> Self {
        self.orientation = degrees;
        self
    }

    /// Centre of the copper shape.
    pub fn shape_pos(&self) -> Point {
        self.position + self.offset.rotated(self.orientation)
    }

    pub fn drill_size(&self) -> Size {
        self.drill.map(|d| d.size).unwrap_or_default()
    }

    pub fn drill_shape(&self) -> DrillShape {
        self.drill.map(|d| d.shape).unwrap_or_default()
    }

    /// A zero-size drill is no hole.
    pub fn has_hole(&self) -> bool {
        self.drill_size().width > 0.0
    }

    pub fn has_copper(&self) -> bool {
        self.layers.has_copper()
    }

    /// Copper outline in board coordinates.
    pub fn shape(&self) -> Shape {
        let hw = self.size.width / 2.0;
        let hh = self.size.height / 2.0;
        let origin = Point::default();

        let local = match &self.shape {
            PadShape::Circle => Shape::circle(origin, hw),
            PadShape::Oval => {
                if hw > hh {
                    Shape::capsule(Point::new(hh - hw, 0.0), Point::new(hw - hh, 0.0), hh)
                } else {
                    Shape::capsule(Point::new(0.0, hw - hh), Point::new(0.0, hh - hw), hw)
                }
            }
            PadShape::Rect => Shape::polygon(rect_corners(hw, hh), 0.0),
            PadShape::RoundRect { radius_ratio } => {
                let r = radius_ratio.clamp(0.0, 0.5) * self.size.min_side();
                Shape::polygon(rect_corners(hw - r, hh - r), r)
            }
            PadShape::Trapezoid { delta } => {
                let ddx = delta.x / 2.0;
                let ddy = delta.y / 2.0;
                Shape::polygon(
                    vec![
                        Point::new(-hw - ddy, hh + ddx),
                        Point::new(-hw + ddy, -hh - ddx),
                        Point::new(hw - ddy, -hh + ddx),
                        Point::new(hw + ddy, hh - ddx),
                    ],
                    0.0,
                )
            }
        };

        local.rotated(self.orientation).translated(self.shape_pos())
    }

    /// Radius of the smallest circle around `position` containing the copper.
    pub fn bounding_radius(&self) -> f64 {
        self.shape().bounding_radius_about(self.position)
    }

    /// Synthetic pad with the size and shape of this pad's hole, on every
    /// copper layer, with a minimal clearance. `None` without a hole.
    pub fn hole_probe(&self) -> Option<Pad> {
        if !self.has_hole() {
            return None;
        }
        let shape = match self.drill_shape() {
            DrillShape::Circle => PadShape::Circle,
            DrillShape::Oblong => PadShape::Oval,
        };
        Some(Pad {
            name: String::new(),
            position: self.position,
            size: self.drill_size(),
            shape,
            orientation: self.orientation,
            drill: None,
            offset: Point::default(),
            layers: LayerSet::all_copper() | self.layers,
            net: 0,
            local_clearance: Some(HOLE_PROBE_CLEARANCE),
        })
    }

    /// Same hole position, size and shape, and orientation for oblong holes.
    pub fn same_hole_as(&self, other: &Pad) -> bool {
        if self.position != other.position
            || self.drill_size() != other.drill_size()
            || self.drill_shape() != other.drill_shape()
        {
            return false;
        }
        self.drill_shape() == DrillShape::Circle || self.orientation == other.orientation
    }
}

fn rect_corners(hw: f64, hh: f64) -> Vec<Point> {
    vec![
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
}
