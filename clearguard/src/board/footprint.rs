//! Footprints, their graphic items and courtyard polygons

use geo::{Area, BooleanOps, MultiPolygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layer::Layer;
use super::pad::Pad;
use crate::geometry::polygon::{is_self_intersecting, to_polygon};
use crate::geometry::{Point, EPSILON};

/// Endpoints closer than this (mm) are joined when chaining courtyard lines.
pub const CHAIN_EPSILON: f64 = 0.005;

/// Segments used to approximate a full circle.
const SEGMENTS_PER_CIRCLE: usize = 36;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CourtyardError {
    #[error("courtyard outline is not closed near {0}")]
    Unclosed(Point),
    #[error("courtyard outline intersects itself")]
    SelfIntersecting,
    #[error("courtyard outline has no area")]
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Front,
    Back,
}

/// Graphic primitive, board coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphicShape {
    Segment { start: Point, end: Point },
    Rect { start: Point, end: Point },
    Circle { center: Point, radius: f64 },
    /// Arc from `start` around `center` by `angle` degrees, counter-clockwise
    Arc { center: Point, start: Point, angle: f64 },
    Polygon { points: Vec<Point> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintGraphic {
    pub layer: Layer,
    #[serde(default)]
    pub width: f64,
    pub shape: GraphicShape,
}

/// Front and back courtyard areas; empty when a side has no courtyard.
#[derive(Debug, Clone, PartialEq)]
pub struct Courtyard {
    pub front: MultiPolygon<f64>,
    pub back: MultiPolygon<f64>,
}

impl Default for Courtyard {
    fn default() -> Self {
        Self {
            front: MultiPolygon::new(Vec::new()),
            back: MultiPolygon::new(Vec::new()),
        }
    }
}

impl Courtyard {
    pub fn is_empty(&self) -> bool {
        self.front.0.is_empty() && self.back.0.is_empty()
    }

    pub fn side(&self, side: Side) -> &MultiPolygon<f64> {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub reference: String,
    #[serde(default)]
    pub value: String,
    pub position: Point,
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub graphics: Vec<FootprintGraphic>,
    #[serde(skip)]
    pub courtyard: Courtyard,
}

impl Footprint {
    pub fn new(reference: &str, position: Point) -> Self {
        Self {
            reference: reference.to_string(),
            value: String::new(),
            position,
            orientation: 0.0,
            side: Side::Front,
            pads: Vec::new(),
            graphics: Vec::new(),
            courtyard: Courtyard::default(),
        }
    }

    pub fn with_pad(mut self, pad: Pad) -> Self {
        self.pads.push(pad);
        self
    }

    /// Add a rectangular courtyard outline on `layer`.
    pub fn with_courtyard_rect(mut self, layer: Layer, start: Point, end: Point) -> Self {
        self.graphics.push(FootprintGraphic {
            layer,
            width: 0.05,
            shape: GraphicShape::Rect { start, end },
        });
        self
    }

    /// Rebuild both courtyard sides from the graphics on `F.CrtYd` and
    /// `B.CrtYd`. On error the cached courtyard is left empty.
    pub fn build_courtyard(&mut self) -> Result<(), CourtyardError> {
        self.courtyard = Courtyard::default();
        let front = build_side(&self.graphics, Layer::F_CRTYD)?;
        let back = build_side(&self.graphics, Layer::B_CRTYD)?;
        self.courtyard = Courtyard { front, back };
        Ok(())
    }
}

fn build_side(graphics: &[FootprintGraphic], layer: Layer) -> Result<MultiPolygon<f64>, CourtyardError> {
    let mut outlines: Vec<Vec<Point>> = Vec::new();
    let mut open: Vec<Vec<Point>> = Vec::new();

    for graphic in graphics.iter().filter(|g| g.layer == layer) {
        match &graphic.shape {
            GraphicShape::Rect { start, end } => outlines.push(vec![
                *start,
                Point::new(end.x, start.y),
                *end,
                Point::new(start.x, end.y),
            ]),
            GraphicShape::Circle { center, radius } => {
                let rim = *center + Point::new(*radius, 0.0);
                let mut pts = arc_points(*center, rim, 360.0);
                pts.pop();
                outlines.push(pts);
            }
            GraphicShape::Polygon { points } => outlines.push(points.clone()),
            GraphicShape::Segment { start, end } => {
                if start.distance(end) > EPSILON {
                    open.push(vec![*start, *end]);
                }
            }
            GraphicShape::Arc { center, start, angle } => open.push(arc_points(*center, *start, *angle)),
        }
    }

    outlines.extend(chain_outlines(open)?);

    let mut area = MultiPolygon::new(Vec::new());
    for outline in &outlines {
        if is_self_intersecting(outline) {
            return Err(CourtyardError::SelfIntersecting);
        }
        let poly = to_polygon(outline, &[]);
        if poly.unsigned_area() <= EPSILON {
            return Err(CourtyardError::Degenerate);
        }
        area = area.union(&MultiPolygon::new(vec![poly]));
    }
    Ok(area)
}

/// Join open polylines end to end into closed outlines.
fn chain_outlines(mut open: Vec<Vec<Point>>) -> Result<Vec<Vec<Point>>, CourtyardError> {
    let mut closed = Vec::new();
    while !open.is_empty() {
        let mut chain = open.remove(0);
        loop {
            let (first, last) = match (chain.first(), chain.last()) {
                (Some(f), Some(l)) => (*f, *l),
                _ => break,
            };
            if chain.len() > 2 && first.distance(&last) <= CHAIN_EPSILON {
                chain.pop();
                break;
            }
            let next = open.iter().enumerate().find_map(|(i, piece)| {
                let head = piece.first()?;
                let tail = piece.last()?;
                if head.distance(&last) <= CHAIN_EPSILON {
                    Some((i, false))
                } else if tail.distance(&last) <= CHAIN_EPSILON {
                    Some((i, true))
                } else {
                    None
                }
            });
            match next {
                Some((i, reversed)) => {
                    let mut piece = open.remove(i);
                    if reversed {
                        piece.reverse();
                    }
                    chain.extend(piece.into_iter().skip(1));
                }
                None => return Err(CourtyardError::Unclosed(last)),
            }
        }
        closed.push(chain);
    }
    Ok(closed)
}

/// Points along an arc, both ends included. Sweeps beyond a full turn are
/// clamped to one.
fn arc_points(center: Point, start: Point, angle: f64) -> Vec<Point> {
    let angle = angle.clamp(-360.0, 360.0);
    let steps = ((angle.abs() / 360.0) * SEGMENTS_PER_CIRCLE as f64).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|k| start.rotated_about(center, angle * k as f64 / steps as f64))
        .collect()
}
