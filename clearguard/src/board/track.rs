//! Routed copper: track segments and vias

use serde::{Deserialize, Serialize};

use super::layer::{Layer, LayerSet};
use crate::geometry::{Point, Segment, Shape};

/// Straight copper track segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub layer: Layer,
    #[serde(default)]
    pub net: i32,
    #[serde(default)]
    pub local_clearance: Option<f64>,
}

impl Track {
    pub fn new(start: Point, end: Point, width: f64, layer: Layer, net: i32) -> Self {
        Self {
            start,
            end,
            width,
            layer,
            net,
            local_clearance: None,
        }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViaType {
    #[default]
    Through,
    BlindBuried,
    Micro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub position: Point,
    pub diameter: f64,
    pub drill: f64,
    #[serde(default)]
    pub via_type: ViaType,
    #[serde(default = "default_top")]
    pub top: Layer,
    #[serde(default = "default_bottom")]
    pub bottom: Layer,
    #[serde(default)]
    pub net: i32,
    #[serde(default)]
    pub local_clearance: Option<f64>,
}

fn default_top() -> Layer {
    Layer::F_CU
}

fn default_bottom() -> Layer {
    Layer::B_CU
}

impl Via {
    pub fn through(position: Point, diameter: f64, drill: f64, net: i32) -> Self {
        Self {
            position,
            diameter,
            drill,
            via_type: ViaType::Through,
            top: Layer::F_CU,
            bottom: Layer::B_CU,
            net,
            local_clearance: None,
        }
    }

    pub fn layer_set(&self) -> LayerSet {
        match self.via_type {
            ViaType::Through => LayerSet::all_copper(),
            ViaType::BlindBuried | ViaType::Micro => LayerSet::copper_span(self.top, self.bottom),
        }
    }
}

/// Element of the board's ordered track sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackItem {
    Track(Track),
    Via(Via),
}

impl TrackItem {
    pub fn net(&self) -> i32 {
        match self {
            TrackItem::Track(t) => t.net,
            TrackItem::Via(v) => v.net,
        }
    }

    pub fn layer_set(&self) -> LayerSet {
        match self {
            TrackItem::Track(t) => LayerSet::single(t.layer),
            TrackItem::Via(v) => v.layer_set(),
        }
    }

    pub fn is_on_layer(&self, layer: Layer) -> bool {
        self.layer_set().contains(layer)
    }

    /// Track width or via diameter.
    pub fn width(&self) -> f64 {
        match self {
            TrackItem::Track(t) => t.width,
            TrackItem::Via(v) => v.diameter,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            TrackItem::Track(t) => t.start,
            TrackItem::Via(v) => v.position,
        }
    }

    pub fn local_clearance(&self) -> Option<f64> {
        match self {
            TrackItem::Track(t) => t.local_clearance,
            TrackItem::Via(v) => v.local_clearance,
        }
    }

    pub fn is_via(&self) -> bool {
        matches!(self, TrackItem::Via(_))
    }

    pub fn shape(&self) -> Shape {
        match self {
            TrackItem::Track(t) => Shape::capsule(t.start, t.end, t.width / 2.0),
            TrackItem::Via(v) => Shape::circle(v.position, v.diameter / 2.0),
        }
    }

    /// Point of the item nearest to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        match self {
            TrackItem::Track(t) => t.segment().nearest_point(p),
            TrackItem::Via(v) => v.position,
        }
    }
}

impl From<Track> for TrackItem {
    fn from(track: Track) -> Self {
        TrackItem::Track(track)
    }
}

impl From<Via> for TrackItem {
    fn from(via: Via) -> Self {
        TrackItem::Via(via)
    }
}
