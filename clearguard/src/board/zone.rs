//! Copper zones and keepout areas

use serde::{Deserialize, Serialize};

use super::layer::LayerSet;
use crate::geometry::polygon::to_polygon;
use crate::geometry::{Point, Segment};

/// Item types a keepout area forbids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeepoutRules {
    pub no_tracks: bool,
    pub no_vias: bool,
    /// Carried for completeness; pads inside keepouts are not checked.
    pub no_pads: bool,
    pub no_copper_pour: bool,
}

/// Zone outline with its net, or a keepout area when `keepout` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub net: i32,
    pub layers: LayerSet,
    pub outline: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
    #[serde(default)]
    pub local_clearance: Option<f64>,
    #[serde(default)]
    pub keepout: Option<KeepoutRules>,
}

impl Zone {
    pub fn copper(net: i32, layers: LayerSet, outline: Vec<Point>) -> Self {
        Self {
            name: String::new(),
            net,
            layers,
            outline,
            holes: Vec::new(),
            local_clearance: None,
            keepout: None,
        }
    }

    pub fn keepout_area(rules: KeepoutRules, layers: LayerSet, outline: Vec<Point>) -> Self {
        Self {
            keepout: Some(rules),
            ..Self::copper(0, layers, outline)
        }
    }

    pub fn is_keepout(&self) -> bool {
        self.keepout.is_some()
    }

    pub fn is_on_copper_layer(&self) -> bool {
        self.layers.has_copper()
    }

    pub fn polygon(&self) -> geo::Polygon<f64> {
        to_polygon(&self.outline, &self.holes)
    }

    /// Outline edge from corner `index` to the next corner, wrapping around.
    pub fn corner_edge(&self, index: usize) -> Option<Segment> {
        let n = self.outline.len();
        if n < 2 || index >= n {
            return None;
        }
        Some(Segment::new(self.outline[index], self.outline[(index + 1) % n]))
    }
}
