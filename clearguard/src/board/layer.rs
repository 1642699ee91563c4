//! Board layers and layer sets
//!
//! Layer numbering follows the usual stack: copper ordinals 0 (`F.Cu`) to 31
//! (`B.Cu`) with inner layers in between, then the technical layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerError {
    #[error("unknown layer name '{0}'")]
    UnknownName(String),
}

pub const COPPER_LAYER_COUNT: u8 = 32;
pub const LAYER_COUNT: u8 = 50;

const TECHNICAL_NAMES: [&str; (LAYER_COUNT - COPPER_LAYER_COUNT) as usize] = [
    "B.Adhes", "F.Adhes", "B.Paste", "F.Paste", "B.SilkS", "F.SilkS", "B.Mask", "F.Mask",
    "Dwgs.User", "Cmts.User", "Eco1.User", "Eco2.User", "Edge.Cuts", "Margin", "B.CrtYd",
    "F.CrtYd", "B.Fab", "F.Fab",
];

/// A single board layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layer(u8);

impl Layer {
    pub const F_CU: Layer = Layer(0);
    pub const B_CU: Layer = Layer(31);
    pub const B_ADHES: Layer = Layer(32);
    pub const F_ADHES: Layer = Layer(33);
    pub const B_PASTE: Layer = Layer(34);
    pub const F_PASTE: Layer = Layer(35);
    pub const B_SILKS: Layer = Layer(36);
    pub const F_SILKS: Layer = Layer(37);
    pub const B_MASK: Layer = Layer(38);
    pub const F_MASK: Layer = Layer(39);
    pub const DWGS_USER: Layer = Layer(40);
    pub const EDGE_CUTS: Layer = Layer(44);
    pub const B_CRTYD: Layer = Layer(46);
    pub const F_CRTYD: Layer = Layer(47);
    pub const B_FAB: Layer = Layer(48);
    pub const F_FAB: Layer = Layer(49);

    /// Inner copper layer `In<n>.Cu`, n in 1..=30.
    pub fn inner(n: u8) -> Option<Layer> {
        (1..=30).contains(&n).then_some(Layer(n))
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    pub fn is_copper(self) -> bool {
        self.0 < COPPER_LAYER_COUNT
    }

    pub fn name(self) -> String {
        match self.0 {
            0 => "F.Cu".to_string(),
            31 => "B.Cu".to_string(),
            n if n < COPPER_LAYER_COUNT => format!("In{}.Cu", n),
            n => TECHNICAL_NAMES[(n - COPPER_LAYER_COUNT) as usize].to_string(),
        }
    }

    pub fn from_name(name: &str) -> Result<Layer, LayerError> {
        match name {
            "F.Cu" => return Ok(Layer::F_CU),
            "B.Cu" => return Ok(Layer::B_CU),
            _ => {}
        }
        if let Some(n) = name
            .strip_prefix("In")
            .and_then(|rest| rest.strip_suffix(".Cu"))
            .and_then(|n| n.parse::<u8>().ok())
        {
            return Layer::inner(n).ok_or_else(|| LayerError::UnknownName(name.to_string()));
        }
        TECHNICAL_NAMES
            .iter()
            .position(|t| *t == name)
            .map(|i| Layer(COPPER_LAYER_COUNT + i as u8))
            .ok_or_else(|| LayerError::UnknownName(name.to_string()))
    }
}

impl TryFrom<String> for Layer {
    type Error = LayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Layer::from_name(&value)
    }
}

impl From<Layer> for String {
    fn from(layer: Layer) -> Self {
        layer.name()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Set of layers as a bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LayerSet(u64);

impl LayerSet {
    pub const fn empty() -> Self {
        LayerSet(0)
    }

    /// Every copper layer, `F.Cu` through `B.Cu`.
    pub const fn all_copper() -> Self {
        LayerSet((1u64 << COPPER_LAYER_COUNT) - 1)
    }

    pub fn single(layer: Layer) -> Self {
        LayerSet(1u64 << layer.0)
    }

    pub fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        layers.into_iter().fold(LayerSet::empty(), |set, l| set.with(l))
    }

    /// Copper layers from `top` to `bottom` ordinals inclusive, in either order.
    pub fn copper_span(top: Layer, bottom: Layer) -> Self {
        let (lo, hi) = if top.0 <= bottom.0 { (top.0, bottom.0) } else { (bottom.0, top.0) };
        LayerSet::from_layers((lo..=hi.min(COPPER_LAYER_COUNT - 1)).map(Layer))
    }

    pub fn with(self, layer: Layer) -> Self {
        LayerSet(self.0 | (1u64 << layer.0))
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & (1u64 << layer.0) != 0
    }

    pub fn intersects(&self, other: &LayerSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn copper(&self) -> LayerSet {
        *self & LayerSet::all_copper()
    }

    pub fn has_copper(&self) -> bool {
        !self.copper().is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        (0..LAYER_COUNT).map(Layer).filter(move |l| self.contains(*l))
    }
}

impl BitAnd for LayerSet {
    type Output = LayerSet;

    fn bitand(self, rhs: LayerSet) -> LayerSet {
        LayerSet(self.0 & rhs.0)
    }
}

impl BitOr for LayerSet {
    type Output = LayerSet;

    fn bitor(self, rhs: LayerSet) -> LayerSet {
        LayerSet(self.0 | rhs.0)
    }
}

impl TryFrom<Vec<String>> for LayerSet {
    type Error = LayerError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut set = LayerSet::empty();
        for name in names {
            // wildcard copper, as used for through-hole pads
            if name == "*.Cu" {
                set = set | LayerSet::all_copper();
                continue;
            }
            set = set.with(Layer::from_name(&name)?);
        }
        Ok(set)
    }
}

impl From<LayerSet> for Vec<String> {
    fn from(set: LayerSet) -> Self {
        set.layers().map(|l| l.name()).collect()
    }
}
