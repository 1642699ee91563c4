//! Board model read by the rule checks
//!
//! A [`Board`] is a plain owned snapshot: footprints own their pads, the
//! track sequence keeps tracks and vias in routing order, and every item is
//! addressed by index through [`ItemRef`].

pub mod footprint;
pub mod layer;
pub mod pad;
pub mod text;
pub mod track;
pub mod zone;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use footprint::{CourtyardError, Footprint, FootprintGraphic, GraphicShape, Side};
pub use layer::{Layer, LayerError, LayerSet};
pub use pad::{Drill, DrillShape, Pad, PadShape};
pub use text::Text;
pub use track::{Track, TrackItem, Via, ViaType};
pub use zone::{KeepoutRules, Zone};

use crate::core::DrcError;

/// Board-wide minimum sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    pub min_track_width: f64,
    pub min_via_diameter: f64,
    pub min_via_drill: f64,
    pub min_micro_via_diameter: f64,
    pub min_micro_via_drill: f64,
    pub copper_layer_count: u8,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            min_track_width: 0.2,
            min_via_diameter: 0.4,
            min_via_drill: 0.3,
            min_micro_via_diameter: 0.2,
            min_micro_via_drill: 0.1,
            copper_layer_count: 2,
        }
    }
}

impl DesignSettings {
    /// Inner layer adjacent to the outer layer `outer`, or the opposite
    /// outer layer on a two-layer board.
    pub fn layer_below(&self, outer: Layer) -> Layer {
        let inner_count = self.copper_layer_count.saturating_sub(2);
        if inner_count == 0 {
            return if outer == Layer::F_CU { Layer::B_CU } else { Layer::F_CU };
        }
        let n = if outer == Layer::F_CU { 1 } else { inner_count };
        Layer::inner(n).unwrap_or(Layer::B_CU)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetClass {
    pub name: String,
    pub clearance: f64,
    pub track_width: f64,
    pub via_diameter: f64,
    pub via_drill: f64,
    pub micro_via_diameter: f64,
    pub micro_via_drill: f64,
}

impl Default for NetClass {
    fn default() -> Self {
        Self {
            name: NetClasses::DEFAULT_NAME.to_string(),
            clearance: 0.2,
            track_width: 0.25,
            via_diameter: 0.8,
            via_drill: 0.4,
            micro_via_diameter: 0.3,
            micro_via_drill: 0.1,
        }
    }
}

/// The default netclass plus named ones, iterated in name order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NetClasses {
    pub default: NetClass,
    pub named: BTreeMap<String, NetClass>,
}

impl NetClasses {
    pub const DEFAULT_NAME: &'static str = "Default";

    pub fn get(&self, name: &str) -> &NetClass {
        self.named.get(name).unwrap_or(&self.default)
    }

    /// Default netclass first, then the named ones.
    pub fn iter(&self) -> impl Iterator<Item = &NetClass> {
        std::iter::once(&self.default).chain(self.named.values())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub code: i32,
    pub name: String,
    #[serde(default)]
    pub netclass: Option<String>,
}

/// Reference to a board item by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    /// Index into the track sequence, a track
    Track(usize),
    /// Index into the track sequence, a via
    Via(usize),
    Pad { footprint: usize, pad: usize },
    Zone(usize),
    Text(usize),
    Footprint(usize),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub name: String,
    pub design: DesignSettings,
    pub netclasses: NetClasses,
    pub nets: Vec<Net>,
    pub footprints: Vec<Footprint>,
    pub tracks: Vec<TrackItem>,
    pub zones: Vec<Zone>,
    pub texts: Vec<Text>,
}

impl Board {
    pub fn from_json_str(json: &str) -> Result<Self, DrcError> {
        let board: Board = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    pub fn load(path: &Path) -> Result<Self, DrcError> {
        let json = std::fs::read_to_string(path)?;
        let mut board = Self::from_json_str(&json)?;
        if board.name.is_empty() {
            board.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
        }
        Ok(board)
    }

    /// Reject content the checks cannot interpret.
    pub fn validate(&self) -> Result<(), DrcError> {
        let count = self.design.copper_layer_count;
        if !(2..=32).contains(&count) || count % 2 != 0 {
            return Err(DrcError::InvalidBoard(format!(
                "copper layer count {} is not an even number in 2..=32",
                count
            )));
        }
        for (i, item) in self.tracks.iter().enumerate() {
            if let TrackItem::Track(track) = item {
                if !track.layer.is_copper() {
                    return Err(DrcError::InvalidBoard(format!(
                        "track {} is on non-copper layer {}",
                        i, track.layer
                    )));
                }
            }
        }
        for text in &self.texts {
            if text.thickness < 0.0 {
                return Err(DrcError::InvalidBoard(format!(
                    "text '{}' has negative thickness",
                    text.text
                )));
            }
        }
        Ok(())
    }

    pub fn net_name(&self, code: i32) -> &str {
        self.nets
            .iter()
            .find(|n| n.code == code)
            .map(|n| n.name.as_str())
            .unwrap_or("")
    }

    pub fn netclass_for_net(&self, code: i32) -> &NetClass {
        let name = self
            .nets
            .iter()
            .find(|n| n.code == code)
            .and_then(|n| n.netclass.as_deref());
        match name {
            Some(name) => self.netclasses.get(name),
            None => &self.netclasses.default,
        }
    }

    /// Every pad with its reference, in footprint order.
    pub fn pads(&self) -> impl Iterator<Item = (ItemRef, &Pad)> {
        self.footprints.iter().enumerate().flat_map(|(f, fp)| {
            fp.pads
                .iter()
                .enumerate()
                .map(move |(p, pad)| (ItemRef::Pad { footprint: f, pad: p }, pad))
        })
    }

    pub fn pad(&self, footprint: usize, pad: usize) -> Option<&Pad> {
        self.footprints.get(footprint)?.pads.get(pad)
    }

    pub fn track_ref(&self, index: usize) -> Option<ItemRef> {
        self.tracks.get(index).map(|item| match item {
            TrackItem::Track(_) => ItemRef::Track(index),
            TrackItem::Via(_) => ItemRef::Via(index),
        })
    }

    /// Short human-readable label of an item.
    pub fn describe(&self, item: ItemRef) -> String {
        match item {
            ItemRef::Track(i) | ItemRef::Via(i) => match self.tracks.get(i) {
                Some(TrackItem::Track(t)) => format!(
                    "Track {:.4} mm on {}, net [{}]",
                    t.width,
                    t.layer,
                    self.net_name(t.net)
                ),
                Some(TrackItem::Via(v)) => format!(
                    "Via {:.4} mm {}-{}, net [{}]",
                    v.diameter,
                    v.top,
                    v.bottom,
                    self.net_name(v.net)
                ),
                None => format!("<missing track {}>", i),
            },
            ItemRef::Pad { footprint, pad } => match (self.footprints.get(footprint), self.pad(footprint, pad)) {
                (Some(fp), Some(p)) => format!(
                    "Pad {} of {} on {}, net [{}]",
                    p.name,
                    fp.reference,
                    layer_summary(&p.layers),
                    self.net_name(p.net)
                ),
                _ => format!("<missing pad {}/{}>", footprint, pad),
            },
            ItemRef::Zone(i) => match self.zones.get(i) {
                Some(z) if z.is_keepout() => format!("Keepout area on {}", layer_summary(&z.layers)),
                Some(z) => format!(
                    "Zone outline on {}, net [{}]",
                    layer_summary(&z.layers),
                    self.net_name(z.net)
                ),
                None => format!("<missing zone {}>", i),
            },
            ItemRef::Text(i) => match self.texts.get(i) {
                Some(t) => format!("Text \"{}\" on {}", t.text, t.layer),
                None => format!("<missing text {}>", i),
            },
            ItemRef::Footprint(i) => match self.footprints.get(i) {
                Some(fp) => format!("Footprint {}", fp.reference),
                None => format!("<missing footprint {}>", i),
            },
        }
    }

    /// True when `item` refers to an existing board item.
    pub fn contains(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Track(i) => matches!(self.tracks.get(i), Some(TrackItem::Track(_))),
            ItemRef::Via(i) => matches!(self.tracks.get(i), Some(TrackItem::Via(_))),
            ItemRef::Pad { footprint, pad } => self.pad(footprint, pad).is_some(),
            ItemRef::Zone(i) => i < self.zones.len(),
            ItemRef::Text(i) => i < self.texts.len(),
            ItemRef::Footprint(i) => i < self.footprints.len(),
        }
    }
}

fn layer_summary(layers: &LayerSet) -> String {
    if layers.copper() == LayerSet::all_copper() {
        return "*.Cu".to_string();
    }
    let names: Vec<String> = layers.layers().map(|l| l.name()).collect();
    names.join(",")
}
