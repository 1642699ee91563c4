//! Violation records and the sink they are pushed to

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::ItemRef;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Every kind of rule violation, with a stable numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    UnconnectedItems,
    TrackNearPad,
    TrackNearVia,
    ViaNearVia,
    ViaNearTrack,
    ViaNearPad,
    TrackSegmentsTooClose,
    TracksCrossing,
    PadNearPad1,
    ViaHoleBigger,
    MicroViaIncorrectLayerPair,
    ZonesIntersect,
    ZonesTooClose,
    SuspiciousNetForZoneOutline,
    HoleNearPad,
    HoleNearTrack,
    TooSmallTrackWidth,
    TooSmallVia,
    TooSmallMicroVia,
    TooSmallViaDrill,
    TooSmallMicroViaDrill,
    NetclassTrackWidth,
    NetclassViaSize,
    NetclassViaDrillSize,
    NetclassMicroViaSize,
    NetclassMicroViaDrillSize,
    ViaInsideKeepout,
    TrackInsideKeepout,
    ViaInsideText,
    TrackInsideText,
    PadInsideText,
    OverlappingFootprints,
    MissingCourtyard,
    MalformedCourtyard,
    MalformedZoneOutline,
}

impl ViolationKind {
    pub fn all() -> &'static [ViolationKind] {
        use ViolationKind::*;
        &[
            UnconnectedItems,
            TrackNearPad,
            TrackNearVia,
            ViaNearVia,
            ViaNearTrack,
            ViaNearPad,
            TrackSegmentsTooClose,
            TracksCrossing,
            PadNearPad1,
            ViaHoleBigger,
            MicroViaIncorrectLayerPair,
            ZonesIntersect,
            ZonesTooClose,
            SuspiciousNetForZoneOutline,
            HoleNearPad,
            HoleNearTrack,
            TooSmallTrackWidth,
            TooSmallVia,
            TooSmallMicroVia,
            TooSmallViaDrill,
            TooSmallMicroViaDrill,
            NetclassTrackWidth,
            NetclassViaSize,
            NetclassViaDrillSize,
            NetclassMicroViaSize,
            NetclassMicroViaDrillSize,
            ViaInsideKeepout,
            TrackInsideKeepout,
            ViaInsideText,
            TrackInsideText,
            PadInsideText,
            OverlappingFootprints,
            MissingCourtyard,
            MalformedCourtyard,
            MalformedZoneOutline,
        ]
    }

    pub fn code(self) -> u32 {
        use ViolationKind::*;
        match self {
            UnconnectedItems => 1,
            TrackNearPad => 3,
            TrackNearVia => 4,
            ViaNearVia => 5,
            ViaNearTrack => 6,
            ViaNearPad => 7,
            TrackSegmentsTooClose => 15,
            TracksCrossing => 16,
            PadNearPad1 => 18,
            ViaHoleBigger => 19,
            MicroViaIncorrectLayerPair => 20,
            ZonesIntersect => 21,
            ZonesTooClose => 22,
            SuspiciousNetForZoneOutline => 23,
            HoleNearPad => 24,
            HoleNearTrack => 25,
            TooSmallTrackWidth => 26,
            TooSmallVia => 27,
            TooSmallMicroVia => 28,
            TooSmallViaDrill => 29,
            TooSmallMicroViaDrill => 30,
            NetclassTrackWidth => 31,
            NetclassViaSize => 33,
            NetclassViaDrillSize => 34,
            NetclassMicroViaSize => 35,
            NetclassMicroViaDrillSize => 36,
            ViaInsideKeepout => 37,
            TrackInsideKeepout => 38,
            ViaInsideText => 40,
            TrackInsideText => 41,
            PadInsideText => 42,
            OverlappingFootprints => 43,
            MissingCourtyard => 44,
            MalformedCourtyard => 45,
            MalformedZoneOutline => 46,
        }
    }

    pub fn from_code(code: u32) -> Option<ViolationKind> {
        Self::all().iter().copied().find(|k| k.code() == code)
    }

    pub fn description(self) -> &'static str {
        use ViolationKind::*;
        match self {
            UnconnectedItems => "Unconnected items",
            TrackNearPad => "Track too close to pad",
            TrackNearVia => "Track too close to via",
            ViaNearVia => "Via too close to via",
            ViaNearTrack => "Via too close to track",
            ViaNearPad => "Via too close to pad",
            TrackSegmentsTooClose => "Two track ends too close",
            TracksCrossing => "Tracks crossing",
            PadNearPad1 => "Pad too close to pad",
            ViaHoleBigger => "Via hole > diameter",
            MicroViaIncorrectLayerPair => "Micro Via: incorrect layer pairs (not adjacent)",
            ZonesIntersect => "Copper area inside copper area",
            ZonesTooClose => "Copper areas intersect or are too close",
            SuspiciousNetForZoneOutline => "Copper area belongs to a net which has no pads",
            HoleNearPad => "Hole too close to pad",
            HoleNearTrack => "Hole too close to track",
            TooSmallTrackWidth => "Too small track width",
            TooSmallVia => "Too small via size",
            TooSmallMicroVia => "Too small micro via size",
            TooSmallViaDrill => "Too small via drill",
            TooSmallMicroViaDrill => "Too small micro via drill",
            NetclassTrackWidth => "NetClass Track Width < global limit",
            NetclassViaSize => "NetClass Via Dia < global limit",
            NetclassViaDrillSize => "NetClass Via Drill < global limit",
            NetclassMicroViaSize => "NetClass uVia Dia < global limit",
            NetclassMicroViaDrillSize => "NetClass uVia Drill < global limit",
            ViaInsideKeepout => "Via inside a keepout area",
            TrackInsideKeepout => "Track inside a keepout area",
            ViaInsideText => "Via inside a text",
            TrackInsideText => "Track inside a text",
            PadInsideText => "Pad inside a text",
            OverlappingFootprints => "Courtyards overlap",
            MissingCourtyard => "Footprint has no courtyard defined",
            MalformedCourtyard => "Footprint has incorrect courtyard (not a closed shape)",
            MalformedZoneOutline => "Copper area outline intersects itself",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ViolationKind::MissingCourtyard | ViolationKind::SuspiciousNetForZoneOutline => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrType({}): {}", self.code(), self.description())
    }
}

/// One rule violation. Built once by a check and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub main: Option<ItemRef>,
    pub position: Point,
    pub aux: Option<ItemRef>,
    pub aux_position: Option<Point>,
    pub message: String,
}

impl Violation {
    /// Violation between two items, or on a single item when `aux` is `None`.
    pub fn between(kind: ViolationKind, main: ItemRef, position: Point, aux: Option<(ItemRef, Point)>) -> Self {
        Self {
            kind,
            main: Some(main),
            position,
            aux: aux.map(|(item, _)| item),
            aux_position: aux.map(|(_, pos)| pos),
            message: kind.description().to_string(),
        }
    }

    pub fn on_item(kind: ViolationKind, main: ItemRef, position: Point) -> Self {
        Self::between(kind, main, position, None)
    }

    /// Violation with a formatted message and no item, such as a netclass error.
    pub fn board_level(kind: ViolationKind, position: Point, message: String) -> Self {
        Self {
            kind,
            main: None,
            position,
            aux: None,
            aux_position: None,
            message,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = message;
        self
    }

    pub fn items(&self) -> impl Iterator<Item = ItemRef> {
        self.main.into_iter().chain(self.aux)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrType({}): {} @{}", self.kind.code(), self.message, self.position)
    }
}

/// Receives violations in the order the checks produce them
pub trait ViolationSink {
    fn push(&mut self, violation: Violation);
}

impl ViolationSink for Vec<Violation> {
    fn push(&mut self, violation: Violation) {
        Vec::push(self, violation);
    }
}

/// Ratsnest edge with no routed connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnconnectedItem {
    pub net: i32,
    pub source: ItemRef,
    pub source_label: String,
    pub source_position: Point,
    pub target: ItemRef,
    pub target_label: String,
    pub target_position: Point,
}

impl fmt::Display for UnconnectedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n    @{}: {}\n    @{}: {}",
            ViolationKind::UnconnectedItems,
            self.source_position,
            self.source_label,
            self.target_position,
            self.target_label
        )
    }
}
