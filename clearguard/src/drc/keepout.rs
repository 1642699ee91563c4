//! Tracks and vias inside keepout areas

use super::Context;
use crate::board::{ItemRef, KeepoutRules, TrackItem, Zone};
use crate::geometry::polygon::{distance_to_point, distance_to_segment};
use crate::violation::{Violation, ViolationKind, ViolationSink};

pub(crate) fn test_keepout_areas(ctx: &Context<'_>, sink: &mut dyn ViolationSink) {
    let board = ctx.board;
    for (zone_index, zone) in board.zones.iter().enumerate() {
        let Some(rules) = zone.keepout else {
            continue;
        };
        if !rules.no_tracks && !rules.no_vias {
            continue;
        }
        let polygon = zone.polygon();
        for (track_index, item) in board.tracks.iter().enumerate() {
            if let Some(violation) = test_item(zone_index, zone, &rules, &polygon, track_index, item) {
                sink.push(violation);
            }
        }
    }
}

/// First keepout area the track item at `index` violates.
pub(crate) fn check_track_item(ctx: &Context<'_>, index: usize) -> Option<Violation> {
    let item = ctx.board.tracks.get(index)?;
    ctx.board.zones.iter().enumerate().find_map(|(zone_index, zone)| {
        let rules = zone.keepout?;
        test_item(zone_index, zone, &rules, &zone.polygon(), index, item)
    })
}

fn test_item(
    zone_index: usize,
    zone: &Zone,
    rules: &KeepoutRules,
    polygon: &geo::Polygon<f64>,
    index: usize,
    item: &TrackItem,
) -> Option<Violation> {
    let (kind, main, position) = match item {
        TrackItem::Track(track) => {
            if !rules.no_tracks || !zone.layers.contains(track.layer) {
                return None;
            }
            let segment = track.segment();
            if distance_to_segment(polygon, &segment) > track.width / 2.0 {
                return None;
            }
            let inside = zone
                .outline
                .first()
                .map_or(track.start, |corner| segment.nearest_point(*corner));
            (ViolationKind::TrackInsideKeepout, ItemRef::Track(index), inside)
        }
        TrackItem::Via(via) => {
            if !rules.no_vias || !zone.layers.intersects(&via.layer_set()) {
                return None;
            }
            if distance_to_point(polygon, via.position) >= via.diameter / 2.0 {
                return None;
            }
            (ViolationKind::ViaInsideKeepout, ItemRef::Via(index), via.position)
        }
    };
    let anchor = zone.outline.first().copied().unwrap_or(position);
    Some(Violation::between(kind, main, position, Some((ItemRef::Zone(zone_index), anchor))))
}
