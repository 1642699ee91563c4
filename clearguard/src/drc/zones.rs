//! Zone net and outline checks

use geo::MultiPolygon;

use super::Context;
use crate::board::{ItemRef, Zone};
use crate::geometry::polygon::{
    area_distance, areas_intersect, contains_point, distance_to_segment, intersects_segment, is_self_intersecting,
    overlap_location,
};
use crate::geometry::{Point, Segment};
use crate::violation::{Violation, ViolationKind, ViolationSink};

pub(crate) fn test_zones(ctx: &Context<'_>, sink: &mut dyn ViolationSink) {
    let board = ctx.board;

    for (i, zone) in board.zones.iter().enumerate() {
        if !is_copper_zone(zone) {
            continue;
        }
        // net 0 is an unconnected zone, which is allowed
        let dead_net = zone.net > 0 && ctx.connectivity.pad_count(board, zone.net) == 0;
        if zone.net < 0 || dead_net {
            let message = format!(
                "{} (net code {} '{}')",
                ViolationKind::SuspiciousNetForZoneOutline.description(),
                zone.net,
                board.net_name(zone.net)
            );
            sink.push(
                Violation::on_item(ViolationKind::SuspiciousNetForZoneOutline, ItemRef::Zone(i), anchor(zone))
                    .with_message(message),
            );
        }
    }

    for (i, zone) in board.zones.iter().enumerate() {
        if !is_copper_zone(zone) {
            continue;
        }
        if is_self_intersecting(&zone.outline) {
            sink.push(Violation::on_item(ViolationKind::MalformedZoneOutline, ItemRef::Zone(i), anchor(zone)));
            continue;
        }
        for j in (i + 1)..board.zones.len() {
            if let Some(violation) = zone_pair(ctx, i, j) {
                sink.push(violation);
            }
        }
    }
}

fn is_copper_zone(zone: &Zone) -> bool {
    zone.is_on_copper_layer() && !zone.is_keepout()
}

fn anchor(zone: &Zone) -> Point {
    zone.outline.first().copied().unwrap_or_default()
}

/// Zones that must keep apart: copper, a shared layer, different nets.
fn conflicting(a: &Zone, b: &Zone) -> bool {
    is_copper_zone(a) && is_copper_zone(b) && a.net != b.net && a.layers.copper().intersects(&b.layers)
}

fn zone_clearance(ctx: &Context<'_>, a: usize, b: usize) -> f64 {
    ctx.clearance
        .clearance(ctx.board, ItemRef::Zone(a))
        .max(ctx.clearance.clearance(ctx.board, ItemRef::Zone(b)))
}

fn zone_pair(ctx: &Context<'_>, i: usize, j: usize) -> Option<Violation> {
    let (a, b) = (&ctx.board.zones[i], &ctx.board.zones[j]);
    if !conflicting(a, b) {
        return None;
    }
    let (area_a, area_b) = (a.polygon(), b.polygon());
    if areas_intersect(&area_a, &area_b) {
        let at = b
            .outline
            .iter()
            .find(|p| contains_point(&area_a, **p))
            .or_else(|| a.outline.iter().find(|p| contains_point(&area_b, **p)))
            .copied()
            .or_else(|| {
                overlap_location(
                    &MultiPolygon::new(vec![area_a.clone()]),
                    &MultiPolygon::new(vec![area_b.clone()]),
                )
            })
            .unwrap_or_else(|| anchor(a));
        return Some(Violation::between(
            ViolationKind::ZonesIntersect,
            ItemRef::Zone(i),
            at,
            Some((ItemRef::Zone(j), anchor(b))),
        ));
    }
    if area_distance(&area_a, &area_b) < zone_clearance(ctx, i, j) {
        return Some(Violation::between(
            ViolationKind::ZonesTooClose,
            ItemRef::Zone(i),
            anchor(a),
            Some((ItemRef::Zone(j), anchor(b))),
        ));
    }
    None
}

/// Test the outline edge starting at `corner` against the other zones.
pub(crate) fn check_zone_corner(ctx: &Context<'_>, zone: usize, corner: usize) -> Option<Violation> {
    let board = ctx.board;
    let reference = board.zones.get(zone)?;
    let edge: Segment = reference.corner_edge(corner)?;

    for (j, other) in board.zones.iter().enumerate() {
        if j == zone || !conflicting(reference, other) {
            continue;
        }
        let area = other.polygon();
        let kind = if intersects_segment(&area, &edge) {
            ViolationKind::ZonesIntersect
        } else if distance_to_segment(&area, &edge) < zone_clearance(ctx, zone, j) {
            ViolationKind::ZonesTooClose
        } else {
            continue;
        };
        return Some(Violation::between(
            kind,
            ItemRef::Zone(zone),
            edge.start,
            Some((ItemRef::Zone(j), anchor(other))),
        ));
    }
    None
}
