//! Track and via clearances
//!
//! The batch pass walks the track sequence in order and tests every item
//! against the pads and against the items after it. The single-item check
//! used while editing tests against every other item instead.

use tracing::debug;

use super::Context;
use crate::board::pad::HOLE_PROBE_CLEARANCE;
use crate::board::{ItemRef, Layer, Pad, Track, TrackItem, Via, ViaType};
use crate::clearance::track_clearances;
use crate::geometry::{point_segment_distance, segment_distance, segments_intersect, Point};
use crate::progress::Poller;
use crate::violation::{Violation, ViolationKind, ViolationSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Items later in the sequence
    Following,
    /// Every other item
    All,
}

pub(crate) fn test_tracks(ctx: &Context<'_>, sink: &mut dyn ViolationSink, poller: &mut Poller<'_>) {
    let clearances = track_clearances(ctx.board, ctx.clearance);
    let total = ctx.board.tracks.len();
    for index in 0..total {
        if poller.should_stop(index, total) {
            debug!(done = index, total, "track sweep cancelled");
            return;
        }
        if let Some(violation) = check_item(ctx, &clearances, index, Scope::Following) {
            sink.push(violation);
        }
    }
}

pub(crate) fn check_single(ctx: &Context<'_>, index: usize) -> Option<Violation> {
    let clearances = track_clearances(ctx.board, ctx.clearance);
    check_item(ctx, &clearances, index, Scope::All)
}

fn check_item(ctx: &Context<'_>, clearances: &[f64], index: usize, scope: Scope) -> Option<Violation> {
    let board = ctx.board;
    let item = board.tracks.get(index)?;
    let main = board.track_ref(index)?;

    if let Some(kind) = size_violation(ctx, item) {
        return Some(Violation::on_item(kind, main, item.position()));
    }

    if let Some(violation) = check_against_pads(ctx, item, main, clearances[index]) {
        return Some(violation);
    }

    let others: Box<dyn Iterator<Item = usize>> = match scope {
        Scope::Following => Box::new(index + 1..board.tracks.len()),
        Scope::All => Box::new((0..board.tracks.len()).filter(move |j| *j != index)),
    };
    for j in others {
        let other = &board.tracks[j];
        if other.net() != 0 && other.net() == item.net() {
            continue;
        }
        if !item.layer_set().copper().intersects(&other.layer_set()) {
            continue;
        }
        let clearance = clearances[index].max(clearances[j]);
        if let Some((kind, at)) = item_clash(item, other, clearance) {
            let aux = board.track_ref(j)?;
            return Some(Violation::between(kind, main, at, Some((aux, other.position()))));
        }
    }
    None
}

/// Item sizes against the board minimums.
fn size_violation(ctx: &Context<'_>, item: &TrackItem) -> Option<ViolationKind> {
    let design = &ctx.board.design;
    match item {
        TrackItem::Track(track) => (track.width < design.min_track_width).then_some(ViolationKind::TooSmallTrackWidth),
        TrackItem::Via(via) => {
            if via.via_type == ViaType::Micro {
                if via.diameter < design.min_micro_via_diameter {
                    return Some(ViolationKind::TooSmallMicroVia);
                }
                if via.drill < design.min_micro_via_drill {
                    return Some(ViolationKind::TooSmallMicroViaDrill);
                }
            } else {
                if via.diameter < design.min_via_diameter {
                    return Some(ViolationKind::TooSmallVia);
                }
                if via.drill < design.min_via_drill {
                    return Some(ViolationKind::TooSmallViaDrill);
                }
            }
            if via.drill >= via.diameter {
                return Some(ViolationKind::ViaHoleBigger);
            }
            if via.via_type == ViaType::Micro && !micro_via_pair_ok(ctx, via) {
                return Some(ViolationKind::MicroViaIncorrectLayerPair);
            }
            None
        }
    }
}

/// A micro-via joins an outer layer to the layer right below it.
fn micro_via_pair_ok(ctx: &Context<'_>, via: &Via) -> bool {
    let design = &ctx.board.design;
    let (a, b) = if via.top <= via.bottom {
        (via.top, via.bottom)
    } else {
        (via.bottom, via.top)
    };
    let front = (Layer::F_CU, design.layer_below(Layer::F_CU));
    let back = (design.layer_below(Layer::B_CU), Layer::B_CU);
    (a, b) == front || (a, b) == back
}

fn check_against_pads(ctx: &Context<'_>, item: &TrackItem, main: ItemRef, clearance: f64) -> Option<Violation> {
    let board = ctx.board;
    let shape = item.shape();
    let layers = item.layer_set();

    for (pad_ref, pad) in board.pads() {
        if pad.net != 0 && pad.net == item.net() {
            continue;
        }
        let pad_clearance = ctx.clearance.clearance(board, pad_ref);

        if pad.layers.intersects(&layers.copper()) {
            if shape.collides(&pad.shape(), clearance.max(pad_clearance)) {
                let kind = if item.is_via() {
                    ViolationKind::ViaNearPad
                } else {
                    ViolationKind::TrackNearPad
                };
                return Some(pad_violation(kind, item, main, pad, pad_ref));
            }
        } else if let Some(probe) = pad.hole_probe() {
            if shape.collides(&probe.shape(), clearance.max(HOLE_PROBE_CLEARANCE)) {
                return Some(pad_violation(ViolationKind::HoleNearTrack, item, main, pad, pad_ref));
            }
        }
    }
    None
}

fn pad_violation(kind: ViolationKind, item: &TrackItem, main: ItemRef, pad: &Pad, pad_ref: ItemRef) -> Violation {
    Violation::between(
        kind,
        main,
        item.nearest_point(pad.position),
        Some((pad_ref, pad.position)),
    )
}

/// Kind and location of a clearance failure between two routed items.
fn item_clash(item: &TrackItem, other: &TrackItem, clearance: f64) -> Option<(ViolationKind, Point)> {
    match (item, other) {
        (TrackItem::Track(a), TrackItem::Track(b)) => track_track(a, b, clearance),
        (TrackItem::Track(t), TrackItem::Via(v)) => {
            track_via(t, v, clearance).map(|at| (ViolationKind::TrackNearVia, at))
        }
        (TrackItem::Via(v), TrackItem::Track(t)) => {
            track_via(t, v, clearance).map(|_| (ViolationKind::ViaNearTrack, v.position))
        }
        (TrackItem::Via(a), TrackItem::Via(b)) => {
            let limit = clearance + (a.diameter + b.diameter) / 2.0;
            (a.position.distance(&b.position) < limit).then_some((ViolationKind::ViaNearVia, a.position))
        }
    }
}

fn track_track(a: &Track, b: &Track, clearance: f64) -> Option<(ViolationKind, Point)> {
    let (distance, at) = segment_distance(a.start, a.end, b.start, b.end);
    if segments_intersect(a.start, a.end, b.start, b.end) {
        return Some((ViolationKind::TracksCrossing, at));
    }
    let limit = clearance + (a.width + b.width) / 2.0;
    (distance < limit).then_some((ViolationKind::TrackSegmentsTooClose, at))
}

fn track_via(track: &Track, via: &Via, clearance: f64) -> Option<Point> {
    let (distance, at) = point_segment_distance(via.position, track.start, track.end);
    let limit = clearance + (track.width + via.diameter) / 2.0;
    (distance < limit).then_some(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Footprint, LayerSet, PadShape};
    use crate::clearance::NetclassClearance;
    use crate::connectivity::BoardConnectivity;
    use crate::geometry::Size;
    use crate::progress::Progress;

    fn run(board: &Board) -> Vec<Violation> {
        let ctx = Context {
            board,
            clearance: &NetclassClearance,
            connectivity: &BoardConnectivity,
        };
        let mut sink: Vec<Violation> = Vec::new();
        let mut reporter = |_: usize, _: usize| Progress::Continue;
        let mut poller = Poller::new(&mut reporter);
        test_tracks(&ctx, &mut sink, &mut poller);
        sink
    }

    fn single(board: &Board, index: usize) -> Option<Violation> {
        let ctx = Context {
            board,
            clearance: &NetclassClearance,
            connectivity: &BoardConnectivity,
        };
        check_single(&ctx, index)
    }

    fn track(x0: f64, y0: f64, x1: f64, y1: f64, net: i32) -> TrackItem {
        Track::new(Point::new(x0, y0), Point::new(x1, y1), 0.25, Layer::F_CU, net).into()
    }

    #[test]
    fn test_crossing_tracks() {
        let board = Board {
            tracks: vec![track(0.0, 0.0, 2.0, 2.0, 1), track(0.0, 2.0, 2.0, 0.0, 2)],
            ..Default::default()
        };
        let found = run(&board);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::TracksCrossing);
        assert!((found[0].position.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_tracks_gap() {
        // centre distance 0.4, edge gap 0.15 < 0.2
        let close = Board {
            tracks: vec![track(0.0, 0.0, 5.0, 0.0, 1), track(0.0, 0.4, 5.0, 0.4, 2)],
            ..Default::default()
        };
        let found = run(&close);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::TrackSegmentsTooClose);
        assert_eq!(found[0].main, Some(ItemRef::Track(0)));
        assert_eq!(found[0].aux, Some(ItemRef::Track(1)));

        let apart = Board {
            tracks: vec![track(0.0, 0.0, 5.0, 0.0, 1), track(0.0, 0.5, 5.0, 0.5, 2)],
            ..Default::default()
        };
        assert!(run(&apart).is_empty());
    }

    #[test]
    fn test_same_net_and_other_layer_skipped() {
        let other_layer = Track::new(Point::new(0.0, 0.1), Point::new(5.0, 0.1), 0.25, Layer::B_CU, 2);
        let board = Board {
            tracks: vec![track(0.0, 0.0, 5.0, 0.0, 1), track(0.0, 0.1, 5.0, 0.1, 1), other_layer.into()],
            ..Default::default()
        };
        assert!(run(&board).is_empty());
    }

    #[test]
    fn test_via_kinds_follow_reference() {
        let board = Board {
            tracks: vec![
                Via::through(Point::new(0.0, 0.5), 0.6, 0.3, 1).into(),
                track(-2.0, 0.0, 2.0, 0.0, 2),
                Via::through(Point::new(0.0, -0.6), 0.6, 0.3, 3).into(),
            ],
            ..Default::default()
        };
        let kinds: Vec<_> = run(&board).iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::ViaNearTrack, ViolationKind::TrackNearVia]);
    }

    #[test]
    fn test_via_sizes() {
        let mut board = Board {
            tracks: vec![Via::through(Point::new(0.0, 0.0), 0.35, 0.3, 1).into()],
            ..Default::default()
        };
        assert_eq!(run(&board)[0].kind, ViolationKind::TooSmallVia);

        board.tracks = vec![Via::through(Point::new(0.0, 0.0), 0.5, 0.5, 1).into()];
        assert_eq!(run(&board)[0].kind, ViolationKind::ViaHoleBigger);
    }

    #[test]
    fn test_micro_via_layer_pair() {
        let mut board = Board::default();
        board.design.copper_layer_count = 4;
        let micro = Via {
            via_type: ViaType::Micro,
            top: Layer::F_CU,
            bottom: Layer::inner(1).unwrap(),
            ..Via::through(Point::new(0.0, 0.0), 0.3, 0.1, 1)
        };
        board.tracks = vec![micro.clone().into()];
        assert!(run(&board).is_empty());

        board.tracks = vec![Via {
            bottom: Layer::inner(2).unwrap(),
            ..micro
        }
        .into()];
        assert_eq!(run(&board)[0].kind, ViolationKind::MicroViaIncorrectLayerPair);
    }

    #[test]
    fn test_track_near_pad_and_hole() {
        let pad = Pad::smd(
            "1",
            Point::new(0.0, 0.6),
            Size::new(1.0, 1.0),
            PadShape::Rect,
            LayerSet::single(Layer::F_CU),
        )
        .with_net(5);
        let mut back_pad = Pad::through_hole("2", Point::new(4.0, 0.6), Size::new(1.0, 1.0), PadShape::Circle, 0.8)
            .with_net(6);
        back_pad.layers = LayerSet::single(Layer::B_CU);
        let mut board = Board {
            tracks: vec![track(-2.0, 0.0, 2.0, 0.0, 1)],
            ..Default::default()
        };
        board
            .footprints
            .push(Footprint::new("R1", Point::new(0.0, 0.6)).with_pad(pad));
        let found = run(&board);
        assert_eq!(found[0].kind, ViolationKind::TrackNearPad);
        assert_eq!(found[0].aux, Some(ItemRef::Pad { footprint: 0, pad: 0 }));

        board.footprints.clear();
        board.tracks = vec![track(2.0, 0.0, 6.0, 0.0, 1)];
        board
            .footprints
            .push(Footprint::new("J1", Point::new(4.0, 0.6)).with_pad(back_pad));
        assert_eq!(run(&board)[0].kind, ViolationKind::HoleNearTrack);
    }

    #[test]
    fn test_single_item_checks_earlier_items_too() {
        let board = Board {
            tracks: vec![track(0.0, 0.0, 5.0, 0.0, 1), track(0.0, 0.3, 5.0, 0.3, 2)],
            ..Default::default()
        };
        let v = single(&board, 1).unwrap();
        assert_eq!(v.main, Some(ItemRef::Track(1)));
        assert_eq!(v.aux, Some(ItemRef::Track(0)));
        assert!(single(&board, 7).is_none());
    }
}
