//! Pad to pad clearances with a sorted sweep
//!
//! Pads are sorted by X then Y. A reference pad is only tested against the
//! pads after it whose X lies within the widest distance two pads can
//! interact over, so dense boards stay close to linear.

use tracing::debug;

use super::Context;
use crate::board::pad::HOLE_PROBE_CLEARANCE;
use crate::board::{ItemRef, Pad};
use crate::progress::Poller;
use crate::violation::{Violation, ViolationKind, ViolationSink};

pub(crate) struct SweepPad<'a> {
    pub item: ItemRef,
    pub footprint: usize,
    pub pad: &'a Pad,
    pub clearance: f64,
    /// Bounding radius of the copper or the hole, whichever is larger
    pub radius: f64,
}

pub(crate) fn sorted_pads<'a>(ctx: &Context<'a>) -> Vec<SweepPad<'a>> {
    let mut pads: Vec<SweepPad<'a>> = ctx
        .board
        .pads()
        .map(|(item, pad)| {
            let footprint = match item {
                ItemRef::Pad { footprint, .. } => footprint,
                _ => 0,
            };
            SweepPad {
                item,
                footprint,
                pad,
                clearance: ctx.clearance.clearance(ctx.board, item),
                radius: pad.bounding_radius().max(pad.drill_size().max_side() / 2.0),
            }
        })
        .collect();
    pads.sort_by(|a, b| {
        a.pad
            .position
            .x
            .total_cmp(&b.pad.position.x)
            .then(a.pad.position.y.total_cmp(&b.pad.position.y))
    });
    pads
}

pub(crate) fn test_pad_to_pad(ctx: &Context<'_>, sink: &mut dyn ViolationSink, poller: &mut Poller<'_>) {
    let pads = sorted_pads(ctx);
    let max_radius = pads.iter().map(|p| p.radius).fold(0.0, f64::max);
    let max_clearance = pads.iter().map(|p| p.clearance).fold(HOLE_PROBE_CLEARANCE, f64::max);

    for (i, reference) in pads.iter().enumerate() {
        if poller.should_stop(i, pads.len()) {
            debug!(done = i, total = pads.len(), "pad sweep cancelled");
            return;
        }
        let x_limit = reference.pad.position.x
            + reference.radius
            + max_radius
            + reference.clearance.max(max_clearance);

        let hit = pads[i + 1..]
            .iter()
            .take_while(|candidate| candidate.pad.position.x <= x_limit)
            .find_map(|candidate| test_pair(reference, candidate));
        if let Some(violation) = hit {
            sink.push(violation);
        }
    }
}

/// First violation between a reference pad and a candidate, if any.
pub(crate) fn test_pair(reference: &SweepPad<'_>, candidate: &SweepPad<'_>) -> Option<Violation> {
    let (rp, cp) = (reference.pad, candidate.pad);
    if candidate.item == reference.item {
        return None;
    }
    if cp.net != 0 && cp.net == rp.net {
        return None;
    }
    if candidate.footprint == reference.footprint && cp.name == rp.name {
        return None;
    }

    let ref_copper = rp.layers.copper();
    let shares_copper = cp.layers.intersects(&ref_copper);

    // pads on different copper layers can still clash through their holes
    if !shares_copper && cp.has_copper() && rp.has_copper() {
        if cp.same_hole_as(rp) {
            return None;
        }
        if let Some(probe) = cp.hole_probe() {
            if pads_collide(rp, reference.clearance, &probe, HOLE_PROBE_CLEARANCE) {
                return Some(pad_violation(ViolationKind::HoleNearPad, candidate, reference));
            }
        }
        if let Some(probe) = rp.hole_probe() {
            if pads_collide(cp, candidate.clearance, &probe, HOLE_PROBE_CLEARANCE) {
                return Some(pad_violation(ViolationKind::HoleNearPad, reference, candidate));
            }
        }
        return None;
    }

    // technical-layer-only pads without a hole never clash
    if (!shares_copper && !cp.has_hole()) || (!rp.has_copper() && !rp.has_hole()) {
        return None;
    }

    if pads_collide(rp, reference.clearance, cp, candidate.clearance) {
        return Some(pad_violation(ViolationKind::PadNearPad1, reference, candidate));
    }
    None
}

fn pads_collide(a: &Pad, a_clearance: f64, b: &Pad, b_clearance: f64) -> bool {
    a.shape().collides(&b.shape(), a_clearance.max(b_clearance))
}

fn pad_violation(kind: ViolationKind, main: &SweepPad<'_>, aux: &SweepPad<'_>) -> Violation {
    Violation::between(
        kind,
        main.item,
        main.pad.position,
        Some((aux.item, aux.pad.position)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Drill, DrillShape, Footprint, Layer, LayerSet, PadShape};
    use crate::clearance::NetclassClearance;
    use crate::connectivity::BoardConnectivity;
    use crate::geometry::{Point, Size};
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
        test_pad_to_pad(&ctx, &mut sink, &mut poller);
        sink
    }

    /// Forward scan over the sorted pads without the X cutoff.
    fn run_naive(board: &Board) -> Vec<Violation> {
        let ctx = Context {
            board,
            clearance: &NetclassClearance,
            connectivity: &BoardConnectivity,
        };
        let pads = sorted_pads(&ctx);
        let mut out = Vec::new();
        for i in 0..pads.len() {
            for j in (i + 1)..pads.len() {
                if let Some(v) = test_pair(&pads[i], &pads[j]) {
                    out.push(v);
                    break;
                }
            }
        }
        out
    }

    fn smd(name: &str, x: f64, y: f64, net: i32) -> Pad {
        Pad::smd(
            name,
            Point::new(x, y),
            Size::new(1.0, 1.0),
            PadShape::Rect,
            LayerSet::single(Layer::F_CU),
        )
        .with_net(net)
    }

    fn board_with(footprints: Vec<Footprint>) -> Board {
        Board {
            footprints,
            ..Default::default()
        }
    }

    #[test]
    fn test_close_pads_of_different_nets() {
        let board = board_with(vec![
            Footprint::new("R1", Point::new(0.0, 0.0)).with_pad(smd("1", 0.0, 0.0, 1)),
            Footprint::new("R2", Point::new(1.1, 0.0)).with_pad(smd("1", 1.1, 0.0, 2)),
        ]);
        let found = run(&board);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::PadNearPad1);
        assert_eq!(found[0].main, Some(ItemRef::Pad { footprint: 0, pad: 0 }));
    }

    #[test]
    fn test_same_net_pads_never_clash() {
        let board = board_with(vec![
            Footprint::new("R1", Point::new(0.0, 0.0)).with_pad(smd("1", 0.0, 0.0, 3)),
            Footprint::new("R2", Point::new(0.2, 0.0)).with_pad(smd("1", 0.2, 0.0, 3)),
        ]);
        assert!(run(&board).is_empty());
    }

    #[test]
    fn test_no_net_pads_do_clash() {
        let board = board_with(vec![
            Footprint::new("R1", Point::new(0.0, 0.0)).with_pad(smd("1", 0.0, 0.0, 0)),
            Footprint::new("R2", Point::new(0.2, 0.0)).with_pad(smd("1", 0.2, 0.0, 0)),
        ]);
        assert_eq!(run(&board).len(), 1);
    }

    #[test]
    fn test_duplicate_pad_exemption() {
        let board = board_with(vec![Footprint::new("U1", Point::new(0.0, 0.0))
            .with_pad(smd("1", 0.0, 0.0, 1))
            .with_pad(smd("1", 0.3, 0.0, 2))]);
        assert!(run(&board).is_empty());
    }

    #[test]
    fn test_hole_near_pad_on_other_layer() {
        let mut th = Pad::through_hole("1", Point::new(0.0, 0.0), Size::new(1.6, 1.6), PadShape::Circle, 1.0);
        th.layers = LayerSet::single(Layer::B_CU);
        th.net = 1;
        let board = board_with(vec![
            Footprint::new("J1", Point::new(0.0, 0.0)).with_pad(th),
            Footprint::new("R1", Point::new(0.9, 0.0)).with_pad(smd("1", 0.9, 0.0, 2)),
        ]);
        let found = run(&board);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::HoleNearPad);
        // the drilled reference pad is the main item
        assert_eq!(found[0].main, Some(ItemRef::Pad { footprint: 0, pad: 0 }));
    }

    #[test]
    fn test_identical_holes_are_accepted() {
        let mut front = Pad::through_hole("1", Point::new(0.0, 0.0), Size::new(2.0, 3.0), PadShape::Oval, 1.0);
        front.drill = Some(Drill {
            size: Size::new(1.0, 1.6),
            shape: DrillShape::Oblong,
        });
        front.layers = LayerSet::single(Layer::F_CU);
        let mut back = front.clone().with_net(2);
        back.layers = LayerSet::single(Layer::B_CU);
        let board = board_with(vec![
            Footprint::new("J1", Point::new(0.0, 0.0)).with_pad(front.clone().with_net(1)),
            Footprint::new("J2", Point::new(0.0, 0.0)).with_pad(back.clone()),
        ]);
        assert!(run(&board).is_empty());

        let rotated = board_with(vec![
            Footprint::new("J1", Point::new(0.0, 0.0)).with_pad(front.with_net(1)),
            Footprint::new("J2", Point::new(0.0, 0.0)).with_pad(back.with_orientation(90.0)),
        ]);
        assert_eq!(run(&rotated).len(), 1);
    }

    #[test]
    fn test_technical_only_pad_is_ignored() {
        let mut paste = smd("2", 0.0, 0.0, 2);
        paste.layers = LayerSet::single(Layer::F_PASTE);
        let board = board_with(vec![
            Footprint::new("R1", Point::new(0.0, 0.0)).with_pad(smd("1", 0.0, 0.0, 1)),
            Footprint::new("R2", Point::new(0.0, 0.0)).with_pad(paste),
        ]);
        assert!(run(&board).is_empty());
    }

    #[test]
    fn test_pruned_sweep_matches_naive_scan() {
        // deterministic pseudo-random layout
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10_000) as f64 / 10_000.0
        };

        let mut footprints = Vec::new();
        for f in 0..60 {
            let mut fp = Footprint::new(&format!("U{}", f), Point::new(0.0, 0.0));
            for p in 0..4 {
                let x = next() * 40.0;
                let y = next() * 40.0;
                let w = 0.3 + next() * 2.5;
                let h = 0.3 + next() * 2.5;
                let shape = match p % 4 {
                    0 => PadShape::Circle,
                    1 => PadShape::Oval,
                    2 => PadShape::Rect,
                    _ => PadShape::RoundRect { radius_ratio: 0.25 },
                };
                let layers = if next() < 0.5 {
                    LayerSet::single(Layer::F_CU)
                } else {
                    LayerSet::single(Layer::B_CU)
                };
                let mut pad = Pad::smd(&p.to_string(), Point::new(x, y), Size::new(w, h), shape, layers)
                    .with_net((next() * 6.0) as i32)
                    .with_orientation(next() * 360.0);
                if next() < 0.3 {
                    pad.drill = Some(Drill::round(w.min(h) * 0.5));
                }
                if next() < 0.2 {
                    pad.local_clearance = Some(next());
                }
                fp.pads.push(pad);
            }
            footprints.push(fp);
        }
        let board = board_with(footprints);
        let pruned = run(&board);
        assert!(!pruned.is_empty());
        assert_eq!(pruned, run_naive(&board));
    }
}
