//! Copper text against tracks, vias and pads
//!
//! Each copper text is broken into its stroke segments. Tracks and vias are
//! tested against the strokes directly. Pads are moved into the frame of a
//! stroke, where the stroke lies on the X axis from the origin, and tested
//! against a horizontal capsule.

use tracing::debug;

use super::Context;
use crate::board::{ItemRef, Pad, Text, TrackItem};
use crate::geometry::{Point, Segment, Shape};
use crate::progress::Poller;
use crate::violation::{Violation, ViolationKind, ViolationSink};

pub(crate) fn test_texts(ctx: &Context<'_>, sink: &mut dyn ViolationSink, poller: &mut Poller<'_>) {
    let board = ctx.board;
    let total = board.texts.len();

    for (index, text) in board.texts.iter().enumerate() {
        if poller.should_stop(index, total) {
            debug!(done = index, total, "text checks cancelled");
            return;
        }
        if !text.layer.is_copper() {
            continue;
        }
        let strokes = text.stroke_segments();
        if strokes.is_empty() {
            debug!(text = %text.text, "text has no strokes, skipped");
            continue;
        }
        test_text_against_tracks(ctx, index, text, &strokes, sink);
        test_text_against_pads(ctx, index, text, &strokes, sink);
    }
}

fn test_text_against_tracks(
    ctx: &Context<'_>,
    index: usize,
    text: &Text,
    strokes: &[Segment],
    sink: &mut dyn ViolationSink,
) {
    let board = ctx.board;
    for (track_index, item) in board.tracks.iter().enumerate() {
        if !item.is_on_layer(text.layer) {
            continue;
        }
        let Some(item_ref) = board.track_ref(track_index) else {
            continue;
        };
        let min_dist = (item.width() + text.thickness) / 2.0 + ctx.clearance.clearance(board, item_ref);

        let hit = strokes.iter().find(|stroke| match item {
            TrackItem::Track(track) => stroke.distance(&track.segment()) < min_dist,
            TrackItem::Via(via) => stroke.point_closer_than(via.position, min_dist),
        });
        if let Some(stroke) = hit {
            let kind = if item.is_via() {
                ViolationKind::ViaInsideText
            } else {
                ViolationKind::TrackInsideText
            };
            sink.push(Violation::between(
                kind,
                item_ref,
                item.nearest_point(stroke.start),
                Some((ItemRef::Text(index), text.position)),
            ));
        }
    }
}

fn test_text_against_pads(
    ctx: &Context<'_>,
    index: usize,
    text: &Text,
    strokes: &[Segment],
    sink: &mut dyn ViolationSink,
) {
    let board = ctx.board;
    for (item_ref, pad) in board.pads() {
        if !pad.layers.contains(text.layer) {
            continue;
        }
        let clearance = ctx.clearance.clearance(board, item_ref);
        if strokes
            .iter()
            .any(|stroke| pad_near_stroke(pad, stroke, text.thickness, clearance))
        {
            sink.push(Violation::between(
                ViolationKind::PadInsideText,
                item_ref,
                pad.position,
                Some((ItemRef::Text(index), text.position)),
            ));
        }
    }
}

/// Pad test in the stroke frame: origin at the stroke start, stroke along +X.
fn pad_near_stroke(pad: &Pad, stroke: &Segment, thickness: f64, clearance: f64) -> bool {
    let origin = stroke.start;
    let delta = stroke.end - origin;
    let angle = delta.angle_degrees();
    let local_pad = pad.shape().translated(-origin).rotated(-angle);
    let local_stroke = Shape::capsule(Point::default(), Point::new(delta.length(), 0.0), thickness / 2.0);
    local_pad.collides(&local_stroke, clearance)
}
