//! Effective clearance lookup

use crate::board::{Board, ItemRef, TrackItem};

/// Required clearance around a board item, local overrides already merged
pub trait ClearanceResolver {
    fn clearance(&self, board: &Board, item: ItemRef) -> f64;
}

/// Local clearance when set, otherwise the clearance of the item's netclass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetclassClearance;

impl ClearanceResolver for NetclassClearance {
    fn clearance(&self, board: &Board, item: ItemRef) -> f64 {
        let (local, net) = match item {
            ItemRef::Track(i) | ItemRef::Via(i) => match board.tracks.get(i) {
                Some(t) => (t.local_clearance(), t.net()),
                None => (None, 0),
            },
            ItemRef::Pad { footprint, pad } => match board.pad(footprint, pad) {
                Some(p) => (p.local_clearance, p.net),
                None => (None, 0),
            },
            ItemRef::Zone(i) => match board.zones.get(i) {
                Some(z) => (z.local_clearance, z.net),
                None => (None, 0),
            },
            ItemRef::Text(_) | ItemRef::Footprint(_) => (None, 0),
        };
        local.unwrap_or_else(|| board.netclass_for_net(net).clearance)
    }
}

/// Clearance of every item in the track sequence, in sequence order.
pub(crate) fn track_clearances(board: &Board, resolver: &dyn ClearanceResolver) -> Vec<f64> {
    board
        .tracks
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let r = match item {
                TrackItem::Track(_) => ItemRef::Track(i),
                TrackItem::Via(_) => ItemRef::Via(i),
            };
            resolver.clearance(board, r)
        })
        .collect()
}
