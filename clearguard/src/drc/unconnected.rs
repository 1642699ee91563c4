//! Unrouted ratsnest edges

use super::Context;
use crate::violation::UnconnectedItem;

pub(crate) fn list_unconnected(ctx: &Context<'_>) -> Vec<UnconnectedItem> {
    let board = ctx.board;
    ctx.connectivity
        .unconnected_edges(board)
        .into_iter()
        .map(|edge| UnconnectedItem {
            net: edge.net,
            source: edge.source,
            source_label: board.describe(edge.source),
            source_position: edge.source_position,
            target: edge.target,
            target_label: board.describe(edge.target),
            target_position: edge.target_position,
        })
        .collect()
}
