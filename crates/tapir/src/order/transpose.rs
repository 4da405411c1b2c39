use super::RankTable;
use crate::model::DrawGraph;
use tapir_graph::{EdgeId, NodeId};

/// Swaps adjacent vertices while that reduces crossings with the neighbouring ranks.
///
/// With `allow_ties`, a swap that keeps a non-zero crossing count unchanged is taken too. Passes
/// repeat only while the previous one strictly improved something. Returns the total number of
/// crossings removed.
pub fn transpose(g: &mut DrawGraph, table: &mut RankTable, allow_ties: bool) -> u64 {
    let mut candidate = vec![true; table.len()];
    let mut total = 0;
    loop {
        let mut delta = 0;
        for r in 0..table.len() {
            if candidate[r] {
                delta += transpose_rank(g, table, r, allow_ties, &mut candidate);
            }
        }
        total += delta;
        if delta == 0 {
            break;
        }
    }
    total
}

fn transpose_rank(
    g: &mut DrawGraph,
    table: &mut RankTable,
    r: usize,
    allow_ties: bool,
    candidate: &mut [bool],
) -> u64 {
    let mut gain = 0;
    candidate[r] = false;
    for i in 0..table.rank(r).len().saturating_sub(1) {
        let v = table.rank(r)[i];
        let w = table.rank(r)[i + 1];
        let c0 = crossings_between(g, v, w);
        let c1 = crossings_between(g, w, v);
        if c1 < c0 || (allow_ties && c0 > 0 && c1 == c0) {
            table.swap(g, r, i);
            gain += c0 - c1;
            candidate[r] = true;
            if r > 0 {
                candidate[r - 1] = true;
            }
            if r + 1 < candidate.len() {
                candidate[r + 1] = true;
            }
        }
    }
    gain
}

/// Crossings among the edges of `left` and `right` (with `left` placed first) on both sides.
fn crossings_between(g: &DrawGraph, left: NodeId, right: NodeId) -> u64 {
    let tail_order = |e: EdgeId| g.endpoints(e).map_or(0, |(u, _)| g[u].order);
    let head_order = |e: EdgeId| g.endpoints(e).map_or(0, |(_, w)| g[w].order);
    count_inversions(g.in_edges(left), g.in_edges(right), tail_order)
        + count_inversions(g.out_edges(left), g.out_edges(right), head_order)
}

fn count_inversions(left: &[EdgeId], right: &[EdgeId], pos: impl Fn(EdgeId) -> usize) -> u64 {
    let mut cross = 0;
    for &e2 in right {
        let inter = pos(e2);
        cross += left.iter().filter(|&&e1| pos(e1) > inter).count() as u64;
    }
    cross
}
