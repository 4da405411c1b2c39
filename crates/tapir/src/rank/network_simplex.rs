//! Network simplex over a feasible spanning tree.
//!
//! The tree lives inside the draw graph itself: `EdgeInfo::tree` marks tree edges,
//! `EdgeInfo::cut_value` holds their cut values and `NodeInfo::{low, lim, tree_parent}` the
//! Euler-tour numbering used for O(1) subtree tests. Each exchange updates cut values along the
//! tree path between the entering edge's endpoints and renumbers only the subtree below their
//! common ancestor.

use super::util::slack;
use crate::Result;
use crate::error::InternalError;
use crate::model::DrawGraph;
use crate::walk::{low_lim, shift_subtree};
use tapir_graph::{EdgeId, NodeId};
use tracing::{trace, warn};

/// Cut values above `-CUT_EPSILON` count as non-negative. Weights are floats, so sums that are
/// zero on paper can come out as tiny negatives.
pub const CUT_EPSILON: f64 = 1e-9;

/// Numbers every tree of the forest rooted at `roots`. Fails when the forest misses a node.
pub fn init_low_lim(g: &mut DrawGraph, roots: &[NodeId]) -> Result<()> {
    let mut next = 1;
    for &root in roots {
        next = low_lim(g, root, None, next);
    }
    let reached = (next - 1) as usize;
    if reached != g.node_count() {
        return Err(InternalError::TreeNotSpanning {
            reached,
            expected: g.node_count(),
        }
        .into());
    }
    Ok(())
}

/// Computes the cut value of every tree edge, leaves first.
///
/// A node is resolved once it has a single unresolved tree edge left; that edge's cut value then
/// depends only on edges whose cut values are already known.
pub fn init_cut_values(g: &mut DrawGraph) -> Result<()> {
    let mut unresolved = vec![0usize; g.node_bound()];
    let mut done = vec![false; g.edge_bound()];
    let tree_edges: Vec<EdgeId> = g
        .edges()
        .filter(|(_, _, _, e)| e.tree)
        .map(|(id, _, _, _)| id)
        .collect();
    for &e in &tree_edges {
        if let Some((v, w)) = g.endpoints(e) {
            unresolved[v.index()] += 1;
            unresolved[w.index()] += 1;
        }
    }

    let mut queue: Vec<NodeId> = g
        .node_ids()
        .filter(|v| unresolved[v.index()] == 1)
        .collect();
    while let Some(v) = queue.pop() {
        if unresolved[v.index()] != 1 {
            continue;
        }
        let Some(e) = g.node_edges(v).find(|&e| g[e].tree && !done[e.index()]) else {
            continue;
        };
        let Some(w) = g.opposite(e, v) else {
            continue;
        };
        g[e].cut_value = calc_cut_value(g, v, e);
        done[e.index()] = true;
        unresolved[v.index()] = 0;
        unresolved[w.index()] -= 1;
        if unresolved[w.index()] == 1 {
            queue.push(w);
        }
    }

    match tree_edges.into_iter().find(|e| !done[e.index()]) {
        Some(edge) => Err(InternalError::DanglingTreeEdge { edge }.into()),
        None => Ok(()),
    }
}

/// Cut value of `tree_edge`, seen from `child`, its endpoint on the leaf side. Every other tree
/// edge at `child` must already carry its cut value.
pub fn calc_cut_value(g: &DrawGraph, child: NodeId, tree_edge: EdgeId) -> f64 {
    let child_is_tail = g
        .endpoints(tree_edge)
        .is_some_and(|(source, _)| source == child);

    let mut cut = g[tree_edge].weight;
    let mut account = |edge: EdgeId, points_to_head: bool| {
        let info = &g[edge];
        cut += if points_to_head {
            info.weight
        } else {
            -info.weight
        };
        if info.tree {
            cut += if points_to_head {
                -info.cut_value
            } else {
                info.cut_value
            };
        }
    };
    for &e in g.out_edges(child) {
        if e != tree_edge {
            account(e, child_is_tail);
        }
    }
    for &e in g.in_edges(child) {
        if e != tree_edge {
            account(e, !child_is_tail);
        }
    }
    cut
}

/// One network simplex run over a draw graph that already carries a feasible spanning forest.
pub struct NetworkSimplex<'g> {
    g: &'g mut DrawGraph,
    /// Working list scanned for negative cut values; an exchange replaces the leaving edge in
    /// place.
    tree_edges: Vec<EdgeId>,
    cursor: usize,
    search_size: usize,
    iterations: usize,
}

impl<'g> NetworkSimplex<'g> {
    /// Numbers the forest rooted at `roots` and computes its cut values.
    pub fn new(g: &'g mut DrawGraph, roots: &[NodeId], search_size: usize) -> Result<Self> {
        init_low_lim(g, roots)?;
        init_cut_values(g)?;
        let tree_edges: Vec<EdgeId> = g
            .edges()
            .filter(|(_, _, _, e)| e.tree)
            .map(|(id, _, _, _)| id)
            .collect();
        Ok(Self {
            g,
            tree_edges,
            cursor: 0,
            search_size: search_size.max(1),
            iterations: 0,
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn graph(&self) -> &DrawGraph {
        self.g
    }

    /// Exchanges edges until no tree edge has a negative cut value, or until `max_iterations`
    /// exchanges have been made. Returns the number of exchanges.
    pub fn run(&mut self, max_iterations: Option<usize>) -> Result<usize> {
        while let Some(slot) = self.leave_slot() {
            if max_iterations.is_some_and(|max| self.iterations >= max) {
                warn!(
                    iterations = self.iterations,
                    "network simplex hit its iteration cap before reaching an optimum"
                );
                break;
            }
            let leave = self.tree_edges[slot];
            let enter = self.enter_edge(leave)?;
            trace!(
                iteration = self.iterations,
                %leave,
                %enter,
                cut_value = self.g[leave].cut_value,
                "exchanging tree edge"
            );
            self.update(slot, leave, enter)?;
            self.iterations += 1;
        }
        Ok(self.iterations)
    }

    /// Next tree edge with a negative cut value, if any.
    ///
    /// Scans the working list cyclically from where the previous search stopped and returns
    /// the most negative of the first `search_size` candidates.
    pub fn leave_edge(&mut self) -> Option<EdgeId> {
        self.leave_slot().map(|slot| self.tree_edges[slot])
    }

    fn leave_slot(&mut self) -> Option<usize> {
        let len = self.tree_edges.len();
        let mut best: Option<(usize, f64)> = None;
        let mut found = 0;
        let mut stopped = None;
        for step in 0..len {
            let slot = (self.cursor + step) % len;
            let cut = self.g[self.tree_edges[slot]].cut_value;
            if cut >= -CUT_EPSILON {
                continue;
            }
            if best.is_none_or(|(_, b)| cut < b) {
                best = Some((slot, cut));
            }
            found += 1;
            if found >= self.search_size {
                stopped = Some(slot);
                break;
            }
        }
        let (slot, _) = best?;
        // The next search resumes at the slot that filled the window, which the exchange
        // refills with the entering edge. A full scan leaves the cursor where it was.
        if let Some(stopped) = stopped {
            self.cursor = stopped;
        }
        Some(slot)
    }

    /// Minimum-slack non-tree edge that reconnects the two halves of the tree split at `leave`,
    /// crossing the cut in the opposite direction.
    pub fn enter_edge(&self, leave: EdgeId) -> Result<EdgeId> {
        let g = &*self.g;
        let (v, w) = g
            .endpoints(leave)
            .ok_or(InternalError::DanglingTreeEdge { edge: leave })?;

        // The endpoint with the smaller lim roots the subtree cut off by `leave`.
        let (root, into_subtree) = if g[v].lim > g[w].lim {
            (w, true)
        } else {
            (v, false)
        };
        let (low, lim) = (g[root].low, g[root].lim);
        let inside = |x: NodeId| low <= g[x].lim && g[x].lim <= lim;

        let mut best: Option<(i32, EdgeId)> = None;
        for x in g.node_ids().filter(|&x| inside(x)) {
            let candidates = if into_subtree {
                g.out_edges(x)
            } else {
                g.in_edges(x)
            };
            for &f in candidates {
                let Some(other) = g.opposite(f, x) else {
                    continue;
                };
                if inside(other) {
                    continue;
                }
                let s = slack(g, f);
                if best.is_none_or(|(b, _)| s < b) {
                    best = Some((s, f));
                }
            }
        }
        best.map(|(_, f)| f)
            .ok_or_else(|| InternalError::NoEnteringEdge { edge: leave }.into())
    }

    /// Swaps `leave` out of the tree and `enter` in, re-ranking and updating cut values and
    /// low/lim numbers.
    pub fn exchange(&mut self, leave: EdgeId, enter: EdgeId) -> Result<()> {
        let slot = self
            .tree_edges
            .iter()
            .position(|&e| e == leave)
            .ok_or(InternalError::DanglingTreeEdge { edge: leave })?;
        self.update(slot, leave, enter)
    }

    fn update(&mut self, slot: usize, leave: EdgeId, enter: EdgeId) -> Result<()> {
        let g = &mut *self.g;
        let (v, w) = g
            .endpoints(leave)
            .ok_or(InternalError::DanglingTreeEdge { edge: leave })?;
        let (tail, head) = g
            .endpoints(enter)
            .ok_or(InternalError::NoEnteringEdge { edge: leave })?;

        let delta = slack(g, enter);
        if delta != 0 {
            if g[v].lim < g[w].lim {
                shift_subtree(g, v, leave, delta);
            } else {
                shift_subtree(g, w, leave, -delta);
            }
        }

        let cut = g[leave].cut_value;
        let first = tree_update(g, tail, head, cut, true)?;
        let second = tree_update(g, head, tail, cut, false)?;
        if first != second {
            return Err(InternalError::MismatchedAncestor { first, second }.into());
        }

        g[enter].cut_value = -cut;
        g[enter].tree = true;
        g[leave].cut_value = 0.0;
        g[leave].tree = false;
        self.tree_edges[slot] = enter;

        let parent = g[first].tree_parent;
        let low = g[first].low;
        low_lim(g, first, parent, low);
        Ok(())
    }
}

/// Walks from `v` towards the root until reaching an ancestor of `w`, adding or subtracting
/// `cut` on each tree edge passed. Returns that ancestor.
fn tree_update(
    g: &mut DrawGraph,
    mut v: NodeId,
    w: NodeId,
    cut: f64,
    dir: bool,
) -> Result<NodeId> {
    let target = g[w].lim;
    while !(g[v].low <= target && target <= g[v].lim) {
        let Some(e) = g[v].tree_parent else {
            return Err(InternalError::NoCommonAncestor { node: v }.into());
        };
        let (tail, head) = g
            .endpoints(e)
            .ok_or(InternalError::DanglingTreeEdge { edge: e })?;
        let forward = if v == tail { dir } else { !dir };
        if forward {
            g[e].cut_value += cut;
        } else {
            g[e].cut_value -= cut;
        }
        v = if g[tail].lim > g[head].lim { tail } else { head };
    }
    Ok(v)
}

/// Feasible tree plus simplex iterations until optimal. Returns the number of exchanges.
pub fn solve(
    g: &mut DrawGraph,
    roots: &[NodeId],
    search_size: usize,
    max_iterations: Option<usize>,
) -> Result<usize> {
    NetworkSimplex::new(g, roots, search_size)?.run(max_iterations)
}
