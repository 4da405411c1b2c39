//! Feasible tree construction used by the network simplex ranker.

use super::util::slack;
use crate::model::DrawGraph;
use crate::walk::tight_subtree;
use tapir_graph::{EdgeId, NodeId};
use tracing::trace;

/// Marks a spanning forest of tight edges (`EdgeInfo::tree`), adjusting ranks so that one
/// exists. Returns one root per connected component, in node order.
///
/// Expects a feasible ranking (e.g. from [`super::util::init_rank`]) and keeps it feasible.
pub fn feasible_tree(g: &mut DrawGraph) -> Vec<NodeId> {
    g.for_each_edge_mut(|_, e| e.tree = false);

    let nodes: Vec<NodeId> = g.node_ids().collect();
    let mut in_tree = vec![false; g.node_bound()];
    let mut roots: Vec<NodeId> = Vec::new();

    for root in nodes {
        if in_tree[root.index()] {
            continue;
        }
        roots.push(root);
        loop {
            let members = tight_subtree(g, root, &mut in_tree);
            let Some(delta) = min_slack_shift(g, &members, &in_tree) else {
                break;
            };
            trace!(root = %root, size = members.len(), delta, "shifting partial tight tree");

            let touched: Vec<EdgeId> = members
                .iter()
                .flat_map(|&v| g.out_edges(v).iter().copied())
                .collect();
            for e in touched {
                g[e].tree = false;
            }
            for &v in &members {
                g[v].rank += delta;
                in_tree[v.index()] = false;
            }
        }
    }
    roots
}

/// Finds the incident non-tree edge with the least slack and returns the rank shift that makes
/// it tight. `None` when the tree already spans its component.
fn min_slack_shift(g: &DrawGraph, members: &[NodeId], in_tree: &[bool]) -> Option<i32> {
    let mut best: Option<(i32, i32)> = None;
    let mut consider = |s: i32, delta: i32| {
        if best.is_none_or(|(b, _)| s < b) {
            best = Some((s, delta));
        }
    };
    for &v in members {
        for &e in g.out_edges(v) {
            let Some((_, w)) = g.endpoints(e) else {
                continue;
            };
            if !in_tree[w.index()] {
                // Tree on the source side: move it down.
                let s = slack(g, e);
                consider(s, s);
            }
        }
        for &e in g.in_edges(v) {
            let Some((u, _)) = g.endpoints(e) else {
                continue;
            };
            if !in_tree[u.index()] {
                let s = slack(g, e);
                consider(s, -s);
            }
        }
    }
    best.map(|(_, delta)| delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeInfo, NodeInfo};
    use crate::rank::util::init_rank;

    #[test]
    fn shifts_a_partial_tree_to_tighten_the_cheapest_edge() {
        // a -> b (minlen 1), c -> b (minlen 3): initial ranks a0 c0 b3, a->b has slack 2.
        let mut g = DrawGraph::new();
        let a = g.add_node(NodeInfo::default());
        let b = g.add_node(NodeInfo::default());
        let c = g.add_node(NodeInfo::default());
        let ab = g.add_edge(a, b, EdgeInfo::default());
        let cb = g.add_edge(c, b, EdgeInfo::new(3, 1.0));
        init_rank(&mut g).unwrap();

        let roots = feasible_tree(&mut g);
        assert_eq!(roots, vec![a]);
        assert!(g[ab].tree && g[cb].tree);
        assert_eq!(slack(&g, ab), 0);
        assert_eq!(slack(&g, cb), 0);
        assert_eq!(g[b].rank - g[a].rank, 1);
    }
}
