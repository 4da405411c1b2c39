//! Helper algorithms over [`Graph`].

use super::{Graph, NodeId};
use std::collections::VecDeque;

/// The graph has a directed cycle; `node` lies on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("graph contains a cycle through node {node}")]
pub struct CycleError {
    pub node: NodeId,
}

/// Kahn's algorithm. Sources are seeded in insertion order and out-edges are released in
/// insertion order, so the result is deterministic for a given construction sequence.
pub fn topological_order<N, E>(g: &Graph<N, E>) -> Result<Vec<NodeId>, CycleError> {
    let mut remaining: Vec<usize> = g.node_ids().map(|v| g.in_degree(v)).collect();
    let mut queue: VecDeque<NodeId> = g
        .node_ids()
        .filter(|v| remaining[v.index()] == 0)
        .collect();

    let mut out: Vec<NodeId> = Vec::with_capacity(g.node_count());
    while let Some(v) = queue.pop_front() {
        out.push(v);
        for w in g.successors(v) {
            let slot = &mut remaining[w.index()];
            *slot -= 1;
            if *slot == 0 {
                queue.push_back(w);
            }
        }
    }

    if out.len() == g.node_count() {
        return Ok(out);
    }

    // Every node left over still has an unprocessed predecessor, so walking predecessors
    // must eventually revisit a node; that node is on a cycle.
    let Some(start) = g.node_ids().find(|v| remaining[v.index()] > 0) else {
        return Ok(out);
    };
    let mut seen = vec![false; g.node_bound()];
    let mut v = start;
    while !seen[v.index()] {
        seen[v.index()] = true;
        let Some(u) = g.predecessors(v).find(|u| remaining[u.index()] > 0) else {
            break;
        };
        v = u;
    }
    Err(CycleError { node: v })
}

/// Weakly connected components, each listed in discovery (BFS) order.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<NodeId>> {
    let mut seen = vec![false; g.node_bound()];
    let mut out: Vec<Vec<NodeId>> = Vec::new();

    for start in g.node_ids() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut comp: Vec<NodeId> = Vec::new();
        let mut q: VecDeque<NodeId> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v);
            for n in g.successors(v).chain(g.predecessors(v)) {
                if !seen[n.index()] {
                    seen[n.index()] = true;
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}
