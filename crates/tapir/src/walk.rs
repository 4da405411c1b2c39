//! Tree-walk primitives.
//!
//! [`walk`] is an iterative depth-first traversal with three hook points (discover, explore,
//! finish). The network simplex builds its tree walkers on top of it: Euler-tour numbering
//! ([`low_lim`]), tight-subtree growth ([`tight_subtree`]) and subtree re-ranking
//! ([`shift_subtree`]). The explicit stack keeps deep trees (long virtual chains) off the call
//! stack.

use crate::model::DrawGraph;
use crate::rank::util::slack;
use tapir_graph::{EdgeId, Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Follow out-edges only.
    Out,
    /// Follow out-edges, then in-edges.
    Undirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First visit of `node`; `via` is the edge it was reached by (`None` for the root).
    Discover { node: NodeId, via: Option<EdgeId> },
    /// `edge` leads from a visited node to an unvisited one. The hook answers whether to
    /// descend.
    Explore {
        edge: EdgeId,
        from: NodeId,
        to: NodeId,
    },
    /// Every edge of `node` has been explored.
    Finish { node: NodeId, via: Option<EdgeId> },
}

#[derive(Debug)]
struct Frame {
    node: NodeId,
    via: Option<EdgeId>,
    edges: Vec<EdgeId>,
    next: usize,
}

fn frame<N, E>(g: &Graph<N, E>, node: NodeId, via: Option<EdgeId>, mode: WalkMode) -> Frame {
    let edges = match mode {
        WalkMode::Out => g.out_edges(node).to_vec(),
        WalkMode::Undirected => g.node_edges(node).collect(),
    };
    Frame {
        node,
        via,
        edges,
        next: 0,
    }
}

/// Depth-first walk from `root`. The hook gets mutable access to the graph at every step; its
/// return value is only consulted for [`Step::Explore`].
pub fn walk<N, E, F>(g: &mut Graph<N, E>, root: NodeId, mode: WalkMode, mut hook: F)
where
    F: FnMut(&mut Graph<N, E>, Step) -> bool,
{
    if !g.contains_node(root) {
        return;
    }
    let mut visited = vec![false; g.node_bound()];
    visited[root.index()] = true;
    hook(
        g,
        Step::Discover {
            node: root,
            via: None,
        },
    );

    let mut stack: Vec<Frame> = vec![frame(g, root, None, mode)];
    while let Some(top) = stack.last_mut() {
        if let Some(&edge) = top.edges.get(top.next) {
            top.next += 1;
            let from = top.node;
            let Some(to) = g.opposite(edge, from) else {
                continue;
            };
            if visited[to.index()] {
                continue;
            }
            if !hook(g, Step::Explore { edge, from, to }) {
                continue;
            }
            visited[to.index()] = true;
            hook(
                g,
                Step::Discover {
                    node: to,
                    via: Some(edge),
                },
            );
            let next = frame(g, to, Some(edge), mode);
            stack.push(next);
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        hook(
            g,
            Step::Finish {
                node: done.node,
                via: done.via,
            },
        );
    }
}

/// Nodes reachable from `root`, in discovery order.
pub fn reachable<N, E>(g: &mut Graph<N, E>, root: NodeId, mode: WalkMode) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    walk(g, root, mode, |_, step| {
        if let Step::Discover { node, .. } = step {
            out.push(node);
        }
        true
    });
    out
}

/// Assigns Euler-tour `low`/`lim` numbers and `tree_parent` to the tree reachable from `root`
/// without crossing `parent`, starting at counter `start`. Returns the next unused counter.
///
/// Afterwards every node `v` of the walked tree satisfies: `w` is in the subtree of `v` iff
/// `low(v) <= lim(w) <= lim(v)`.
pub fn low_lim(g: &mut DrawGraph, root: NodeId, parent: Option<EdgeId>, start: u32) -> u32 {
    let mut next = start;
    walk(g, root, WalkMode::Undirected, |g, step| match step {
        Step::Discover { node, via } => {
            let info = &mut g[node];
            info.low = next;
            info.tree_parent = via.or(parent);
            true
        }
        Step::Explore { edge, .. } => g[edge].tree && Some(edge) != parent,
        Step::Finish { node, .. } => {
            g[node].lim = next;
            next += 1;
            true
        }
    });
    next
}

/// Grows a tree of zero-slack edges from `root`, marking its edges `tree` and its nodes in
/// `in_tree`. Returns the nodes reached, `root` first.
pub fn tight_subtree(g: &mut DrawGraph, root: NodeId, in_tree: &mut [bool]) -> Vec<NodeId> {
    let mut members: Vec<NodeId> = Vec::new();
    walk(g, root, WalkMode::Undirected, |g, step| match step {
        Step::Discover { node, .. } => {
            in_tree[node.index()] = true;
            members.push(node);
            true
        }
        Step::Explore { edge, to, .. } => {
            if in_tree[to.index()] || slack(g, edge) != 0 {
                return false;
            }
            g[edge].tree = true;
            true
        }
        Step::Finish { .. } => true,
    });
    members
}

/// Subtracts `delta` from the rank of every node tree-reachable from `root` without crossing
/// `skip`.
pub fn shift_subtree(g: &mut DrawGraph, root: NodeId, skip: EdgeId, delta: i32) {
    walk(g, root, WalkMode::Undirected, |g, step| match step {
        Step::Discover { node, .. } => {
            g[node].rank -= delta;
            true
        }
        Step::Explore { edge, .. } => edge != skip && g[edge].tree,
        Step::Finish { .. } => true,
    });
}
