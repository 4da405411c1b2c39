//! The auxiliary graph whose optimal ranking gives x coordinates.
//!
//! Vertices of the draw graph keep their handles. Every draw edge `u -> v` gets an edge-vertex
//! `n` with zero-minlen edges `n -> u` and `n -> v`; minimizing their weighted length pulls `u`
//! and `v` towards the same x. Neighbours within a rank are joined by zero-weight separation
//! edges whose minlen keeps them apart.

use crate::model::{DrawGraph, EdgeInfo, NodeInfo};
use crate::{Error, Result};
use crate::order::RankTable;
use crate::rank::feasible_tree::feasible_tree;
use crate::rank::util::slack;
use tapir_graph::{EdgeId, NodeId};
use tracing::debug;

/// Straightening factor for an edge: chains of virtual vertices pull hardest.
pub fn omega(source_virtual: bool, target_virtual: bool) -> f64 {
    match (source_virtual, target_virtual) {
        (true, true) => 8.0,
        (false, false) => 1.0,
        _ => 2.0,
    }
}

/// Upper bound on the summed separations of all ranks. Keeps every auxiliary rank, and the
/// differences between them, inside `i32`.
pub const MAX_EXTENT: f64 = (1u32 << 29) as f64;

/// Minimum distance between the centres of two rank neighbours.
pub fn separation(left_width: f64, right_width: f64, node_sep: f64) -> i32 {
    gap(left_width, right_width, node_sep) as i32
}

fn gap(left_width: f64, right_width: f64, node_sep: f64) -> f64 {
    ((left_width + right_width) / 2.0 + node_sep).ceil()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeNode {
    pub node: NodeId,
    /// The draw edge this vertex stands for.
    pub edge: EdgeId,
    pub to_source: EdgeId,
    pub to_target: EdgeId,
}

#[derive(Debug, Clone)]
pub struct AuxGraph {
    pub graph: DrawGraph,
    pub edge_nodes: Vec<EdgeNode>,
}

/// Builds the auxiliary graph for `g` ordered as in `table`.
///
/// Fails with [`Error::TooWide`] when the separations of all ranks add up to more than
/// [`MAX_EXTENT`].
pub fn build_aux_graph(g: &DrawGraph, table: &RankTable, node_sep: f64) -> Result<AuxGraph> {
    let mut graph = DrawGraph::with_capacity(
        g.node_count() + g.edge_count(),
        2 * g.edge_count() + g.node_count(),
    );
    for (_, n) in g.nodes() {
        graph.add_node(NodeInfo {
            order: n.order,
            virt: n.virt,
            origin: n.origin,
            ..NodeInfo::sized(n.width, n.height)
        });
    }

    let mut edge_nodes: Vec<EdgeNode> = Vec::with_capacity(g.edge_count());
    for (edge, u, v, info) in g.edges() {
        let weight = info.weight * omega(g[u].virt, g[v].virt);
        let node = graph.add_node(NodeInfo {
            aux: true,
            origin: Some(edge),
            ..NodeInfo::default()
        });
        let pull = || EdgeInfo {
            origin: Some(edge),
            ..EdgeInfo::new(0, weight)
        };
        let to_source = graph.add_edge(node, u, pull());
        let to_target = graph.add_edge(node, v, pull());
        edge_nodes.push(EdgeNode {
            node,
            edge,
            to_source,
            to_target,
        });
    }

    let mut extent = 0.0;
    for rank in table.ranks() {
        for pair in rank.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let minlen = gap(g[left].width, g[right].width, node_sep);
            extent += minlen;
            if extent > MAX_EXTENT {
                return Err(Error::TooWide {
                    extent,
                    limit: MAX_EXTENT,
                });
            }
            graph.add_edge(left, right, EdgeInfo::new(minlen as i32, 0.0));
        }
    }

    Ok(AuxGraph { graph, edge_nodes })
}

/// Builds a feasible tight spanning forest of the auxiliary graph directly from its structure
/// and returns the tree roots.
///
/// Each rank is packed left to right along its separation edges. Ranks are then merged into
/// groups: the first edge-vertex that joins two groups becomes a connector, its endpoints are
/// aligned by shifting the smaller group, and both of its edges enter the tree. Every other
/// edge-vertex hangs off whichever endpoint lies further left. Groups that no edge joins become
/// separate trees. Should the result not be a tight spanning forest, the generic search takes
/// over from the (feasible) positions computed so far.
pub fn aux_feasible_tree(aux: &mut AuxGraph, g: &DrawGraph, table: &RankTable) -> Vec<NodeId> {
    let graph = &mut aux.graph;
    graph.for_each_edge_mut(|_, e| e.tree = false);

    for rank in table.ranks() {
        let mut x = 0;
        for (i, &v) in rank.iter().enumerate() {
            if i > 0 {
                let left = rank[i - 1];
                if let Some(sep) = graph.find_edge(left, v) {
                    x = graph[left].rank + graph[sep].minlen;
                    graph[sep].tree = true;
                }
            }
            graph[v].rank = x;
        }
    }

    let rank_of = |v: NodeId| g[v].rank.max(0) as usize;
    let mut group_of_rank: Vec<usize> = (0..table.len()).collect();
    let mut group_ranks: Vec<Vec<usize>> = (0..table.len()).map(|r| vec![r]).collect();
    let mut connector = vec![false; aux.edge_nodes.len()];

    for (i, en) in aux.edge_nodes.iter().enumerate() {
        let Some((u, v)) = g.endpoints(en.edge) else {
            continue;
        };
        let (gu, gv) = (group_of_rank[rank_of(u)], group_of_rank[rank_of(v)]);
        if gu == gv {
            continue;
        }
        let d = graph[u].rank - graph[v].rank;
        let (keep, moved, delta) = if group_ranks[gv].len() <= group_ranks[gu].len() {
            (gu, gv, d)
        } else {
            (gv, gu, -d)
        };
        let ranks = std::mem::take(&mut group_ranks[moved]);
        for &r in &ranks {
            for &w in table.rank(r) {
                graph[w].rank += delta;
            }
            group_of_rank[r] = keep;
        }
        group_ranks[keep].extend(ranks);
        connector[i] = true;
    }

    for (i, en) in aux.edge_nodes.iter().enumerate() {
        let Some((u, v)) = g.endpoints(en.edge) else {
            continue;
        };
        let (xu, xv) = (graph[u].rank, graph[v].rank);
        graph[en.node].rank = xu.min(xv);
        if connector[i] || xu <= xv {
            graph[en.to_source].tree = true;
        }
        if connector[i] || xv < xu {
            graph[en.to_target].tree = true;
        }
    }

    let mut seen_group = vec![false; table.len()];
    let mut roots: Vec<NodeId> = Vec::new();
    for (r, rank) in table.ranks().iter().enumerate() {
        let group = group_of_rank[r];
        let Some(&first) = rank.first() else {
            continue;
        };
        if !seen_group[group] {
            seen_group[group] = true;
            roots.push(first);
        }
    }

    if is_tight_forest(graph, roots.len()) {
        roots
    } else {
        debug!("specialized aux tree is not a tight spanning forest; using the generic search");
        feasible_tree(graph)
    }
}

fn is_tight_forest(graph: &DrawGraph, roots: usize) -> bool {
    let mut tree_edges = 0;
    for e in graph.edge_ids() {
        if graph[e].tree {
            if slack(graph, e) != 0 {
                return false;
            }
            tree_edges += 1;
        }
    }
    tree_edges + roots == graph.node_count()
}
