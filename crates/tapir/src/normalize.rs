//! Normalize long edges by inserting virtual nodes.
//!
//! After ranking an edge may span several ranks. Ordering and positioning only deal with edges
//! between adjacent ranks, so every longer edge is replaced by a chain of zero-size virtual
//! nodes, one per intermediate rank.

use crate::error::InternalError;
use crate::{Error, Result};
use crate::model::{DrawGraph, EdgeInfo, NodeInfo};
use tapir_graph::{EdgeId, NodeId};
use tracing::{debug, debug_span};

/// Most virtual nodes [`expand`] inserts into one graph.
pub const MAX_VIRTUAL_NODES: u64 = 1 << 20;

/// The path that replaced one long edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// The removed edge.
    pub edge: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Virtual nodes from source side to target side.
    pub nodes: Vec<NodeId>,
}

/// Replaces every edge spanning more than one rank with a chain of virtual nodes.
///
/// Chain edges keep the original weight and have minlen 1. Edges that span less than one rank
/// cannot come out of a feasible ranking and are reported as internal errors. Needing more than
/// [`MAX_VIRTUAL_NODES`] fails with [`Error::TooManyVirtualNodes`] before the graph is touched.
pub fn expand(g: &mut DrawGraph) -> Result<Vec<Chain>> {
    let _span = debug_span!("expand").entered();
    let mut long: Vec<(EdgeId, NodeId, NodeId)> = Vec::new();
    let mut count: u64 = 0;
    for (e, source, target, _) in g.edges() {
        let span = g[target].rank - g[source].rank;
        if span < 1 {
            return Err(InternalError::UnexpandableEdge { edge: e, span }.into());
        }
        if span > 1 {
            count += u64::from(span.unsigned_abs() - 1);
            long.push((e, source, target));
        }
    }
    if count > MAX_VIRTUAL_NODES {
        return Err(Error::TooManyVirtualNodes {
            count,
            limit: MAX_VIRTUAL_NODES,
        });
    }

    let mut chains: Vec<Chain> = Vec::with_capacity(long.len());
    for (e, source, target) in long {
        chains.push(expand_edge(g, e, source, target));
    }

    debug!(
        chains = chains.len(),
        virtual_nodes = chains.iter().map(|c| c.nodes.len()).sum::<usize>(),
        "long edges expanded"
    );
    Ok(chains)
}

fn expand_edge(g: &mut DrawGraph, e: EdgeId, source: NodeId, target: NodeId) -> Chain {
    let weight = g[e].weight;
    let first = g[source].rank + 1;
    let last = g[target].rank;
    g.remove_edge(e);

    let piece = || EdgeInfo {
        origin: Some(e),
        ..EdgeInfo::new(1, weight)
    };

    let mut nodes: Vec<NodeId> = Vec::with_capacity((last - first) as usize);
    let mut prev = source;
    for rank in first..last {
        let v = g.add_node(NodeInfo {
            rank,
            virt: true,
            origin: Some(e),
            ..NodeInfo::sized(0.0, 0.0)
        });
        g.add_edge(prev, v, piece());
        nodes.push(v);
        prev = v;
    }
    g.add_edge(prev, target, piece());

    Chain {
        edge: e,
        source,
        target,
        nodes,
    }
}
