//! Coordinate assignment.
//!
//! x comes from a second network simplex run over an auxiliary constraint graph (see
//! [`aux_graph`]); y is a direct function of rank.

pub mod aux_graph;

pub use aux_graph::{
    AuxGraph, EdgeNode, MAX_EXTENT, aux_feasible_tree, build_aux_graph, omega, separation,
};

use crate::Result;
use crate::config::LayoutConfig;
use crate::model::DrawGraph;
use crate::order::RankTable;
use crate::rank::network_simplex::NetworkSimplex;
use tracing::{debug, debug_span};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionStats {
    pub aux_nodes: usize,
    pub aux_edges: usize,
    /// Edge exchanges of the x-coordinate simplex run.
    pub iterations: usize,
}

/// Sets `NodeInfo::x` for every vertex of `g`. The leftmost vertex centre ends up at 0.
pub fn assign_x(
    g: &mut DrawGraph,
    table: &RankTable,
    config: &LayoutConfig,
) -> Result<PositionStats> {
    let _span = debug_span!("position").entered();
    let mut aux = build_aux_graph(g, table, config.node_sep)?;
    let roots = aux_feasible_tree(&mut aux, g, table);
    let mut stats = PositionStats {
        aux_nodes: aux.graph.node_count(),
        aux_edges: aux.graph.edge_count(),
        iterations: 0,
    };
    debug!(
        aux_nodes = stats.aux_nodes,
        aux_edges = stats.aux_edges,
        trees = roots.len(),
        "auxiliary graph built"
    );

    stats.iterations = NetworkSimplex::new(&mut aux.graph, &roots, config.search_size)?
        .run(config.max_simplex_iterations)?;

    let min = g.node_ids().map(|v| aux.graph[v].rank).min().unwrap_or(0);
    g.for_each_node_mut(|v, n| n.x = f64::from(aux.graph[v].rank - min));
    debug!(iterations = stats.iterations, "x coordinates assigned");
    Ok(stats)
}

/// `y = (rank + 1) * rank_sep`.
pub fn assign_y(g: &mut DrawGraph, config: &LayoutConfig) {
    let rank_sep = config.rank_sep;
    g.for_each_node_mut(|_, n| n.y = f64::from(n.rank + 1) * rank_sep);
}

pub fn position(
    g: &mut DrawGraph,
    table: &RankTable,
    config: &LayoutConfig,
) -> Result<PositionStats> {
    let stats = assign_x(g, table, config)?;
    assign_y(g, config);
    Ok(stats)
}
