//! Rank assignment (network simplex, tight tree, longest path).
//!
//! Every ranker starts from the longest-path ranking; network simplex then tightens it into a
//! spanning tree and optimizes the weighted edge length. Ranks are normalized to start at 0.

pub mod balance;
pub mod feasible_tree;
pub mod network_simplex;
pub mod util;

use crate::{Error, Result};
use crate::config::{LayoutConfig, Ranker};
use crate::model::DrawGraph;
use tracing::{debug, debug_span};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankStats {
    /// Edge exchanges made by network simplex.
    pub iterations: usize,
    /// Number of ranks in use, `max_rank + 1`.
    pub rank_count: usize,
    pub balanced: usize,
}

/// Assigns `NodeInfo::rank` to every vertex of `g` with the configured ranker.
///
/// Fails with [`crate::Error::Cycle`] on cyclic input.
pub fn assign_ranks(g: &mut DrawGraph, config: &LayoutConfig) -> Result<RankStats> {
    let _span = debug_span!("rank", ranker = ?config.ranker).entered();
    let mut stats = RankStats::default();

    util::init_rank(g)?;
    match config.ranker {
        Ranker::LongestPath => {}
        Ranker::TightTree => {
            feasible_tree::feasible_tree(g);
        }
        Ranker::NetworkSimplex => {
            let roots = feasible_tree::feasible_tree(g);
            stats.iterations = network_simplex::solve(
                g,
                &roots,
                config.search_size,
                config.max_simplex_iterations,
            )?;
        }
    }
    util::normalize_ranks(g);
    if let Some((node, _)) = g.nodes().find(|(_, n)| n.rank > util::MAX_RANK) {
        return Err(Error::TooManyRanks {
            node,
            limit: util::MAX_RANK,
        });
    }
    if config.ranker == Ranker::NetworkSimplex && config.balance {
        stats.balanced = balance::balance(g);
    }

    stats.rank_count = if g.is_empty() {
        0
    } else {
        util::max_rank(g) as usize + 1
    };
    debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        iterations = stats.iterations,
        ranks = stats.rank_count,
        balanced = stats.balanced,
        "ranks assigned"
    );
    Ok(stats)
}
