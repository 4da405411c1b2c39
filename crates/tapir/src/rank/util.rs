//! Rank helpers (initial ranking, slack, normalization).

use crate::model::DrawGraph;
use crate::{Error, Result};
use tapir_graph::{EdgeId, alg};

/// `rank(target) - rank(source) - minlen`. Feasible rankings keep this non-negative.
pub fn slack(g: &DrawGraph, e: EdgeId) -> i32 {
    let Some((v, w)) = g.endpoints(e) else {
        return 0;
    };
    g[w].rank - g[v].rank - g[e].minlen
}

pub fn is_tight(g: &DrawGraph, e: EdgeId) -> bool {
    slack(g, e) == 0
}

/// Largest rank a layout may use.
pub const MAX_RANK: i32 = 1 << 20;

/// Longest-path ranking: every vertex sits as high as its in-edges allow, sources at 0.
///
/// Fails with [`Error::TooManyRanks`] once a path needs more than [`MAX_RANK`] ranks.
pub fn init_rank(g: &mut DrawGraph) -> Result<()> {
    let order = alg::topological_order(g)?;
    for v in order {
        let mut rank = 0;
        for &e in g.in_edges(v) {
            let Some((u, _)) = g.endpoints(e) else {
                continue;
            };
            let reach = g[u]
                .rank
                .checked_add(g[e].minlen)
                .filter(|&r| r <= MAX_RANK)
                .ok_or(Error::TooManyRanks {
                    node: v,
                    limit: MAX_RANK,
                })?;
            rank = rank.max(reach);
        }
        g[v].rank = rank;
    }
    Ok(())
}

/// Shifts ranks so that the smallest is 0.
pub fn normalize_ranks(g: &mut DrawGraph) {
    let Some(min) = g.nodes().map(|(_, n)| n.rank).min() else {
        return;
    };
    if min == 0 {
        return;
    }
    g.for_each_node_mut(|_, n| n.rank -= min);
}

/// The ranking objective: sum of `weight * (rank(target) - rank(source))`.
pub fn weighted_length(g: &DrawGraph) -> f64 {
    g.edges()
        .map(|(_, v, w, e)| e.weight * f64::from(g[w].rank - g[v].rank))
        .sum()
}

pub fn max_rank(g: &DrawGraph) -> i32 {
    g.nodes().map(|(_, n)| n.rank).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeInfo, NodeInfo};

    #[test]
    fn init_rank_honours_minlen() {
        let mut g = DrawGraph::new();
        let a = g.add_node(NodeInfo::default());
        let b = g.add_node(NodeInfo::default());
        let c = g.add_node(NodeInfo::default());
        g.add_edge(a, b, EdgeInfo::new(3, 1.0));
        g.add_edge(a, c, EdgeInfo::default());
        g.add_edge(c, b, EdgeInfo::default());
        init_rank(&mut g).unwrap();
        assert_eq!((g[a].rank, g[b].rank, g[c].rank), (0, 3, 1));
    }

    #[test]
    fn normalize_ranks_is_idempotent() {
        let mut g = DrawGraph::new();
        for rank in [-2, 0, 3] {
            let v = g.add_node(NodeInfo::default());
            g[v].rank = rank;
        }
        normalize_ranks(&mut g);
        let once: Vec<i32> = g.nodes().map(|(_, n)| n.rank).collect();
        normalize_ranks(&mut g);
        let twice: Vec<i32> = g.nodes().map(|(_, n)| n.rank).collect();
        assert_eq!(once, vec![0, 2, 5]);
        assert_eq!(once, twice);
    }
}
