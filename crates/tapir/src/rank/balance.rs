use super::network_simplex::CUT_EPSILON;
use super::util::max_rank;
use crate::model::DrawGraph;
use tapir_graph::NodeId;

/// Moves every vertex whose in-weight equals its out-weight to the least populated rank its
/// edges allow. The weighted edge length is unchanged. Expects normalized ranks; returns how
/// many vertices moved.
pub fn balance(g: &mut DrawGraph) -> usize {
    let max = max_rank(g);
    if max <= 0 {
        return 0;
    }
    let mut population = vec![0usize; max as usize + 1];
    for (_, n) in g.nodes() {
        population[n.rank.clamp(0, max) as usize] += 1;
    }

    let nodes: Vec<NodeId> = g.node_ids().collect();
    let mut moved = 0;
    for v in nodes {
        let mut in_weight = 0.0;
        let mut low = 0;
        for &e in g.in_edges(v) {
            if let Some((u, _)) = g.endpoints(e) {
                in_weight += g[e].weight;
                low = low.max(g[u].rank + g[e].minlen);
            }
        }
        let mut out_weight = 0.0;
        let mut high = max;
        for &e in g.out_edges(v) {
            if let Some((_, w)) = g.endpoints(e) {
                out_weight += g[e].weight;
                high = high.min(g[w].rank - g[e].minlen);
            }
        }
        if (in_weight - out_weight).abs() > CUT_EPSILON || low >= high {
            continue;
        }

        let mut choice = low;
        for r in low + 1..=high {
            if population[r as usize] < population[choice as usize] {
                choice = r;
            }
        }
        let current = g[v].rank;
        if choice != current {
            population[current as usize] -= 1;
            population[choice as usize] += 1;
            g[v].rank = choice;
            moved += 1;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeInfo, NodeInfo};
    use crate::rank::util::weighted_length;

    #[test]
    fn isolated_vertices_spread_to_empty_ranks() {
        // a -> b -> c -> d fills ranks 0..=3 once; x and y start out on rank 0.
        let mut g = DrawGraph::new();
        let path: Vec<NodeId> = (0..4).map(|_| g.add_node(NodeInfo::default())).collect();
        g.set_path(&path, EdgeInfo::default);
        for (i, &v) in path.iter().enumerate() {
            g[v].rank = i as i32;
        }
        let x = g.add_node(NodeInfo::default());
        let y = g.add_node(NodeInfo::default());

        let before = weighted_length(&g);
        balance(&mut g);
        assert_eq!(weighted_length(&g), before);
        assert_ne!(g[x].rank, 0);
        assert_ne!(g[y].rank, 0);
        assert_ne!(g[x].rank, g[y].rank);
    }

    #[test]
    fn unbalanced_vertices_stay_put() {
        let mut g = DrawGraph::new();
        let a = g.add_node(NodeInfo::default());
        let b = g.add_node(NodeInfo::default());
        let c = g.add_node(NodeInfo::default());
        g.add_edge(a, b, EdgeInfo::default());
        g.add_edge(a, c, EdgeInfo::new(2, 1.0));
        g[b].rank = 1;
        g[c].rank = 2;
        assert_eq!(balance(&mut g), 0);
        assert_eq!((g[a].rank, g[b].rank, g[c].rank), (0, 1, 2));
    }
}
