use super::RankTable;
use crate::Result;
use crate::model::DrawGraph;
use std::collections::VecDeque;
use tapir_graph::{NodeId, alg};

/// Breadth-first initial ordering.
///
/// Vertices are visited in topological order; each unvisited one starts a BFS that follows
/// out-edges, then in-edges, appending vertices to their rank as they leave the queue. Trees come
/// out crossing-free.
pub fn init_order(g: &mut DrawGraph, rank_count: usize) -> Result<RankTable> {
    let mut table = RankTable::new(rank_count);
    let mut seen = vec![false; g.node_bound()];
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    for start in alg::topological_order(g)? {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            table.push(g, v);
            let next: Vec<NodeId> = g.successors(v).chain(g.predecessors(v)).collect();
            for w in next {
                if !seen[w.index()] {
                    seen[w.index()] = true;
                    queue.push_back(w);
                }
            }
        }
    }
    Ok(table)
}
