use super::RankTable;
use crate::model::DrawGraph;
use tapir_graph::NodeId;

/// Total number of edge crossings between all adjacent rank pairs.
pub fn cross_count(g: &DrawGraph, table: &RankTable) -> u64 {
    (1..table.len())
        .map(|r| two_layer_cross_count(g, table.rank(r - 1), table.rank(r)))
        .sum()
}

/// Crossings between the edges running from `north` down to `south`.
///
/// Edge endpoints are listed by north position, then south position; the answer is the number
/// of inversions among the south positions, counted with an accumulator tree.
pub fn two_layer_cross_count(g: &DrawGraph, north: &[NodeId], south: &[NodeId]) -> u64 {
    let Some(&first) = south.first() else {
        return 0;
    };
    let south_rank = g[first].rank;

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = g
            .successors(v)
            .filter(|&w| g[w].rank == south_rank)
            .map(|w| g[w].order)
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<u64> = vec![0; tree_size];

    let mut cc: u64 = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum: u64 = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
