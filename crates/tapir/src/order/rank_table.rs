use crate::model::DrawGraph;
use tapir_graph::NodeId;

/// Per-rank vertex lists, left to right.
///
/// `NodeInfo::order` of every listed vertex equals its index in its rank list; every mutating
/// method keeps the two in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankTable {
    ranks: Vec<Vec<NodeId>>,
}

impl RankTable {
    pub fn new(rank_count: usize) -> Self {
        Self {
            ranks: vec![Vec::new(); rank_count],
        }
    }

    /// Rebuilds the table from the `rank` and `order` fields already stored in `g`.
    pub fn from_graph(g: &DrawGraph) -> Self {
        let rank_count = g
            .nodes()
            .map(|(_, n)| n.rank.max(0) as usize + 1)
            .max()
            .unwrap_or(0);
        let mut ranks: Vec<Vec<NodeId>> = vec![Vec::new(); rank_count];
        for (v, n) in g.nodes() {
            ranks[n.rank.max(0) as usize].push(v);
        }
        for rank in &mut ranks {
            rank.sort_by_key(|&v| g[v].order);
        }
        Self { ranks }
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn rank(&self, r: usize) -> &[NodeId] {
        self.ranks.get(r).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ranks(&self) -> &[Vec<NodeId>] {
        &self.ranks
    }

    /// Appends `v` to the right end of its rank.
    pub fn push(&mut self, g: &mut DrawGraph, v: NodeId) {
        let r = g[v].rank.max(0) as usize;
        if r >= self.ranks.len() {
            self.ranks.resize(r + 1, Vec::new());
        }
        g[v].order = self.ranks[r].len();
        self.ranks[r].push(v);
    }

    /// Swaps the vertices at positions `i` and `i + 1` of rank `r`.
    pub fn swap(&mut self, g: &mut DrawGraph, r: usize, i: usize) {
        let rank = &mut self.ranks[r];
        rank.swap(i, i + 1);
        g[rank[i]].order = i;
        g[rank[i + 1]].order = i + 1;
    }

    /// Replaces rank `r` with `vertices`, a permutation of its current content.
    pub fn set_rank(&mut self, g: &mut DrawGraph, r: usize, vertices: Vec<NodeId>) {
        for (i, &v) in vertices.iter().enumerate() {
            g[v].order = i;
        }
        self.ranks[r] = vertices;
    }

    pub fn snapshot(&self) -> Vec<Vec<NodeId>> {
        self.ranks.clone()
    }

    pub fn restore(&mut self, g: &mut DrawGraph, snapshot: Vec<Vec<NodeId>>) {
        for rank in &snapshot {
            for (i, &v) in rank.iter().enumerate() {
                g[v].order = i;
            }
        }
        self.ranks = snapshot;
    }

    /// Whether every vertex of `g` is listed exactly once, in the rank it belongs to, at the
    /// index its `order` says.
    pub fn is_consistent(&self, g: &DrawGraph) -> bool {
        let mut seen = vec![false; g.node_bound()];
        for (r, rank) in self.ranks.iter().enumerate() {
            for (i, &v) in rank.iter().enumerate() {
                if !g.contains_node(v) || seen[v.index()] {
                    return false;
                }
                seen[v.index()] = true;
                if g[v].rank != r as i32 || g[v].order != i {
                    return false;
                }
            }
        }
        seen.iter().all(|&s| s)
    }
}
