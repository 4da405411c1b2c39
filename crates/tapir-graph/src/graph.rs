//! Arena graph container.
//!
//! This module contains the core `Graph` container plus a small set of helper algorithms
//! re-exported as `tapir_graph::alg`.

use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

mod ids;

pub mod alg;

pub use alg::CycleError;
pub use ids::{EdgeId, NodeId};

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    label: N,
    out: Vec<EdgeId>,
    in_: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    v: NodeId,
    w: NodeId,
    label: E,
}

/// Directed multigraph with stable handles.
///
/// Nodes are never removed. Removed edges leave a tombstone behind so that every handle handed
/// out stays unambiguous for the lifetime of the graph. All iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<NodeEntry<N>>,
    edges: Vec<Option<EdgeEntry<E>>>,
    live_edges: usize,
    // Parallel edges share a key; the vector keeps them in insertion order.
    edge_index: HashMap<(NodeId, NodeId), Vec<EdgeId>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            live_edges: 0,
            edge_index: HashMap::default(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            live_edges: 0,
            edge_index: HashMap::with_capacity_and_hasher(edges, FxBuildHasher),
        }
    }

    pub fn add_node(&mut self, label: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeEntry {
            label,
            out: Vec::new(),
            in_: Vec::new(),
        });
        id
    }

    /// Adds an edge `v -> w`.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a node of this graph.
    pub fn add_edge(&mut self, v: NodeId, w: NodeId, label: E) -> EdgeId {
        assert!(self.contains_node(v), "edge source {v} is not in the graph");
        assert!(self.contains_node(w), "edge target {w} is not in the graph");

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(EdgeEntry { v, w, label }));
        self.live_edges += 1;
        self.nodes[v.index()].out.push(id);
        self.nodes[w.index()].in_.push(id);
        self.edge_index.entry((v, w)).or_default().push(id);
        id
    }

    /// Connects consecutive nodes of `path`, building each edge label with `label`.
    pub fn set_path<F>(&mut self, path: &[NodeId], mut label: F) -> Vec<EdgeId>
    where
        F: FnMut() -> E,
    {
        path.windows(2)
            .map(|pair| self.add_edge(pair[0], pair[1], label()))
            .collect()
    }

    pub fn remove_edge(&mut self, e: EdgeId) -> Option<E> {
        let entry = self.edges.get_mut(e.index())?.take()?;
        self.live_edges -= 1;
        self.nodes[entry.v.index()].out.retain(|&x| x != e);
        self.nodes[entry.w.index()].in_.retain(|&x| x != e);
        if let Some(ids) = self.edge_index.get_mut(&(entry.v, entry.w)) {
            ids.retain(|&x| x != e);
            if ids.is_empty() {
                self.edge_index.remove(&(entry.v, entry.w));
            }
        }
        Some(entry.label)
    }

    pub fn contains_node(&self, v: NodeId) -> bool {
        v.index() < self.nodes.len()
    }

    pub fn contains_edge(&self, e: EdgeId) -> bool {
        matches!(self.edges.get(e.index()), Some(Some(_)))
    }

    pub fn node(&self, v: NodeId) -> Option<&N> {
        self.nodes.get(v.index()).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, v: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(v.index()).map(|n| &mut n.label)
    }

    pub fn edge(&self, e: EdgeId) -> Option<&E> {
        self.edges
            .get(e.index())
            .and_then(Option::as_ref)
            .map(|entry| &entry.label)
    }

    pub fn edge_mut(&mut self, e: EdgeId) -> Option<&mut E> {
        self.edges
            .get_mut(e.index())
            .and_then(Option::as_mut)
            .map(|entry| &mut entry.label)
    }

    /// Returns `(source, target)` of a live edge.
    pub fn endpoints(&self, e: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges
            .get(e.index())
            .and_then(Option::as_ref)
            .map(|entry| (entry.v, entry.w))
    }

    /// Returns the endpoint of `e` that is not `v`.
    pub fn opposite(&self, e: EdgeId, v: NodeId) -> Option<NodeId> {
        let (a, b) = self.endpoints(e)?;
        if a == v {
            Some(b)
        } else if b == v {
            Some(a)
        } else {
            None
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Upper bound (exclusive) on node indices; sizes per-node side tables.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Upper bound (exclusive) on edge indices, tombstones included.
    pub fn edge_bound(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(ix, _)| EdgeId::new(ix))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(ix, n)| (NodeId::new(ix), &n.label))
    }

    /// Live edges as `(id, source, target, label)`.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId, &E)> + '_ {
        self.edges.iter().enumerate().filter_map(|(ix, entry)| {
            entry
                .as_ref()
                .map(|entry| (EdgeId::new(ix), entry.v, entry.w, &entry.label))
        })
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(NodeId, &mut N),
    {
        for (ix, n) in self.nodes.iter_mut().enumerate() {
            f(NodeId::new(ix), &mut n.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(EdgeId, &mut E),
    {
        for (ix, entry) in self.edges.iter_mut().enumerate() {
            if let Some(entry) = entry {
                f(EdgeId::new(ix), &mut entry.label);
            }
        }
    }

    pub fn out_edges(&self, v: NodeId) -> &[EdgeId] {
        self.nodes
            .get(v.index())
            .map(|n| n.out.as_slice())
            .unwrap_or(&[])
    }

    pub fn in_edges(&self, v: NodeId) -> &[EdgeId] {
        self.nodes
            .get(v.index())
            .map(|n| n.in_.as_slice())
            .unwrap_or(&[])
    }

    /// Out-edges followed by in-edges of `v`.
    pub fn node_edges(&self, v: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(v)
            .iter()
            .chain(self.in_edges(v).iter())
            .copied()
    }

    pub fn out_degree(&self, v: NodeId) -> usize {
        self.out_edges(v).len()
    }

    pub fn in_degree(&self, v: NodeId) -> usize {
        self.in_edges(v).len()
    }

    pub fn successors(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(_, w)| w))
    }

    pub fn predecessors(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(u, _)| u))
    }

    /// All edges `v -> w`, in insertion order.
    pub fn edges_between(&self, v: NodeId, w: NodeId) -> &[EdgeId] {
        self.edge_index
            .get(&(v, w))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_edge(&self, v: NodeId, w: NodeId) -> Option<EdgeId> {
        self.edges_between(v, w).first().copied()
    }

    pub fn has_edge(&self, v: NodeId, w: NodeId) -> bool {
        !self.edges_between(v, w).is_empty()
    }

    /// Nodes without in-edges, in insertion order.
    pub fn sources(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.in_edges(v).is_empty())
            .collect()
    }

    /// Nodes without out-edges, in insertion order.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.out_edges(v).is_empty())
            .collect()
    }

    /// Builds a graph with the same shape and handles but transformed labels.
    pub fn map<N2, E2, FN, FE>(&self, mut f_node: FN, mut f_edge: FE) -> Graph<N2, E2>
    where
        FN: FnMut(NodeId, &N) -> N2,
        FE: FnMut(EdgeId, &E) -> E2,
    {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(ix, n)| NodeEntry {
                label: f_node(NodeId::new(ix), &n.label),
                out: n.out.clone(),
                in_: n.in_.clone(),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(ix, entry)| {
                entry.as_ref().map(|entry| EdgeEntry {
                    v: entry.v,
                    w: entry.w,
                    label: f_edge(EdgeId::new(ix), &entry.label),
                })
            })
            .collect();
        Graph {
            nodes,
            edges,
            live_edges: self.live_edges,
            edge_index: self.edge_index.clone(),
        }
    }
}

impl<N, E> std::ops::Index<NodeId> for Graph<N, E> {
    type Output = N;

    fn index(&self, v: NodeId) -> &N {
        &self.nodes[v.index()].label
    }
}

impl<N, E> std::ops::IndexMut<NodeId> for Graph<N, E> {
    fn index_mut(&mut self, v: NodeId) -> &mut N {
        &mut self.nodes[v.index()].label
    }
}

impl<N, E> std::ops::Index<EdgeId> for Graph<N, E> {
    type Output = E;

    fn index(&self, e: EdgeId) -> &E {
        match self.edges.get(e.index()) {
            Some(Some(entry)) => &entry.label,
            _ => panic!("edge {e} is not in the graph"),
        }
    }
}

impl<N, E> std::ops::IndexMut<EdgeId> for Graph<N, E> {
    fn index_mut(&mut self, e: EdgeId) -> &mut E {
        match self.edges.get_mut(e.index()) {
            Some(Some(entry)) => &mut entry.label,
            _ => panic!("edge {e} is not in the graph"),
        }
    }
}
