//! Draw info: the per-vertex and per-edge attribute store shared by every pipeline stage.
//!
//! The store is a [`Graph`] whose labels are [`NodeInfo`] / [`EdgeInfo`]. Handles of the
//! caller's graph are reused as-is; virtual vertices and auxiliary vertices get fresh handles
//! appended after them.

use tapir_graph::{EdgeId, Graph};

pub type DrawGraph = Graph<NodeInfo, EdgeInfo>;

/// Median value of a vertex that has no neighbours in the fixed rank.
pub const NO_MEDIAN: f64 = -1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub rank: i32,
    /// Position within the rank, `0..len`.
    pub order: usize,
    pub median: f64,
    pub low: u32,
    pub lim: u32,
    /// Tree edge towards this vertex's parent in the current spanning tree.
    pub tree_parent: Option<EdgeId>,
    /// Inserted by long-edge expansion.
    pub virt: bool,
    /// Exists only inside the coordinate-assignment graph.
    pub aux: bool,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    /// For virtual vertices: the caller edge the chain replaces.
    pub origin: Option<EdgeId>,
}

impl Default for NodeInfo {
    fn default() -> Self {
        Self {
            rank: 0,
            order: 0,
            median: NO_MEDIAN,
            low: 0,
            lim: 0,
            tree_parent: None,
            virt: false,
            aux: false,
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
            origin: None,
        }
    }
}

impl NodeInfo {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInfo {
    pub minlen: i32,
    pub weight: f64,
    /// Only meaningful while `tree` is set.
    pub cut_value: f64,
    pub tree: bool,
    /// For chain pieces: the caller edge the chain replaces.
    pub origin: Option<EdgeId>,
}

impl Default for EdgeInfo {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            cut_value: 0.0,
            tree: false,
            origin: None,
        }
    }
}

impl EdgeInfo {
    pub fn new(minlen: i32, weight: f64) -> Self {
        Self {
            minlen,
            weight,
            ..Default::default()
        }
    }
}
