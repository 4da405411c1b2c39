//! Layout entry point: initializer, pipeline and output.

use crate::config::LayoutConfig;
use crate::model::{DrawGraph, EdgeInfo, NodeInfo};
use crate::normalize::Chain;
use crate::rank::util::MAX_RANK;
use crate::{Error, Result, normalize, order, position, rank};
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use tapir_graph::{EdgeId, Graph, NodeId};
use tracing::{debug, debug_span};

type SizeFn<'g, N> = Box<dyn Fn(&N) -> f64 + 'g>;

/// Lays out a caller graph. Node and edge labels are opaque here; sizes come from the
/// configured size functions, ranking attributes from [`LayoutEngine::set_minlen`] and
/// [`LayoutEngine::set_weight`].
pub struct LayoutEngine<'g, N, E> {
    graph: &'g Graph<N, E>,
    config: LayoutConfig,
    node_width: Option<SizeFn<'g, N>>,
    node_height: Option<SizeFn<'g, N>>,
    minlen: HashMap<EdgeId, i32>,
    weight: HashMap<EdgeId, f64>,
}

impl<'g, N, E> LayoutEngine<'g, N, E> {
    pub fn new(graph: &'g Graph<N, E>, config: LayoutConfig) -> Self {
        Self {
            graph,
            config,
            node_width: None,
            node_height: None,
            minlen: HashMap::default(),
            weight: HashMap::default(),
        }
    }

    pub fn with_node_width<F>(mut self, f: F) -> Self
    where
        F: Fn(&N) -> f64 + 'g,
    {
        self.node_width = Some(Box::new(f));
        self
    }

    pub fn with_node_height<F>(mut self, f: F) -> Self
    where
        F: Fn(&N) -> f64 + 'g,
    {
        self.node_height = Some(Box::new(f));
        self
    }

    /// Minimum rank distance across `edge` (default 1, at most [`MAX_RANK`]).
    pub fn set_minlen(&mut self, edge: EdgeId, minlen: i32) -> Result<()> {
        if !self.graph.contains_edge(edge) {
            return Err(Error::MissingEdge { edge });
        }
        if !(1..=MAX_RANK).contains(&minlen) {
            return Err(Error::InvalidMinlen { edge, minlen });
        }
        self.minlen.insert(edge, minlen);
        Ok(())
    }

    /// Importance of keeping `edge` short and straight (default 1).
    pub fn set_weight(&mut self, edge: EdgeId, weight: f64) -> Result<()> {
        if !self.graph.contains_edge(edge) {
            return Err(Error::MissingEdge { edge });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { edge, weight });
        }
        self.weight.insert(edge, weight);
        Ok(())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Builds the draw graph: one record per caller vertex and edge, caller-set attributes
    /// first, defaults for the rest.
    pub fn initialize(&self) -> Result<DrawGraph> {
        if self.graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        self.config.validate()?;

        let default_width = self.config.default_width;
        let default_height = self.config.default_height;
        let g = self.graph.map(
            |_, label| {
                let width = self.node_width.as_ref().map_or(default_width, |f| f(label));
                let height = self.node_height.as_ref().map_or(default_height, |f| f(label));
                NodeInfo::sized(width, height)
            },
            |e, _| {
                let minlen = self.minlen.get(&e).copied().unwrap_or(1);
                let weight = self.weight.get(&e).copied().unwrap_or(1.0);
                EdgeInfo::new(minlen, weight)
            },
        );

        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if let Some((node, _)) = g.nodes().find(|(_, n)| !valid(n.width) || !valid(n.height)) {
            return Err(Error::InvalidSize { node });
        }
        Ok(g)
    }

    /// Runs the whole pipeline: initialize, rank, expand long edges, order, position.
    pub fn layout_graph(&self) -> Result<Layout> {
        let _span = debug_span!(
            "layout",
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count()
        )
        .entered();

        let mut g = self.initialize()?;
        let rank_stats = rank::assign_ranks(&mut g, &self.config)?;
        let chains = normalize::expand(&mut g)?;
        let (table, order_stats) = order::order(&mut g, &self.config)?;
        position::position(&mut g, &table, &self.config)?;

        let layout = Layout::build(
            self.graph,
            &g,
            &chains,
            Stats {
                rank_count: table.len(),
                crossings: order_stats.crossings,
                simplex_iterations: rank_stats.iterations,
            },
        );
        debug!(
            ranks = layout.rank_count,
            crossings = layout.crossings,
            virtual_nodes = layout.virtual_nodes().len(),
            "layout finished"
        );
        Ok(layout)
    }
}

/// Lays out `graph` with default node sizes and edge attributes.
pub fn layout<N, E>(graph: &Graph<N, E>, config: LayoutConfig) -> Result<Layout> {
    LayoutEngine::new(graph, config).layout_graph()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Final placement of one vertex. `x`/`y` are the centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: NodeId,
    pub rank: usize,
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Bend point of a long edge rather than a caller vertex.
    pub virt: bool,
}

/// Polyline of one caller edge: source centre, every virtual vertex of its chain, target
/// centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy)]
struct Stats {
    rank_count: usize,
    crossings: u64,
    simplex_iterations: usize,
}

/// Result of [`LayoutEngine::layout_graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Caller vertices in handle order, then virtual vertices.
    nodes: Vec<NodeLayout>,
    real: usize,
    edges: Vec<EdgeLayout>,
    rank_count: usize,
    crossings: u64,
    simplex_iterations: usize,
    bounds: Bounds,
}

impl Layout {
    fn build<N, E>(caller: &Graph<N, E>, g: &DrawGraph, chains: &[Chain], stats: Stats) -> Self {
        let nodes: Vec<NodeLayout> = g
            .nodes()
            .map(|(id, n)| NodeLayout {
                id,
                rank: n.rank.max(0) as usize,
                order: n.order,
                x: n.x,
                y: n.y,
                width: n.width,
                height: n.height,
                virt: n.virt,
            })
            .collect();

        let mut chain_of: Vec<Option<&Chain>> = vec![None; caller.edge_bound()];
        for chain in chains {
            chain_of[chain.edge.index()] = Some(chain);
        }
        let centre = |v: NodeId| Point {
            x: g[v].x,
            y: g[v].y,
        };
        let edges: Vec<EdgeLayout> = caller
            .edges()
            .map(|(id, source, target, _)| {
                let mut points = vec![centre(source)];
                if let Some(chain) = chain_of[id.index()] {
                    points.extend(chain.nodes.iter().map(|&v| centre(v)));
                }
                points.push(centre(target));
                EdgeLayout {
                    id,
                    source,
                    target,
                    points,
                }
            })
            .collect();

        let mut bounds: Option<Bounds> = None;
        for n in &nodes {
            let (hw, hh) = (n.width / 2.0, n.height / 2.0);
            let b = bounds.get_or_insert(Bounds {
                min_x: n.x - hw,
                min_y: n.y - hh,
                max_x: n.x + hw,
                max_y: n.y + hh,
            });
            b.min_x = b.min_x.min(n.x - hw);
            b.min_y = b.min_y.min(n.y - hh);
            b.max_x = b.max_x.max(n.x + hw);
            b.max_y = b.max_y.max(n.y + hh);
        }

        Self {
            nodes,
            real: caller.node_count(),
            edges,
            rank_count: stats.rank_count,
            crossings: stats.crossings,
            simplex_iterations: stats.simplex_iterations,
            bounds: bounds.unwrap_or_default(),
        }
    }

    /// Caller vertices, in handle order.
    pub fn nodes(&self) -> &[NodeLayout] {
        &self.nodes[..self.real]
    }

    pub fn virtual_nodes(&self) -> &[NodeLayout] {
        &self.nodes[self.real..]
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeLayout> {
        self.nodes()
            .get(id.index())
            .ok_or(Error::MissingNode { node: id })
    }

    pub fn edges(&self) -> &[EdgeLayout] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Result<&EdgeLayout> {
        self.edges
            .iter()
            .find(|e| e.id == id)
            .ok_or(Error::MissingEdge { edge: id })
    }

    pub fn rank_count(&self) -> usize {
        self.rank_count
    }

    /// Edge crossings of the final order, counted on the expanded graph.
    pub fn crossings(&self) -> u64 {
        self.crossings
    }

    /// Extents of all vertex boxes, virtual vertices included.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Edge exchanges the ranking simplex needed.
    pub fn simplex_iterations(&self) -> usize {
        self.simplex_iterations
    }
}
