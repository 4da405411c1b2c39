//! Layered (Sugiyama-style) layout of directed acyclic graphs.
//!
//! The pipeline runs five stages over one draw graph ([`model::DrawGraph`]):
//!
//! 1. initialize draw info from the caller's graph ([`LayoutEngine::initialize`]),
//! 2. assign ranks by network simplex ([`rank`]),
//! 3. replace long edges with chains of virtual vertices ([`normalize`]),
//! 4. order every rank to reduce crossings ([`order`]),
//! 5. assign coordinates, x by a second network simplex over an auxiliary graph ([`position`]).
//!
//! ```
//! use tapir::{LayoutConfig, layout};
//! use tapir_graph::Graph;
//!
//! let mut g: Graph<&str, ()> = Graph::new();
//! let a = g.add_node("a");
//! let b = g.add_node("b");
//! g.add_edge(a, b, ());
//!
//! let out = layout(&g, LayoutConfig::default()).unwrap();
//! assert_eq!(out.node(a).unwrap().rank, 0);
//! assert_eq!(out.node(b).unwrap().rank, 1);
//! ```

pub use tapir_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod walk;

pub use config::{LayoutConfig, Ranker};
pub use error::{Error, InternalError, Result};
pub use layout::{Bounds, EdgeLayout, Layout, LayoutEngine, NodeLayout, Point, layout};
