//! Graph container APIs used by `tapir`.
//!
//! Vertices and edges live in an arena and are addressed by copyable handles ([`NodeId`],
//! [`EdgeId`]). Callers map their own domain values to handles once and keep labels of any type
//! next to them, so nothing here requires hashable or comparable domain types.

mod graph;

pub use graph::{CycleError, EdgeId, Graph, NodeId, alg};
