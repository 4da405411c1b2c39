use crate::rank::util::MAX_RANK;
use tapir_graph::{CycleError, EdgeId, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

/// Why a layout could not be produced.
///
/// Everything except [`Error::Internal`] is a problem with the input; `Internal` means the
/// engine broke one of its own invariants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    #[error("graph contains a cycle through node {node}")]
    Cycle { node: NodeId },

    #[error("node {node} is not part of the graph")]
    MissingNode { node: NodeId },

    #[error("edge {edge} is not part of the graph")]
    MissingEdge { edge: EdgeId },

    #[error(
        "edge {edge} has minlen {minlen}; layered layout needs 1 <= minlen <= {max}",
        max = MAX_RANK
    )]
    InvalidMinlen { edge: EdgeId, minlen: i32 },

    #[error("edge {edge} has weight {weight}; weights must be finite and non-negative")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    #[error("node {node} has an invalid size; width and height must be finite and non-negative")]
    InvalidSize { node: NodeId },

    #[error("node {node} would be ranked below rank {limit}")]
    TooManyRanks { node: NodeId, limit: i32 },

    #[error("long edges need {count} virtual nodes; at most {limit} are allowed")]
    TooManyVirtualNodes { count: u64, limit: u64 },

    #[error("ranks need {extent} units of horizontal separation; at most {limit} fit")]
    TooWide { extent: f64, limit: f64 },

    #[error("invalid layout configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<CycleError> for Error {
    fn from(err: CycleError) -> Self {
        Self::Cycle { node: err.node }
    }
}

/// Broken engine invariants. Seeing one of these is a bug in `tapir`, not in the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InternalError {
    #[error("internal: no common tree ancestor above node {node}")]
    NoCommonAncestor { node: NodeId },

    #[error("internal: tree update met at {first} and {second}")]
    MismatchedAncestor { first: NodeId, second: NodeId },

    #[error("internal: no entering edge for leaving tree edge {edge}")]
    NoEnteringEdge { edge: EdgeId },

    #[error("internal: tree spans {reached} of {expected} nodes")]
    TreeNotSpanning { reached: usize, expected: usize },

    #[error("internal: tree edge {edge} left without a resolved cut value")]
    DanglingTreeEdge { edge: EdgeId },

    #[error("internal: edge {edge} spans {span} ranks after ranking")]
    UnexpandableEdge { edge: EdgeId, span: i32 },
}
