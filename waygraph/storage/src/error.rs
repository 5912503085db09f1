use miette::Diagnostic;
use thiserror::Error;
use waygraph_common::error::{EncodingError, NotImplemented};
use waygraph_common::types::{EdgeId, NodeId};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug, Diagnostic)]
pub enum StorageError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    NotImplemented(#[from] NotImplemented),

    #[error("no current edge: call advance() and check its result before reading the edge")]
    NoCurrentEdge,

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("node {node} is not adjacent to edge {edge}")]
    NodeNotAdjacent { edge: EdgeId, node: NodeId },

    #[error("invalid distance {0} for edge, expected a finite non-negative value")]
    InvalidDistance(f64),

    #[error("flags of edge {edge} hold {expected} ints, got {actual}")]
    FlagsLength {
        edge: EdgeId,
        expected: usize,
        actual: usize,
    },

    #[error("invalid geometry for edge {edge}: {reason}")]
    InvalidGeometry { edge: EdgeId, reason: String },

    #[error("encoding error")]
    Encoding(#[from] EncodingError),
}
