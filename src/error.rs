//! Error types for the comment tree.
//!
//! User actions never fail; they report outcomes instead. Errors only come
//! out of construction: bad configuration or a seed that breaks the tree
//! invariants.

use crate::types::NodeId;
use thiserror::Error;

/// Main error type for tree construction.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Broken parent link on {node}: expected {expected:?}, got {got:?}")]
    BrokenLinkage {
        node: NodeId,
        expected: Option<NodeId>,
        got: Option<NodeId>,
    },

    #[error("Node {node} nested at depth {depth} exceeds max depth {max}")]
    DepthExceeded { node: NodeId, depth: usize, max: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for ThreadError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            ThreadError::Deserialization(e.to_string())
        } else {
            ThreadError::Serialization(e.to_string())
        }
    }
}

/// Result type for tree construction.
pub type Result<T> = std::result::Result<T, ThreadError>;
