//! AST error types.

use thiserror::Error;

/// Errors raised while building or loading a tree.
#[derive(Debug, Error)]
pub enum AstError {
    /// A `type` tag (or alias name) that is not known.
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// A JSON value that cannot be read as a node.
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Malformed JSON text.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AstError {
    /// Creates an unknown node type error.
    pub fn unknown_node_type(name: impl Into<String>) -> Self {
        Self::UnknownNodeType(name.into())
    }

    /// Creates an invalid node error.
    pub fn invalid_node(message: impl Into<String>) -> Self {
        Self::InvalidNode(message.into())
    }
}
