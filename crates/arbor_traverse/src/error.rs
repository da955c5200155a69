//! Traversal error types.

use arbor_ast::{AstError, NodeType};
use thiserror::Error;

/// Error returned by a visitor handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during traversal.
#[derive(Debug, Error)]
pub enum TraverseError {
    /// A traversal was started below the program root without a scope.
    #[error(
        "You must pass a scope and parentPath unless traversing a Program/File. \
         Instead of that you tried to traverse a {node_type} node without passing scope and parentPath."
    )]
    ParentRequired { node_type: NodeType },

    /// A handler failed; the traversal was abandoned at that point.
    #[error(transparent)]
    Handler(HandlerError),
}

impl TraverseError {
    /// Creates a parent-required error.
    pub fn parent_required(node_type: NodeType) -> Self {
        Self::ParentRequired { node_type }
    }
}

/// Errors raised while loading a [`TraverseConfig`](crate::TraverseConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not valid JSONC or does not match the schema.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// A blacklist entry names no node type.
    #[error(transparent)]
    UnknownType(#[from] AstError),
}

impl ConfigError {
    /// Creates an invalid config error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
