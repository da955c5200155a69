//! # arbor_ast
//!
//! JavaScript AST model for the arbor traversal engine.
//!
//! ## Architecture
//!
//! - Nodes live in an [`Ast`] arena and are addressed by [`NodeId`] handles,
//!   which double as node identity
//! - Each node has a [`NodeType`] tag, named child slots, and free-form
//!   JSON properties
//! - [`VisitorKeys`] declares, per type, which slots are children and in what
//!   order they are visited
//! - [`traverse_fast`] is the context-free pre-order walk over that table
//!
//! ## Example
//!
//! ```rust
//! use arbor_ast::{Ast, Node, NodeType};
//!
//! let mut ast = Ast::new();
//! let program = ast.alloc(Node::new(NodeType::Program).with_list("body", vec![]));
//! let file = ast.alloc(Node::new(NodeType::File).with_child("program", program));
//!
//! assert!(ast[file].node_type.is_program_root());
//! ```

mod arena;
mod error;
mod json;
mod keys;
mod node;
mod node_type;
mod span;
mod walk;

pub use arena::{ArenaId, Ast};
pub use error::AstError;
pub use keys::{VisitorKeys, standard_keys};
pub use node::{CLEAR_KEYS, COMMENT_KEYS, Child, Node, NodeId, RemovePropertiesOptions};
pub use node_type::{Alias, NodeType};
pub use span::Span;
pub use walk::traverse_fast;
