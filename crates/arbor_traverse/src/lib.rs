//! # arbor_traverse
//!
//! Visitor traversal engine for arbor ASTs.
//!
//! This crate provides:
//! - The [`Traverser`] engine: scope-checked traversal, per-key dispatch,
//!   type search, and identity-cache maintenance
//! - [`Visitor`] specifications with typed selectors, normalized once into an
//!   [`ExplodedVisitor`]
//! - Path wrappers that let handlers stop, skip, replace, or remove nodes
//!   while the tree is being walked
//! - Configuration loading
//!
//! ## Example
//!
//! ```rust
//! use arbor_ast::{Ast, NodeType};
//! use arbor_traverse::{Traverser, Visitor};
//! use serde_json::json;
//!
//! let (mut ast, file) = Ast::from_json(&json!({
//!     "type": "File",
//!     "program": {
//!         "type": "Program",
//!         "body": [{
//!             "type": "ExpressionStatement",
//!             "expression": { "type": "Identifier", "name": "answer" }
//!         }]
//!     }
//! }))
//! .unwrap();
//!
//! let visitor = Visitor::<Vec<String>>::new().on_enter(NodeType::Identifier, |path| {
//!     let name = path.node().name().unwrap_or_default().to_string();
//!     path.state_mut().push(name);
//!     Ok(())
//! });
//!
//! let mut names = Vec::new();
//! let mut traverser = Traverser::new();
//! traverser.traverse(&mut ast, file, &visitor, None, &mut names, None).unwrap();
//!
//! assert_eq!(names, vec!["answer".to_string()]);
//! assert!(traverser.has_type(&mut ast, file, None, NodeType::Identifier, &[]));
//! ```

mod cache;
mod config;
mod context;
mod error;
mod path;
mod scope;
mod traverser;
mod visitors;

pub use cache::IdentityCache;
pub use config::TraverseConfig;
pub use context::TraversalContext;
pub use error::{ConfigError, HandlerError, TraverseError};
pub use path::{NodePath, Path, PathRef, SkipKeys};
pub use scope::Scope;
pub use traverser::Traverser;
pub use visitors::{
    ExplodedVisitor, Handler, HandlerResult, IntoSelectors, Phase, Selector, Visitor,
};

/// Outcome of visiting a node: keep going, or stop the traversal.
pub type VisitResult = std::ops::ControlFlow<()>;
