//! Arena owning every node of a tree.
//!
//! Nodes are appended to a single vector and addressed by [`NodeId`]. Nothing
//! is freed individually: a node detached from the tree stays allocated (and
//! addressable) until the arena is dropped or reset, which keeps ids stable
//! while visitors rewrite the tree.
//!
//! A [`NodeId`] is only meaningful inside the arena that issued it. Each arena
//! carries a process-unique [`ArenaId`] so that caches keyed by node ids can
//! tell two trees apart.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::{Node, NodeId, NodeType, RemovePropertiesOptions};

/// Arena of AST nodes.
///
/// # Example
///
/// ```rust
/// use arbor_ast::{Ast, Node, NodeType};
///
/// let mut ast = Ast::new();
/// let a = ast.alloc(Node::new(NodeType::Identifier));
/// let b = ast.alloc(Node::new(NodeType::Identifier));
///
/// // Equal contents, distinct identities.
/// assert_eq!(ast[a], ast[b]);
/// assert_ne!(a, b);
/// ```
#[derive(Debug)]
pub struct Ast {
    id: ArenaId,
    nodes: Vec<Node>,
}

/// Process-unique identity of an [`Ast`].
///
/// Fresh for every new, cloned, or reset arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena{}", self.0)
    }
}

impl Ast {
    #[inline]
    pub fn new() -> Self {
        Self {
            id: ArenaId::next(),
            nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: ArenaId::next(),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Identity of this arena.
    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Moves a node into the arena and returns its handle.
    #[inline]
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self[id].node_type
    }

    /// Number of nodes ever allocated, attached or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every allocated node id.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Strips transient properties from a single node.
    #[inline]
    pub fn remove_properties(&mut self, id: NodeId, opts: RemovePropertiesOptions) {
        self[id].remove_properties(opts);
    }

    /// Drops every node.
    ///
    /// All previously issued ids become dangling, so the arena takes a new
    /// [`ArenaId`].
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.id = ArenaId::next();
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Ast {
    /// Copies the nodes into a new arena with its own [`ArenaId`].
    fn clone(&self) -> Self {
        Self {
            id: ArenaId::next(),
            nodes: self.nodes.clone(),
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Ast {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_assigns_sequential_ids() {
        let mut ast = Ast::new();
        let first = ast.alloc(Node::new(NodeType::Identifier));
        let second = ast.alloc(Node::new(NodeType::ThisExpression));

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(ast.node_type(second), NodeType::ThisExpression);
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let ast = Ast::with_capacity(4);
        assert!(ast.get(NodeId::new(0)).is_none());
        assert!(ast.is_empty());
    }

    #[test]
    fn test_index_mut_edits_in_place() {
        let mut ast = Ast::new();
        let id = ast.alloc(Node::new(NodeType::Identifier).with_prop("name", "a"));
        ast[id].set_prop("name", "b");
        assert_eq!(ast[id].name(), Some("b"));
    }

    #[test]
    fn test_reset() {
        let mut ast = Ast::new();
        let before = ast.id();
        ast.alloc(Node::new(NodeType::Identifier));
        ast.reset();
        assert!(ast.is_empty());
        assert_eq!(ast.ids().count(), 0);
        assert_ne!(ast.id(), before);
    }

    #[test]
    fn test_arenas_have_distinct_ids() {
        let mut first = Ast::new();
        first.alloc(Node::new(NodeType::Identifier));
        let second = Ast::default();
        let copy = first.clone();

        assert_ne!(first.id(), second.id());
        assert_ne!(first.id(), copy.id());
        assert_eq!(copy.len(), 1);
    }
}
