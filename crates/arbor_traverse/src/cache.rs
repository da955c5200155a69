//! Node identity cache.
//!
//! Two maps keyed by [`NodeId`]: node → path wrapper and node → scope. Paths
//! are created lazily the first time a traversal wraps a node and are reused
//! on every later visit, so handlers observe one stable wrapper per node.
//!
//! Entries are never dropped implicitly. Detaching a node through the path
//! API evicts its subtree; otherwise callers clear entries with
//! [`Traverser::clear_node`](crate::Traverser::clear_node),
//! [`Traverser::remove_properties`](crate::Traverser::remove_properties) or
//! [`Traverser::clear_cache`](crate::Traverser::clear_cache).

use std::collections::HashMap;
use std::rc::Rc;

use arbor_ast::NodeId;
use tracing::trace;

use crate::{NodePath, PathRef, Scope};

/// Identity-keyed store of path wrappers and scopes.
#[derive(Debug, Default)]
pub struct IdentityCache {
    paths: HashMap<NodeId, PathRef>,
    scopes: HashMap<NodeId, Rc<Scope>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the wrapper cached for `node`.
    #[inline]
    pub fn path(&self, node: NodeId) -> Option<&PathRef> {
        self.paths.get(&node)
    }

    /// Returns the cached wrapper for `node`, creating it on first use.
    pub fn get_or_create_path(&mut self, node: NodeId) -> PathRef {
        Rc::clone(
            self.paths
                .entry(node)
                .or_insert_with(|| Rc::new(NodePath::new(node))),
        )
    }

    /// Drops the wrapper entry of `node`, returning it.
    pub fn remove_path(&mut self, node: NodeId) -> Option<PathRef> {
        let removed = self.paths.remove(&node);
        if removed.is_some() {
            trace!(%node, "evicted path");
        }
        removed
    }

    /// Points `destination` at the wrapper cached for `source`.
    ///
    /// Returns false (and changes nothing) if `source` has no entry.
    pub fn copy_path(&mut self, source: NodeId, destination: NodeId) -> bool {
        let Some(path) = self.paths.get(&source).cloned() else {
            return false;
        };
        trace!(%source, %destination, "copied path");
        self.paths.insert(destination, path);
        true
    }

    /// Looks up the scope cached for a scope-opening node.
    #[inline]
    pub fn scope(&self, block: NodeId) -> Option<&Rc<Scope>> {
        self.scopes.get(&block)
    }

    /// Returns the scope opened by `block`, creating it under `parent` on first use.
    pub fn get_or_create_scope(&mut self, block: NodeId, parent: Option<Rc<Scope>>) -> Rc<Scope> {
        Rc::clone(
            self.scopes
                .entry(block)
                .or_insert_with(|| Rc::new(Scope::new(block, parent))),
        )
    }

    /// Drops the scope opened by `block`, returning it.
    pub fn remove_scope(&mut self, block: NodeId) -> Option<Rc<Scope>> {
        let removed = self.scopes.remove(&block);
        if removed.is_some() {
            trace!(%block, "evicted scope");
        }
        removed
    }

    /// Empties the wrapper map.
    pub fn clear_paths(&mut self) {
        self.paths.clear();
    }

    /// Empties the scope map.
    pub fn clear_scopes(&mut self) {
        self.scopes.clear();
    }

    /// Empties both maps.
    pub fn clear(&mut self) {
        self.clear_paths();
        self.clear_scopes();
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_ast::{Ast, Node, NodeType};
    use rstest::{fixture, rstest};

    #[fixture]
    fn nodes() -> (NodeId, NodeId) {
        let mut ast = Ast::new();
        let a = ast.alloc(Node::new(NodeType::Identifier));
        let b = ast.alloc(Node::new(NodeType::Identifier));
        (a, b)
    }

    #[rstest]
    fn test_get_or_create_reuses_entry(nodes: (NodeId, NodeId)) {
        let (a, _) = nodes;
        let mut cache = IdentityCache::new();

        let first = cache.get_or_create_path(a);
        let second = cache.get_or_create_path(a);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.path_count(), 1);
    }

    #[rstest]
    fn test_structurally_equal_nodes_get_distinct_paths(nodes: (NodeId, NodeId)) {
        let (a, b) = nodes;
        let mut cache = IdentityCache::new();

        let pa = cache.get_or_create_path(a);
        let pb = cache.get_or_create_path(b);

        assert!(!Rc::ptr_eq(&pa, &pb));
    }

    #[rstest]
    fn test_copy_path(nodes: (NodeId, NodeId)) {
        let (a, b) = nodes;
        let mut cache = IdentityCache::new();

        assert!(!cache.copy_path(a, b));
        assert!(cache.path(b).is_none());

        let pa = cache.get_or_create_path(a);
        assert!(cache.copy_path(a, b));
        assert!(Rc::ptr_eq(cache.path(b).unwrap(), &pa));
    }

    #[rstest]
    fn test_remove_path_leaves_scopes(nodes: (NodeId, NodeId)) {
        let (a, _) = nodes;
        let mut cache = IdentityCache::new();
        cache.get_or_create_path(a);
        cache.get_or_create_scope(a, None);

        assert!(cache.remove_path(a).is_some());
        assert!(cache.path(a).is_none());
        assert!(cache.scope(a).is_some());
    }

    #[rstest]
    fn test_clear_empties_both_maps(nodes: (NodeId, NodeId)) {
        let (a, b) = nodes;
        let mut cache = IdentityCache::new();
        cache.get_or_create_path(a);
        cache.get_or_create_scope(b, None);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.path(a).is_none());
        assert!(cache.scope(b).is_none());
    }
}
