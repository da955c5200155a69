//! Core traversal engine.

use std::ops::ControlFlow;
use std::rc::Rc;

use arbor_ast::{
    ArenaId, Ast, NodeId, NodeType, RemovePropertiesOptions, VisitorKeys, traverse_fast,
};
use tracing::{debug, trace, warn};

use crate::{
    ExplodedVisitor, IdentityCache, PathRef, Scope, SkipKeys, TraversalContext, TraverseError,
    VisitResult, Visitor,
};

/// The traversal engine.
///
/// Owns the child-key table and the identity cache. Everything that walks a
/// tree goes through it, so wrappers and scopes stay stable across
/// traversals of one arena until the cache is cleared. Handing the engine a
/// different arena clears the cache, since node ids are per arena.
#[derive(Debug, Default)]
pub struct Traverser {
    /// Child keys per node type.
    keys: VisitorKeys,
    /// Node → path and node → scope entries.
    cache: IdentityCache,
    /// Arena the cache entries belong to.
    arena: Option<ArenaId>,
}

impl Traverser {
    /// Creates an engine with the standard child keys and an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom child-key table.
    pub fn with_keys(keys: VisitorKeys) -> Self {
        Self {
            keys,
            cache: IdentityCache::new(),
            arena: None,
        }
    }

    #[inline]
    pub fn keys(&self) -> &VisitorKeys {
        &self.keys
    }

    #[inline]
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    #[inline]
    pub fn cache_mut(&mut self) -> &mut IdentityCache {
        &mut self.cache
    }

    /// The arena the cached entries were created for, if any.
    #[inline]
    pub fn arena(&self) -> Option<ArenaId> {
        self.arena
    }

    /// Ties the cache to `ast`, dropping entries left by another arena.
    fn bind(&mut self, ast: &Ast) {
        let id = ast.id();
        match self.arena {
            Some(current) if current == id => {}
            Some(current) => {
                debug!(from = %current, to = %id, "arena changed, clearing identity cache");
                self.cache.clear();
                self.arena = Some(id);
            }
            None => self.arena = Some(id),
        }
    }

    /// Walks the children of `root` with `visitor`.
    ///
    /// `root` itself is not entered. Unless the visitor is `no_scope`, a
    /// traversal without a scope must start at a `File` or `Program` node;
    /// anything else fails with [`TraverseError::ParentRequired`] before any
    /// handler runs.
    ///
    /// A stop requested by a handler ends the traversal early and is not an
    /// error. A handler failure aborts it and is returned as
    /// [`TraverseError::Handler`].
    pub fn traverse<S>(
        &mut self,
        ast: &mut Ast,
        root: NodeId,
        visitor: &Visitor<S>,
        scope: Option<Rc<Scope>>,
        state: &mut S,
        parent_path: Option<&PathRef>,
    ) -> Result<(), TraverseError> {
        let root_type = ast.node_type(root);
        if !visitor.is_no_scope() && scope.is_none() && !root_type.is_program_root() {
            return Err(TraverseError::parent_required(root_type));
        }

        let exploded = visitor.explode();
        debug!(
            root = %root_type,
            no_scope = exploded.no_scope(),
            scoped = scope.is_some(),
            "starting traversal"
        );

        let _flow = self.dispatch(ast, root, &exploded, scope, state, parent_path, None)?;
        Ok(())
    }

    /// Visits the children of `node`, key by key in declared order.
    ///
    /// Types without registered child keys are leaves: nothing is visited.
    /// Keys in `skip_keys` are passed over. Returns `Break` as soon as any
    /// visited path is stopped.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch<S>(
        &mut self,
        ast: &mut Ast,
        node: NodeId,
        visitor: &ExplodedVisitor<S>,
        scope: Option<Rc<Scope>>,
        state: &mut S,
        parent_path: Option<&PathRef>,
        skip_keys: Option<&SkipKeys>,
    ) -> Result<VisitResult, TraverseError> {
        self.bind(ast);
        let node_type = ast.node_type(node);
        let Some(keys) = self.keys.get(node_type) else {
            return Ok(ControlFlow::Continue(()));
        };

        trace!(%node, %node_type, "dispatch");

        let context = TraversalContext::new(scope, visitor, parent_path.cloned());
        for &key in keys {
            if skip_keys.is_some_and(|skip| skip.contains(key)) {
                continue;
            }
            if context.visit(self, ast, state, node, key)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Pre-order walk over `node` and its descendants, without handlers,
    /// scopes, or stop signals.
    pub fn fast_walk<F>(&self, ast: &mut Ast, node: NodeId, enter: F)
    where
        F: FnMut(&mut Ast, NodeId),
    {
        traverse_fast(ast, &self.keys, node, enter);
    }

    /// Returns true if a node of `target` appears in `tree`.
    ///
    /// A `tree` whose own type is blacklisted is never searched. Blacklisted
    /// types deeper down hide their subtrees. The search stops at the first
    /// match. Without a scope the search runs scope-free, so it may start at
    /// any node.
    pub fn has_type(
        &mut self,
        ast: &mut Ast,
        tree: NodeId,
        scope: Option<Rc<Scope>>,
        target: NodeType,
        blacklist: &[NodeType],
    ) -> bool {
        let tree_type = ast.node_type(tree);
        if blacklist.contains(&tree_type) {
            return false;
        }
        if tree_type == target {
            return true;
        }

        let visitor = Visitor::<TypeSearch>::new()
            .enter(|path| {
                if path.node_type() == path.state().target {
                    path.state_mut().found = true;
                    path.stop();
                }
                Ok(())
            })
            .blacklist(blacklist.iter().copied())
            .with_no_scope(scope.is_none());

        let mut search = TypeSearch {
            found: false,
            target,
        };
        if let Err(e) = self.traverse(ast, tree, &visitor, scope, &mut search, None) {
            warn!("Type search aborted: {}", e);
        }
        search.found
    }

    /// Strips transient properties from `node` and forgets its wrapper.
    ///
    /// The node's scope entry is kept.
    pub fn clear_node(&mut self, ast: &mut Ast, node: NodeId, opts: RemovePropertiesOptions) {
        self.bind(ast);
        ast.remove_properties(node, opts);
        self.cache.remove_path(node);
    }

    /// Runs [`clear_node`](Self::clear_node) on `tree` and every node below
    /// it. Returns `tree` for chaining.
    pub fn remove_properties(
        &mut self,
        ast: &mut Ast,
        tree: NodeId,
        opts: RemovePropertiesOptions,
    ) -> NodeId {
        self.bind(ast);
        let Self { keys, cache, .. } = self;
        traverse_fast(ast, keys, tree, |ast, node| {
            ast.remove_properties(node, opts);
            cache.remove_path(node);
        });
        tree
    }

    /// Empties both the path and the scope cache.
    pub fn clear_cache(&mut self) {
        debug!(
            paths = self.cache.path_count(),
            scopes = self.cache.scope_count(),
            "clearing identity cache"
        );
        self.cache.clear();
    }

    pub fn clear_path_cache(&mut self) {
        debug!(paths = self.cache.path_count(), "clearing path cache");
        self.cache.clear_paths();
    }

    pub fn clear_scope_cache(&mut self) {
        debug!(scopes = self.cache.scope_count(), "clearing scope cache");
        self.cache.clear_scopes();
    }

    /// Makes `destination` share the wrapper cached for `source`.
    ///
    /// Does nothing if `source` has no wrapper. Returns whether an entry was
    /// copied.
    pub fn copy_cache(&mut self, source: NodeId, destination: NodeId) -> bool {
        self.cache.copy_path(source, destination)
    }

    /// Drops the cache entries of `node` and everything below it.
    pub(crate) fn evict_subtree(&mut self, ast: &mut Ast, node: NodeId) {
        self.bind(ast);
        let Self { keys, cache, .. } = self;
        traverse_fast(ast, keys, node, |_, id| {
            cache.remove_path(id);
            cache.remove_scope(id);
        });
    }
}

/// State of a [`Traverser::has_type`] search.
#[derive(Debug, Clone, Copy)]
struct TypeSearch {
    found: bool,
    target: NodeType,
}
