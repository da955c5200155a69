//! Path wrappers.
//!
//! A [`NodePath`] records where a node sits (parent, key, list index), the
//! scope it was visited in, and the control flags its handlers raised. One
//! wrapper exists per node and is shared through the identity cache, so every
//! handler that looks at a node sees the same [`PathRef`].
//!
//! Handlers do not receive the wrapper directly but a [`Path`]: a short-lived
//! view that also lends them the arena, the traversal state, and the engine,
//! which is what lets them rewrite the tree or start a nested traversal.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::rc::Rc;

use arbor_ast::{Ast, Child, Node, NodeId, NodeType};

use crate::{Scope, TraverseError, Traverser, VisitResult, Visitor};

/// Shared handle to a cached wrapper.
pub type PathRef = Rc<NodePath>;

/// Child keys a path asked the dispatcher not to descend into.
pub type SkipKeys = HashSet<String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PathFlags {
    stop: bool,
    skip: bool,
    removed: bool,
    requeued: bool,
}

/// Location and control state of one node.
#[derive(Debug)]
pub struct NodePath {
    node: Cell<NodeId>,
    parent: Cell<Option<NodeId>>,
    parent_path: RefCell<Option<PathRef>>,
    key: Cell<&'static str>,
    index: Cell<Option<usize>>,
    scope: RefCell<Option<Rc<Scope>>>,
    skip_keys: RefCell<SkipKeys>,
    flags: Cell<PathFlags>,
}

impl NodePath {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node: Cell::new(node),
            parent: Cell::new(None),
            parent_path: RefCell::new(None),
            key: Cell::new(""),
            index: Cell::new(None),
            scope: RefCell::new(None),
            skip_keys: RefCell::new(SkipKeys::new()),
            flags: Cell::new(PathFlags::default()),
        }
    }

    /// The wrapped node.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node.get()
    }

    /// The node holding this one, if it has been placed in a tree.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent.get()
    }

    pub fn parent_path(&self) -> Option<PathRef> {
        self.parent_path.borrow().clone()
    }

    /// Name of the parent slot holding this node.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.key.get()
    }

    /// Position within the parent slot, for sequence slots.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index.get()
    }

    pub fn scope(&self) -> Option<Rc<Scope>> {
        self.scope.borrow().clone()
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.flags.get().removed
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.flags.get().stop
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.flags.get().skip
    }

    fn update(&self, f: impl FnOnce(&mut PathFlags)) {
        let mut flags = self.flags.get();
        f(&mut flags);
        self.flags.set(flags);
    }

    /// Records where the node was found by the current context.
    pub(crate) fn setup(
        &self,
        parent_path: Option<PathRef>,
        parent: NodeId,
        key: &'static str,
        index: Option<usize>,
        node: NodeId,
    ) {
        self.node.set(node);
        self.parent.set(Some(parent));
        *self.parent_path.borrow_mut() = parent_path;
        self.key.set(key);
        self.index.set(index);
    }

    /// Clears the flags and skipped keys left over from a previous visit.
    pub(crate) fn push_context(&self) {
        self.flags.set(PathFlags::default());
        self.skip_keys.borrow_mut().clear();
    }

    pub(crate) fn set_scope(&self, scope: Option<Rc<Scope>>) {
        *self.scope.borrow_mut() = scope;
    }

    pub(crate) fn set_node(&self, node: NodeId) {
        self.node.set(node);
    }

    /// Re-locates the node in its container after siblings were inserted or
    /// removed. Returns false if the node is no longer there.
    pub(crate) fn resync(&self, ast: &Ast) -> bool {
        let Some(parent) = self.parent() else {
            return true;
        };
        let node = self.node();
        match ast[parent].child(self.key()) {
            Some(Child::Node(id)) => *id == node,
            Some(Child::List(ids)) => {
                if self.index().and_then(|i| ids.get(i)) == Some(&node) {
                    return true;
                }
                match ids.iter().position(|id| *id == node) {
                    Some(position) => {
                        self.index.set(Some(position));
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub(crate) fn stop(&self) {
        self.update(|f| {
            f.stop = true;
            f.skip = true;
        });
    }

    pub(crate) fn skip(&self) {
        self.update(|f| f.skip = true);
    }

    pub(crate) fn mark_removed(&self) {
        self.update(|f| {
            f.removed = true;
            f.skip = true;
        });
    }

    pub(crate) fn requeue(&self) {
        self.update(|f| f.requeued = true);
    }

    pub(crate) fn take_requeued(&self) -> bool {
        let requeued = self.flags.get().requeued;
        self.update(|f| f.requeued = false);
        requeued
    }

    /// True once a handler stopped, skipped, or removed this path.
    pub(crate) fn is_interrupted(&self) -> bool {
        let flags = self.flags.get();
        flags.stop || flags.skip || flags.removed
    }

    pub(crate) fn skip_key(&self, key: &str) {
        self.skip_keys.borrow_mut().insert(key.to_string());
    }

    pub(crate) fn skip_keys(&self) -> Option<SkipKeys> {
        let keys = self.skip_keys.borrow();
        (!keys.is_empty()).then(|| keys.clone())
    }

    /// The signal this path sends to its parent.
    pub(crate) fn flow(&self) -> VisitResult {
        if self.is_stopped() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// What a handler works with while its node is being visited.
///
/// # Example
///
/// ```rust
/// use arbor_ast::{Ast, Node, NodeType};
/// use arbor_traverse::{Traverser, Visitor};
///
/// let mut ast = Ast::new();
/// let id = ast.alloc(Node::new(NodeType::Identifier).with_prop("name", "a"));
/// let stmt = ast.alloc(Node::new(NodeType::ExpressionStatement).with_child("expression", id));
/// let program = ast.alloc(Node::new(NodeType::Program).with_list("body", vec![stmt]));
///
/// // Rename every identifier and count them.
/// let visitor = Visitor::<usize>::new().on_enter(NodeType::Identifier, |path| {
///     path.node_mut().set_prop("name", "renamed");
///     *path.state_mut() += 1;
///     Ok(())
/// });
///
/// let mut count = 0usize;
/// Traverser::new()
///     .traverse(&mut ast, program, &visitor, None, &mut count, None)
///     .unwrap();
///
/// assert_eq!(count, 1);
/// assert_eq!(ast[id].name(), Some("renamed"));
/// ```
pub struct Path<'t, S> {
    path: PathRef,
    traverser: &'t mut Traverser,
    ast: &'t mut Ast,
    state: &'t mut S,
}

impl<'t, S> Path<'t, S> {
    pub(crate) fn new(
        path: PathRef,
        traverser: &'t mut Traverser,
        ast: &'t mut Ast,
        state: &'t mut S,
    ) -> Self {
        Self {
            path,
            traverser,
            ast,
            state,
        }
    }

    /// Id of the node being visited.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.path.node()
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.ast[self.path.node()]
    }

    #[inline]
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.ast[self.path.node()]
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.node().node_type
    }

    #[inline]
    pub fn ast(&self) -> &Ast {
        self.ast
    }

    #[inline]
    pub fn ast_mut(&mut self) -> &mut Ast {
        self.ast
    }

    #[inline]
    pub fn state(&self) -> &S {
        self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.state
    }

    /// The cached wrapper of the current node.
    #[inline]
    pub fn wrapper(&self) -> &PathRef {
        &self.path
    }

    /// Looks up the cached wrapper of any node.
    pub fn cached_path(&self, node: NodeId) -> Option<PathRef> {
        self.traverser.cache().path(node).cloned()
    }

    pub fn scope(&self) -> Option<Rc<Scope>> {
        self.path.scope()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.path.parent()
    }

    pub fn parent_path(&self) -> Option<PathRef> {
        self.path.parent_path()
    }

    #[inline]
    pub fn key(&self) -> &'static str {
        self.path.key()
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.path.index()
    }

    /// Ends the traversal: no further node is entered, and no exit handler
    /// of this node or its ancestors runs.
    pub fn stop(&mut self) {
        self.path.stop();
    }

    /// Ends the visit of this node: remaining enter handlers, its children,
    /// and its exit handlers are skipped. Siblings are still visited.
    pub fn skip(&mut self) {
        self.path.skip();
    }

    /// Skips one child key of this node.
    pub fn skip_key(&mut self, key: &str) {
        self.path.skip_key(key);
    }

    /// Puts `replacement` where the current node was.
    ///
    /// The wrapper moves with it: the cache entry is copied to the new node and
    /// dropped for the old one. Remaining handlers for the old node are not
    /// called; the new node is visited next.
    pub fn replace_with(&mut self, replacement: NodeId) {
        let old = self.path.node();
        if old == replacement {
            return;
        }
        if let Some(parent) = self.path.parent() {
            self.ast[parent].replace_child(self.path.key(), self.path.index(), replacement);
        }
        self.traverser.copy_cache(old, replacement);
        self.traverser.cache_mut().remove_path(old);
        self.path.set_node(replacement);
        self.path.requeue();
    }

    /// Detaches the current node from its parent.
    ///
    /// Cache entries of the node and all of its descendants are evicted, and
    /// the node's children are not visited.
    pub fn remove(&mut self) {
        let node = self.path.node();
        if let Some(parent) = self.path.parent() {
            self.ast[parent].detach_child(self.path.key(), self.path.index());
        }
        self.traverser.evict_subtree(self.ast, node);
        self.path.mark_removed();
    }

    /// Runs `visitor` over the children of the current node with its own
    /// state. Stopping that traversal does not stop this one.
    pub fn traverse<T>(&mut self, visitor: &Visitor<T>, state: &mut T) -> Result<(), TraverseError> {
        let node = self.path.node();
        let scope = self.path.scope();
        self.traverser
            .traverse(self.ast, node, visitor, scope, state, Some(&self.path))
    }

    /// Runs `visitor` over the children of another node through the same
    /// engine, so wrappers stay shared with this traversal.
    ///
    /// The nested traversal has its own state and its own stop signal.
    /// `node` should not contain the node being visited.
    pub fn traverse_node<T>(
        &mut self,
        node: NodeId,
        visitor: &Visitor<T>,
        scope: Option<Rc<Scope>>,
        state: &mut T,
    ) -> Result<(), TraverseError> {
        self.traverser
            .traverse(self.ast, node, visitor, scope, state, None)
    }

    /// Searches another subtree for a node of `target`.
    ///
    /// Runs scope-free; see [`Traverser::has_type`].
    pub fn has_type(&mut self, node: NodeId, target: NodeType, blacklist: &[NodeType]) -> bool {
        self.traverser.has_type(self.ast, node, None, target, blacklist)
    }
}
