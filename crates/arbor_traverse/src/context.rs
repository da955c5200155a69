//! Traversal context: visits the children stored under one key.

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::rc::Rc;

use arbor_ast::{Ast, Child, NodeId, NodeType, VisitorKeys};
use tracing::trace;

use crate::visitors::Phase;
use crate::{ExplodedVisitor, Path, PathRef, Scope, TraverseError, Traverser, VisitResult};

/// Binds a scope, a normalized visitor, and the parent path for one
/// dispatch level.
pub struct TraversalContext<'v, S> {
    scope: Option<Rc<Scope>>,
    visitor: &'v ExplodedVisitor<S>,
    parent_path: Option<PathRef>,
}

impl<'v, S> TraversalContext<'v, S> {
    pub fn new(
        scope: Option<Rc<Scope>>,
        visitor: &'v ExplodedVisitor<S>,
        parent_path: Option<PathRef>,
    ) -> Self {
        Self {
            scope,
            visitor,
            parent_path,
        }
    }

    #[inline]
    pub fn scope(&self) -> Option<&Rc<Scope>> {
        self.scope.as_ref()
    }

    #[inline]
    pub fn parent_path(&self) -> Option<&PathRef> {
        self.parent_path.as_ref()
    }

    /// Whether `node` needs a wrapper at all: something handles it, or it
    /// has children that might be handled.
    pub fn should_visit(&self, keys: &VisitorKeys, ast: &Ast, node: NodeId) -> bool {
        if self.visitor.has_global_handlers() {
            return true;
        }

        let node = &ast[node];
        if self.visitor.handles(node.node_type) {
            return true;
        }

        keys.get(node.node_type).is_some_and(|child_keys| {
            child_keys
                .iter()
                .any(|key| node.child(key).is_some_and(Child::is_populated))
        })
    }

    /// Visits the child (or children) stored under `key` on `node`.
    ///
    /// Returns `Break` as soon as a visited path is stopped; later children
    /// under the key are not visited.
    pub fn visit(
        &self,
        traverser: &mut Traverser,
        ast: &mut Ast,
        state: &mut S,
        node: NodeId,
        key: &'static str,
    ) -> Result<VisitResult, TraverseError> {
        let entries: Vec<(Option<usize>, NodeId)> = match ast[node].child(key) {
            None | Some(Child::None) => return Ok(ControlFlow::Continue(())),
            Some(Child::Node(id)) => vec![(None, *id)],
            Some(Child::List(ids)) => ids
                .iter()
                .copied()
                .enumerate()
                .map(|(i, id)| (Some(i), id))
                .collect(),
        };

        let mut queue = Vec::with_capacity(entries.len());
        for (index, child) in entries {
            if self.should_visit(traverser.keys(), ast, child) {
                queue.push(self.create_path(traverser, node, key, index, child));
            }
        }

        if queue.is_empty() {
            return Ok(ControlFlow::Continue(()));
        }

        self.visit_queue(traverser, ast, state, queue)
    }

    fn create_path(
        &self,
        traverser: &mut Traverser,
        parent: NodeId,
        key: &'static str,
        index: Option<usize>,
        node: NodeId,
    ) -> PathRef {
        let path = traverser.cache_mut().get_or_create_path(node);
        path.setup(self.parent_path.clone(), parent, key, index, node);
        path
    }

    fn visit_queue(
        &self,
        traverser: &mut Traverser,
        ast: &mut Ast,
        state: &mut S,
        queue: Vec<PathRef>,
    ) -> Result<VisitResult, TraverseError> {
        let mut visited = HashSet::new();

        for path in queue {
            loop {
                // Siblings may have moved, or the node may be gone.
                if !path.resync(ast) {
                    break;
                }
                if !visited.insert(path.node()) {
                    break;
                }

                path.push_context();
                if self.visit_path(traverser, ast, state, &path)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }

                // A replacement node is visited in place of the old one.
                if !path.take_requeued() {
                    break;
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn visit_path(
        &self,
        traverser: &mut Traverser,
        ast: &mut Ast,
        state: &mut S,
        path: &PathRef,
    ) -> Result<VisitResult, TraverseError> {
        let node = path.node();
        let node_type = ast.node_type(node);
        if self.visitor.is_blacklisted(node_type) {
            return Ok(ControlFlow::Continue(()));
        }

        trace!(%node, %node_type, key = path.key(), "visit");

        let scope = self.resolve_scope(traverser, node, node_type);
        path.set_scope(scope.clone());

        if self.call(traverser, ast, state, path, Phase::Enter)? || path.is_interrupted() {
            return Ok(path.flow());
        }

        let skip_keys = path.skip_keys();
        let result = traverser.dispatch(
            ast,
            node,
            self.visitor,
            scope,
            state,
            Some(path),
            skip_keys.as_ref(),
        )?;
        if result.is_break() {
            path.stop();
            return Ok(ControlFlow::Break(()));
        }

        self.call(traverser, ast, state, path, Phase::Exit)?;
        Ok(path.flow())
    }

    fn resolve_scope(
        &self,
        traverser: &mut Traverser,
        node: NodeId,
        node_type: NodeType,
    ) -> Option<Rc<Scope>> {
        if self.visitor.no_scope() || !node_type.is_scopable() {
            return self.scope.clone();
        }
        Some(traverser.cache_mut().get_or_create_scope(node, self.scope.clone()))
    }

    /// Runs the handlers of `phase` for the path's node.
    ///
    /// Returns true when a handler replaced the node or interrupted the path,
    /// in which case the remaining handlers were not called.
    fn call(
        &self,
        traverser: &mut Traverser,
        ast: &mut Ast,
        state: &mut S,
        path: &PathRef,
        phase: Phase,
    ) -> Result<bool, TraverseError> {
        let node = path.node();
        let node_type = ast.node_type(node);

        for handler in self.visitor.handlers(phase, node_type) {
            let mut view = Path::new(Rc::clone(path), traverser, ast, state);
            handler(&mut view).map_err(TraverseError::Handler)?;

            if path.node() != node || path.is_interrupted() {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Visitor;
    use arbor_ast::Node;

    fn call_with_args(ast: &mut Ast) -> (NodeId, NodeId, NodeId) {
        let callee = ast.alloc(Node::new(NodeType::Identifier).with_prop("name", "f"));
        let arg = ast.alloc(Node::new(NodeType::NumericLiteral).with_prop("value", 1));
        let call = ast.alloc(
            Node::new(NodeType::CallExpression)
                .with_child("callee", callee)
                .with_list("arguments", vec![arg]),
        );
        (call, callee, arg)
    }

    #[test]
    fn test_should_visit_prunes_unhandled_leaves() {
        let mut ast = Ast::new();
        let (call, callee, arg) = call_with_args(&mut ast);
        let keys = VisitorKeys::standard();

        let visitor = Visitor::<()>::new().on_enter(NodeType::Identifier, |_| Ok(()));
        let exploded = visitor.explode();
        let context = TraversalContext::new(None, &exploded, None);

        assert!(context.should_visit(&keys, &ast, callee));
        assert!(!context.should_visit(&keys, &ast, arg));
        // Unhandled, but it has children worth descending into.
        assert!(context.should_visit(&keys, &ast, call));
    }

    #[test]
    fn test_global_handlers_visit_everything() {
        let mut ast = Ast::new();
        let (_, _, arg) = call_with_args(&mut ast);
        let keys = VisitorKeys::standard();

        let visitor = Visitor::<()>::new().enter(|_| Ok(()));
        let exploded = visitor.explode();
        let context = TraversalContext::new(None, &exploded, None);

        assert!(context.should_visit(&keys, &ast, arg));
    }

    #[test]
    fn test_visit_empty_slot_continues() {
        let mut ast = Ast::new();
        let mut ret = Node::new(NodeType::ReturnStatement);
        ret.set_child("argument", Child::None);
        let ret = ast.alloc(ret);

        let visitor = Visitor::<usize>::new().enter(|path| {
            *path.state_mut() += 1;
            Ok(())
        });
        let exploded = visitor.explode();
        let context = TraversalContext::new(None, &exploded, None);
        let mut traverser = Traverser::new();
        let mut calls = 0;

        let result = context
            .visit(&mut traverser, &mut ast, &mut calls, ret, "argument")
            .unwrap();

        assert!(result.is_continue());
        assert_eq!(calls, 0);
        assert!(traverser.cache().is_empty());
    }

    #[test]
    fn test_visit_wraps_children_with_location() {
        let mut ast = Ast::new();
        let (call, _, arg) = call_with_args(&mut ast);

        let visitor = Visitor::<()>::new().enter(|_| Ok(()));
        let exploded = visitor.explode();
        let context = TraversalContext::new(None, &exploded, None);
        let mut traverser = Traverser::new();

        context
            .visit(&mut traverser, &mut ast, &mut (), call, "arguments")
            .unwrap();

        let path = traverser.cache().path(arg).unwrap();
        assert_eq!(path.parent(), Some(call));
        assert_eq!(path.key(), "arguments");
        assert_eq!(path.index(), Some(0));
    }
}
