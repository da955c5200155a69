//! Lexical scopes.
//!
//! A scope is opened by every scopable node (programs, blocks, functions,
//! `for` loops) and links to its enclosing scope. Binding tables are the
//! business of the passes that need them; this type only records the tree.

use std::rc::Rc;

use arbor_ast::NodeId;

/// A lexical scope, identified by the node that opens it.
#[derive(Debug)]
pub struct Scope {
    block: NodeId,
    parent: Option<Rc<Scope>>,
    depth: usize,
}

impl Scope {
    /// Creates a scope for `block` nested in `parent`.
    pub fn new(block: NodeId, parent: Option<Rc<Scope>>) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.depth + 1);
        Self {
            block,
            parent,
            depth,
        }
    }

    /// The node that opens this scope.
    #[inline]
    pub fn block(&self) -> NodeId {
        self.block
    }

    #[inline]
    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    /// Nesting depth; the outermost scope is 0.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Walks outwards to the outermost scope.
    pub fn program_scope(self: &Rc<Self>) -> Rc<Scope> {
        let mut scope = Rc::clone(self);
        while let Some(parent) = scope.parent.clone() {
            scope = parent;
        }
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_ast::{Ast, Node, NodeType};

    #[test]
    fn test_nested_scopes() {
        let mut ast = Ast::new();
        let program = ast.alloc(Node::new(NodeType::Program));
        let block = ast.alloc(Node::new(NodeType::BlockStatement));

        let outer = Rc::new(Scope::new(program, None));
        let inner = Rc::new(Scope::new(block, Some(Rc::clone(&outer))));

        assert_eq!(outer.depth(), 0);
        assert_eq!(inner.depth(), 1);
        assert_eq!(inner.block(), block);
        assert!(Rc::ptr_eq(&inner.program_scope(), &outer));
    }
}
