//! Context-free tree walk.
//!
//! [`traverse_fast`] visits every node reachable through the child-key table
//! in pre-order. It has no visitor table, no scope, and no way to stop early,
//! which makes it the cheap primitive for bulk work such as stripping
//! properties from a whole subtree.

use crate::{Ast, NodeId, VisitorKeys};

/// Calls `enter` on `root` and on every descendant, parents before children,
/// children in key order and then sequence order.
///
/// A node's children are read after `enter` returns, so `enter` may rewrite
/// the slots of the node it is given and the walk follows the new contents.
///
/// # Example
///
/// ```rust
/// use arbor_ast::{Ast, Node, NodeType, VisitorKeys, traverse_fast};
///
/// let mut ast = Ast::new();
/// let id = ast.alloc(Node::new(NodeType::Identifier));
/// let stmt = ast.alloc(Node::new(NodeType::ExpressionStatement).with_child("expression", id));
///
/// let mut seen = Vec::new();
/// traverse_fast(&mut ast, &VisitorKeys::standard(), stmt, |ast, node| {
///     seen.push(ast.node_type(node));
/// });
/// assert_eq!(seen, vec![NodeType::ExpressionStatement, NodeType::Identifier]);
/// ```
pub fn traverse_fast<F>(ast: &mut Ast, keys: &VisitorKeys, root: NodeId, mut enter: F)
where
    F: FnMut(&mut Ast, NodeId),
{
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        enter(ast, node);

        let Some(child_keys) = keys.get(ast.node_type(node)) else {
            continue;
        };

        // Reverse so the first key's first child is popped next.
        for key in child_keys.iter().rev() {
            stack.extend(ast[node].child_ids(key).iter().rev().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, NodeType};
    use pretty_assertions::assert_eq;

    fn ident(ast: &mut Ast, name: &str) -> NodeId {
        ast.alloc(Node::new(NodeType::Identifier).with_prop("name", name))
    }

    #[test]
    fn test_visits_in_pre_order() {
        let mut ast = Ast::new();
        let callee = ident(&mut ast, "f");
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let sum = ast.alloc(
            Node::new(NodeType::BinaryExpression)
                .with_child("left", a)
                .with_child("right", b),
        );
        let c = ident(&mut ast, "c");
        let call = ast.alloc(
            Node::new(NodeType::CallExpression)
                .with_child("callee", callee)
                .with_list("arguments", vec![sum, c]),
        );

        let mut order = Vec::new();
        traverse_fast(&mut ast, &VisitorKeys::standard(), call, |_, node| order.push(node));

        assert_eq!(order, vec![call, callee, sum, a, b, c]);
    }

    #[test]
    fn test_unregistered_types_are_leaves() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let stmt = ast.alloc(Node::new(NodeType::ExpressionStatement).with_child("expression", a));

        let mut count = 0;
        traverse_fast(&mut ast, &VisitorKeys::empty(), stmt, |_, _| count += 1);

        assert_eq!(count, 1);
    }

    #[test]
    fn test_enter_may_mutate_current_node() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let stmt = ast.alloc(Node::new(NodeType::ExpressionStatement).with_child("expression", a));

        let mut names = Vec::new();
        traverse_fast(&mut ast, &VisitorKeys::standard(), stmt, |ast, node| {
            if node == stmt {
                ast[node].set_child("expression", b);
            }
            if let Some(name) = ast[node].name() {
                names.push(name.to_string());
            }
        });

        assert_eq!(names, vec!["b"]);
    }
}
