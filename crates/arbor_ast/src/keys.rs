//! Child-key table.
//!
//! For each node type, the ordered names of the child slots a traversal
//! descends into. The order is significant: a call's `callee` is visited
//! before its `arguments`, a binary expression's `left` before its `right`.

use std::collections::HashMap;

use crate::NodeType;

/// Mapping from node type to its ordered child keys.
///
/// Types without an entry, and types mapped to an empty list, are leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorKeys {
    table: HashMap<NodeType, &'static [&'static str]>,
}

impl VisitorKeys {
    /// Table with an entry for every [`NodeType`].
    pub fn standard() -> Self {
        let table = NodeType::ALL
            .iter()
            .map(|&node_type| (node_type, standard_keys(node_type)))
            .collect();
        Self { table }
    }

    /// Table with no entries; every type is unregistered.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Registers (or overrides) the keys of a type.
    pub fn register(&mut self, node_type: NodeType, keys: &'static [&'static str]) -> &mut Self {
        self.table.insert(node_type, keys);
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, node_type: NodeType, keys: &'static [&'static str]) -> Self {
        self.register(node_type, keys);
        self
    }

    /// Removes the entry of a type, turning it into an unregistered leaf.
    pub fn unregister(&mut self, node_type: NodeType) -> Option<&'static [&'static str]> {
        self.table.remove(&node_type)
    }

    /// Returns the ordered keys of a type, or `None` if it is unregistered.
    #[inline]
    pub fn get(&self, node_type: NodeType) -> Option<&'static [&'static str]> {
        self.table.get(&node_type).copied()
    }

    #[inline]
    pub fn contains(&self, node_type: NodeType) -> bool {
        self.table.contains_key(&node_type)
    }
}

impl Default for VisitorKeys {
    fn default() -> Self {
        Self::standard()
    }
}

/// Built-in child keys of a node type.
pub const fn standard_keys(node_type: NodeType) -> &'static [&'static str] {
    match node_type {
        NodeType::File => &["program"],
        NodeType::Program | NodeType::BlockStatement => &["directives", "body"],
        NodeType::Directive => &["value"],
        NodeType::ExpressionStatement => &["expression"],
        NodeType::ReturnStatement
        | NodeType::ThrowStatement
        | NodeType::UnaryExpression
        | NodeType::UpdateExpression => &["argument"],
        NodeType::IfStatement | NodeType::ConditionalExpression => {
            &["test", "consequent", "alternate"]
        }
        NodeType::WhileStatement => &["test", "body"],
        NodeType::ForStatement => &["init", "test", "update", "body"],
        NodeType::VariableDeclaration => &["declarations"],
        NodeType::VariableDeclarator => &["id", "init"],
        NodeType::FunctionDeclaration | NodeType::FunctionExpression => &["id", "params", "body"],
        NodeType::ArrowFunctionExpression => &["params", "body"],
        NodeType::BinaryExpression
        | NodeType::LogicalExpression
        | NodeType::AssignmentExpression => &["left", "right"],
        NodeType::CallExpression | NodeType::NewExpression => &["callee", "arguments"],
        NodeType::MemberExpression => &["object", "property"],
        NodeType::ArrayExpression => &["elements"],
        NodeType::ObjectExpression => &["properties"],
        NodeType::ObjectProperty => &["key", "value"],
        NodeType::SequenceExpression => &["expressions"],
        NodeType::DirectiveLiteral
        | NodeType::EmptyStatement
        | NodeType::Identifier
        | NodeType::StringLiteral
        | NodeType::NumericLiteral
        | NodeType::BooleanLiteral
        | NodeType::NullLiteral
        | NodeType::ThisExpression => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_registers_every_type() {
        let keys = VisitorKeys::standard();
        assert!(NodeType::ALL.iter().all(|t| keys.contains(*t)));
        assert_eq!(keys.get(NodeType::CallExpression), Some(&["callee", "arguments"][..]));
        assert_eq!(keys.get(NodeType::Identifier), Some(&[] as &[&str]));
    }

    #[test]
    fn test_empty_has_no_entries() {
        assert_eq!(VisitorKeys::empty().get(NodeType::File), None);
    }

    #[test]
    fn test_register_and_unregister() {
        let mut keys = VisitorKeys::empty().with(NodeType::BinaryExpression, &["right", "left"]);
        assert_eq!(keys.get(NodeType::BinaryExpression), Some(&["right", "left"][..]));

        assert!(keys.unregister(NodeType::BinaryExpression).is_some());
        assert!(!keys.contains(NodeType::BinaryExpression));
    }
}
