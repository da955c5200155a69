//! Node definition.
//!
//! A [`Node`] holds its type tag, an optional source span, the named child
//! slots that the traversal engine descends into, and free-form properties
//! (`name`, `operator`, comments, ...) that it never looks at.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{NodeType, Span};

/// Stable handle of a node inside an [`Ast`](crate::Ast).
///
/// This is the node's identity: two nodes with identical contents allocated
/// separately have different ids, and an id keeps naming the same node after
/// it is detached from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in its arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contents of a named child slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Child {
    /// Empty slot (`null` in JSON).
    #[default]
    None,
    /// A single node.
    Node(NodeId),
    /// An ordered sequence of nodes.
    List(Vec<NodeId>),
}

impl Child {
    /// Returns true if the slot holds at least one node.
    #[inline]
    pub fn is_populated(&self) -> bool {
        match self {
            Child::None => false,
            Child::Node(_) => true,
            Child::List(ids) => !ids.is_empty(),
        }
    }

    /// Nodes held by the slot, in order.
    #[inline]
    pub fn ids(&self) -> &[NodeId] {
        match self {
            Child::None => &[],
            Child::Node(id) => std::slice::from_ref(id),
            Child::List(ids) => ids,
        }
    }
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

impl From<Option<NodeId>> for Child {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Child::None, Child::Node)
    }
}

impl From<Vec<NodeId>> for Child {
    fn from(ids: Vec<NodeId>) -> Self {
        Child::List(ids)
    }
}

/// Property keys cleared by [`Node::remove_properties`].
pub const CLEAR_KEYS: &[&str] = &["tokens", "start", "end", "loc", "raw", "rawValue"];

/// Comment property keys, cleared unless comments are preserved.
pub const COMMENT_KEYS: &[&str] = &[
    "comments",
    "leadingComments",
    "trailingComments",
    "innerComments",
];

/// Options for [`Node::remove_properties`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePropertiesOptions {
    /// Keep comment properties attached.
    #[serde(default)]
    pub preserve_comments: bool,
}

/// A node in the tree.
///
/// # Example
///
/// ```rust
/// use arbor_ast::{Ast, Node, NodeType};
///
/// let mut ast = Ast::new();
/// let left = ast.alloc(Node::new(NodeType::Identifier).with_prop("name", "a"));
/// let right = ast.alloc(Node::new(NodeType::Identifier).with_prop("name", "b"));
/// let sum = ast.alloc(
///     Node::new(NodeType::BinaryExpression)
///         .with_prop("operator", "+")
///         .with_child("left", left)
///         .with_child("right", right),
/// );
///
/// assert_eq!(ast[sum].child_ids("left"), &[left]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The type of this node.
    pub node_type: NodeType,

    /// Source range, if known.
    pub span: Option<Span>,

    slots: BTreeMap<String, Child>,

    props: Map<String, Value>,
}

impl Node {
    /// Creates a node with no children and no properties.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            span: None,
            slots: BTreeMap::new(),
            props: Map::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Sets a single-node child slot.
    #[must_use]
    pub fn with_child(mut self, key: impl Into<String>, id: NodeId) -> Self {
        self.slots.insert(key.into(), Child::Node(id));
        self
    }

    /// Sets a sequence child slot.
    #[must_use]
    pub fn with_list(mut self, key: impl Into<String>, ids: Vec<NodeId>) -> Self {
        self.slots.insert(key.into(), Child::List(ids));
        self
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Returns the slot stored under `key`.
    #[inline]
    pub fn child(&self, key: &str) -> Option<&Child> {
        self.slots.get(key)
    }

    #[inline]
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Child> {
        self.slots.get_mut(key)
    }

    /// Returns the nodes stored under `key` (empty when the slot is absent).
    #[inline]
    pub fn child_ids(&self, key: &str) -> &[NodeId] {
        self.child(key).map_or(&[], Child::ids)
    }

    /// Replaces a slot, returning its previous contents.
    pub fn set_child(&mut self, key: impl Into<String>, child: impl Into<Child>) -> Option<Child> {
        self.slots.insert(key.into(), child.into())
    }

    /// Puts `id` at `index` of a sequence slot, or into a single-node slot when
    /// `index` is `None`. Returns false if there is no such position.
    pub fn replace_child(&mut self, key: &str, index: Option<usize>, id: NodeId) -> bool {
        match (self.slots.get_mut(key), index) {
            (Some(Child::List(ids)), Some(i)) => match ids.get_mut(i) {
                Some(slot) => {
                    *slot = id;
                    true
                }
                None => false,
            },
            (Some(slot), None) => {
                *slot = Child::Node(id);
                true
            }
            _ => false,
        }
    }

    /// Takes the child at `index` out of a sequence slot (shifting later
    /// siblings down), or empties a single-node slot when `index` is `None`.
    pub fn detach_child(&mut self, key: &str, index: Option<usize>) -> Option<NodeId> {
        match (self.slots.get_mut(key), index) {
            (Some(Child::List(ids)), Some(i)) if i < ids.len() => Some(ids.remove(i)),
            (Some(slot), None) => match std::mem::take(slot) {
                Child::Node(id) => Some(id),
                other => {
                    *slot = other;
                    None
                }
            },
            _ => None,
        }
    }

    /// Iterates over all slots in key order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Child)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn set_prop(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props.insert(key.into(), value.into())
    }

    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    /// Shorthand for the `name` property of identifiers.
    pub fn name(&self) -> Option<&str> {
        self.prop("name").and_then(Value::as_str)
    }

    /// Strips transient properties: the span, [`CLEAR_KEYS`], every key starting
    /// with `_`, and [`COMMENT_KEYS`] unless `opts.preserve_comments`.
    ///
    /// Child slots are left alone.
    pub fn remove_properties(&mut self, opts: RemovePropertiesOptions) {
        self.span = None;
        self.props.retain(|key, _| {
            let transient = CLEAR_KEYS.contains(&key.as_str())
                || key.starts_with('_')
                || (!opts.preserve_comments && COMMENT_KEYS.contains(&key.as_str()));
            !transient
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decorated() -> Node {
        Node::new(NodeType::Identifier)
            .with_span(Span::new(0, 3))
            .with_prop("name", "foo")
            .with_prop("loc", json!({ "start": { "line": 1, "column": 0 } }))
            .with_prop("raw", "foo")
            .with_prop("_scopeInfo", true)
            .with_prop("leadingComments", json!([{ "type": "CommentLine", "value": " hi" }]))
    }

    #[test]
    fn test_child_ids_for_each_slot_kind() {
        let node = Node::new(NodeType::CallExpression)
            .with_child("callee", NodeId::new(1))
            .with_list("arguments", vec![NodeId::new(2), NodeId::new(3)]);

        assert_eq!(node.child_ids("callee"), &[NodeId::new(1)]);
        assert_eq!(node.child_ids("arguments"), &[NodeId::new(2), NodeId::new(3)]);
        assert_eq!(node.child_ids("missing"), &[] as &[NodeId]);
    }

    #[test]
    fn test_replace_and_detach_child() {
        let mut node = Node::new(NodeType::CallExpression)
            .with_child("callee", NodeId::new(1))
            .with_list("arguments", vec![NodeId::new(2), NodeId::new(3)]);

        assert!(node.replace_child("arguments", Some(1), NodeId::new(9)));
        assert!(!node.replace_child("arguments", Some(5), NodeId::new(9)));
        assert_eq!(node.child_ids("arguments"), &[NodeId::new(2), NodeId::new(9)]);

        assert_eq!(node.detach_child("arguments", Some(0)), Some(NodeId::new(2)));
        assert_eq!(node.child_ids("arguments"), &[NodeId::new(9)]);

        assert_eq!(node.detach_child("callee", None), Some(NodeId::new(1)));
        assert_eq!(node.child("callee"), Some(&Child::None));
        assert_eq!(node.detach_child("callee", None), None);
    }

    #[test]
    fn test_is_populated() {
        assert!(!Child::None.is_populated());
        assert!(!Child::List(vec![]).is_populated());
        assert!(Child::Node(NodeId::new(0)).is_populated());
    }

    #[test]
    fn test_remove_properties_strips_transient_keys() {
        let mut node = decorated();
        node.remove_properties(RemovePropertiesOptions::default());

        assert_eq!(node.span, None);
        let keys: Vec<_> = node.props().keys().cloned().collect();
        assert_eq!(keys, vec!["name".to_string()]);
    }

    #[test]
    fn test_remove_properties_can_preserve_comments() {
        let mut node = decorated();
        node.remove_properties(RemovePropertiesOptions {
            preserve_comments: true,
        });

        assert!(node.prop("leadingComments").is_some());
        assert!(node.prop("_scopeInfo").is_none());
        assert!(node.prop("raw").is_none());
    }

    #[test]
    fn test_remove_properties_keeps_slots() {
        let mut node = Node::new(NodeType::ExpressionStatement)
            .with_child("expression", NodeId::new(7))
            .with_prop("start", 0);
        node.remove_properties(RemovePropertiesOptions::default());

        assert_eq!(node.child_ids("expression"), &[NodeId::new(7)]);
        assert!(node.prop("start").is_none());
    }
}
