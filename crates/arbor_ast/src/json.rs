//! Loading and dumping Babel-style JSON trees.
//!
//! A JSON object with a `"type"` field is a node. Fields named by the
//! type's [standard child keys](crate::standard_keys) become child slots:
//! an object is a single child, an array a sequence, `null` an empty slot.
//! Numeric `start`/`end` fields become the span. Everything else is kept as
//! a property and written back unchanged.

use serde_json::{Map, Value};

use crate::{Ast, AstError, Child, Node, NodeId, NodeType, Span, standard_keys};

impl Ast {
    /// Parses a JSON document into a fresh arena, returning it with the root id.
    pub fn from_json(value: &Value) -> Result<(Ast, NodeId), AstError> {
        let mut ast = Ast::new();
        let root = ast.alloc_json(value)?;
        Ok((ast, root))
    }

    /// Parses JSON text; see [`from_json`](Self::from_json).
    pub fn from_json_str(text: &str) -> Result<(Ast, NodeId), AstError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Allocates the node described by `value` (and its subtree) in this arena.
    pub fn alloc_json(&mut self, value: &Value) -> Result<NodeId, AstError> {
        let object = value
            .as_object()
            .ok_or_else(|| AstError::invalid_node(format!("expected an object, found {value}")))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AstError::invalid_node("missing \"type\" field"))?;
        let node_type: NodeType = tag.parse()?;
        let child_keys = standard_keys(node_type);

        let mut node = Node::new(node_type);
        if let (Some(start), Some(end)) = (
            object.get("start").and_then(Value::as_u64),
            object.get("end").and_then(Value::as_u64),
        ) {
            let offset = |n: u64| {
                u32::try_from(n).map_err(|_| {
                    AstError::invalid_node(format!("{node_type} offset {n} does not fit in u32"))
                })
            };
            node.span = Some(Span::new(offset(start)?, offset(end)?));
        }

        for (key, field) in object {
            match key.as_str() {
                "type" => {}
                "start" | "end" if node.span.is_some() => {}
                _ if child_keys.contains(&key.as_str()) => {
                    let child = self.alloc_slot(node_type, key, field)?;
                    node.set_child(key.as_str(), child);
                }
                _ => {
                    node.set_prop(key.as_str(), field.clone());
                }
            }
        }

        Ok(self.alloc(node))
    }

    fn alloc_slot(&mut self, owner: NodeType, key: &str, field: &Value) -> Result<Child, AstError> {
        match field {
            Value::Null => Ok(Child::None),
            Value::Object(_) => Ok(Child::Node(self.alloc_json(field)?)),
            Value::Array(items) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_null() {
                        return Err(AstError::invalid_node(format!(
                            "{owner}.{key} contains a hole"
                        )));
                    }
                    ids.push(self.alloc_json(item)?);
                }
                Ok(Child::List(ids))
            }
            other => Err(AstError::invalid_node(format!(
                "{owner}.{key} must hold nodes, found {other}"
            ))),
        }
    }

    /// Writes the subtree rooted at `root` back to JSON.
    pub fn to_json(&self, root: NodeId) -> Value {
        let node = &self[root];
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from(node.node_type.as_str()));
        if let Some(span) = node.span {
            object.insert("start".to_string(), Value::from(span.start));
            object.insert("end".to_string(), Value::from(span.end));
        }
        for (key, value) in node.props() {
            object.insert(key.clone(), value.clone());
        }
        for (key, child) in node.slots() {
            let value = match child {
                Child::None => Value::Null,
                Child::Node(id) => self.to_json(*id),
                Child::List(ids) => Value::Array(ids.iter().map(|id| self.to_json(*id)).collect()),
            };
            object.insert(key.to_string(), value);
        }
        Value::Object(object)
    }
}
