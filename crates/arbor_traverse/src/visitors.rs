//! Visitor specifications and their normalized form.
//!
//! A [`Visitor`] is assembled from handlers attached to every node
//! (`enter`/`exit`) or to selectors: a node type, an alias, or a union of
//! them. Before dispatch it is exploded into an [`ExplodedVisitor`], a flat
//! table from concrete node type to handler lists. Exploding happens once per
//! visitor value; later traversals reuse the cached table.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use arbor_ast::{Alias, AstError, NodeType};
use tracing::debug;

use crate::{HandlerError, Path};

/// Result returned by a handler.
pub type HandlerResult = Result<(), HandlerError>;

/// A visitor callback.
pub type Handler<S> = Rc<dyn Fn(&mut Path<'_, S>) -> HandlerResult>;

/// When a handler runs relative to the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

/// What a typed handler applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Type(NodeType),
    Alias(Alias),
}

impl Selector {
    /// Parses a `|`-separated union such as `"Identifier|Literal"`.
    pub fn parse_union(s: &str) -> Result<Vec<Selector>, AstError> {
        s.split('|').map(|part| part.trim().parse()).collect()
    }
}

impl From<NodeType> for Selector {
    fn from(node_type: NodeType) -> Self {
        Selector::Type(node_type)
    }
}

impl From<Alias> for Selector {
    fn from(alias: Alias) -> Self {
        Selector::Alias(alias)
    }
}

impl FromStr for Selector {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NodeType>()
            .map(Selector::Type)
            .or_else(|_| s.parse::<Alias>().map(Selector::Alias))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Type(node_type) => node_type.fmt(f),
            Selector::Alias(alias) => alias.fmt(f),
        }
    }
}

/// Anything that names one or more selectors.
pub trait IntoSelectors {
    fn into_selectors(self) -> Vec<Selector>;
}

impl IntoSelectors for Selector {
    fn into_selectors(self) -> Vec<Selector> {
        vec![self]
    }
}

impl IntoSelectors for NodeType {
    fn into_selectors(self) -> Vec<Selector> {
        vec![self.into()]
    }
}

impl IntoSelectors for Alias {
    fn into_selectors(self) -> Vec<Selector> {
        vec![self.into()]
    }
}

impl IntoSelectors for Vec<Selector> {
    fn into_selectors(self) -> Vec<Selector> {
        self
    }
}

impl<const N: usize> IntoSelectors for [Selector; N] {
    fn into_selectors(self) -> Vec<Selector> {
        self.to_vec()
    }
}

impl<const N: usize> IntoSelectors for [NodeType; N] {
    fn into_selectors(self) -> Vec<Selector> {
        self.into_iter().map(Selector::from).collect()
    }
}

impl<const N: usize> IntoSelectors for [Alias; N] {
    fn into_selectors(self) -> Vec<Selector> {
        self.into_iter().map(Selector::from).collect()
    }
}

/// A visitor specification.
///
/// # Example
///
/// ```rust
/// use arbor_ast::{Alias, NodeType};
/// use arbor_traverse::Visitor;
///
/// let visitor = Visitor::<Vec<String>>::new()
///     .on_enter([NodeType::Identifier, NodeType::ThisExpression], |path| {
///         let label = path.node_type().to_string();
///         path.state_mut().push(label);
///         Ok(())
///     })
///     .on_exit(Alias::Function, |_| Ok(()))
///     .blacklist([NodeType::ObjectExpression]);
///
/// let exploded = visitor.explode();
/// assert!(exploded.handles(NodeType::ArrowFunctionExpression));
/// assert!(exploded.is_blacklisted(NodeType::ObjectExpression));
/// ```
pub struct Visitor<S> {
    enter: Vec<Handler<S>>,
    exit: Vec<Handler<S>>,
    typed: Vec<(Selector, Phase, Handler<S>)>,
    blacklist: HashSet<NodeType>,
    no_scope: bool,
    exploded: OnceCell<Rc<ExplodedVisitor<S>>>,
}

impl<S> Visitor<S> {
    pub fn new() -> Self {
        Self {
            enter: Vec::new(),
            exit: Vec::new(),
            typed: Vec::new(),
            blacklist: HashSet::new(),
            no_scope: false,
            exploded: OnceCell::new(),
        }
    }

    /// Adds a handler run when entering every node.
    #[must_use]
    pub fn enter(mut self, f: impl Fn(&mut Path<'_, S>) -> HandlerResult + 'static) -> Self {
        self.enter.push(Rc::new(f));
        self.changed()
    }

    /// Adds a handler run when leaving every node.
    #[must_use]
    pub fn exit(mut self, f: impl Fn(&mut Path<'_, S>) -> HandlerResult + 'static) -> Self {
        self.exit.push(Rc::new(f));
        self.changed()
    }

    /// Adds a handler run when entering nodes matching `selectors`.
    #[must_use]
    pub fn on_enter(
        self,
        selectors: impl IntoSelectors,
        f: impl Fn(&mut Path<'_, S>) -> HandlerResult + 'static,
    ) -> Self {
        self.on(selectors, Phase::Enter, Rc::new(f))
    }

    /// Adds a handler run when leaving nodes matching `selectors`.
    #[must_use]
    pub fn on_exit(
        self,
        selectors: impl IntoSelectors,
        f: impl Fn(&mut Path<'_, S>) -> HandlerResult + 'static,
    ) -> Self {
        self.on(selectors, Phase::Exit, Rc::new(f))
    }

    fn on(mut self, selectors: impl IntoSelectors, phase: Phase, handler: Handler<S>) -> Self {
        for selector in selectors.into_selectors() {
            self.typed.push((selector, phase, Rc::clone(&handler)));
        }
        self.changed()
    }

    /// Excludes nodes of these types, and everything below them.
    #[must_use]
    pub fn blacklist(mut self, types: impl IntoIterator<Item = NodeType>) -> Self {
        self.blacklist.extend(types);
        self.changed()
    }

    /// Disables scope tracking and the scope requirement of
    /// [`Traverser::traverse`](crate::Traverser::traverse).
    #[must_use]
    pub fn no_scope(self) -> Self {
        self.with_no_scope(true)
    }

    #[must_use]
    pub fn with_no_scope(mut self, no_scope: bool) -> Self {
        self.no_scope = no_scope;
        self.changed()
    }

    #[inline]
    pub fn is_no_scope(&self) -> bool {
        self.no_scope
    }

    /// Whether the normalized table has been built and cached.
    #[inline]
    pub fn is_exploded(&self) -> bool {
        self.exploded.get().is_some()
    }

    fn changed(mut self) -> Self {
        self.exploded = OnceCell::new();
        self
    }

    /// Returns the normalized table, building it on first use.
    pub fn explode(&self) -> Rc<ExplodedVisitor<S>> {
        Rc::clone(self.exploded.get_or_init(|| Rc::new(self.compile())))
    }

    fn compile(&self) -> ExplodedVisitor<S> {
        let mut by_type: HashMap<NodeType, TypeHandlers<S>> = HashMap::new();

        // Handlers declared on a type run before those it inherits from aliases.
        for (selector, phase, handler) in &self.typed {
            if let Selector::Type(node_type) = selector {
                by_type
                    .entry(*node_type)
                    .or_default()
                    .push(*phase, Rc::clone(handler));
            }
        }
        for (selector, phase, handler) in &self.typed {
            if let Selector::Alias(alias) = selector {
                for node_type in alias.members() {
                    by_type
                        .entry(node_type)
                        .or_default()
                        .push(*phase, Rc::clone(handler));
                }
            }
        }

        debug!(
            types = by_type.len(),
            global_enter = self.enter.len(),
            global_exit = self.exit.len(),
            "exploded visitor"
        );

        ExplodedVisitor {
            enter: self.enter.clone(),
            exit: self.exit.clone(),
            by_type,
            blacklist: self.blacklist.clone(),
            no_scope: self.no_scope,
        }
    }
}

impl<S> Default for Visitor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Visitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitor")
            .field("enter", &self.enter.len())
            .field("exit", &self.exit.len())
            .field("typed", &self.typed.len())
            .field("blacklist", &self.blacklist)
            .field("no_scope", &self.no_scope)
            .field("exploded", &self.is_exploded())
            .finish()
    }
}

struct TypeHandlers<S> {
    enter: Vec<Handler<S>>,
    exit: Vec<Handler<S>>,
}

impl<S> Default for TypeHandlers<S> {
    fn default() -> Self {
        Self {
            enter: Vec::new(),
            exit: Vec::new(),
        }
    }
}

impl<S> TypeHandlers<S> {
    fn push(&mut self, phase: Phase, handler: Handler<S>) {
        match phase {
            Phase::Enter => self.enter.push(handler),
            Phase::Exit => self.exit.push(handler),
        }
    }

    fn get(&self, phase: Phase) -> &[Handler<S>] {
        match phase {
            Phase::Enter => &self.enter,
            Phase::Exit => &self.exit,
        }
    }
}

/// Normalized visitor: handler lists per concrete node type.
pub struct ExplodedVisitor<S> {
    enter: Vec<Handler<S>>,
    exit: Vec<Handler<S>>,
    by_type: HashMap<NodeType, TypeHandlers<S>>,
    blacklist: HashSet<NodeType>,
    no_scope: bool,
}

impl<S> ExplodedVisitor<S> {
    /// Handlers to run for a node of `node_type`: the global ones first, then
    /// the type's own.
    pub fn handlers(&self, phase: Phase, node_type: NodeType) -> impl Iterator<Item = &Handler<S>> {
        let global = match phase {
            Phase::Enter => &self.enter,
            Phase::Exit => &self.exit,
        };
        let typed = self
            .by_type
            .get(&node_type)
            .map_or(&[] as &[Handler<S>], |h| h.get(phase));
        global.iter().chain(typed)
    }

    /// Number of handlers that would run for `node_type` in `phase`.
    pub fn handler_count(&self, phase: Phase, node_type: NodeType) -> usize {
        self.handlers(phase, node_type).count()
    }

    /// Whether any typed handler applies to `node_type`.
    #[inline]
    pub fn handles(&self, node_type: NodeType) -> bool {
        self.by_type.contains_key(&node_type)
    }

    #[inline]
    pub fn has_global_handlers(&self) -> bool {
        !self.enter.is_empty() || !self.exit.is_empty()
    }

    #[inline]
    pub fn is_blacklisted(&self, node_type: NodeType) -> bool {
        self.blacklist.contains(&node_type)
    }

    #[inline]
    pub fn no_scope(&self) -> bool {
        self.no_scope
    }
}

impl<S> fmt::Debug for ExplodedVisitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.by_type.keys().collect();
        types.sort();
        f.debug_struct("ExplodedVisitor")
            .field("enter", &self.enter.len())
            .field("exit", &self.exit.len())
            .field("types", &types)
            .field("blacklist", &self.blacklist)
            .field("no_scope", &self.no_scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn noop<S>(_: &mut Path<'_, S>) -> HandlerResult {
        Ok(())
    }

    #[rstest]
    #[case("Identifier", Selector::Type(NodeType::Identifier))]
    #[case("Expression", Selector::Alias(Alias::Expression))]
    fn test_parse_selector(#[case] input: &str, #[case] expected: Selector) {
        assert_eq!(input.parse::<Selector>().unwrap(), expected);
    }

    #[test]
    fn test_parse_union() {
        let selectors = Selector::parse_union("Identifier | Literal").unwrap();
        assert_eq!(
            selectors,
            vec![
                Selector::Type(NodeType::Identifier),
                Selector::Alias(Alias::Literal)
            ]
        );
        assert!(Selector::parse_union("Identifier|Bogus").is_err());
    }

    #[test]
    fn test_explode_splits_unions() {
        let visitor = Visitor::<()>::new().on_enter([NodeType::Identifier, NodeType::ThisExpression], noop);
        let exploded = visitor.explode();

        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::Identifier), 1);
        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::ThisExpression), 1);
        assert_eq!(exploded.handler_count(Phase::Exit, NodeType::Identifier), 0);
    }

    #[test]
    fn test_explode_expands_aliases_after_direct_handlers() {
        let visitor = Visitor::<Vec<&'static str>>::new()
            .on_enter(Alias::Literal, |path| {
                path.state_mut().push("alias");
                Ok(())
            })
            .on_enter(NodeType::StringLiteral, |path| {
                path.state_mut().push("direct");
                Ok(())
            });
        let exploded = visitor.explode();

        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::StringLiteral), 2);
        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::NullLiteral), 1);
        assert!(!exploded.handles(NodeType::Identifier));

        let direct = exploded.handlers(Phase::Enter, NodeType::StringLiteral).next().unwrap();
        let alias_only = exploded.handlers(Phase::Enter, NodeType::NullLiteral).next().unwrap();
        assert!(!Rc::ptr_eq(direct, alias_only));
    }

    #[test]
    fn test_global_handlers_precede_typed_ones() {
        let typed: Handler<()> = Rc::new(noop::<()>);
        let global: Handler<()> = Rc::new(noop::<()>);
        let visitor = Visitor::<()>::new()
            .on_enter(NodeType::Identifier, {
                let typed = Rc::clone(&typed);
                move |path| typed(path)
            })
            .enter({
                let global = Rc::clone(&global);
                move |path| global(path)
            });
        let exploded = visitor.explode();

        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::Identifier), 2);
        assert_eq!(exploded.handler_count(Phase::Enter, NodeType::Program), 1);
        assert!(exploded.has_global_handlers());
    }

    #[test]
    fn test_explode_is_cached() {
        let visitor = Visitor::<()>::new().on_enter(NodeType::Identifier, noop);
        assert!(!visitor.is_exploded());

        let first = visitor.explode();
        let second = visitor.explode();

        assert!(visitor.is_exploded());
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_builder_invalidates_cached_table() {
        let visitor = Visitor::<()>::new().on_enter(NodeType::Identifier, noop);
        let _ = visitor.explode();

        let visitor = visitor.blacklist([NodeType::Program]);
        assert!(!visitor.is_exploded());
        assert!(visitor.explode().is_blacklisted(NodeType::Program));
    }
}
