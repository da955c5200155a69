//! Node type tags and alias groups.
//!
//! Tag names follow the Babel/ESTree naming used by JavaScript tooling, so a
//! JSON dump produced by those tools can be loaded without renaming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AstError;

/// Type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NodeType {
    // Program structure
    /// Outermost wrapper around a program.
    File,
    /// Program body.
    Program,
    /// Directive prologue entry (`"use strict"`).
    Directive,
    /// Literal value of a directive.
    DirectiveLiteral,

    // Statements
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,

    // Expressions
    FunctionExpression,
    ArrowFunctionExpression,
    Identifier,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    AssignmentExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    ArrayExpression,
    ObjectExpression,
    ObjectProperty,
    ConditionalExpression,
    SequenceExpression,
    ThisExpression,
}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: &'static [NodeType] = &[
        NodeType::File,
        NodeType::Program,
        NodeType::Directive,
        NodeType::DirectiveLiteral,
        NodeType::ExpressionStatement,
        NodeType::BlockStatement,
        NodeType::EmptyStatement,
        NodeType::ReturnStatement,
        NodeType::ThrowStatement,
        NodeType::IfStatement,
        NodeType::WhileStatement,
        NodeType::ForStatement,
        NodeType::VariableDeclaration,
        NodeType::VariableDeclarator,
        NodeType::FunctionDeclaration,
        NodeType::FunctionExpression,
        NodeType::ArrowFunctionExpression,
        NodeType::Identifier,
        NodeType::StringLiteral,
        NodeType::NumericLiteral,
        NodeType::BooleanLiteral,
        NodeType::NullLiteral,
        NodeType::BinaryExpression,
        NodeType::LogicalExpression,
        NodeType::UnaryExpression,
        NodeType::UpdateExpression,
        NodeType::AssignmentExpression,
        NodeType::CallExpression,
        NodeType::NewExpression,
        NodeType::MemberExpression,
        NodeType::ArrayExpression,
        NodeType::ObjectExpression,
        NodeType::ObjectProperty,
        NodeType::ConditionalExpression,
        NodeType::SequenceExpression,
        NodeType::ThisExpression,
    ];

    /// Returns the tag name as it appears in JSON dumps.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "File",
            NodeType::Program => "Program",
            NodeType::Directive => "Directive",
            NodeType::DirectiveLiteral => "DirectiveLiteral",
            NodeType::ExpressionStatement => "ExpressionStatement",
            NodeType::BlockStatement => "BlockStatement",
            NodeType::EmptyStatement => "EmptyStatement",
            NodeType::ReturnStatement => "ReturnStatement",
            NodeType::ThrowStatement => "ThrowStatement",
            NodeType::IfStatement => "IfStatement",
            NodeType::WhileStatement => "WhileStatement",
            NodeType::ForStatement => "ForStatement",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::VariableDeclarator => "VariableDeclarator",
            NodeType::FunctionDeclaration => "FunctionDeclaration",
            NodeType::FunctionExpression => "FunctionExpression",
            NodeType::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeType::Identifier => "Identifier",
            NodeType::StringLiteral => "StringLiteral",
            NodeType::NumericLiteral => "NumericLiteral",
            NodeType::BooleanLiteral => "BooleanLiteral",
            NodeType::NullLiteral => "NullLiteral",
            NodeType::BinaryExpression => "BinaryExpression",
            NodeType::LogicalExpression => "LogicalExpression",
            NodeType::UnaryExpression => "UnaryExpression",
            NodeType::UpdateExpression => "UpdateExpression",
            NodeType::AssignmentExpression => "AssignmentExpression",
            NodeType::CallExpression => "CallExpression",
            NodeType::NewExpression => "NewExpression",
            NodeType::MemberExpression => "MemberExpression",
            NodeType::ArrayExpression => "ArrayExpression",
            NodeType::ObjectExpression => "ObjectExpression",
            NodeType::ObjectProperty => "ObjectProperty",
            NodeType::ConditionalExpression => "ConditionalExpression",
            NodeType::SequenceExpression => "SequenceExpression",
            NodeType::ThisExpression => "ThisExpression",
        }
    }

    /// Returns true for the two tags a traversal may start from without a scope.
    #[inline]
    pub const fn is_program_root(&self) -> bool {
        matches!(self, NodeType::File | NodeType::Program)
    }

    /// Returns true if nodes of this type open a new lexical scope.
    #[inline]
    pub fn is_scopable(&self) -> bool {
        self.is(Alias::Scopable)
    }

    /// Returns true if this type belongs to `alias`.
    #[inline]
    pub fn is(&self, alias: Alias) -> bool {
        self.aliases().contains(&alias)
    }

    /// Alias groups this type belongs to.
    pub const fn aliases(&self) -> &'static [Alias] {
        use Alias::*;

        match self {
            NodeType::File
            | NodeType::Directive
            | NodeType::DirectiveLiteral
            | NodeType::VariableDeclarator
            | NodeType::ObjectProperty => &[],
            NodeType::Program => &[Scopable],
            NodeType::ExpressionStatement
            | NodeType::EmptyStatement
            | NodeType::ReturnStatement
            | NodeType::ThrowStatement => &[Statement],
            NodeType::BlockStatement => &[Scopable, Statement],
            NodeType::IfStatement => &[Statement, Conditional],
            NodeType::WhileStatement => &[Statement, Loop],
            NodeType::ForStatement => &[Scopable, Statement, Loop],
            NodeType::VariableDeclaration => &[Statement, Declaration],
            NodeType::FunctionDeclaration => &[Scopable, Function, Statement, Declaration],
            NodeType::FunctionExpression | NodeType::ArrowFunctionExpression => {
                &[Scopable, Function, Expression]
            }
            NodeType::StringLiteral
            | NodeType::NumericLiteral
            | NodeType::BooleanLiteral
            | NodeType::NullLiteral => &[Expression, Literal],
            NodeType::BinaryExpression | NodeType::LogicalExpression => &[Binary, Expression],
            NodeType::ConditionalExpression => &[Expression, Conditional],
            NodeType::Identifier
            | NodeType::UnaryExpression
            | NodeType::UpdateExpression
            | NodeType::AssignmentExpression
            | NodeType::CallExpression
            | NodeType::NewExpression
            | NodeType::MemberExpression
            | NodeType::ArrayExpression
            | NodeType::ObjectExpression
            | NodeType::SequenceExpression
            | NodeType::ThisExpression => &[Expression],
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AstError::unknown_node_type(s))
    }
}

/// A named group of node types.
///
/// Visitors may register a handler for an alias; it applies to every member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Alias {
    Expression,
    Statement,
    Literal,
    Function,
    Scopable,
    Binary,
    Conditional,
    Loop,
    Declaration,
}

impl Alias {
    /// Every alias, in declaration order.
    pub const ALL: &'static [Alias] = &[
        Alias::Expression,
        Alias::Statement,
        Alias::Literal,
        Alias::Function,
        Alias::Scopable,
        Alias::Binary,
        Alias::Conditional,
        Alias::Loop,
        Alias::Declaration,
    ];

    /// Returns the alias name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Alias::Expression => "Expression",
            Alias::Statement => "Statement",
            Alias::Literal => "Literal",
            Alias::Function => "Function",
            Alias::Scopable => "Scopable",
            Alias::Binary => "Binary",
            Alias::Conditional => "Conditional",
            Alias::Loop => "Loop",
            Alias::Declaration => "Declaration",
        }
    }

    /// Node types belonging to this alias, in declaration order.
    pub fn members(self) -> impl Iterator<Item = NodeType> {
        NodeType::ALL.iter().copied().filter(move |t| t.is(self))
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alias {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alias::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AstError::unknown_node_type(s))
    }
}
