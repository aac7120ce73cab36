//! AST node kinds consumed by the evaluator.
//!
//! The parser produces this tree; the evaluator dispatches on `NodeKind`.
//! Patterns (the left side of `=:`) reuse expression node kinds: an
//! identifier node binds, a literal node compares, a list literal
//! destructures, plus the pattern-only `SplatPattern` and
//! `InterpolationExpression` kinds.

use crate::{Location, Name};

/// Arithmetic operators of `BinaryExpression`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Source-text spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// Operators of `EqualityExpression`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EqualityOp {
    Eq,
    NotEq,
}

/// Operators of `RelationalExpression`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelationalOp {
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl RelationalOp {
    /// Source-text spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOp::Lt => "<",
            RelationalOp::LtEq => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::GtEq => ">=",
        }
    }
}

/// Operators of `LogicalExpression`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Operators of `UnaryExpression`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    /// Source-text spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Formal parameter of a function definition.
///
/// A splat parameter (`*rest`) captures the middle argument slice as a List,
/// with the same slicing rule as the match-engine splat.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub splat: bool,
}

impl Param {
    /// Plain positional parameter.
    pub fn new(name: Name) -> Self {
        Param { name, splat: false }
    }

    /// Splat parameter (`*name`).
    pub fn splat(name: Name) -> Self {
        Param { name, splat: true }
    }
}

/// One `key: value` entry of a map literal. Keys are static symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub key: Name,
    pub value: Node,
}

/// AST node: a kind plus the source location it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
}

/// The closed set of node kinds the evaluator understands.
///
/// Anything outside this set raises UnsupportedNode at evaluation time.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Statement sequence; all but the last result are discarded.
    Block(Vec<Node>),
    /// Expression sequence with Block semantics (program roots, `do` bodies).
    ExpressionList(Vec<Node>),
    /// `target = value`
    SimpleAssignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    /// `pattern =: value`
    MatchAssign {
        pattern: Box<Node>,
        value: Box<Node>,
    },
    /// `def name(params) body end`
    FunctionDefinition {
        name: Name,
        params: Vec<Param>,
        body: Box<Node>,
    },
    /// `callee(args)`; the callee must be an identifier reference.
    FunctionCall {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    /// `lhs && rhs`, `lhs || rhs`
    LogicalExpression {
        op: LogicalOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `lhs == rhs`, `lhs != rhs`
    EqualityExpression {
        op: EqualityOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `lhs < rhs` and friends
    RelationalExpression {
        op: RelationalOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `lhs + rhs` and friends
    BinaryExpression {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `-operand`, `!operand`
    UnaryExpression {
        op: UnaryOp,
        operand: Box<Node>,
    },
    /// Lowercase identifier. In pattern position this binds.
    VariableReference(Name),
    /// Uppercase constant. In pattern position this resolves and compares.
    ConstReference(Name),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    SymbolLiteral(Name),
    BooleanLiteral(bool),
    NilLiteral,
    ListLiteral(Vec<Node>),
    MapLiteral(Vec<MapEntry>),
    /// `*name`, valid only inside a list pattern.
    SplatPattern(Name),
    /// `<expr>`; evaluates `expr` and compares, never binds.
    InterpolationExpression(Box<Node>),
}

impl NodeKind {
    /// Stable kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Block(_) => "Block",
            NodeKind::ExpressionList(_) => "ExpressionList",
            NodeKind::SimpleAssignment { .. } => "SimpleAssignment",
            NodeKind::MatchAssign { .. } => "MatchAssign",
            NodeKind::FunctionDefinition { .. } => "FunctionDefinition",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::EqualityExpression { .. } => "EqualityExpression",
            NodeKind::RelationalExpression { .. } => "RelationalExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::VariableReference(_) => "VariableReference",
            NodeKind::ConstReference(_) => "ConstReference",
            NodeKind::IntegerLiteral(_) => "IntegerLiteral",
            NodeKind::FloatLiteral(_) => "FloatLiteral",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::SymbolLiteral(_) => "SymbolLiteral",
            NodeKind::BooleanLiteral(_) => "BooleanLiteral",
            NodeKind::NilLiteral => "NilLiteral",
            NodeKind::ListLiteral(_) => "ListLiteral",
            NodeKind::MapLiteral(_) => "MapLiteral",
            NodeKind::SplatPattern(_) => "SplatPattern",
            NodeKind::InterpolationExpression(_) => "InterpolationExpression",
        }
    }
}

// Builder constructors.
//
// Builders default to `Location::DUMMY` (tests, embedding hosts); the parser
// attaches real locations via `with_location`.

impl Node {
    /// Create a node at an explicit location.
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Node { kind, location }
    }

    /// Replace this node's location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn int(value: i64) -> Self {
        Node::new(NodeKind::IntegerLiteral(value), Location::DUMMY)
    }

    pub fn float(value: f64) -> Self {
        Node::new(NodeKind::FloatLiteral(value), Location::DUMMY)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::new(NodeKind::StringLiteral(value.into()), Location::DUMMY)
    }

    pub fn symbol(name: Name) -> Self {
        Node::new(NodeKind::SymbolLiteral(name), Location::DUMMY)
    }

    pub fn boolean(value: bool) -> Self {
        Node::new(NodeKind::BooleanLiteral(value), Location::DUMMY)
    }

    pub fn nil() -> Self {
        Node::new(NodeKind::NilLiteral, Location::DUMMY)
    }

    pub fn list(elements: Vec<Node>) -> Self {
        Node::new(NodeKind::ListLiteral(elements), Location::DUMMY)
    }

    pub fn map(entries: Vec<MapEntry>) -> Self {
        Node::new(NodeKind::MapLiteral(entries), Location::DUMMY)
    }

    pub fn var(name: Name) -> Self {
        Node::new(NodeKind::VariableReference(name), Location::DUMMY)
    }

    pub fn constant(name: Name) -> Self {
        Node::new(NodeKind::ConstReference(name), Location::DUMMY)
    }

    pub fn block(children: Vec<Node>) -> Self {
        Node::new(NodeKind::Block(children), Location::DUMMY)
    }

    pub fn expression_list(children: Vec<Node>) -> Self {
        Node::new(NodeKind::ExpressionList(children), Location::DUMMY)
    }

    pub fn simple_assign(target: Node, value: Node) -> Self {
        Node::new(
            NodeKind::SimpleAssignment {
                target: Box::new(target),
                value: Box::new(value),
            },
            Location::DUMMY,
        )
    }

    pub fn match_assign(pattern: Node, value: Node) -> Self {
        Node::new(
            NodeKind::MatchAssign {
                pattern: Box::new(pattern),
                value: Box::new(value),
            },
            Location::DUMMY,
        )
    }

    pub fn function_def(name: Name, params: Vec<Param>, body: Node) -> Self {
        Node::new(
            NodeKind::FunctionDefinition {
                name,
                params,
                body: Box::new(body),
            },
            Location::DUMMY,
        )
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::new(
            NodeKind::FunctionCall {
                callee: Box::new(callee),
                args,
            },
            Location::DUMMY,
        )
    }

    pub fn logical(op: LogicalOp, lhs: Node, rhs: Node) -> Self {
        Node::new(
            NodeKind::LogicalExpression {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Location::DUMMY,
        )
    }

    pub fn equality(op: EqualityOp, lhs: Node, rhs: Node) -> Self {
        Node::new(
            NodeKind::EqualityExpression {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Location::DUMMY,
        )
    }

    pub fn relational(op: RelationalOp, lhs: Node, rhs: Node) -> Self {
        Node::new(
            NodeKind::RelationalExpression {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Location::DUMMY,
        )
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
        Node::new(
            NodeKind::BinaryExpression {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Location::DUMMY,
        )
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::new(
            NodeKind::UnaryExpression {
                op,
                operand: Box::new(operand),
            },
            Location::DUMMY,
        )
    }

    pub fn splat(name: Name) -> Self {
        Node::new(NodeKind::SplatPattern(name), Location::DUMMY)
    }

    pub fn interpolation(expr: Node) -> Self {
        Node::new(
            NodeKind::InterpolationExpression(Box::new(expr)),
            Location::DUMMY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_use_dummy_location() {
        let node = Node::int(1);
        assert_eq!(node.location, Location::DUMMY);
        assert_eq!(node.kind, NodeKind::IntegerLiteral(1));
    }

    #[test]
    fn test_with_location() {
        let loc = Location::new(Name::EMPTY, 3, 7);
        let node = Node::nil().with_location(loc);
        assert_eq!(node.location.line, 3);
        assert_eq!(node.location.column, 7);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Node::nil().kind.kind_name(), "NilLiteral");
        let assign = Node::match_assign(Node::var(Name::EMPTY), Node::int(1));
        assert_eq!(assign.kind.kind_name(), "MatchAssign");
    }
}
