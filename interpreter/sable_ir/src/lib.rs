//! Sable IR - AST and identifier infrastructure for the Sable interpreter.
//!
//! This crate defines the tree the parser hands to the evaluator:
//!
//! - `Node` / `NodeKind`: the closed set of AST node kinds
//! - `Location`: file/line/column source positions carried by every node
//! - `Name` / `StringInterner`: compact interned identifiers
//!
//! The AST is a plain owned tree (children boxed into their parents) with a
//! single tagged `NodeKind` enum; the evaluator dispatches on the variant.

mod ast;
mod interner;
mod location;
mod name;

pub use ast::{
    BinaryOp, EqualityOp, LogicalOp, MapEntry, Node, NodeKind, Param, RelationalOp, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use location::Location;
pub use name::Name;
