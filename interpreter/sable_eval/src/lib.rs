//! Sable Eval - tree-walking evaluator for Sable programs.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `SymbolTable`: variable scoping as a stack of frames, each with a
//!   restrictive bit (function frames do not chain lookups upward)
//! - `FunctionTable`: named functor registry (define appends, call uses
//!   the first definition)
//! - `OperandStack`: the visitor's uniform return convention; every node
//!   evaluation pushes exactly one value
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator
//!   dispatch
//! - `Kernel`: canonical Type objects for primitive variants, backing
//!   `type_of` / `scope_of` and type patterns
//! - `Value` types from `sable_match`
//!
//! # Re-exports
//!
//! This crate re-exports value and error types from `sable_match` for
//! convenience: `Value`, `TypeValue`, `InstanceValue`, `FunctorValue`,
//! `EvalError`, `ErrorKind`, `EvalResult`.

mod environment;
mod functions;
mod interpreter;
mod kernel;
mod operators;
mod sink;
mod stack;

#[cfg(test)]
mod tests;

// Re-export value and error types from sable_match
pub use sable_match::{
    AssertionDetails, BindingSet, ErrorKind, EvalError, EvalResult, FunctorValue, Heap,
    InstanceValue, PatternExecutor, ScopeHandle, TypeValue, Value, ValueMap,
};

pub use environment::{Frame, SymbolTable};
pub use functions::FunctionTable;
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use kernel::Kernel;
pub use operators::{evaluate_binary, evaluate_equality, evaluate_relational, evaluate_unary};
pub use sink::{
    buffer_sink, silent_sink, stderr_sink, BufferErrorSink, ErrorSinkImpl, SharedErrorSink,
    StderrErrorSink,
};
pub use stack::{ensure_sufficient_stack, OperandStack};
