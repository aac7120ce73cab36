//! Sable Match - runtime values, evaluation errors, and the destructuring
//! match engine.
//!
//! This crate sits below the evaluator:
//!
//! - `Value`: the closed tagged value model (nil, booleans, numbers,
//!   strings, symbols, lists, maps, types, instances, functors)
//! - `EvalError` / `ErrorKind` / `EvalResult`: the evaluation error surface
//! - `match_pattern`: pattern-vs-value unification with staged,
//!   all-or-nothing bindings
//!
//! The match engine needs to evaluate interpolation patterns and resolve
//! constants, both of which live in the evaluator. It reaches back up
//! through the `PatternExecutor` trait instead of depending on the
//! evaluator crate.

pub mod errors;
mod matcher;
mod value;

pub use errors::{AssertionDetails, ErrorKind, EvalError, EvalResult};
pub use matcher::{match_pattern, BindingSet, PatternExecutor};
pub use value::{FunctorValue, Heap, InstanceValue, ScopeHandle, TypeValue, Value, ValueMap};

// Re-export error constructors for convenience (canonical path is
// sable_match::errors::*)
pub use errors::{
    arity_error, assertion_failure, call_target_not_identifier, call_target_unknown,
    division_by_zero, invalid_assignment_target, match_arity_mismatch, match_expected_list,
    match_expected_map, match_literal_mismatch, match_missing_key, match_multiple_splats,
    match_type_mismatch, primitive_scope_violation, scope_underflow, splat_outside_list,
    undefined_variable, unsupported_node, unsupported_operation, unsupported_unary,
};
