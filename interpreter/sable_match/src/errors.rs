//! Error types for evaluation and pattern matching.

use sable_ir::Location;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Semantic kind of an evaluation error.
///
/// Kinds are a closed enum so hosts (and a future `rescue`) can match on
/// identity rather than parsing messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Pattern failed to match value.
    Match,
    /// Lookup found no binding.
    UndefinedVariable,
    /// Operands of incompatible variants.
    UnsupportedOperation,
    /// Integer division or modulo by zero.
    DivisionByZero,
    /// Callee is not an identifier or is not registered.
    CallTarget,
    /// Argument count does not fit the parameter list.
    Arity,
    /// Attempt to pop the root scope (internal invariant).
    ScopeUnderflow,
    /// AST node kind not known to the evaluator.
    UnsupportedNode,
    /// Assertion raised by the standard library.
    AssertionFailure,
}

impl ErrorKind {
    /// Stable label used when formatting captured errors.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Match => "MatchError",
            ErrorKind::UndefinedVariable => "UndefinedVariable",
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::CallTarget => "CallTargetError",
            ErrorKind::Arity => "ArityError",
            ErrorKind::ScopeUnderflow => "ScopeUnderflow",
            ErrorKind::UnsupportedNode => "UnsupportedNode",
            ErrorKind::AssertionFailure => "AssertionFailure",
        }
    }
}

/// Left and right values of a failed assertion.
///
/// Assertions are raised by the standard library built on top of the core;
/// the evaluator treats them as ordinary errors but preserves both sides
/// for reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct AssertionDetails {
    pub left: Value,
    pub right: Value,
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Semantic kind.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
    /// Source location where the error occurred.
    pub location: Option<Location>,
    /// Left/right values when this is an assertion failure.
    pub assertion: Option<Box<AssertionDetails>>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            location: None,
            assertion: None,
        }
    }

    /// Attach a source location to this error.
    ///
    /// Builder method enabling chained construction:
    /// `undefined_variable("x").with_location(loc)`.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a source location if the error does not already carry one.
    ///
    /// Used at evaluator dispatch sites so the innermost location wins.
    #[must_use]
    pub fn or_location(mut self, location: Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Match Engine Errors

/// Literal pattern does not equal the value.
#[cold]
pub fn match_literal_mismatch(expected: &Value, got: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::Match,
        format!("expected {expected:?}, got {got:?}"),
    )
}

/// Type pattern does not cover the value.
#[cold]
pub fn match_type_mismatch(type_name: &str, got: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Match,
        format!("value of type {got} is not an instance of {type_name}"),
    )
}

/// List pattern arity does not fit the value.
#[cold]
pub fn match_arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Match,
        format!("list pattern expects {expected} element(s), got {got}"),
    )
}

/// List pattern applied to a non-list value.
#[cold]
pub fn match_expected_list(got: &str) -> EvalError {
    EvalError::new(ErrorKind::Match, format!("expected a List, got {got}"))
}

/// Map pattern applied to a non-map value.
#[cold]
pub fn match_expected_map(got: &str) -> EvalError {
    EvalError::new(ErrorKind::Match, format!("expected a Map, got {got}"))
}

/// Map pattern key absent from the value.
#[cold]
pub fn match_missing_key(key: &str) -> EvalError {
    EvalError::new(ErrorKind::Match, format!("missing map key :{key}"))
}

/// More than one splat in a list pattern.
#[cold]
pub fn match_multiple_splats() -> EvalError {
    EvalError::new(
        ErrorKind::Match,
        "list pattern allows at most one splat".to_string(),
    )
}

/// Splat pattern outside a list pattern.
#[cold]
pub fn splat_outside_list(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Match,
        format!("splat *{name} is only valid inside a list pattern"),
    )
}

// Variable and Call Errors

/// Undefined variable.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UndefinedVariable,
        format!("undefined variable: {name}"),
    )
}

/// Call target is not an identifier reference.
#[cold]
pub fn call_target_not_identifier(kind: &str) -> EvalError {
    EvalError::new(
        ErrorKind::CallTarget,
        format!("call target must be an identifier, got {kind}"),
    )
}

/// Call target identifier has no registered function.
#[cold]
pub fn call_target_unknown(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::CallTarget,
        format!("undefined function: {name}"),
    )
}

/// Wrong number of arguments in a function call.
#[cold]
pub fn arity_error(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        format!("{name} expects {expected} argument(s), got {got}"),
    )
}

// Operator Errors

/// Binary operands of incompatible variants.
///
/// Message shape: `` `<op>` is not supported for <A> and <B> ``.
#[cold]
pub fn unsupported_operation(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedOperation,
        format!("`{op}` is not supported for {left} and {right}"),
    )
}

/// Unary operand of an incompatible variant.
#[cold]
pub fn unsupported_unary(op: &str, operand: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedOperation,
        format!("`{op}` is not supported for {operand}"),
    )
}

/// Assignment target is not an identifier.
#[cold]
pub fn invalid_assignment_target(kind: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedOperation,
        format!("cannot assign to {kind}"),
    )
}

/// Integer division or modulo by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorKind::DivisionByZero, "division by zero".to_string())
}

/// Instance-scope operation attempted on a primitive value.
#[cold]
pub fn primitive_scope_violation(op: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedOperation,
        format!("`{op}` is not supported for primitive {type_name}"),
    )
}

// Internal Invariant Errors

/// Attempt to pop the root scope.
#[cold]
pub fn scope_underflow() -> EvalError {
    EvalError::new(
        ErrorKind::ScopeUnderflow,
        "attempted to pop the root scope".to_string(),
    )
}

/// AST node kind the evaluator does not understand.
#[cold]
pub fn unsupported_node(kind: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedNode,
        format!("unsupported node: {kind}"),
    )
}

// Assertion Channel

/// Assertion failure raised by the standard library.
///
/// Carries both compared values alongside the message; flows through the
/// ordinary error channel.
#[cold]
pub fn assertion_failure(left: Value, right: Value, message: impl Into<String>) -> EvalError {
    let mut err = EvalError::new(ErrorKind::AssertionFailure, message);
    err.assertion = Some(Box::new(AssertionDetails { left, right }));
    err
}
