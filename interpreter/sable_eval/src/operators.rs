//! Operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for binary, relational, equality,
//! and unary operations. The value variant set is fixed (not
//! user-extensible), so pattern matching is preferred over trait objects
//! for exhaustiveness checking.

use sable_ir::{BinaryOp, EqualityOp, RelationalOp, StringLookup, UnaryOp};
use sable_match::{
    division_by_zero, unsupported_operation, unsupported_unary, EvalResult, Value,
};
use std::cmp::Ordering;

/// Evaluate an arithmetic binary operation.
///
/// Int/Int stays Int (division truncates toward zero); mixed Int/Float
/// promotes to Float; `String +` stringifies any non-nil right operand;
/// `String * Int` repeats. Everything else is an UnsupportedOperation.
pub fn evaluate_binary<I: StringLookup>(
    left: Value,
    right: Value,
    op: BinaryOp,
    interner: &I,
) -> EvalResult {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float_binary(*a as f64, *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float_binary(*a, *b as f64, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Str(s), _) => eval_string_binary(s, &right, op, interner),
        _ => Err(unsupported_operation(
            op.symbol(),
            left.type_name(interner),
            right.type_name(interner),
        )),
    }
}

/// Binary operations on integers.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::int(a + b)),
        BinaryOp::Sub => Ok(Value::int(a - b)),
        BinaryOp::Mul => Ok(Value::int(a * b)),
        BinaryOp::Div => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                // Rust's `/` truncates toward zero, as required.
                Ok(Value::int(a / b))
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                Ok(Value::int(a % b))
            }
        }
    }
}

/// Binary operations on floats (and promoted mixed operands).
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::float(a + b)),
        BinaryOp::Sub => Ok(Value::float(a - b)),
        BinaryOp::Mul => Ok(Value::float(a * b)),
        BinaryOp::Div => Ok(Value::float(a / b)),
        BinaryOp::Mod => Ok(Value::float(a % b)),
    }
}

/// Binary operations with a string left operand.
fn eval_string_binary<I: StringLookup>(
    s: &str,
    right: &Value,
    op: BinaryOp,
    interner: &I,
) -> EvalResult {
    match (op, right) {
        // `String + nil` is not supported; everything else stringifies.
        (BinaryOp::Add, Value::Nil) => {
            Err(unsupported_operation("+", "String", "Nil"))
        }
        (BinaryOp::Add, _) => Ok(Value::string(format!(
            "{s}{}",
            right.display_value(interner)
        ))),
        (BinaryOp::Mul, Value::Int(n)) => {
            // Negative counts yield the empty string.
            let count = usize::try_from(*n).unwrap_or(0);
            Ok(Value::string(s.repeat(count)))
        }
        _ => Err(unsupported_operation(
            op.symbol(),
            "String",
            right.type_name(interner),
        )),
    }
}

/// Evaluate an equality operation.
///
/// Never fails: cross-variant operands are simply unequal, with Int/Float
/// comparing mathematically.
pub fn evaluate_equality(left: &Value, right: &Value, op: EqualityOp) -> Value {
    let eq = left.equals(right);
    Value::Bool(match op {
        EqualityOp::Eq => eq,
        EqualityOp::NotEq => !eq,
    })
}

/// Evaluate a relational operation.
///
/// Defined for numeric/numeric and string/string operands only.
pub fn evaluate_relational<I: StringLookup>(
    left: Value,
    right: Value,
    op: RelationalOp,
    interner: &I,
) -> EvalResult {
    let ord = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            // Mixed and float comparisons use partial_cmp for IEEE 754
            // compliance (NaN compares as neither less nor greater).
            match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            }
        }
        (Value::Str(a), Value::Str(b)) => Some((**a).cmp(&**b)),
        _ => {
            return Err(unsupported_operation(
                op.symbol(),
                left.type_name(interner),
                right.type_name(interner),
            ))
        }
    };
    let holds = match op {
        RelationalOp::Lt => matches!(ord, Some(Ordering::Less)),
        RelationalOp::LtEq => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        RelationalOp::Gt => matches!(ord, Some(Ordering::Greater)),
        RelationalOp::GtEq => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
    };
    Ok(Value::Bool(holds))
}

/// Evaluate a unary operation.
///
/// `-` negates numerics; `!` inverts truthiness.
pub fn evaluate_unary<I: StringLookup>(op: UnaryOp, operand: Value, interner: &I) -> EvalResult {
    match op {
        UnaryOp::Neg => match operand {
            Value::Int(n) => Ok(Value::int(-n)),
            Value::Float(f) => Ok(Value::float(-f)),
            other => Err(unsupported_unary("-", other.type_name(interner))),
        },
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}
