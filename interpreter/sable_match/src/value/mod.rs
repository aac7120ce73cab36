//! Runtime values for the Sable interpreter.
//!
//! # Heap Enforcement
//!
//! All heap allocations go through factory methods on `Value`. The
//! `Heap<T>` wrapper has a crate-private constructor, so external code
//! cannot create heap payloads directly:
//!
//! ```text
//! let s = Value::string("hello");     // OK
//! let l = Value::list(vec![]);        // OK
//! let s = Value::Str(Heap::new(...)); // ERROR: Heap::new is pub(crate)
//! ```
//!
//! Primitives are immutable; containers hold shared handles, so cloning a
//! `Value` never deep-copies and binding is by reference.

mod composite;
mod heap;

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

// Re-export StringLookup from sable_ir for convenience
pub use sable_ir::{Name, StringLookup};

pub use composite::{FunctorValue, InstanceValue, ScopeHandle, TypeValue};
pub use heap::Heap;

/// Map payload: Symbol keys to values, iteration in insertion order.
pub type ValueMap = IndexMap<Name, Value, FxBuildHasher>;

/// Runtime value in the Sable interpreter.
#[derive(Clone)]
pub enum Value {
    /// The unit value.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 string.
    Str(Heap<String>),
    /// Interned identifier-like token, distinct from `Str`.
    Symbol(Name),
    /// Ordered sequence; order and duplicates significant.
    List(Heap<Vec<Value>>),
    /// Symbol-keyed mapping in insertion order.
    Map(Heap<ValueMap>),
    /// A named type object with an instance scope.
    Type(TypeValue),
    /// An instance: owning type plus its own scope.
    Instance(InstanceValue),
    /// A callable wrapping a function definition.
    Functor(FunctorValue),
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value.
    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a symbol value.
    #[inline]
    pub fn symbol(name: Name) -> Self {
        Value::Symbol(name)
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value.
    #[inline]
    pub fn map(entries: ValueMap) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create a functor value.
    #[inline]
    pub fn functor(f: FunctorValue) -> Self {
        Value::Functor(f)
    }
}

// Value Methods

impl Value {
    /// Check if this value is truthy.
    ///
    /// A value is falsey iff it is Nil or Bool(false); everything else,
    /// including 0, 0.0, "" and [], is truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Whether this is an Int or Float.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Whether this is a String.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Try to view as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to view as a float, promoting Int.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to view as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to view as a map.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Canonical per-variant type label.
    ///
    /// These strings name the kernel's canonical Type objects. For an
    /// Instance the label is the generic `"Instance"`; use `type_name` to
    /// report the instance's own type name.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Type(_) => "Type",
            Value::Instance(_) => "Instance",
            Value::Functor(_) => "Functor",
        }
    }

    /// Type name for error messages and the `type` query.
    ///
    /// Same as `type_label` except that an Instance reports its type's own
    /// name.
    pub fn type_name<I: StringLookup + ?Sized>(&self, interner: &I) -> &'static str {
        match self {
            Value::Instance(i) => interner.lookup(i.type_value().name()),
            _ => self.type_label(),
        }
    }

    /// Check equality with another value.
    ///
    /// Int and Float compare equal when mathematically equal (`1 == 1.0`).
    /// All other cross-variant comparisons are unequal. Containers compare
    /// structurally; types, instances, and functors by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                int_float_eq(*i, *f)
            }
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.equals(w)))
            }
            (Value::Type(a), Value::Type(b)) => a.same_type(b),
            (Value::Instance(a), Value::Instance(b)) => a.same_instance(b),
            (Value::Functor(a), Value::Functor(b)) => a.same_functor(b),
            _ => false,
        }
    }

    /// Stringification used by display and `String +` concatenation.
    pub fn display_value<I: StringLookup + ?Sized>(&self, interner: &I) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Symbol(name) => interner.lookup(*name).to_string(),
            Value::List(items) => {
                let inner: Vec<_> = items.iter().map(|v| v.display_value(interner)).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Map(map) => {
                let inner: Vec<_> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", interner.lookup(*k), v.display_value(interner)))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Type(ty) => interner.lookup(ty.name()).to_string(),
            Value::Instance(i) => {
                format!("#<{}>", interner.lookup(i.type_value().name()))
            }
            Value::Functor(f) => format!("<functor {}>", interner.lookup(f.name())),
        }
    }
}

/// Whether an Int and a Float are mathematically equal.
///
/// True iff the float is integral, representable in i64 range, and equal.
fn int_float_eq(i: i64, f: f64) -> bool {
    if f.fract() != 0.0 || !f.is_finite() {
        return false;
    }
    // Exclusive upper bound: i64::MAX + 1 is exact in f64, and every float
    // inside the range converts to i64 without saturation.
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) {
        return false;
    }
    f as i64 == i
}

// Trait Implementations

/// Equality follows `Value::equals`, including Int/Float cross-equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Symbol(name) => write!(f, "Symbol({name:?})"),
            Value::List(items) => write!(f, "List({:?})", &**items),
            Value::Map(map) => {
                write!(f, "Map(")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v:?}")?;
                }
                write!(f, ")")
            }
            Value::Type(ty) => write!(f, "Type({:?})", ty.name()),
            Value::Instance(i) => write!(f, "Instance({:?})", i.type_value().name()),
            Value::Functor(func) => write!(f, "{func:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::int(0).is_truthy());
        assert!(Value::float(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn test_numeric_cross_equality() {
        assert_eq!(Value::int(1), Value::float(1.0));
        assert_eq!(Value::float(2.0), Value::int(2));
        assert_ne!(Value::int(1), Value::float(1.1));
        assert_ne!(Value::int(1), Value::float(f64::NAN));
    }

    #[test]
    fn test_cross_variant_unequal() {
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::int(0), Value::Bool(false));
        assert_ne!(Value::string("1"), Value::int(1));
        assert_ne!(Value::symbol(Name::from_raw(1)), Value::string(""));
    }

    #[test]
    fn test_list_structural_equality() {
        let a = Value::list(vec![Value::int(1), Value::float(2.0)]);
        let b = Value::list(vec![Value::float(1.0), Value::int(2)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_shares_container() {
        let list = Value::list(vec![Value::int(1)]);
        let alias = list.clone();
        match (&list, &alias) {
            (Value::List(a), Value::List(b)) => assert!(Heap::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(Value::int(1).type_label(), "Integer");
        assert_eq!(Value::float(1.0).type_label(), "Float");
        assert_eq!(Value::Nil.type_label(), "Nil");
        assert_eq!(Value::Bool(true).type_label(), "Boolean");
        assert_eq!(Value::string("").type_label(), "String");
        assert_eq!(Value::list(vec![]).type_label(), "List");
    }

    #[test]
    fn test_int_float_eq_edges() {
        assert!(int_float_eq(0, 0.0));
        assert!(int_float_eq(0, -0.0));
        assert!(!int_float_eq(0, f64::INFINITY));
        assert!(!int_float_eq(i64::MAX, 9.3e18));
    }
}
