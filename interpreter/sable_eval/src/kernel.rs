//! Kernel type registry: canonical Type objects for primitive variants.
//!
//! The kernel owns one `TypeValue` per built-in variant, created once at
//! interpreter construction and seeded into the root scope under its
//! canonical name. `type_of` answers with these identity-stable handles,
//! which is what makes type patterns on primitives work.

use rustc_hash::FxHashMap;
use sable_ir::{Name, StringInterner};
use sable_match::{primitive_scope_violation, EvalError, ScopeHandle, TypeValue, Value};

use crate::environment::SymbolTable;

/// Canonical Type objects, pre-interned at construction.
///
/// Field-per-type keeps `type_of` a single match with no hashing on the
/// hot path; `by_name` serves constant resolution.
pub struct Kernel {
    nil: TypeValue,
    boolean: TypeValue,
    integer: TypeValue,
    float: TypeValue,
    string: TypeValue,
    symbol: TypeValue,
    list: TypeValue,
    map: TypeValue,
    type_: TypeValue,
    functor: TypeValue,
    by_name: FxHashMap<Name, TypeValue>,
}

impl Kernel {
    /// Create the canonical types, interning their names.
    pub fn new(interner: &StringInterner) -> Self {
        let make = |label: &str| TypeValue::new(interner.intern(label));
        let nil = make("Nil");
        let boolean = make("Boolean");
        let integer = make("Integer");
        let float = make("Float");
        let string = make("String");
        let symbol = make("Symbol");
        let list = make("List");
        let map = make("Map");
        let type_ = make("Type");
        let functor = make("Functor");

        let mut by_name = FxHashMap::default();
        for ty in [
            &nil, &boolean, &integer, &float, &string, &symbol, &list, &map, &type_, &functor,
        ] {
            by_name.insert(ty.name(), ty.clone());
        }

        Kernel {
            nil,
            boolean,
            integer,
            float,
            string,
            symbol,
            list,
            map,
            type_,
            functor,
            by_name,
        }
    }

    /// Seed the canonical Type objects into the root scope.
    pub fn seed(&self, symbols: &mut SymbolTable) {
        for ty in self.by_name.values() {
            symbols.define_root(ty.name(), Value::Type(ty.clone()));
        }
    }

    /// Canonical type registered under `name`, if any.
    pub fn by_name(&self, name: Name) -> Option<TypeValue> {
        self.by_name.get(&name).cloned()
    }

    /// The type of a value.
    ///
    /// Instances answer with their own type; everything else with the
    /// canonical Type object for its variant. Identity-stable across calls.
    pub fn type_of(&self, value: &Value) -> TypeValue {
        match value {
            Value::Instance(i) => i.type_value().clone(),
            Value::Nil => self.nil.clone(),
            Value::Bool(_) => self.boolean.clone(),
            Value::Int(_) => self.integer.clone(),
            Value::Float(_) => self.float.clone(),
            Value::Str(_) => self.string.clone(),
            Value::Symbol(_) => self.symbol.clone(),
            Value::List(_) => self.list.clone(),
            Value::Map(_) => self.map.clone(),
            Value::Type(_) => self.type_.clone(),
            Value::Functor(_) => self.functor.clone(),
        }
    }

    /// The scope of a value.
    ///
    /// Instances answer with their own scope, types with their instance
    /// scope, and primitives with the instance scope of their canonical
    /// type.
    pub fn scope_of(&self, value: &Value) -> ScopeHandle {
        match value {
            Value::Instance(i) => i.scope(),
            Value::Type(ty) => ty.instance_scope(),
            other => self.type_of(other).instance_scope(),
        }
    }

    /// Reject instance-scope-style operations on primitive values.
    pub fn disallow_primitives(&self, value: &Value, op: &str) -> Result<(), EvalError> {
        match value {
            Value::Instance(_) | Value::Type(_) => Ok(()),
            other => Err(primitive_scope_violation(op, other.type_label())),
        }
    }
}
