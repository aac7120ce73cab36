//! Destructuring match engine for `pattern =: value`.
//!
//! The engine unifies a pattern tree against a value and stages the names
//! it would bind into a `BindingSet`. It never mutates a scope itself: the
//! caller commits the set only after the whole pattern succeeded, which
//! gives match-assign its all-or-nothing semantics.
//!
//! Interpolation patterns and constant references need the evaluator
//! (expression evaluation, scope lookup, kernel types); the engine reaches
//! it through the `PatternExecutor` trait.

use sable_ir::{Location, Name, Node, NodeKind, StringLookup};

use crate::errors::{
    match_arity_mismatch, match_expected_list, match_expected_map, match_literal_mismatch,
    match_missing_key, match_multiple_splats, match_type_mismatch, splat_outside_list,
    unsupported_node, EvalError, EvalResult,
};
use crate::value::{TypeValue, Value};

/// Evaluator services the match engine depends on.
///
/// Implemented by the interpreter; the `StringLookup` supertrait renders
/// names in match errors.
pub trait PatternExecutor: StringLookup {
    /// Evaluate an interpolation expression to a value.
    fn eval_expr(&mut self, expr: &Node) -> EvalResult;

    /// Resolve a constant reference to its stored value.
    fn lookup_const(&mut self, name: Name, location: Location) -> EvalResult;

    /// Canonical type of a value, if one is registered.
    ///
    /// For instances this is the instance's type; for primitives the
    /// kernel's canonical Type object.
    fn type_of(&self, value: &Value) -> Option<TypeValue>;
}

/// Bindings staged by a match attempt.
///
/// Nothing is visible to the program until the caller commits the set; a
/// failed sub-pattern therefore unbinds nothing.
#[derive(Debug, Default)]
pub struct BindingSet {
    entries: Vec<(Name, Value)>,
}

impl BindingSet {
    pub fn new() -> Self {
        BindingSet {
            entries: Vec::new(),
        }
    }

    /// Stage a binding.
    pub fn push(&mut self, name: Name, value: Value) {
        self.entries.push((name, value));
    }

    /// Staged bindings in staging order.
    pub fn iter(&self) -> impl Iterator<Item = &(Name, Value)> {
        self.entries.iter()
    }

    /// Consume the set for committing.
    pub fn into_entries(self) -> Vec<(Name, Value)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Match a pattern against a value.
///
/// On success returns the staged bindings for the caller to commit; on
/// failure returns a MatchError and stages nothing observable.
pub fn match_pattern(
    pattern: &Node,
    value: &Value,
    host: &mut dyn PatternExecutor,
) -> Result<BindingSet, EvalError> {
    let mut bindings = BindingSet::new();
    match_into(pattern, value, host, &mut bindings)?;
    Ok(bindings)
}

/// Recursive worker staging into `out`.
fn match_into(
    pattern: &Node,
    value: &Value,
    host: &mut dyn PatternExecutor,
    out: &mut BindingSet,
) -> Result<(), EvalError> {
    match &pattern.kind {
        NodeKind::NilLiteral => literal(&Value::Nil, value, pattern.location),
        NodeKind::BooleanLiteral(b) => literal(&Value::Bool(*b), value, pattern.location),
        NodeKind::IntegerLiteral(n) => literal(&Value::int(*n), value, pattern.location),
        NodeKind::FloatLiteral(f) => literal(&Value::float(*f), value, pattern.location),
        NodeKind::StringLiteral(s) => literal(&Value::string(s.clone()), value, pattern.location),
        NodeKind::SymbolLiteral(name) => literal(&Value::symbol(*name), value, pattern.location),

        // Identifiers always match and bind; `_name` identifiers follow the
        // same path (the discardable convention lives in the parser/linter).
        NodeKind::VariableReference(name) => {
            out.push(*name, value.clone());
            Ok(())
        }

        // A const naming a Type is a type pattern; any other stored value
        // behaves as a literal.
        NodeKind::ConstReference(name) => {
            let resolved = host.lookup_const(*name, pattern.location)?;
            match resolved {
                Value::Type(ty) => check_type(&ty, value, host, pattern.location),
                other => literal(&other, value, pattern.location),
            }
        }

        // Interpolation evaluates first and never binds.
        NodeKind::InterpolationExpression(expr) => {
            let evaluated = host.eval_expr(expr)?;
            match evaluated {
                Value::Type(ty) => check_type(&ty, value, host, pattern.location),
                other => literal(&other, value, pattern.location),
            }
        }

        NodeKind::ListLiteral(elements) => match_list(elements, value, host, out, pattern.location),
        NodeKind::MapLiteral(entries) => {
            let Value::Map(map) = value else {
                return Err(
                    match_expected_map(value.type_name(host)).with_location(pattern.location)
                );
            };
            // Every listed key must be present; extra keys are ignored.
            let map = map.clone();
            for entry in entries {
                let Some(sub_value) = map.get(&entry.key) else {
                    return Err(
                        match_missing_key(host.lookup(entry.key)).with_location(pattern.location)
                    );
                };
                match_into(&entry.value, sub_value, host, out)?;
            }
            Ok(())
        }

        NodeKind::SplatPattern(name) => {
            Err(splat_outside_list(host.lookup(*name)).with_location(pattern.location))
        }

        other => Err(unsupported_node(other.kind_name()).with_location(pattern.location)),
    }
}

/// Literal pattern: must equal the value (including Int/Float
/// cross-equality).
fn literal(expected: &Value, got: &Value, location: Location) -> Result<(), EvalError> {
    if expected.equals(got) {
        Ok(())
    } else {
        Err(match_literal_mismatch(expected, got).with_location(location))
    }
}

/// Type pattern: the value must be an instance of exactly this type.
///
/// Primitives check against their canonical type; instances against their
/// type pointer. No subtyping.
fn check_type(
    ty: &TypeValue,
    value: &Value,
    host: &mut dyn PatternExecutor,
    location: Location,
) -> Result<(), EvalError> {
    let actual = match value {
        Value::Instance(i) => Some(i.type_value().clone()),
        _ => host.type_of(value),
    };
    match actual {
        Some(actual) if actual.same_type(ty) => Ok(()),
        _ => Err(
            match_type_mismatch(host.lookup(ty.name()), value.type_name(host))
                .with_location(location),
        ),
    }
}

/// List pattern, with at most one splat.
///
/// Fixed elements match by position from both ends; the splat binds the
/// middle slice as a new List (no flattening, possibly empty).
fn match_list(
    elements: &[Node],
    value: &Value,
    host: &mut dyn PatternExecutor,
    out: &mut BindingSet,
    location: Location,
) -> Result<(), EvalError> {
    let Value::List(items) = value else {
        return Err(match_expected_list(value.type_name(host)).with_location(location));
    };
    let items = items.clone();

    let mut splat_at = None;
    for (idx, element) in elements.iter().enumerate() {
        if matches!(element.kind, NodeKind::SplatPattern(_)) {
            if splat_at.is_some() {
                return Err(match_multiple_splats().with_location(location));
            }
            splat_at = Some(idx);
        }
    }

    let Some(splat_at) = splat_at else {
        // Exact arity without a splat.
        if elements.len() != items.len() {
            return Err(match_arity_mismatch(elements.len(), items.len()).with_location(location));
        }
        for (element, item) in elements.iter().zip(items.iter()) {
            match_into(element, item, host, out)?;
        }
        return Ok(());
    };

    let head = &elements[..splat_at];
    let tail = &elements[splat_at + 1..];
    let fixed = head.len() + tail.len();
    if items.len() < fixed {
        return Err(match_arity_mismatch(fixed, items.len()).with_location(location));
    }

    for (element, item) in head.iter().zip(items.iter()) {
        match_into(element, item, host, out)?;
    }

    let middle = &items[head.len()..items.len() - tail.len()];
    let NodeKind::SplatPattern(splat_name) = &elements[splat_at].kind else {
        unreachable!("splat_at indexes a SplatPattern");
    };
    let splat_name = *splat_name;
    // The splat always produces a fresh List, even for a single captured
    // element that is itself a List.
    out.push(splat_name, Value::list(middle.to_vec()));

    let tail_items = &items[items.len() - tail.len()..];
    for (element, item) in tail.iter().zip(tail_items.iter()) {
        match_into(element, item, host, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{undefined_variable, ErrorKind};
    use crate::value::ValueMap;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashMap;
    use sable_ir::{MapEntry, StringInterner};

    /// Minimal host: literal-only eval, const table, two canonical types.
    struct TestHost {
        interner: StringInterner,
        consts: FxHashMap<Name, Value>,
        integer_type: TypeValue,
        string_type: TypeValue,
    }

    impl TestHost {
        fn new() -> Self {
            let interner = StringInterner::new();
            let integer_type = TypeValue::new(interner.intern("Integer"));
            let string_type = TypeValue::new(interner.intern("String"));
            TestHost {
                interner,
                consts: FxHashMap::default(),
                integer_type,
                string_type,
            }
        }

        fn intern(&self, s: &str) -> Name {
            self.interner.intern(s)
        }
    }

    impl StringLookup for TestHost {
        fn lookup(&self, name: Name) -> &'static str {
            self.interner.lookup(name)
        }
    }

    impl PatternExecutor for TestHost {
        fn eval_expr(&mut self, expr: &Node) -> EvalResult {
            match &expr.kind {
                NodeKind::IntegerLiteral(n) => Ok(Value::int(*n)),
                NodeKind::FloatLiteral(f) => Ok(Value::float(*f)),
                NodeKind::VariableReference(name) | NodeKind::ConstReference(name) => self
                    .consts
                    .get(name)
                    .cloned()
                    .ok_or_else(|| undefined_variable(self.interner.lookup(*name))),
                other => Err(unsupported_node(other.kind_name())),
            }
        }

        fn lookup_const(&mut self, name: Name, location: Location) -> EvalResult {
            self.consts
                .get(&name)
                .cloned()
                .ok_or_else(|| undefined_variable(self.interner.lookup(name)).with_location(location))
        }

        fn type_of(&self, value: &Value) -> Option<TypeValue> {
            match value {
                Value::Instance(i) => Some(i.type_value().clone()),
                Value::Int(_) => Some(self.integer_type.clone()),
                Value::Str(_) => Some(self.string_type.clone()),
                _ => None,
            }
        }
    }

    fn bound(bindings: &BindingSet, name: Name) -> Option<Value> {
        bindings
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn test_literal_matches_cross_numeric() {
        let mut host = TestHost::new();
        let bindings =
            match_pattern(&Node::int(2), &Value::float(2.0), &mut host).expect("match");
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_literal_mismatch_is_match_error() {
        let mut host = TestHost::new();
        let err = match_pattern(&Node::nil(), &Value::Bool(false), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_identifier_binds() {
        let mut host = TestHost::new();
        let a = host.intern("a");
        let bindings = match_pattern(&Node::var(a), &Value::int(1), &mut host).expect("match");
        assert_eq!(bound(&bindings, a), Some(Value::int(1)));
    }

    #[test]
    fn test_underscore_identifier_binds() {
        let mut host = TestHost::new();
        let name = host.intern("_ignored");
        let bindings =
            match_pattern(&Node::var(name), &Value::string("x"), &mut host).expect("match");
        assert_eq!(bound(&bindings, name), Some(Value::string("x")));
    }

    #[test]
    fn test_const_type_pattern() {
        let mut host = TestHost::new();
        let name = host.intern("Integer");
        host.consts
            .insert(name, Value::Type(host.integer_type.clone()));
        assert!(match_pattern(&Node::constant(name), &Value::int(5), &mut host).is_ok());
        let err =
            match_pattern(&Node::constant(name), &Value::string("5"), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_const_value_pattern() {
        let mut host = TestHost::new();
        let name = host.intern("A");
        host.consts.insert(name, Value::int(10));
        assert!(match_pattern(&Node::constant(name), &Value::int(10), &mut host).is_ok());
        host.consts.insert(name, Value::Bool(false));
        let err = match_pattern(&Node::constant(name), &Value::Bool(true), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_interpolation_never_binds() {
        let mut host = TestHost::new();
        let a = host.intern("a");
        host.consts.insert(a, Value::int(2));
        let pattern = Node::interpolation(Node::var(a));
        let bindings = match_pattern(&pattern, &Value::float(2.0), &mut host).expect("match");
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_interpolation_type_check() {
        let mut host = TestHost::new();
        let t = host.intern("int_type");
        host.consts
            .insert(t, Value::Type(host.integer_type.clone()));
        let pattern = Node::interpolation(Node::var(t));
        assert!(match_pattern(&pattern, &Value::int(5), &mut host).is_ok());
        let err = match_pattern(&pattern, &Value::float(1.5), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_empty_list_pattern() {
        let mut host = TestHost::new();
        assert!(match_pattern(&Node::list(vec![]), &Value::list(vec![]), &mut host).is_ok());
    }

    #[test]
    fn test_list_arity_mismatch() {
        let mut host = TestHost::new();
        let a = host.intern("a");
        let pattern = Node::list(vec![Node::var(a)]);
        let err =
            match_pattern(&pattern, &Value::list(vec![Value::int(1), Value::int(2)]), &mut host)
                .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_list_destructures() {
        let mut host = TestHost::new();
        let (a, b) = (host.intern("a"), host.intern("b"));
        let pattern = Node::list(vec![Node::var(a), Node::var(b)]);
        let value = Value::list(vec![Value::int(1), Value::int(2)]);
        let bindings = match_pattern(&pattern, &value, &mut host).expect("match");
        assert_eq!(bound(&bindings, a), Some(Value::int(1)));
        assert_eq!(bound(&bindings, b), Some(Value::int(2)));
    }

    #[test]
    fn test_middle_splat() {
        let mut host = TestHost::new();
        let mid = host.intern("mid");
        let pattern = Node::list(vec![Node::int(1), Node::splat(mid), Node::int(4)]);
        let value = Value::list(vec![
            Value::int(1),
            Value::int(2),
            Value::int(3),
            Value::int(4),
        ]);
        let bindings = match_pattern(&pattern, &value, &mut host).expect("match");
        assert_eq!(
            bound(&bindings, mid),
            Some(Value::list(vec![Value::int(2), Value::int(3)]))
        );
    }

    #[test]
    fn test_splat_captures_empty_list() {
        let mut host = TestHost::new();
        let rest = host.intern("rest");
        let pattern = Node::list(vec![Node::int(1), Node::splat(rest)]);
        let value = Value::list(vec![Value::int(1)]);
        let bindings = match_pattern(&pattern, &value, &mut host).expect("match");
        assert_eq!(bound(&bindings, rest), Some(Value::list(vec![])));
    }

    #[test]
    fn test_splat_wraps_single_list_element() {
        let mut host = TestHost::new();
        let rest = host.intern("list");
        let pattern = Node::list(vec![Node::int(1), Node::splat(rest)]);
        let inner = Value::list(vec![Value::int(2), Value::int(3)]);
        let value = Value::list(vec![Value::int(1), inner.clone()]);
        let bindings = match_pattern(&pattern, &value, &mut host).expect("match");
        assert_eq!(bound(&bindings, rest), Some(Value::list(vec![inner])));
    }

    #[test]
    fn test_head_and_tail_splats() {
        let mut host = TestHost::new();
        let rest = host.intern("rest");
        let items = Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]);

        // Head splat
        let pattern = Node::list(vec![Node::splat(rest), Node::int(3)]);
        let bindings = match_pattern(&pattern, &items, &mut host).expect("match");
        assert_eq!(
            bound(&bindings, rest),
            Some(Value::list(vec![Value::int(1), Value::int(2)]))
        );

        // Tail splat
        let pattern = Node::list(vec![Node::int(1), Node::splat(rest)]);
        let bindings = match_pattern(&pattern, &items, &mut host).expect("match");
        assert_eq!(
            bound(&bindings, rest),
            Some(Value::list(vec![Value::int(2), Value::int(3)]))
        );
    }

    #[test]
    fn test_multiple_splats_rejected() {
        let mut host = TestHost::new();
        let (a, b) = (host.intern("a"), host.intern("b"));
        let pattern = Node::list(vec![Node::splat(a), Node::splat(b)]);
        let err = match_pattern(&pattern, &Value::list(vec![]), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_splat_too_few_items() {
        let mut host = TestHost::new();
        let mid = host.intern("mid");
        let pattern = Node::list(vec![Node::int(1), Node::splat(mid), Node::int(2)]);
        let err = match_pattern(&pattern, &Value::list(vec![Value::int(1)]), &mut host)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_empty_map_pattern() {
        let mut host = TestHost::new();
        let pattern = Node::map(vec![]);
        assert!(match_pattern(&pattern, &Value::map(ValueMap::default()), &mut host).is_ok());
    }

    #[test]
    fn test_map_pattern_binds_and_ignores_extras() {
        let mut host = TestHost::new();
        let (a, b, x) = (host.intern("a"), host.intern("b"), host.intern("x"));
        let mut entries = ValueMap::default();
        entries.insert(a, Value::int(1));
        entries.insert(b, Value::int(2));
        let value = Value::map(entries);

        let pattern = Node::map(vec![MapEntry {
            key: a,
            value: Node::var(x),
        }]);
        let bindings = match_pattern(&pattern, &value, &mut host).expect("match");
        assert_eq!(bound(&bindings, x), Some(Value::int(1)));
    }

    #[test]
    fn test_map_missing_key() {
        let mut host = TestHost::new();
        let a = host.intern("a");
        let pattern = Node::map(vec![MapEntry {
            key: a,
            value: Node::int(1),
        }]);
        let err =
            match_pattern(&pattern, &Value::map(ValueMap::default()), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_nested_failure_stages_nothing_observable() {
        let mut host = TestHost::new();
        let (a, b) = (host.intern("a"), host.intern("b"));
        // `[a, 3]` against [1, 2]: `a` is staged, then the literal fails.
        let pattern = Node::list(vec![Node::var(a), Node::int(3)]);
        let value = Value::list(vec![Value::int(1), Value::int(2)]);
        let err = match_pattern(&pattern, &value, &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
        // The failed call returned no binding set at all, so neither `a`
        // nor `b` can leak into a scope.
        let _ = b;
    }

    #[test]
    fn test_splat_outside_list_rejected() {
        let mut host = TestHost::new();
        let rest = host.intern("rest");
        let err = match_pattern(&Node::splat(rest), &Value::int(1), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Match);
    }

    #[test]
    fn test_non_pattern_node_rejected() {
        let mut host = TestHost::new();
        let pattern = Node::block(vec![]);
        let err = match_pattern(&pattern, &Value::int(1), &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedNode);
    }
}
