//! Function table: named functor registry.
//!
//! Defining a name appends to its functor list; calling a name uses the
//! first entry. Overload selection beyond "first" is not defined.

use rustc_hash::FxHashMap;
use sable_ir::Name;
use sable_match::FunctorValue;

/// Interpreter-wide map from identifier to its functor definitions.
#[derive(Default)]
pub struct FunctionTable {
    entries: FxHashMap<Name, Vec<FunctorValue>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable {
            entries: FxHashMap::default(),
        }
    }

    /// Register a functor under a name. Redefinition appends.
    pub fn define(&mut self, name: Name, functor: FunctorValue) {
        self.entries.entry(name).or_default().push(functor);
    }

    /// Resolve a name to its first registered functor.
    pub fn resolve(&self, name: Name) -> Option<&FunctorValue> {
        self.entries.get(&name).and_then(|functors| functors.first())
    }

    /// Whether any functor is registered under the name.
    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ir::{Node, StringInterner};

    #[test]
    fn test_define_and_resolve() {
        let interner = StringInterner::new();
        let f = interner.intern("f");

        let mut table = FunctionTable::new();
        assert!(table.resolve(f).is_none());

        let functor = FunctorValue::new(f, vec![], Node::int(1));
        table.define(f, functor.clone());
        assert!(table.resolve(f).is_some_and(|r| r.same_functor(&functor)));
    }

    #[test]
    fn test_redefinition_appends_first_wins() {
        let interner = StringInterner::new();
        let f = interner.intern("f");

        let mut table = FunctionTable::new();
        let first = FunctorValue::new(f, vec![], Node::int(1));
        let second = FunctorValue::new(f, vec![], Node::int(2));
        table.define(f, first.clone());
        table.define(f, second);

        assert!(table.resolve(f).is_some_and(|r| r.same_functor(&first)));
        assert_eq!(table.len(), 1);
    }
}
