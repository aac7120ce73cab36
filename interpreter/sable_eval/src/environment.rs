//! Symbol table for variable scoping in the interpreter.
//!
//! The symbol table is a stack of owned frames, each carrying a restrictive
//! bit. A restrictive frame (a function call frame) does not chain lookups
//! to the frames below it; a permissive frame does. The bottom frame is the
//! root scope, which holds the kernel's canonical types and is never popped.

use rustc_hash::FxHashMap;
use sable_ir::Name;
use sable_match::{errors::scope_underflow, EvalError, Value};

/// A single scope frame containing variable bindings.
#[derive(Debug)]
pub struct Frame {
    /// Variable bindings in this frame (`FxHashMap` for faster hashing with
    /// `Name` keys).
    bindings: FxHashMap<Name, Value>,
    /// Whether lookups stop at this frame instead of chaining downward.
    restrictive: bool,
}

impl Frame {
    fn new(restrictive: bool) -> Self {
        Frame {
            bindings: FxHashMap::default(),
            restrictive,
        }
    }

    /// Whether this frame blocks lookups from chaining to its parent.
    #[inline]
    pub fn is_restrictive(&self) -> bool {
        self.restrictive
    }

    /// Look up a binding in this frame only.
    #[inline]
    pub fn get(&self, name: Name) -> Option<Value> {
        self.bindings.get(&name).cloned()
    }

    /// Create or overwrite a binding in this frame.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Whether this frame binds the name.
    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Number of bindings in this frame.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this frame has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Symbol table: a stack of frames with the active frame on top.
///
/// Lookup starts at the active frame and walks downward; a restrictive
/// frame that lacks the binding fails the lookup at that frame.
pub struct SymbolTable {
    frames: Vec<Frame>,
}

impl SymbolTable {
    /// Create a symbol table with a permissive root frame.
    pub fn new() -> Self {
        SymbolTable {
            frames: vec![Frame::new(false)],
        }
    }

    /// Current frame depth (the root counts as 1).
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The active frame.
    pub fn top(&self) -> &Frame {
        let Some(frame) = self.frames.last() else {
            unreachable!("symbol table always holds the root frame");
        };
        frame
    }

    fn top_mut(&mut self) -> &mut Frame {
        let Some(frame) = self.frames.last_mut() else {
            unreachable!("symbol table always holds the root frame");
        };
        frame
    }

    /// Look up a binding, walking frames top-down.
    ///
    /// A restrictive frame that does not bind the name stops the walk.
    pub fn get(&self, name: Name) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Some(value);
            }
            if frame.restrictive {
                return None;
            }
        }
        None
    }

    /// Bind a name.
    ///
    /// With `make_new`, the binding is created (or overwritten) in the
    /// active frame. Without it, the nearest visible frame already binding
    /// the name is mutated (same restrictive walk as `get`); if none binds
    /// it, the binding is created in the active frame.
    pub fn set(&mut self, name: Name, value: Value, make_new: bool) {
        if !make_new {
            for frame in self.frames.iter_mut().rev() {
                if frame.contains(name) {
                    frame.define(name, value);
                    return;
                }
                if frame.restrictive {
                    break;
                }
            }
        }
        self.top_mut().define(name, value);
    }

    /// Push a new frame onto the stack.
    pub fn push_frame(&mut self, restrictive: bool) {
        self.frames.push(Frame::new(restrictive));
    }

    /// Pop the active frame.
    ///
    /// Popping the root frame is a ScopeUnderflow error.
    pub fn pop_frame(&mut self) -> Result<(), EvalError> {
        if self.frames.len() <= 1 {
            return Err(scope_underflow());
        }
        self.frames.pop();
        Ok(())
    }

    /// Create or overwrite a binding in the root frame.
    ///
    /// Used to seed the kernel's canonical types.
    pub fn define_root(&mut self, name: Name, value: Value) {
        let Some(frame) = self.frames.first_mut() else {
            unreachable!("symbol table always holds the root frame");
        };
        frame.define(name, value);
    }

    /// Drop frames above `depth`.
    ///
    /// Error-recovery hook for `run`: frames pushed by an erroring call are
    /// popped by their guards, and this restores the invariant even if an
    /// error escapes between push and guard construction.
    pub fn truncate_to(&mut self, depth: usize) {
        while self.frames.len() > depth.max(1) {
            self.frames.pop();
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ir::StringInterner;

    #[test]
    fn test_define_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(42), true);
        assert_eq!(symbols.get(x), Some(Value::int(42)));
    }

    #[test]
    fn test_shadowing_and_pop() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);

        symbols.push_frame(false);
        symbols.set(x, Value::int(2), true);
        assert_eq!(symbols.get(x), Some(Value::int(2)));

        symbols.pop_frame().expect("non-root frame");
        assert_eq!(symbols.get(x), Some(Value::int(1)));
    }

    #[test]
    fn test_permissive_frame_chains_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);
        symbols.push_frame(false);
        assert_eq!(symbols.get(x), Some(Value::int(1)));
    }

    #[test]
    fn test_restrictive_frame_blocks_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);
        symbols.push_frame(true);
        assert!(symbols.top().is_restrictive());
        assert_eq!(symbols.get(x), None);

        // Bindings inside the restrictive frame are visible.
        symbols.set(x, Value::int(2), true);
        assert_eq!(symbols.get(x), Some(Value::int(2)));
    }

    #[test]
    fn test_set_mutates_nearest_binding_frame() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);
        symbols.push_frame(false);

        // Without make_new, the root binding is mutated.
        symbols.set(x, Value::int(2), false);
        symbols.pop_frame().expect("non-root frame");
        assert_eq!(symbols.get(x), Some(Value::int(2)));
    }

    #[test]
    fn test_make_new_binds_in_active_frame() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);
        symbols.push_frame(false);

        symbols.set(x, Value::int(2), true);
        symbols.pop_frame().expect("non-root frame");
        assert_eq!(symbols.get(x), Some(Value::int(1)));
    }

    #[test]
    fn test_set_behind_restrictive_frame_creates_locally() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut symbols = SymbolTable::new();
        symbols.set(x, Value::int(1), true);
        symbols.push_frame(true);

        // The root binding is not visible, so a new local binding is made.
        symbols.set(x, Value::int(2), false);
        symbols.pop_frame().expect("non-root frame");
        assert_eq!(symbols.get(x), Some(Value::int(1)));
    }

    #[test]
    fn test_pop_root_is_underflow() {
        let mut symbols = SymbolTable::new();
        let err = symbols.pop_frame().unwrap_err();
        assert_eq!(err.kind, sable_match::ErrorKind::ScopeUnderflow);
    }

    #[test]
    fn test_truncate_to_keeps_root() {
        let mut symbols = SymbolTable::new();
        symbols.push_frame(true);
        symbols.push_frame(false);
        symbols.truncate_to(1);
        assert_eq!(symbols.depth(), 1);
        symbols.truncate_to(0);
        assert_eq!(symbols.depth(), 1);
    }
}
