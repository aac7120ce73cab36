//! RAII scope guard for interpreter frame management.
//!
//! Every site that pushes a frame must guarantee the matching pop on all
//! exit paths, including error propagation. The [`ScopedInterpreter`] guard
//! pushes a frame on creation and pops it on drop, even during unwinding.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! allowing transparent access to all interpreter methods while it lives.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// RAII guard that pops an interpreter frame on drop.
///
/// Access the interpreter through this guard - it implements `Deref` and
/// `DerefMut`. When the guard is dropped (including on error propagation or
/// panic), the frame it pushed is popped.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        // The guard pushed this frame, so the pop cannot underflow.
        let _ = self.interpreter.symbols.pop_frame();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a frame and return a guard that pops it on drop.
    ///
    /// Function calls use `restrictive` frames (no lookup chaining to the
    /// caller); block-structured hosts may push permissive ones.
    pub fn scoped(&mut self, restrictive: bool) -> ScopedInterpreter<'_, 'a> {
        self.symbols.push_frame(restrictive);
        ScopedInterpreter { interpreter: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ir::StringInterner;
    use sable_match::Value;

    #[test]
    fn test_guard_pops_on_drop() {
        let interner = StringInterner::new();
        let mut interp = Interpreter::new(&interner);
        let depth = interp.symbols().depth();
        {
            let _scoped = interp.scoped(true);
        }
        assert_eq!(interp.symbols().depth(), depth);
    }

    #[test]
    fn test_guard_frame_is_restrictive() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut interp = Interpreter::new(&interner);
        interp.symbols_mut().set(x, Value::int(1), true);

        let scoped = interp.scoped(true);
        assert_eq!(scoped.symbols().get(x), None);
        drop(scoped);
        assert_eq!(interp.symbols().get(x), Some(Value::int(1)));
    }
}
