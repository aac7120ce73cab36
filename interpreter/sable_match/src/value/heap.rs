//! Reference-counted payload wrapper for container values.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Shared payload of a container `Value`.
///
/// Wraps `Rc<T>` with a crate-private constructor so all heap allocations go
/// through `Value` factory methods. Cloning a `Heap` clones the handle, not
/// the payload: containers are bound by reference.
///
/// # Thread Safety
/// `Heap<T>` is NOT thread-safe. The interpreter is strictly single-threaded
/// and values may not cross instances, so `Rc` is used instead of `Arc`.
#[repr(transparent)]
pub struct Heap<T>(Rc<T>);

impl<T> Heap<T> {
    /// Create a new heap payload. Crate-private: external code constructs
    /// heap values through `Value` factories only.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }

    /// Whether two handles share the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Heap<T>, b: &Heap<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(self, other) || *self.0 == *other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_allocation() {
        let a = Heap::new(vec![1, 2, 3]);
        let b = a.clone();
        assert!(Heap::ptr_eq(&a, &b));
    }

    #[test]
    fn test_separate_allocations_compare_structurally() {
        let a = Heap::new(vec![1, 2]);
        let b = Heap::new(vec![1, 2]);
        assert!(!Heap::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }
}
