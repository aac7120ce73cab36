//! String interner for identifiers and symbols.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked into
//! `'static` storage, so `lookup` hands out `&'static str` without holding
//! a lock across the caller.

// Arc is needed for SharedInterner - a host may share one interner across
// several interpreter instances.
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Interner exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {} strings, max is {}",
                count,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Storage for interned strings.
struct InternStore {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Interned string contents, indexed by `Name::raw()`.
    strings: Vec<&'static str>,
}

impl InternStore {
    fn with_empty() -> Self {
        // Pre-intern empty string at index 0 (Name::EMPTY)
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        InternStore {
            map,
            strings: vec![empty],
        }
    }
}

/// Resolve a `Name` back to its string content.
///
/// Implemented by `StringInterner`; consumers that only need to render names
/// (error messages, value display) can take this trait instead of the
/// concrete interner.
pub trait StringLookup {
    /// Resolve an interned name to its string content.
    fn lookup(&self, name: Name) -> &'static str;
}

/// String interner with lock-guarded insert and leak-based `'static` lookup.
pub struct StringInterner {
    store: RwLock<InternStore>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        StringInterner {
            store: RwLock::new(InternStore::with_empty()),
        }
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned
        {
            let guard = self.store.read();
            if let Some(&idx) = guard.map.get(s) {
                return Ok(Name::from_raw(idx));
            }
        }

        let mut guard = self.store.write();

        // Double-check after acquiring the write lock
        if let Some(&idx) = guard.map.get(s) {
            return Ok(Name::from_raw(idx));
        }

        // Leak the string to get 'static lifetime
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);
        Ok(Name::from_raw(idx))
    }

    /// Intern a string, returning its `Name`.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity (over 4 billion strings).
    /// Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.store.read().strings.len()
    }

    /// Whether the interner holds only the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &'static str {
        let guard = self.store.read();
        guard
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle for hosts that run multiple interpreters.
pub type SharedInterner = Arc<StringInterner>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedupes() {
        let interner = StringInterner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_strings_distinct_names() {
        let interner = StringInterner::new();
        assert_ne!(interner.intern("a"), interner.intern("b"));
    }

    #[test]
    fn test_lookup_roundtrip() {
        let interner = StringInterner::new();
        let name = interner.intern("identifier");
        assert_eq!(interner.lookup(name), "identifier");
    }

    #[test]
    fn test_empty_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }
}
