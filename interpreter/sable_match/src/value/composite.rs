//! Composite value types: types, instances, and functors.
//!
//! These carry shared internal structure (scopes, parameter lists, body
//! trees) behind reference-counted handles, so cloning a composite `Value`
//! clones handles only.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sable_ir::{Name, Node, Param};

use super::{Heap, Value};

/// Shared, mutable scope referenced by Type and Instance values.
///
/// This is a factory wrapper around `Rc<RefCell<FxHashMap<Name, Value>>>`.
/// It is distinct from the evaluator's symbol-table frames: those are owned
/// by the frame stack, while instance scopes are owned by the values that
/// reference them and may outlive any frame.
///
/// # Thread Safety
/// NOT thread-safe (`Rc`); the interpreter is single-threaded and values may
/// not cross instances.
pub struct ScopeHandle(Rc<RefCell<FxHashMap<Name, Value>>>);

impl ScopeHandle {
    /// Create a new empty scope.
    pub fn new() -> Self {
        ScopeHandle(Rc::new(RefCell::new(FxHashMap::default())))
    }

    /// Look up a binding.
    pub fn get(&self, name: Name) -> Option<Value> {
        self.0.borrow().get(&name).cloned()
    }

    /// Create or overwrite a binding.
    pub fn set(&self, name: Name, value: Value) {
        self.0.borrow_mut().insert(name, value);
    }

    /// Whether a binding exists.
    pub fn contains(&self, name: Name) -> bool {
        self.0.borrow().contains_key(&name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Whether two handles reference the same scope.
    #[inline]
    pub fn ptr_eq(a: &ScopeHandle, b: &ScopeHandle) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Clone for ScopeHandle {
    #[inline]
    fn clone(&self) -> Self {
        ScopeHandle(Rc::clone(&self.0))
    }
}

impl Default for ScopeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeHandle({} bindings)", self.len())
    }
}

/// Shared data of a type object.
#[derive(Debug)]
struct TypeData {
    /// Type name.
    name: Name,
    /// Names visible on instances of this type.
    instance_scope: ScopeHandle,
    /// Scope the type was defined in, when nested.
    enclosing: Option<ScopeHandle>,
}

/// A named type object.
///
/// Type identity is handle identity: two `TypeValue`s are the same type iff
/// they share the same underlying data. The kernel keeps one canonical
/// `TypeValue` per primitive variant, which makes `type_of` identity-stable.
#[derive(Clone, Debug)]
pub struct TypeValue {
    data: Heap<TypeData>,
}

impl TypeValue {
    /// Create a new type object with an empty instance scope.
    pub fn new(name: Name) -> Self {
        TypeValue {
            data: Heap::new(TypeData {
                name,
                instance_scope: ScopeHandle::new(),
                enclosing: None,
            }),
        }
    }

    /// Create a new type object nested in an enclosing scope.
    pub fn with_enclosing(name: Name, enclosing: ScopeHandle) -> Self {
        TypeValue {
            data: Heap::new(TypeData {
                name,
                instance_scope: ScopeHandle::new(),
                enclosing: Some(enclosing),
            }),
        }
    }

    /// Type name.
    #[inline]
    pub fn name(&self) -> Name {
        self.data.name
    }

    /// Scope holding names visible on instances of this type.
    pub fn instance_scope(&self) -> ScopeHandle {
        self.data.instance_scope.clone()
    }

    /// Enclosing scope, when the type is nested.
    pub fn enclosing(&self) -> Option<ScopeHandle> {
        self.data.enclosing.clone()
    }

    /// Whether two values denote the same type (handle identity).
    #[inline]
    pub fn same_type(&self, other: &TypeValue) -> bool {
        Heap::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for TypeValue {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other)
    }
}

/// An instance of a user-defined type: the owning type plus the instance's
/// own scope (instance variables).
#[derive(Clone, Debug)]
pub struct InstanceValue {
    ty: TypeValue,
    scope: ScopeHandle,
}

impl InstanceValue {
    /// Create a new instance of a type with an empty scope.
    pub fn new(ty: TypeValue) -> Self {
        InstanceValue {
            ty,
            scope: ScopeHandle::new(),
        }
    }

    /// The instance's type.
    #[inline]
    pub fn type_value(&self) -> &TypeValue {
        &self.ty
    }

    /// The instance's own scope.
    pub fn scope(&self) -> ScopeHandle {
        self.scope.clone()
    }

    /// Whether two values denote the same instance (scope identity).
    #[inline]
    pub fn same_instance(&self, other: &InstanceValue) -> bool {
        ScopeHandle::ptr_eq(&self.scope, &other.scope)
    }
}

impl PartialEq for InstanceValue {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

/// A callable value wrapping a function definition.
///
/// Carries the formal parameter list and the body tree behind shared
/// handles; the function table and the `Functor` value pushed at definition
/// time share the same definition.
#[derive(Clone)]
pub struct FunctorValue {
    name: Name,
    params: Heap<Vec<Param>>,
    body: Heap<Node>,
}

impl FunctorValue {
    /// Create a functor from a definition's name, parameters, and body.
    pub fn new(name: Name, params: Vec<Param>, body: Node) -> Self {
        FunctorValue {
            name,
            params: Heap::new(params),
            body: Heap::new(body),
        }
    }

    /// Defined name.
    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    /// Formal parameters.
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Body tree.
    #[inline]
    pub fn body(&self) -> &Node {
        &self.body
    }

    /// Position of the splat parameter, if any.
    ///
    /// The parser guarantees at most one; the first is authoritative.
    pub fn splat_index(&self) -> Option<usize> {
        self.params.iter().position(|p| p.splat)
    }

    /// Number of non-splat parameters.
    pub fn fixed_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.splat).count()
    }

    /// Whether two values wrap the same definition (body identity).
    #[inline]
    pub fn same_functor(&self, other: &FunctorValue) -> bool {
        Heap::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for FunctorValue {
    fn eq(&self, other: &Self) -> bool {
        self.same_functor(other)
    }
}

impl fmt::Debug for FunctorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctorValue({:?}, {} params)", self.name, self.params.len())
    }
}
