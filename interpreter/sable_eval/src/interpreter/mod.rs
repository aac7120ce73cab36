//! Tree-walking interpreter for Sable.
//!
//! # Architecture
//!
//! All evaluation goes through `eval(&Node)`, a single recursive function
//! matching on the node kind. Every arm is a transition on the operand
//! stack: a successful evaluation pushes exactly one value, statements pop
//! intermediates, and the stack top is the current result. `eval_value` is
//! the pop-returning convenience used wherever an arm needs an operand.
//!
//! Function calls push a restrictive frame through the RAII guard in
//! `scope_guard.rs`, so the frame is popped on all exit paths including
//! error propagation.

mod function_call;
mod scope_guard;

pub use scope_guard::ScopedInterpreter;

use sable_ir::{
    Location, LogicalOp, MapEntry, Name, Node, NodeKind, StringInterner, StringLookup,
};
use sable_match::{
    invalid_assignment_target, match_pattern, undefined_variable, unsupported_node, EvalError,
    EvalResult, FunctorValue, PatternExecutor, TypeValue, Value, ValueMap,
};

use crate::environment::SymbolTable;
use crate::functions::FunctionTable;
use crate::kernel::Kernel;
use crate::operators::{
    evaluate_binary, evaluate_equality, evaluate_relational, evaluate_unary,
};
use crate::sink::{stderr_sink, SharedErrorSink};
use crate::stack::{ensure_sufficient_stack, OperandStack};

/// Tree-walking interpreter for Sable programs.
///
/// A single instance is strictly single-threaded and owns its symbol
/// table, function table, operand stack, and kernel type registry. Values
/// may not cross instances.
pub struct Interpreter<'a> {
    /// String interner for name lookup.
    pub(crate) interner: &'a StringInterner,
    /// Symbol table: frame stack with restrictive bits.
    pub(crate) symbols: SymbolTable,
    /// Named functor registry.
    pub(crate) functions: FunctionTable,
    /// Operand stack holding intermediate results.
    pub(crate) stack: OperandStack,
    /// Canonical types for primitive variants.
    pub(crate) kernel: Kernel,
    /// Destination for captured error reports.
    pub(crate) error_sink: SharedErrorSink,
}

/// Builder for `Interpreter` configuration.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    error_sink: Option<SharedErrorSink>,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        InterpreterBuilder {
            interner,
            error_sink: None,
        }
    }

    /// Direct captured error reports to the given sink.
    #[must_use]
    pub fn error_sink(mut self, sink: SharedErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Build the interpreter, seeding the kernel types into the root scope.
    pub fn build(self) -> Interpreter<'a> {
        let kernel = Kernel::new(self.interner);
        let mut symbols = SymbolTable::new();
        kernel.seed(&mut symbols);
        Interpreter {
            interner: self.interner,
            symbols,
            functions: FunctionTable::new(),
            stack: OperandStack::new(),
            kernel,
            error_sink: self.error_sink.unwrap_or_else(stderr_sink),
        }
    }
}

impl<'a> Interpreter<'a> {
    /// Create a new interpreter with default configuration.
    ///
    /// For more options, use `Interpreter::builder(interner)`.
    pub fn new(interner: &'a StringInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    /// Create an interpreter builder.
    pub fn builder(interner: &'a StringInterner) -> InterpreterBuilder<'a> {
        InterpreterBuilder::new(interner)
    }

    /// Get the string interner.
    #[inline]
    pub fn interner(&self) -> &StringInterner {
        self.interner
    }

    /// Get the symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Get a mutable reference to the symbol table.
    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Get the function table.
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Get the kernel type registry.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Get the operand stack.
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// Get captured error reports.
    ///
    /// Returns all reports written since the last clear. For the stderr
    /// sink this is an empty string (stderr doesn't capture).
    pub fn captured_errors(&self) -> String {
        self.error_sink.get_output()
    }

    /// Clear captured error reports.
    pub fn clear_captured_errors(&self) {
        self.error_sink.clear();
    }

    /// Run a program.
    ///
    /// With `capture_errors`, failures are formatted (location + kind +
    /// message) to the error sink and `run` returns `Value::Nil`; without
    /// it, the error propagates to the caller. Either way the operand
    /// stack and symbol table are restored to their depths at entry.
    pub fn run(&mut self, program: &Node, capture_errors: bool) -> EvalResult {
        let stack_depth = self.stack.len();
        let scope_depth = self.symbols.depth();
        match self.eval_value(program) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.stack.truncate_to(stack_depth);
                self.symbols.truncate_to(scope_depth);
                if capture_errors {
                    self.error_sink.report(&self.format_error(&err));
                    Ok(Value::Nil)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Format a captured error as `file:line:column: kind: message`.
    fn format_error(&self, err: &EvalError) -> String {
        match err.location {
            Some(loc) => {
                let file = match self.interner.lookup(loc.file) {
                    "" => "<input>",
                    name => name,
                };
                format!("{file}:{}:{}: {err}", loc.line, loc.column)
            }
            None => err.to_string(),
        }
    }

    /// Evaluate a node, pushing exactly one value onto the operand stack.
    pub fn eval(&mut self, node: &Node) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| self.eval_inner(node))
            .map_err(|e| e.or_location(node.location))
    }

    /// Evaluate a node and pop its result off the stack.
    pub fn eval_value(&mut self, node: &Node) -> EvalResult {
        self.eval(node)?;
        match self.stack.pop() {
            Some(value) => Ok(value),
            None => unreachable!("eval pushes exactly one value"),
        }
    }

    /// Node-kind dispatch. Each arm nets exactly one pushed value.
    fn eval_inner(&mut self, node: &Node) -> Result<(), EvalError> {
        match &node.kind {
            NodeKind::IntegerLiteral(n) => {
                self.stack.push(Value::int(*n));
                Ok(())
            }
            NodeKind::FloatLiteral(f) => {
                self.stack.push(Value::float(*f));
                Ok(())
            }
            NodeKind::StringLiteral(s) => {
                self.stack.push(Value::string(s.clone()));
                Ok(())
            }
            NodeKind::SymbolLiteral(name) => {
                self.stack.push(Value::symbol(*name));
                Ok(())
            }
            NodeKind::BooleanLiteral(b) => {
                self.stack.push(Value::Bool(*b));
                Ok(())
            }
            NodeKind::NilLiteral => {
                self.stack.push(Value::Nil);
                Ok(())
            }

            NodeKind::ListLiteral(elements) => {
                // Children evaluate left-to-right; the top N results
                // collect into the list.
                for element in elements {
                    self.eval(element)?;
                }
                let items = self.stack.pop_n(elements.len());
                self.stack.push(Value::list(items));
                Ok(())
            }

            NodeKind::MapLiteral(entries) => self.eval_map_literal(entries),

            NodeKind::VariableReference(name) => {
                let value = self.symbols.get(*name).ok_or_else(|| {
                    undefined_variable(self.interner.lookup(*name))
                })?;
                self.stack.push(value);
                Ok(())
            }

            NodeKind::ConstReference(name) => {
                let value = self.lookup_const_value(*name, node.location)?;
                self.stack.push(value);
                Ok(())
            }

            NodeKind::SimpleAssignment { target, value } => {
                // Identifiers and constants are both assignable names.
                let name = match &target.kind {
                    NodeKind::VariableReference(name) | NodeKind::ConstReference(name) => *name,
                    other => {
                        return Err(invalid_assignment_target(other.kind_name())
                            .with_location(target.location))
                    }
                };
                self.eval(value)?;
                // Bind the stack top by handle, and leave it as the result.
                let Some(top) = self.stack.last() else {
                    unreachable!("eval pushes exactly one value");
                };
                let bound = top.clone();
                self.symbols.set(name, bound, false);
                Ok(())
            }

            NodeKind::MatchAssign { pattern, value } => {
                let matched = self.eval_value(value)?;
                let bindings = match_pattern(pattern, &matched, self)?;
                // Commit only after the whole pattern succeeded.
                for (name, bound) in bindings.into_entries() {
                    self.symbols.set(name, bound, true);
                }
                self.stack.push(matched);
                Ok(())
            }

            NodeKind::LogicalExpression { op, lhs, rhs } => {
                // Short-circuit: the right operand only evaluates when the
                // left does not decide the result.
                let lhs_truthy = self.eval_value(lhs)?.is_truthy();
                let result = match op {
                    LogicalOp::And => lhs_truthy && self.eval_value(rhs)?.is_truthy(),
                    LogicalOp::Or => lhs_truthy || self.eval_value(rhs)?.is_truthy(),
                };
                self.stack.push(Value::Bool(result));
                Ok(())
            }

            NodeKind::EqualityExpression { op, lhs, rhs } => {
                let left = self.eval_value(lhs)?;
                let right = self.eval_value(rhs)?;
                self.stack.push(evaluate_equality(&left, &right, *op));
                Ok(())
            }

            NodeKind::RelationalExpression { op, lhs, rhs } => {
                let left = self.eval_value(lhs)?;
                let right = self.eval_value(rhs)?;
                let result = evaluate_relational(left, right, *op, self.interner)?;
                self.stack.push(result);
                Ok(())
            }

            NodeKind::BinaryExpression { op, lhs, rhs } => {
                let left = self.eval_value(lhs)?;
                let right = self.eval_value(rhs)?;
                let result = evaluate_binary(left, right, *op, self.interner)?;
                self.stack.push(result);
                Ok(())
            }

            NodeKind::UnaryExpression { op, operand } => {
                let value = self.eval_value(operand)?;
                let result = evaluate_unary(*op, value, self.interner)?;
                self.stack.push(result);
                Ok(())
            }

            NodeKind::FunctionDefinition { name, params, body } => {
                let functor = FunctorValue::new(*name, params.clone(), (**body).clone());
                self.functions.define(*name, functor.clone());
                self.stack.push(Value::functor(functor));
                Ok(())
            }

            NodeKind::FunctionCall { callee, args } => {
                self.eval_function_call(callee, args, node.location)
            }

            NodeKind::Block(children) | NodeKind::ExpressionList(children) => {
                self.eval_sequence(children)
            }

            // Pattern-only kinds are not expressions.
            NodeKind::SplatPattern(_) | NodeKind::InterpolationExpression(_) => {
                Err(unsupported_node(node.kind.kind_name()))
            }
        }
    }

    /// Evaluate a map literal: values left-to-right with static keys.
    fn eval_map_literal(&mut self, entries: &[MapEntry]) -> Result<(), EvalError> {
        for entry in entries {
            self.eval(&entry.value)?;
        }
        let values = self.stack.pop_n(entries.len());
        let mut map = ValueMap::default();
        for (entry, value) in entries.iter().zip(values) {
            map.insert(entry.key, value);
        }
        self.stack.push(Value::map(map));
        Ok(())
    }

    /// Evaluate children in order, discarding all but the last result.
    ///
    /// An empty sequence results in Nil, preserving the one-value stack
    /// effect.
    fn eval_sequence(&mut self, children: &[Node]) -> Result<(), EvalError> {
        match children.split_last() {
            None => {
                self.stack.push(Value::Nil);
                Ok(())
            }
            Some((last, init)) => {
                for child in init {
                    self.eval(child)?;
                    self.stack.pop();
                }
                self.eval(last)
            }
        }
    }

    /// Resolve a constant: scope lookup first, then the kernel registry.
    ///
    /// The kernel fallback keeps canonical types visible inside
    /// restrictive call frames, which do not chain to the root scope.
    fn lookup_const_value(&mut self, name: Name, location: Location) -> EvalResult {
        if let Some(value) = self.symbols.get(name) {
            return Ok(value);
        }
        if let Some(ty) = self.kernel.by_name(name) {
            return Ok(Value::Type(ty));
        }
        Err(undefined_variable(self.interner.lookup(name)).with_location(location))
    }
}

impl StringLookup for Interpreter<'_> {
    fn lookup(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }
}

/// The match engine's view of the evaluator: interpolation evaluation,
/// const resolution, and canonical-type lookup.
impl PatternExecutor for Interpreter<'_> {
    fn eval_expr(&mut self, expr: &Node) -> EvalResult {
        self.eval_value(expr)
    }

    fn lookup_const(&mut self, name: Name, location: Location) -> EvalResult {
        self.lookup_const_value(name, location)
    }

    fn type_of(&self, value: &Value) -> Option<TypeValue> {
        Some(self.kernel.type_of(value))
    }
}
